use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{error::AppError, store::Favorite};

/// Request body for adding a favorite. `favorite_id` may be sent as a string or a number.
#[derive(Debug, Deserialize)]
pub struct CreateFavoriteRequest {
    pub favorite_type: String,
    pub favorite_id: Value,
}

impl CreateFavoriteRequest {
    pub fn favorite_id(&self) -> Result<String, AppError> {
        match &self.favorite_id {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(n.to_string()),
            _ => Err(AppError::BadRequest(
                "favorite_id must be a string or a number".into(),
            )),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FavoriteView {
    pub id: i64,
    pub user_id: Option<i64>,
    pub favorite_type: String,
    pub favorite_id: String,
}

impl From<Favorite> for FavoriteView {
    fn from(f: Favorite) -> Self {
        Self {
            id: f.id,
            user_id: f.user_id,
            favorite_type: f.favorite_type,
            favorite_id: f.favorite_id,
        }
    }
}
