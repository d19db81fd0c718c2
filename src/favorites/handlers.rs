//! Favorites are scoped to the caller: the acting user is the token subject,
//! never an id taken from the request.

use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use serde_json::Value;
use tracing::{info, instrument, warn};

use super::dto::{CreateFavoriteRequest, FavoriteView};
use crate::{
    auth::AuthUser,
    error::{AppError, MessageBody},
    extract::{IdPath, JsonBody},
    state::AppState,
    store::{NewFavorite, User},
    validation::{parse_body, require_fields},
};

const REQUIRED: &[&str] = &["favorite_type", "favorite_id"];

pub fn favorite_routes() -> Router<AppState> {
    Router::new()
        .route("/favoritos", get(list_favorites).post(add_favorite))
        .route("/favoritos/:id", get(get_favorite).delete(delete_favorite))
        .route("/favoritos/:id/", get(get_favorite).delete(delete_favorite))
}

async fn acting_user(state: &AppState, mail: &str) -> Result<User, AppError> {
    state.store.find_user_by_mail(mail).await?.ok_or_else(|| {
        warn!(mail = %mail, "token subject has no user");
        AppError::Unauthorized("User not found".into())
    })
}

#[instrument(skip(state, payload))]
pub async fn add_favorite(
    State(state): State<AppState>,
    AuthUser(mail): AuthUser,
    JsonBody(payload): JsonBody<Value>,
) -> Result<Json<MessageBody>, AppError> {
    let user = acting_user(&state, &mail).await?;
    require_fields(&payload, REQUIRED)?;
    let body: CreateFavoriteRequest = parse_body(payload)?;
    let new = NewFavorite {
        user_id: user.id,
        favorite_id: body.favorite_id()?,
        favorite_type: body.favorite_type,
    };

    if state.store.find_matching_favorite(&new).await?.is_some() {
        warn!(user_id = user.id, "favorite already exists");
        return Err(AppError::Duplicate("Favorite"));
    }

    let favorite = state.store.insert_favorite(new).await?;
    info!(favorite_id = favorite.id, user_id = user.id, "favorite added");
    Ok(MessageBody::new("Favorite created successfully"))
}

#[instrument(skip(state))]
pub async fn list_favorites(
    State(state): State<AppState>,
    AuthUser(mail): AuthUser,
) -> Result<Json<Vec<FavoriteView>>, AppError> {
    let user = acting_user(&state, &mail).await?;
    let rows = state.store.list_favorites_by_user(user.id).await?;
    Ok(Json(rows.into_iter().map(FavoriteView::from).collect()))
}

/// Zero or one favorite; someone else's favorite is reported as absent.
#[instrument(skip(state))]
pub async fn get_favorite(
    State(state): State<AppState>,
    AuthUser(mail): AuthUser,
    IdPath(id): IdPath<i64>,
) -> Result<Json<Vec<FavoriteView>>, AppError> {
    let user = acting_user(&state, &mail).await?;
    let row = state
        .store
        .find_favorite(id)
        .await?
        .filter(|f| f.is_owned_by(user.id));
    Ok(Json(row.into_iter().map(FavoriteView::from).collect()))
}

#[instrument(skip(state))]
pub async fn delete_favorite(
    State(state): State<AppState>,
    AuthUser(mail): AuthUser,
    IdPath(id): IdPath<i64>,
) -> Result<Json<MessageBody>, AppError> {
    let user = acting_user(&state, &mail).await?;
    let owned = state
        .store
        .find_favorite(id)
        .await?
        .filter(|f| f.is_owned_by(user.id));
    if owned.is_none() || !state.store.delete_favorite(id).await? {
        warn!(favorite_id = id, user_id = user.id, "favorite not found");
        return Err(AppError::NotFound("Favorite not found".into()));
    }

    info!(favorite_id = id, user_id = user.id, "favorite deleted");
    Ok(MessageBody::new("Favorite was successfully deleted"))
}
