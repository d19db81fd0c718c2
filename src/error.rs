use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

use crate::store::StoreError;

/// Body of every confirmation and error response: `{"msg": "..."}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageBody {
    pub msg: String,
}

impl MessageBody {
    pub fn new(msg: impl Into<String>) -> Json<Self> {
        Json(Self { msg: msg.into() })
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("No {0} was provided")]
    MissingField(&'static str),

    #[error("{0}")]
    BadRequest(String),

    /// Extractor rejection; keeps axum's status and message.
    #[error("{msg}")]
    Rejected { status: StatusCode, msg: String },

    /// Exact-match record already exists. Reported as 401 for API compatibility.
    #[error("{0} already exists")]
    Duplicate(&'static str),

    /// Same message whether the mail is unknown or the password is wrong.
    #[error("Bad mail or password")]
    AuthenticationFailure,

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Store(StoreError),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate { entity } => AppError::Duplicate(entity),
            other => AppError::Store(other),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Rejected {
            status: rejection.status(),
            msg: rejection.body_text(),
        }
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Rejected {
            status: rejection.status(),
            msg: rejection.body_text(),
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingField(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Rejected { status, .. } => *status,
            Self::Duplicate(_) | Self::AuthenticationFailure | Self::Unauthorized(_) => {
                StatusCode::UNAUTHORIZED
            }
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Store(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let msg = if status.is_server_error() {
            error!(error = %self, "internal error");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };
        (status, MessageBody::new(msg)).into_response()
    }
}
