use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::api::ApiError;

/// Failures a request handler can end with.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("no such blog")]
    NotFound,

    #[error("not allowed for this viewer")]
    Unauthorized,

    #[error("session store: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("session store pool: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("session store lock poisoned")]
    Poisoned,

    #[error("session payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("Inkwell API: {0}")]
    Api(#[from] ApiError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Api(_) => StatusCode::BAD_GATEWAY,
            AppError::Storage(_) | AppError::Pool(_) | AppError::Poisoned | AppError::Payload(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::NotFound => "Blog not found".to_string(),
            AppError::Unauthorized => "You are not allowed to do that".to_string(),
            AppError::Api(e) => {
                tracing::warn!("{}", self);
                e.user_message("Something went wrong. Please try again.")
            }
            _ => {
                tracing::error!("{}", self);
                "Internal server error".to_string()
            }
        };

        (status, message).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
