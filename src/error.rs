use crate::store::StoreError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The client sent an incomplete or malformed request.
    #[error("{0}")]
    Validation(String),

    #[error("post not found")]
    NotFound,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("no route matched")]
    RouteNotFound,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound | ApiError::RouteNotFound => StatusCode::NOT_FOUND,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match &self {
            ApiError::Validation(message) => {
                tracing::warn!("rejected request: {message}");
                message.clone()
            }
            ApiError::NotFound | ApiError::RouteNotFound => String::from("Not found"),
            ApiError::Store(err) => {
                tracing::error!("post store failure: {err}");
                String::from("Internal server error")
            }
        };

        (self.status(), Json(ErrorBody { message })).into_response()
    }
}

impl From<axum::extract::rejection::JsonRejection> for ApiError {
    fn from(rejection: axum::extract::rejection::JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}
