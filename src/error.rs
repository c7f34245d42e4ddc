use axum::{http::StatusCode, response::Json};
use serde::Serialize;
use serde_json::json;
use utoipa::ToSchema;

use crate::models::ValidationError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Restaurant not found")]
    RestaurantNotFound,
    #[error("Restaurant or Pizza not found")]
    RestaurantOrPizzaNotFound,
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),
    #[error("connection pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match &self {
            ApiError::RestaurantNotFound | ApiError::RestaurantOrPizzaNotFound => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": self.to_string() })),
            )
                .into_response(),
            ApiError::Validation(err) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "errors": [err.to_string()] })),
            )
                .into_response(),
            ApiError::Database(_) | ApiError::Pool(_) => {
                tracing::error!("request failed: {self}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Internal server error" })),
                )
                    .into_response()
            }
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiErrorResponse {
    /// Error message
    pub error: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ValidationErrorResponse {
    /// Validation failure messages
    pub errors: Vec<String>,
}
