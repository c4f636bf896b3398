//! Global HTTP error shape. Every fallible handler ultimately returns
//! `Result<_, ApiError>`; axum turns the `Err` arm into this JSON body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub status: u16,
    pub error: String,
    pub details: String,
    pub timestamp: String,
}

impl ApiError {
    pub fn internal(err: impl std::fmt::Display) -> Self {
        ApiError {
            status: 500,
            error: "internal_error".to_string(),
            details: err.to_string(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    pub fn not_found(details: impl Into<String>) -> Self {
        ApiError {
            status: 404,
            error: "not_found".to_string(),
            details: details.into(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::internal(err)
    }
}

impl From<collision_avoidance::ScreeningError> for ApiError {
    fn from(err: collision_avoidance::ScreeningError) -> Self {
        ApiError::internal(err)
    }
}
