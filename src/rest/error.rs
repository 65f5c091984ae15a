use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::models::ErrorResponse;
use crate::types::MaintenanceError;

/// Handler error: domain failures keep their status, everything else is a 500.
pub struct ApiError(anyhow::Error);

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self.0.downcast_ref::<MaintenanceError>() {
            Some(err @ MaintenanceError::ReferenceNotFound { .. }) => {
                (StatusCode::NOT_FOUND, err.to_string())
            }
            Some(err @ MaintenanceError::InvalidInput(_)) => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            None => {
                log::error!("Request failed: {:#}", self.0);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };
        (status, Json(ErrorResponse { message })).into_response()
    }
}
