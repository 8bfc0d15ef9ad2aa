use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::{debug, error};

use crate::service::ServiceError;

/// Boundary error. Every NotFound reason renders as the same fixed payload;
/// clients cannot tell a missing student from a missing grade or a bad
/// subject tag. The reason still lands in the logs.
pub struct ApiError(ServiceError);

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.0 {
            ServiceError::NotFound(reason) => {
                debug!(?reason, "lookup failed");
                (
                    StatusCode::NOT_FOUND,
                    Json(json!({
                        "status": 404,
                        "message": "Student or Grade was not found"
                    })),
                )
                    .into_response()
            }
            ServiceError::Db(e) => {
                error!(error = %e, "storage failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "status": 500,
                        "message": "internal error"
                    })),
                )
                    .into_response()
            }
        }
    }
}
