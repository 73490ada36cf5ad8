use axum::{
    Json,
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

use wastetrack_core::CollectionError;

pub const DATABASE_UPDATE_FAILED: &str = "Error updating the database.";
pub const INVALID_SCAN_QUERY: &str =
    "Invalid scan request; send a single houseid parameter.";

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "success": false,
            "message": self.message,
        }));

        (self.status, body).into_response()
    }
}

// Store details stay in the logs; clients only see the generic message.
impl From<CollectionError> for AppError {
    fn from(err: CollectionError) -> Self {
        match err {
            CollectionError::InvalidRequest(msg) => Self::bad_request(msg),
            CollectionError::StoreUnavailable(_) | CollectionError::Query(_) => {
                Self::internal(DATABASE_UPDATE_FAILED)
            }
        }
    }
}

// Keeps malformed query strings on the JSON error contract.
impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        tracing::debug!(error = %rejection.body_text(), "rejected query string");
        Self::bad_request(INVALID_SCAN_QUERY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_request_maps_to_bad_request() {
        let err = AppError::from(CollectionError::InvalidRequest(
            "Household ID is required.".into(),
        ));
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Household ID is required.");
    }

    #[test]
    fn store_failures_hide_driver_details() {
        let err = AppError::from(CollectionError::Query(
            "relation \"collection_logs\" does not exist".into(),
        ));
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, DATABASE_UPDATE_FAILED);
    }
}
