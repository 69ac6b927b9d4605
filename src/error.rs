use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use derive_more::Display;
use serde_json::json;

/// Error taxonomy shared by the ledger, the store and the HTTP handlers.
///
/// Validation and not-found errors carry a caller-facing message; storage
/// failures are logged in full and surfaced as a generic message only.
#[derive(Debug, Display)]
pub enum ApiError {
    /// Missing or malformed required fields. Caller's fault, no retry.
    #[display(fmt = "{}", _0)]
    Validation(String),

    /// Malformed or inconsistent overtime time-of-day values.
    #[display(fmt = "{}", _0)]
    InvalidTimeRange(String),

    /// Lookup or patch against a row that does not exist.
    #[display(fmt = "{}", _0)]
    RecordNotFound(String),

    /// Unique-key conflict, e.g. registering an email twice.
    #[display(fmt = "{}", _0)]
    Conflict(String),

    /// Underlying read/write failure. Never leaks driver detail to clients.
    #[display(fmt = "Internal server error")]
    Storage(sqlx::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        ApiError::Storage(e)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::InvalidTimeRange(_) => StatusCode::BAD_REQUEST,
            ApiError::RecordNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let ApiError::Storage(e) = self {
            tracing::error!(error = %e, "storage failure");
        }

        HttpResponse::build(self.status_code()).json(json!({
            "error": self.to_string()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_bad_request() {
        let err = ApiError::Validation("Project name is required".into());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Project name is required");
    }

    #[test]
    fn record_not_found_maps_to_not_found() {
        let err = ApiError::RecordNotFound("Attendance record not found".into());
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn storage_error_hides_driver_detail() {
        let err = ApiError::Storage(sqlx::Error::PoolClosed);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Internal server error");
    }
}
