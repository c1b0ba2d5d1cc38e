//! API error type and HTTP response mapping.
//!
//! Every failure leaves the API as a JSON body `{"error": "<message>"}` with
//! a non-2xx status, so form-facing callers can surface the message directly.

use api_shared::auth::AuthError;
use api_shared::wire::ErrorRes;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use rdv_core::SchedulingError;

/// API result type.
pub type ApiResult<T> = Result<T, ApiError>;

/// HTTP API error carrying the status and caller-facing message.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    /// Returns an error response for invalid input.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Returns an error response for authentication failures.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    /// Returns an error response for missing resources.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// Returns an error response for booking conflicts (lost race, illegal
    /// transition).
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    /// Returns an internal error response.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Returns an error response for a temporarily unavailable store.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, message)
    }

    /// Returns the HTTP status code for this error.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the caller-facing message.
    pub fn message(&self) -> &str {
        &self.message
    }

    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorRes {
                error: self.message,
            }),
        )
            .into_response()
    }
}

impl From<SchedulingError> for ApiError {
    fn from(value: SchedulingError) -> Self {
        let message = value.to_string();
        match value {
            SchedulingError::InvalidDate(_)
            | SchedulingError::InvalidTime(_)
            | SchedulingError::InvalidType(_)
            | SchedulingError::InvalidStatus(_)
            | SchedulingError::InvalidConfig(_) => Self::bad_request(message),
            SchedulingError::SlotTaken { .. } | SchedulingError::InvalidTransition { .. } => {
                Self::conflict(message)
            }
            SchedulingError::NotFound(_) => Self::not_found(message),
            SchedulingError::RepositoryUnavailable(e) => {
                tracing::error!("appointment store unavailable: {e}");
                Self::unavailable("appointment store temporarily unavailable")
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(value: AuthError) -> Self {
        match value {
            AuthError::NotConfigured => {
                tracing::error!("staff API key not configured");
                Self::internal("staff access not configured")
            }
            AuthError::Missing | AuthError::Invalid => Self::unauthorized(value.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdv_core::DateRejection;

    #[test]
    fn test_invalid_date_maps_to_bad_request() {
        let err = ApiError::from(SchedulingError::InvalidDate(DateRejection::Weekend));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(err.message().contains("Monday to Friday"));
    }

    #[test]
    fn test_store_failure_maps_to_service_unavailable() {
        let err = ApiError::from(SchedulingError::RepositoryUnavailable(
            rdv_core::StoreError::FileRead(std::io::Error::other("disk gone")),
        ));
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
        // Store internals never leak to the caller.
        assert!(!err.message().contains("disk gone"));
    }
}
