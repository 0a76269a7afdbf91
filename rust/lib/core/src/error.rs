use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Machine-readable codes sent as `{"code": ..., "message": ...}`.
/// Clients match on these, never on the message.
pub mod error_code {
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const ALREADY_EXISTS: &str = "ALREADY_EXISTS";
    pub const VALIDATION_FAILED: &str = "VALIDATION_FAILED";
    pub const UNAUTHENTICATED: &str = "UNAUTHENTICATED";
    pub const PERMISSION_DENIED: &str = "PERMISSION_DENIED";
    pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
    pub const INTERNAL: &str = "INTERNAL";
}

/// Error returned by every service call and HTTP handler.
///
/// The `Display` output is the bare message, so `companies/17` renders as
/// `{"code": "NOT_FOUND", "message": "companies/17"}`.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("{0}")]
    NotFound(String),

    /// Unique key already taken (company code, username, email).
    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    PermissionDenied(String),

    #[error("{0}")]
    Storage(String),

    #[error("{0}")]
    Internal(String),
}

impl ServiceError {
    fn classify(&self) -> (StatusCode, &'static str) {
        use error_code::*;
        match self {
            ServiceError::NotFound(_) => (StatusCode::NOT_FOUND, NOT_FOUND),
            ServiceError::Conflict(_) => (StatusCode::CONFLICT, ALREADY_EXISTS),
            ServiceError::Validation(_) => (StatusCode::BAD_REQUEST, VALIDATION_FAILED),
            ServiceError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, UNAUTHENTICATED),
            ServiceError::PermissionDenied(_) => (StatusCode::FORBIDDEN, PERMISSION_DENIED),
            ServiceError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, STORAGE_ERROR),
            ServiceError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL),
        }
    }

    pub fn error_code(&self) -> &'static str {
        self.classify().1
    }

    pub fn status_code(&self) -> StatusCode {
        self.classify().0
    }

    /// Classify a storage failure message. SQLite reports unique-index
    /// violations as `UNIQUE constraint failed: <table>.<column>`.
    pub fn from_storage(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        if msg.contains("UNIQUE constraint") {
            ServiceError::Conflict(msg)
        } else {
            ServiceError::Storage(msg)
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let (status, code) = self.classify();
        if status.is_server_error() {
            tracing::error!(code, error = %self, "request failed");
        }
        let body = serde_json::json!({ "code": code, "message": self.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        let cases = [
            (ServiceError::NotFound("x".into()), 404, "NOT_FOUND"),
            (ServiceError::Conflict("x".into()), 409, "ALREADY_EXISTS"),
            (ServiceError::Validation("x".into()), 400, "VALIDATION_FAILED"),
            (ServiceError::Unauthorized("x".into()), 401, "UNAUTHENTICATED"),
            (ServiceError::PermissionDenied("x".into()), 403, "PERMISSION_DENIED"),
            (ServiceError::Storage("x".into()), 500, "STORAGE_ERROR"),
            (ServiceError::Internal("x".into()), 500, "INTERNAL"),
        ];
        for (err, status, code) in cases {
            assert_eq!(err.status_code().as_u16(), status);
            assert_eq!(err.error_code(), code);
        }
    }

    #[test]
    fn test_company_code_collision_is_conflict() {
        let err = ServiceError::from_storage("UNIQUE constraint failed: companies.code");
        assert!(matches!(err, ServiceError::Conflict(_)));

        let err = ServiceError::from_storage("disk I/O error");
        assert!(matches!(err, ServiceError::Storage(_)));
    }

    #[tokio::test]
    async fn test_response_body() {
        let resp = ServiceError::NotFound("companies/17".into()).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, serde_json::json!({"code": "NOT_FOUND", "message": "companies/17"}));
    }
}
