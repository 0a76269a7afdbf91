pub mod schema;
pub mod password;
pub mod user;
pub mod group;
pub mod session;
pub mod policy;
pub mod migrate;

use std::sync::Arc;

use thiserror::Error;

use bizdir_sql::SQLStore;

/// Name of the group every self-registered or migrated user joins.
pub const DEFAULT_GROUP: &str = "user";

/// Auth service error type.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("validation: {0}")]
    Validation(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("storage: {0}")]
    Storage(String),

    #[error("internal: {0}")]
    Internal(String),
}

impl AuthError {
    /// Map a storage failure, surfacing unique-index violations as conflicts.
    pub(crate) fn storage(e: impl ToString) -> Self {
        let msg = e.to_string();
        if msg.contains("UNIQUE constraint") {
            AuthError::Conflict(msg)
        } else {
            AuthError::Storage(msg)
        }
    }
}

impl From<AuthError> for bizdir_core::ServiceError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::NotFound(m) => bizdir_core::ServiceError::NotFound(m),
            AuthError::Conflict(m) => bizdir_core::ServiceError::Conflict(m),
            AuthError::Validation(m) => bizdir_core::ServiceError::Validation(m),
            AuthError::Unauthorized(m) => bizdir_core::ServiceError::Unauthorized(m),
            AuthError::Forbidden(m) => bizdir_core::ServiceError::PermissionDenied(m),
            AuthError::Storage(m) => bizdir_core::ServiceError::Storage(m),
            AuthError::Internal(m) => bizdir_core::ServiceError::Internal(m),
        }
    }
}

/// Configuration for the auth service.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// JWT signing secret.
    pub jwt_secret: String,
    /// Access token lifetime in seconds (default: 24h).
    pub access_token_ttl: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "bizdir-dev-secret-change-me".to_string(),
            access_token_ttl: 86400,
        }
    }
}

/// The Auth service. Holds the SQL store and configuration.
pub struct AuthService {
    pub(crate) sql: Arc<dyn SQLStore>,
    pub(crate) config: AuthConfig,
}

impl AuthService {
    /// Create a new AuthService, initializing the DB schema.
    pub fn new(sql: Arc<dyn SQLStore>, config: AuthConfig) -> Result<Arc<Self>, AuthError> {
        schema::init_schema(sql.as_ref())?;
        Ok(Arc::new(Self { sql, config }))
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use bizdir_sql::SqliteStore;

    use super::{AuthConfig, AuthService};
    use crate::model::SignupRequest;

    pub fn test_service() -> Arc<AuthService> {
        let sql = Arc::new(SqliteStore::open_in_memory().unwrap());
        AuthService::new(sql, AuthConfig::default()).unwrap()
    }

    pub fn signup(svc: &AuthService, username: &str, email: &str) -> crate::model::User {
        svc.signup(SignupRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: "ClaveSegura123!".to_string(),
            confirm_password: "ClaveSegura123!".to_string(),
        })
        .unwrap()
    }
}
