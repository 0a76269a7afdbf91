//! Auth module: accounts, groups, permissions and token sessions.
//!
//! # Resources
//!
//! - **User**: login identity; superuser flag; direct permissions
//! - **Group**: named permission set; every registered user joins `user`
//! - **Session**: JWT issuance record, revocable on logout
//!
//! Authorization is decided in one place, [`service::policy::authorize`].
//!
//! # Usage
//!
//! ```ignore
//! use auth::{AuthModule, service::AuthConfig};
//!
//! let module = AuthModule::new(sql, AuthConfig::default())?;
//! let router = module.routes(); // /auth/...
//! ```

pub mod model;
pub mod service;
pub mod api;

use std::sync::Arc;

use axum::Router;

use bizdir_core::Module;

use crate::service::{AuthConfig, AuthService};

pub use model::Principal;
pub use service::policy::{Action, authorize};

/// Auth module implementing the Module trait.
pub struct AuthModule {
    service: Arc<AuthService>,
}

impl AuthModule {
    /// Create a new AuthModule.
    pub fn new(
        sql: Arc<dyn bizdir_sql::SQLStore>,
        config: AuthConfig,
    ) -> Result<Self, bizdir_core::ServiceError> {
        let service = AuthService::new(sql, config).map_err(bizdir_core::ServiceError::from)?;
        Ok(Self { service })
    }

    /// Get a reference to the underlying AuthService.
    pub fn service(&self) -> &Arc<AuthService> {
        &self.service
    }
}

impl Module for AuthModule {
    fn name(&self) -> &str {
        "auth"
    }

    fn routes(&self) -> Router {
        api::build_router(self.service.clone())
    }
}
