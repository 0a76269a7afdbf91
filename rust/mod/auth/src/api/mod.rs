mod accounts;
mod me;
pub mod middleware;

use std::sync::Arc;

use axum::Router;

use crate::service::AuthService;

pub use middleware::require_auth;

/// Shared application state.
pub type AppState = Arc<AuthService>;

/// Build the auth API router (`/auth/...`).
///
/// Authentication itself is enforced by [`require_auth`], which the server
/// layers over every module's routes.
pub fn build_router(svc: Arc<AuthService>) -> Router {
    let api = Router::new()
        .merge(accounts::routes())
        .merge(me::routes());

    Router::new().nest("/auth", api).with_state(svc)
}
