mod company;

use std::sync::Arc;

use axum::Router;

use crate::service::CompanyService;

/// Shared application state.
pub type AppState = Arc<CompanyService>;

/// Permission resource name for company records (`company:add`, ...).
pub const RESOURCE: &str = "company";

/// Build the company API router (`/companies/...`).
///
/// Handlers take the caller's [`auth::Principal`], so the router must sit
/// behind the auth middleware.
pub fn router(state: AppState) -> Router {
    Router::new().merge(company::routes()).with_state(state)
}
