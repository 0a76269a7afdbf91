use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use bizdir_core::ServiceError;

use crate::api::AppState;
use crate::model::Principal;

/// Paths that don't require authentication.
const PUBLIC_PATHS: &[&str] = &["/health", "/version", "/auth/login", "/auth/signup"];

/// Bearer-token authentication middleware.
///
/// Public paths pass through. Everything else needs a valid, unrevoked
/// token; the resolved [`Principal`] is stored as a request extension.
pub async fn require_auth(State(svc): State<AppState>, mut req: Request, next: Next) -> Response {
    if is_public_path(req.uri().path()) {
        return next.run(req).await;
    }

    let Some(token) = extract_bearer(req.headers()) else {
        return ServiceError::Unauthorized("missing authorization header".into()).into_response();
    };

    match svc.verify_token(token) {
        Ok(principal) => {
            req.extensions_mut().insert(principal);
            next.run(req).await
        }
        Err(e) => ServiceError::from(e).into_response(),
    }
}

/// Extract the Bearer token from the Authorization header.
fn extract_bearer(headers: &axum::http::HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

fn is_public_path(path: &str) -> bool {
    PUBLIC_PATHS.contains(&path)
}

impl<S: Send + Sync> FromRequestParts<S> for Principal {
    type Rejection = ServiceError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .ok_or_else(|| ServiceError::Unauthorized("authentication required".into()))
    }
}
