//! Route registration: module routes plus system endpoints, all behind
//! the bearer-token middleware.

use std::sync::Arc;

use axum::Router;
use axum::middleware;
use axum::response::IntoResponse;
use axum::routing::get;

use auth::api::require_auth;
use auth::service::AuthService;

/// Build the complete router.
///
/// Module routers carry absolute paths (`/auth/...`, `/companies/...`).
pub fn build_router(auth: Arc<AuthService>, module_routes: Vec<Router>) -> Router {
    let mut app = Router::new()
        .route("/health", get(health))
        .route("/version", get(version));

    for router in module_routes {
        app = app.merge(router);
    }

    app.layer(middleware::from_fn_with_state(auth, require_auth))
}

async fn health() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "status": "ok",
    }))
}

async fn version() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": "bizdird",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use bizdir_core::{Module, Settings};
    use tower::ServiceExt;

    use super::*;
    use crate::bootstrap;

    fn app(dir: &std::path::Path) -> (Router, Arc<AuthService>) {
        let mut settings = Settings::default();
        settings.storage.data_dir = dir.display().to_string();
        settings.jwt.secret = "test-secret".into();
        let modules = bootstrap::init(&settings, &settings.service_config()).unwrap();
        let auth = modules.auth.service().clone();
        let router = build_router(
            auth.clone(),
            vec![modules.auth.routes(), modules.company.routes()],
        );
        (router, auth)
    }

    async fn get_status(app: &Router, uri: &str, token: Option<&str>) -> StatusCode {
        let mut req = Request::builder().uri(uri);
        if let Some(t) = token {
            req = req.header("authorization", format!("Bearer {}", t));
        }
        app.clone()
            .oneshot(req.body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_system_endpoints_are_public() {
        let dir = tempfile::tempdir().unwrap();
        let (app, _) = app(dir.path());
        assert_eq!(get_status(&app, "/health", None).await, StatusCode::OK);
        assert_eq!(get_status(&app, "/version", None).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_companies_need_a_token() {
        let dir = tempfile::tempdir().unwrap();
        let (app, auth) = app(dir.path());
        assert_eq!(get_status(&app, "/companies", None).await, StatusCode::UNAUTHORIZED);

        auth.create_superuser("admin", "", "AdminPass123").unwrap();
        let token = auth.login("admin", "AdminPass123").unwrap().access_token;
        assert_eq!(get_status(&app, "/companies", Some(&token)).await, StatusCode::OK);
        assert_eq!(get_status(&app, "/auth/me", Some(&token)).await, StatusCode::OK);
    }
}
