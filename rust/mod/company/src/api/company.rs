use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;

use auth::{Action, Principal, authorize};
use bizdir_core::{ListParams, ListResult, ServiceError};

use crate::api::{AppState, RESOURCE};
use crate::model::{Company, CompanyPatch, LogoUpload, NewCompany};
use crate::service::logo::content_type;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/companies", get(list_companies).post(create_company))
        .route(
            "/companies/{id}",
            get(get_company).put(update_company).delete(delete_company),
        )
        .route("/companies/{id}/logo", get(get_logo))
}

#[derive(Deserialize)]
struct CreateCompanyBody {
    #[serde(flatten)]
    company: NewCompany,
    logo: Option<LogoUpload>,
}

#[derive(Deserialize)]
struct UpdateCompanyBody {
    #[serde(flatten)]
    patch: CompanyPatch,
    logo: Option<LogoUpload>,
}

fn check(principal: &Principal, action: Action) -> Result<(), ServiceError> {
    authorize(principal, RESOURCE, action).map_err(ServiceError::from)
}

fn decode_logo(logo: Option<LogoUpload>) -> Result<Option<(String, Vec<u8>)>, ServiceError> {
    logo.map(|l| {
        STANDARD
            .decode(l.data.trim())
            .map(|bytes| (l.file_name, bytes))
            .map_err(|e| ServiceError::Validation(format!("logo data is not valid base64: {}", e)))
    })
    .transpose()
}

async fn list_companies(
    State(svc): State<AppState>,
    principal: Principal,
    Query(params): Query<ListParams>,
) -> Result<Json<ListResult<Company>>, ServiceError> {
    check(&principal, Action::View)?;
    Ok(Json(svc.list(&params)?))
}

async fn create_company(
    State(svc): State<AppState>,
    principal: Principal,
    Json(body): Json<CreateCompanyBody>,
) -> Result<(StatusCode, Json<Company>), ServiceError> {
    check(&principal, Action::Add)?;
    body.company.require_names()?;
    let logo = decode_logo(body.logo)?;

    let mut company = svc.create(body.company)?;
    if let Some((file_name, bytes)) = logo {
        company = svc.set_logo(company.id, &file_name, &bytes)?;
    }
    tracing::info!(user = %principal.username, code = %company.code, "company added");
    Ok((StatusCode::CREATED, Json(company)))
}

async fn get_company(
    State(svc): State<AppState>,
    principal: Principal,
    Path(id): Path<i64>,
) -> Result<Json<Company>, ServiceError> {
    check(&principal, Action::View)?;
    Ok(Json(svc.get(id)?))
}

async fn update_company(
    State(svc): State<AppState>,
    principal: Principal,
    Path(id): Path<i64>,
    Json(body): Json<UpdateCompanyBody>,
) -> Result<Json<Company>, ServiceError> {
    check(&principal, Action::Change)?;
    let logo = decode_logo(body.logo)?;

    let mut company = svc.update(id, body.patch)?;
    if let Some((file_name, bytes)) = logo {
        company = svc.set_logo(id, &file_name, &bytes)?;
    }
    Ok(Json(company))
}

async fn delete_company(
    State(svc): State<AppState>,
    principal: Principal,
    Path(id): Path<i64>,
) -> Result<StatusCode, ServiceError> {
    check(&principal, Action::Delete)?;
    svc.delete(id)?;
    tracing::info!(user = %principal.username, id, "company deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn get_logo(
    State(svc): State<AppState>,
    principal: Principal,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ServiceError> {
    check(&principal, Action::View)?;
    let (key, bytes) = svc.get_logo(id)?;
    Ok(([(header::CONTENT_TYPE, content_type(&key))], bytes))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    use auth::service::{AuthConfig, AuthService};
    use bizdir_sql::SqliteStore;

    use super::*;
    use crate::api::router;
    use crate::service::testing::test_service;

    struct Harness {
        app: Router,
        auth: Arc<AuthService>,
        _dir: tempfile::TempDir,
    }

    impl Harness {
        fn new() -> Self {
            let (svc, dir) = test_service();
            let auth = AuthService::new(
                Arc::new(SqliteStore::open_in_memory().unwrap()),
                AuthConfig::default(),
            )
            .unwrap();
            let app = router(svc).layer(axum::middleware::from_fn_with_state(
                auth.clone(),
                auth::api::require_auth,
            ));
            Self { app, auth, _dir: dir }
        }

        fn token_for(&self, username: &str, perms: &[&str]) -> String {
            self.auth
                .signup(auth::model::SignupRequest {
                    username: username.into(),
                    email: String::new(),
                    password: "ClaveSegura123!".into(),
                    confirm_password: "ClaveSegura123!".into(),
                })
                .unwrap();
            for p in perms {
                self.auth.grant_user_permission(username, p).unwrap();
            }
            self.auth.login(username, "ClaveSegura123!").unwrap().access_token
        }

        async fn send(
            &self,
            method: &str,
            uri: &str,
            token: &str,
            body: Option<serde_json::Value>,
        ) -> (StatusCode, Vec<u8>) {
            let builder = Request::builder()
                .method(method)
                .uri(uri)
                .header("authorization", format!("Bearer {}", token));
            let req = match body {
                Some(b) => builder
                    .header("content-type", "application/json")
                    .body(Body::from(serde_json::to_vec(&b).unwrap()))
                    .unwrap(),
                None => builder.body(Body::empty()).unwrap(),
            };
            let resp = self.app.clone().oneshot(req).await.unwrap();
            let status = resp.status();
            let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
            (status, bytes.to_vec())
        }

        async fn send_json(
            &self,
            method: &str,
            uri: &str,
            token: &str,
            body: Option<serde_json::Value>,
        ) -> (StatusCode, serde_json::Value) {
            let (status, bytes) = self.send(method, uri, token, body).await;
            let json = if bytes.is_empty() {
                serde_json::Value::Null
            } else {
                serde_json::from_slice(&bytes).unwrap()
            };
            (status, json)
        }
    }

    #[tokio::test]
    async fn test_editor_crud_flow() {
        let h = Harness::new();
        let token = h.token_for("editor", &["company:add", "company:change", "company:delete"]);

        let (status, created) = h
            .send_json(
                "POST",
                "/companies",
                &token,
                Some(serde_json::json!({
                    "clientName": "Wile",
                    "companyName": "Acme Corp",
                    "country": "Chile",
                    "code": "9999",
                    "logo": {"fileName": "acme.png", "data": STANDARD.encode(b"png")},
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["code"], "0001");
        assert_eq!(created["logoPath"], "logos/0001_acme.png");
        let id = created["id"].as_i64().unwrap();

        let (status, updated) = h
            .send_json(
                "PUT",
                &format!("/companies/{}", id),
                &token,
                Some(serde_json::json!({"companyName": "Acme Chile", "code": "0500"})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["companyName"], "Acme Chile");
        assert_eq!(updated["code"], "0001");

        let (status, logo) = h.send("GET", &format!("/companies/{}/logo", id), &token, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(logo, b"png");

        let (status, list) = h.send_json("GET", "/companies?q=chile", &token, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list["total"], 1);

        let (status, _) = h.send("DELETE", &format!("/companies/{}", id), &token, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = h.send_json("GET", &format!("/companies/{}", id), &token, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_viewer_cannot_write() {
        let h = Harness::new();
        let editor = h.token_for("editor", &["company:add"]);
        let viewer = h.token_for("viewer", &[]);

        let body = serde_json::json!({"clientName": "A", "companyName": "Alpha"});
        let (status, _) = h.send_json("POST", "/companies", &editor, Some(body.clone())).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, err) = h.send_json("POST", "/companies", &viewer, Some(body)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(err["code"], "PERMISSION_DENIED");

        let (status, _) = h.send("DELETE", "/companies/1", &editor, None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, list) = h.send_json("GET", "/companies", &viewer, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list["items"][0]["companyName"], "Alpha");
    }

    #[tokio::test]
    async fn test_create_requires_names_and_valid_logo() {
        let h = Harness::new();
        let token = h.token_for("editor", &["company:add"]);

        let (status, _) = h
            .send_json("POST", "/companies", &token, Some(serde_json::json!({"companyName": "Solo"})))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = h
            .send_json(
                "POST",
                "/companies",
                &token,
                Some(serde_json::json!({
                    "clientName": "A",
                    "companyName": "B",
                    "logo": {"fileName": "x.png", "data": "@@not base64@@"},
                })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        // Neither rejected request consumed a record.
        let (_, list) = h.send_json("GET", "/companies", &token, None).await;
        assert_eq!(list["total"], 0);
    }

    #[tokio::test]
    async fn test_unauthenticated_rejected() {
        let h = Harness::new();
        let (status, _) = h.send("GET", "/companies", "bogus", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
