use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};

use bizdir_core::ServiceError;

use crate::api::AppState;
use crate::model::{LoginRequest, Principal, SignupRequest, TokenResponse, User};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/logout", post(logout))
}

/// POST /auth/signup
async fn signup(
    State(svc): State<AppState>,
    Json(input): Json<SignupRequest>,
) -> Result<(StatusCode, Json<User>), ServiceError> {
    let user = svc.signup(input).map_err(ServiceError::from)?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// POST /auth/login
async fn login(
    State(svc): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ServiceError> {
    let token = svc
        .login(&body.username, &body.password)
        .map_err(ServiceError::from)?;
    Ok(Json(token))
}

/// POST /auth/logout revokes the caller's session.
async fn logout(
    State(svc): State<AppState>,
    principal: Principal,
) -> Result<StatusCode, ServiceError> {
    svc.logout(&principal.session_id).map_err(ServiceError::from)?;
    Ok(StatusCode::NO_CONTENT)
}
