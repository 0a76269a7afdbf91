use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use bizdir_core::ServiceError;

use crate::api::AppState;
use crate::model::Principal;

pub fn routes() -> Router<AppState> {
    Router::new().route("/me", get(me))
}

/// GET /auth/me: current user, groups and effective permissions.
async fn me(
    State(svc): State<AppState>,
    principal: Principal,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let user = svc.get_user(&principal.user_id).map_err(ServiceError::from)?;
    let groups = svc
        .user_group_names(&principal.user_id)
        .map_err(ServiceError::from)?;
    let permissions = svc
        .effective_permissions(&principal.user_id)
        .map_err(ServiceError::from)?;
    Ok(Json(serde_json::json!({
        "user": user,
        "groups": groups,
        "permissions": permissions,
    })))
}
