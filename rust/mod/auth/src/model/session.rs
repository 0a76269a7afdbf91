use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use bizdir_sql::Row;

/// One issued access token. Logout flips `revoked`; verification refuses
/// revoked or unknown sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub user_id: String,
    pub issued_at: String,
    pub expires_at: String,
    #[serde(default)]
    pub revoked: bool,
}

impl Session {
    pub(crate) fn from_row(row: &Row) -> Self {
        Self {
            id: row.text("id"),
            user_id: row.text("user_id"),
            issued_at: row.text("issued_at"),
            expires_at: row.text("expires_at"),
            revoked: row.get_i64("revoked") == Some(1),
        }
    }
}

/// HS256 token payload. Permissions are a snapshot taken at login; a grant
/// made later shows up after the next login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: String,
    pub name: String,
    #[serde(default)]
    pub superuser: bool,
    /// `resource:action` strings, direct and inherited from groups.
    #[serde(default)]
    pub perms: Vec<String>,
    /// Session id, checked against the sessions table.
    pub sid: String,
    pub iat: i64,
    pub exp: i64,
}

/// The authenticated caller of a request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    pub user_id: String,
    pub username: String,
    pub is_superuser: bool,
    pub permissions: BTreeSet<String>,
    pub session_id: String,
}

impl From<Claims> for Principal {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            username: claims.name,
            is_superuser: claims.superuser,
            permissions: claims.perms.into_iter().collect(),
            session_id: claims.sid,
        }
    }
}

impl Principal {
    pub fn has_permission(&self, permission: &str) -> bool {
        self.is_superuser || self.permissions.contains(permission)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
    /// Always `Bearer`.
    pub token_type: String,
    /// Seconds until the token expires.
    pub expires_in: i64,
}
