use serde::{Deserialize, Serialize};

use bizdir_sql::Row;

/// An account in the built-in user store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique identifier (UUIDv4, no dashes).
    pub id: String,

    /// Login name. Unique ignoring case.
    pub username: String,

    /// Email address, lower-cased. Empty when not given.
    #[serde(default)]
    pub email: String,

    /// PHC-formatted password hash. Never serialized to clients.
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    /// Superusers pass every permission check.
    #[serde(default)]
    pub is_superuser: bool,

    /// Inactive users cannot log in.
    #[serde(default = "default_true")]
    pub is_active: bool,

    /// RFC 3339 timestamp the account was first created (or migrated from).
    pub date_joined: String,

    pub created_at: String,
    pub updated_at: String,
}

impl User {
    pub(crate) fn from_row(row: &Row) -> Self {
        Self {
            id: row.text("id"),
            username: row.text("username"),
            email: row.text("email"),
            password_hash: row.text("password_hash"),
            is_superuser: row.get_i64("is_superuser") == Some(1),
            is_active: row.get_i64("is_active") == Some(1),
            date_joined: row.text("date_joined"),
            created_at: row.text("created_at"),
            updated_at: row.text("updated_at"),
        }
    }
}

/// Input for self-service registration.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub username: String,
    #[serde(default)]
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Input for administrative account creation.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    /// Already-hashed password (PHC string).
    pub password_hash: String,
    pub is_superuser: bool,
    /// Defaults to now when `None`.
    pub date_joined: Option<String>,
}

fn default_true() -> bool {
    true
}
