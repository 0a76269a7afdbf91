use serde::Serialize;

use bizdir_sql::Row;

/// A row from the `legacy_users` table of the previous application.
#[derive(Debug, Clone)]
pub struct LegacyUser {
    pub username: String,
    pub email: String,
    /// Hash produced by the legacy app; copied verbatim.
    pub password: String,
    pub created_at: Option<String>,
}

impl LegacyUser {
    pub(crate) fn from_row(row: &Row) -> Self {
        Self {
            username: row.text("username"),
            email: row.text("email"),
            password: row.text("password"),
            created_at: row
                .get_str("created_at")
                .filter(|s| !s.trim().is_empty())
                .map(String::from),
        }
    }
}

/// Outcome counters of a legacy user migration.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MigrationReport {
    pub created: usize,
    pub emails_updated: usize,
    pub already_existing: usize,
}
