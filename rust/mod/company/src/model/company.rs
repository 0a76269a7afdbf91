use serde::{Deserialize, Serialize};

use bizdir_sql::Row;

pub const MAX_NAME_LEN: usize = 100;
pub const MAX_PHONE_LEN: usize = 15;
pub const MAX_COUNTRY_LEN: usize = 50;
pub const MAX_CODE_LEN: usize = 10;

/// A company in the directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    /// Persistent identity, allocated from the `companies` sequence.
    pub id: i64,

    pub client_name: String,
    pub company_name: String,

    /// Unique zero-padded code. Assigned once at creation, never edited.
    pub code: String,

    /// Blob key of the logo, e.g. `logos/0001_imagen_001.png`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_path: Option<String>,

    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub country: String,

    pub created_at: String,
    pub updated_at: String,
}

impl Company {
    pub(crate) fn from_row(row: &Row) -> Self {
        Self {
            id: row.get_i64("id").unwrap_or_default(),
            client_name: row.text("client_name"),
            company_name: row.text("company_name"),
            code: row.text("code"),
            logo_path: row
                .get_str("logo_path")
                .filter(|p| !p.is_empty())
                .map(str::to_string),
            phone: row.text("phone"),
            email: row.text("email"),
            country: row.text("country"),
            created_at: row.text("created_at"),
            updated_at: row.text("updated_at"),
        }
    }

    /// True when any searchable field contains `needle` (already lower-cased).
    pub(crate) fn matches(&self, needle: &str) -> bool {
        [
            &self.company_name,
            &self.client_name,
            &self.code,
            &self.email,
            &self.country,
            &self.phone,
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
    }
}

/// Input for creating a company.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCompany {
    #[serde(default)]
    pub client_name: String,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub country: String,

    /// Code supplied by a bulk import. Not accepted from HTTP clients.
    #[serde(skip)]
    pub code: Option<String>,
}

/// Partial update. `code`, `id` and timestamps are not editable.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyPatch {
    pub client_name: Option<String>,
    pub company_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub country: Option<String>,

    /// Replacement logo blob key. `None` keeps the current logo.
    #[serde(skip)]
    pub logo_path: Option<String>,
}

/// Logo sent inline with a create or update request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoUpload {
    pub file_name: String,
    /// Base64-encoded image bytes.
    pub data: String,
}
