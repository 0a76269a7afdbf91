use serde::{Deserialize, Serialize};

/// Largest page a list endpoint returns, whatever `limit` asks for.
pub const MAX_LIMIT: usize = 500;

/// `?q=&limit=&offset=` for list endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct ListParams {
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
    /// Case-insensitive substring filter.
    #[serde(default)]
    pub q: Option<String>,
}

fn default_limit() -> usize {
    50
}

impl Default for ListParams {
    fn default() -> Self {
        Self { limit: default_limit(), offset: 0, q: None }
    }
}

impl ListParams {
    /// The search term, trimmed; `None` when absent or blank.
    pub fn query(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }

    /// `limit` clamped to [`MAX_LIMIT`].
    pub fn page_size(&self) -> usize {
        self.limit.min(MAX_LIMIT)
    }
}

/// One page of items plus the number of matches across all pages.
#[derive(Debug, Clone, Serialize)]
pub struct ListResult<T: Serialize> {
    pub items: Vec<T>,
    pub total: usize,
}

/// Random 32-hex-digit identifier for users, groups and sessions.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

pub fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_id_shape() {
        let id = new_id();
        assert_eq!(id.len(), 32);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(id, new_id());
    }

    #[test]
    fn test_query_trims_and_drops_blank() {
        let blank = ListParams { q: Some("   ".into()), ..Default::default() };
        assert_eq!(blank.query(), None);

        let acme = ListParams { q: Some(" acme ".into()), ..Default::default() };
        assert_eq!(acme.query(), Some("acme"));
    }

    #[test]
    fn test_page_size_is_capped() {
        let params: ListParams = serde_json::from_str(r#"{"limit": 100000}"#).unwrap();
        assert_eq!(params.page_size(), MAX_LIMIT);

        let params: ListParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.page_size(), 50);
        assert_eq!(params.offset, 0);
    }
}
