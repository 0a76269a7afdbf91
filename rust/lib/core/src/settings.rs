//! TOML settings file shared by `bizdird` and `bizdir`.
//!
//! ```toml
//! [server]
//! listen = "0.0.0.0:8080"
//!
//! [storage]
//! data_dir = "/var/lib/bizdir"
//! # sqlite_path = "/var/lib/bizdir/data.sqlite"
//! # blob_dir = "/var/lib/bizdir/blobs"
//!
//! [jwt]
//! secret = "..."
//! expire_secs = 86400
//!
//! [company]
//! code_ordering = "numeric"   # or "lexicographic"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ServiceConfig;

/// Directory searched for named settings files.
pub const SETTINGS_DIR: &str = "/etc/bizdir";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings file {path}: {message}")]
    Parse { path: String, message: String },

    #[error("{0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSection {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default)]
    pub sqlite_path: Option<String>,
    #[serde(default)]
    pub blob_dir: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtSection {
    #[serde(default)]
    pub secret: String,
    #[serde(default = "default_expire_secs")]
    pub expire_secs: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanySection {
    /// `numeric` or `lexicographic`.
    #[serde(default = "default_code_ordering")]
    pub code_ordering: String,
}

/// Parsed settings file. Every section and key is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub storage: StorageSection,
    #[serde(default)]
    pub jwt: JwtSection,
    #[serde(default)]
    pub company: CompanySection,
}

fn default_listen() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_expire_secs() -> i64 {
    86400
}

fn default_code_ordering() -> String {
    "numeric".to_string()
}

impl Default for ServerSection {
    fn default() -> Self {
        Self { listen: default_listen() }
    }
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            sqlite_path: None,
            blob_dir: None,
        }
    }
}

impl Default for JwtSection {
    fn default() -> Self {
        Self {
            secret: String::new(),
            expire_secs: default_expire_secs(),
        }
    }
}

impl Default for CompanySection {
    fn default() -> Self {
        Self { code_ordering: default_code_ordering() }
    }
}

impl Settings {
    /// A bare name (`prod`) maps to `/etc/bizdir/prod.toml`; anything
    /// containing `/` or `.` is taken as a path.
    pub fn resolve_path(name: &str) -> PathBuf {
        if name.contains('/') || name.contains('.') {
            PathBuf::from(name)
        } else {
            Path::new(SETTINGS_DIR).join(format!("{}.toml", name))
        }
    }

    pub fn parse(content: &str, path: &Path) -> Result<Self, SettingsError> {
        toml::from_str(content).map_err(|e| SettingsError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&content, path)
    }

    /// Load `path` when it exists, otherwise use defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, SettingsError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Checks the server needs before it starts.
    pub fn validate_for_server(&self) -> Result<(), SettingsError> {
        if self.jwt.secret.is_empty() {
            return Err(SettingsError::Invalid("jwt.secret is empty".into()));
        }
        if self.jwt.expire_secs <= 0 {
            return Err(SettingsError::Invalid("jwt.expire_secs must be positive".into()));
        }
        if self.storage.data_dir.is_empty() {
            return Err(SettingsError::Invalid("storage.data_dir is empty".into()));
        }
        Ok(())
    }

    /// Storage locations derived from `[storage]` and `[server]`.
    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            sqlite_path: self.storage.sqlite_path.as_ref().map(PathBuf::from),
            blob_dir: self.storage.blob_dir.as_ref().map(PathBuf::from),
            listen: self.server.listen.clone(),
            ..ServiceConfig::new(&self.storage.data_dir)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_path() {
        assert_eq!(Settings::resolve_path("prod"), PathBuf::from("/etc/bizdir/prod.toml"));
        assert_eq!(Settings::resolve_path("./bizdir.toml"), PathBuf::from("./bizdir.toml"));
    }

    #[test]
    fn test_parse_full() {
        let s = Settings::parse(
            r#"
[storage]
data_dir = "/var/lib/bizdir"

[jwt]
secret = "s3cret"
expire_secs = 3600

[company]
code_ordering = "lexicographic"
"#,
            Path::new("test.toml"),
        )
        .unwrap();
        assert_eq!(s.jwt.secret, "s3cret");
        assert_eq!(s.jwt.expire_secs, 3600);
        assert_eq!(s.company.code_ordering, "lexicographic");
        assert_eq!(s.server.listen, "0.0.0.0:8080");
        assert!(s.validate_for_server().is_ok());

        let cfg = s.service_config();
        assert_eq!(cfg.sqlite_path(), PathBuf::from("/var/lib/bizdir/data.sqlite"));
    }

    #[test]
    fn test_defaults_and_validation() {
        let s = Settings::parse("", Path::new("empty.toml")).unwrap();
        assert_eq!(s.storage.data_dir, "data");
        assert_eq!(s.company.code_ordering, "numeric");
        assert!(matches!(s.validate_for_server(), Err(SettingsError::Invalid(_))));
    }

    #[test]
    fn test_parse_error() {
        let err = Settings::parse("[jwt\nsecret=", Path::new("bad.toml")).unwrap_err();
        assert!(matches!(err, SettingsError::Parse { .. }));
    }

    #[test]
    fn test_load_or_default() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("none.toml");
        assert_eq!(Settings::load_or_default(&missing).unwrap().storage.data_dir, "data");

        let path = dir.path().join("bizdir.toml");
        std::fs::write(&path, "[server]\nlisten = \"127.0.0.1:9000\"\n").unwrap();
        assert_eq!(Settings::load(&path).unwrap().server.listen, "127.0.0.1:9000");
    }
}
