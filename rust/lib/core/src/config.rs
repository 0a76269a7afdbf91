//! Resolved storage locations for one deployment.

use std::path::PathBuf;

/// Where the database, the logo blobs and the listener live.
///
/// Built from [`Settings::service_config`](crate::Settings::service_config);
/// `bizdird` and `bizdir` open the same files through it.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub data_dir: PathBuf,
    /// Overrides `{data_dir}/data.sqlite`.
    pub sqlite_path: Option<PathBuf>,
    /// Overrides `{data_dir}/blobs`.
    pub blob_dir: Option<PathBuf>,
    pub listen: String,
}

impl ServiceConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            sqlite_path: None,
            blob_dir: None,
            listen: "0.0.0.0:8080".to_string(),
        }
    }

    pub fn sqlite_path(&self) -> PathBuf {
        self.sqlite_path
            .clone()
            .unwrap_or_else(|| self.data_dir.join("data.sqlite"))
    }

    pub fn blob_dir(&self) -> PathBuf {
        self.blob_dir.clone().unwrap_or_else(|| self.data_dir.join("blobs"))
    }

    /// Create the data directory and the database's parent directory.
    pub fn prepare(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.data_dir)?;
        if let Some(parent) = self.sqlite_path().parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}
