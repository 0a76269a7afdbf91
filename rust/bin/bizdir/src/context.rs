//! Storage handles for commands that touch the database.

use std::sync::Arc;

use anyhow::Context as _;
use auth::service::{AuthConfig, AuthService};
use bizdir_blob::{BlobStore, FileStore};
use bizdir_core::Settings;
use bizdir_sql::{SQLStore, SqliteStore};
use company::service::CompanyService;
use company::{CodeOrdering, CompanyConfig};

pub struct Context {
    settings: Settings,
    sql: Arc<dyn SQLStore>,
    blob: Arc<dyn BlobStore>,
}

impl Context {
    /// Open the SQLite database and blob directory named by `settings`.
    pub fn open(settings: Settings) -> anyhow::Result<Self> {
        let core = settings.service_config();
        core.prepare()
            .with_context(|| format!("failed to create data dir {}", core.data_dir.display()))?;
        let sql = SqliteStore::open(&core.sqlite_path())
            .map_err(|e| anyhow::anyhow!("failed to open SQL store: {}", e))?;
        let blob = FileStore::open(&core.blob_dir())
            .map_err(|e| anyhow::anyhow!("failed to open blob store: {}", e))?;
        tracing::debug!(sqlite = %core.sqlite_path().display(), "storage opened");
        Ok(Self {
            settings,
            sql: Arc::new(sql),
            blob: Arc::new(blob),
        })
    }

    pub fn auth(&self) -> anyhow::Result<Arc<AuthService>> {
        let config = AuthConfig {
            jwt_secret: self.settings.jwt.secret.clone(),
            access_token_ttl: self.settings.jwt.expire_secs,
        };
        AuthService::new(Arc::clone(&self.sql), config)
            .map_err(|e| anyhow::anyhow!("failed to initialize auth: {}", e))
    }

    pub fn companies(&self) -> anyhow::Result<Arc<CompanyService>> {
        let code_ordering: CodeOrdering = self
            .settings
            .company
            .code_ordering
            .parse()
            .map_err(anyhow::Error::msg)?;
        Ok(CompanyService::new(
            Arc::clone(&self.sql),
            Arc::clone(&self.blob),
            CompanyConfig { code_ordering },
        )?)
    }
}
