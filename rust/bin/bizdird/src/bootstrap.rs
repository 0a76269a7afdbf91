//! Storage and module initialization.

use std::sync::Arc;

use anyhow::Context;
use auth::AuthModule;
use auth::service::AuthConfig;
use bizdir_blob::{BlobStore, FileStore};
use bizdir_core::{ServiceConfig, Settings};
use bizdir_sql::{SQLStore, SqliteStore};
use company::service::CompanyService;
use company::{CodeOrdering, CompanyConfig, CompanyModule};
use tracing::info;

pub struct Modules {
    pub auth: AuthModule,
    pub company: CompanyModule,
}

/// Open the SQLite database and blob directory, then build every module
/// on top of them.
pub fn init(settings: &Settings, core: &ServiceConfig) -> anyhow::Result<Modules> {
    core.prepare()
        .with_context(|| format!("failed to create data dir {}", core.data_dir.display()))?;

    let sqlite_path = core.sqlite_path();
    let sql: Arc<dyn SQLStore> = Arc::new(
        SqliteStore::open(&sqlite_path)
            .map_err(|e| anyhow::anyhow!("failed to open SQL store: {}", e))?,
    );
    let blob: Arc<dyn BlobStore> = Arc::new(
        FileStore::open(&core.blob_dir())
            .map_err(|e| anyhow::anyhow!("failed to open blob store: {}", e))?,
    );
    info!(sqlite = %sqlite_path.display(), "storage opened");

    let auth = AuthModule::new(
        Arc::clone(&sql),
        AuthConfig {
            jwt_secret: settings.jwt.secret.clone(),
            access_token_ttl: settings.jwt.expire_secs,
        },
    )?;

    let code_ordering: CodeOrdering = settings
        .company
        .code_ordering
        .parse()
        .map_err(anyhow::Error::msg)?;
    let company_service = CompanyService::new(sql, blob, CompanyConfig { code_ordering })?;
    info!(%code_ordering, "company module initialized");

    Ok(Modules {
        auth,
        company: CompanyModule::new(company_service),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_creates_storage() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = Settings::default();
        settings.storage.data_dir = dir.path().join("state").display().to_string();
        settings.jwt.secret = "test-secret".into();

        let core = settings.service_config();
        init(&settings, &core).unwrap();
        assert!(core.sqlite_path().exists());
        assert!(core.blob_dir().is_dir());
    }

    #[test]
    fn test_init_rejects_unknown_ordering() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = Settings::default();
        settings.storage.data_dir = dir.path().display().to_string();
        settings.company.code_ordering = "random".into();

        let err = init(&settings, &settings.service_config()).err().unwrap();
        assert!(err.to_string().contains("unknown code ordering"));
    }
}
