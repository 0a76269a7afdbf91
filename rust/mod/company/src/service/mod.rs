pub mod schema;
pub mod company;
pub mod logo;

use std::sync::Arc;

use bizdir_blob::BlobStore;
use bizdir_core::ServiceError;
use bizdir_sql::SQLStore;

use crate::code::CodeOrdering;

/// Company service settings.
#[derive(Debug, Clone, Default)]
pub struct CompanyConfig {
    /// Comparison used when looking for the largest existing code.
    pub code_ordering: CodeOrdering,
}

/// Company service: directory records in SQL, logos in blob storage.
pub struct CompanyService {
    pub(crate) sql: Arc<dyn SQLStore>,
    pub(crate) blob: Arc<dyn BlobStore>,
    pub(crate) config: CompanyConfig,
}

impl CompanyService {
    pub fn new(
        sql: Arc<dyn SQLStore>,
        blob: Arc<dyn BlobStore>,
        config: CompanyConfig,
    ) -> Result<Arc<Self>, ServiceError> {
        schema::init_schema(sql.as_ref())?;
        Ok(Arc::new(Self { sql, blob, config }))
    }

    pub fn config(&self) -> &CompanyConfig {
        &self.config
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use bizdir_blob::FileStore;
    use bizdir_sql::SqliteStore;
    use tempfile::TempDir;

    use super::{CompanyConfig, CompanyService};
    use crate::model::NewCompany;

    /// A service over an in-memory database and a temporary blob directory.
    /// Keep the returned `TempDir` alive for the duration of the test.
    pub fn test_service_with(config: CompanyConfig) -> (Arc<CompanyService>, TempDir) {
        let dir = TempDir::new().unwrap();
        let sql = Arc::new(SqliteStore::open_in_memory().unwrap());
        let blob = Arc::new(FileStore::open(&dir.path().join("blobs")).unwrap());
        (CompanyService::new(sql, blob, config).unwrap(), dir)
    }

    pub fn test_service() -> (Arc<CompanyService>, TempDir) {
        test_service_with(CompanyConfig::default())
    }

    pub fn new_company(client: &str, company: &str) -> NewCompany {
        NewCompany {
            client_name: client.to_string(),
            company_name: company.to_string(),
            ..Default::default()
        }
    }
}
