use bizdir_core::ServiceError;
use bizdir_sql::SQLStore;

/// Company directory tables.
///
/// `sequences` holds named counters; `companies.id` is taken from the
/// `companies` counter inside the same transaction that inserts the row.
const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS sequences (
        name TEXT PRIMARY KEY,
        value INTEGER NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS companies (
        id INTEGER PRIMARY KEY,
        client_name TEXT NOT NULL DEFAULT '',
        company_name TEXT NOT NULL DEFAULT '',
        company_name_key TEXT NOT NULL DEFAULT '',
        code TEXT NOT NULL UNIQUE,
        logo_path TEXT,
        phone TEXT NOT NULL DEFAULT '',
        email TEXT NOT NULL DEFAULT '',
        country TEXT NOT NULL DEFAULT '',
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_companies_name_key ON companies(company_name_key)",
    "CREATE INDEX IF NOT EXISTS idx_companies_logo ON companies(logo_path)",
];

pub fn init_schema(sql: &dyn SQLStore) -> Result<(), ServiceError> {
    for ddl in SCHEMA {
        sql.exec(ddl, &[])
            .map_err(|e| ServiceError::Storage(format!("schema init failed: {}", e)))?;
    }
    Ok(())
}
