use std::fs;
use std::path::{Path, PathBuf};

use bizdir_core::ServiceError;

use crate::import::ImportError;
use crate::model::{CompanyPatch, ImportReport, NewCompany, RowOutcome, SheetRow};
use crate::service::CompanyService;

/// Extracted logos in `dir` (`imagen_*.*`), sorted by file name.
pub fn collect_logos(dir: &Path) -> Result<Vec<PathBuf>, ImportError> {
    if !dir.exists() {
        return Err(ImportError::NotFound(dir.display().to_string()));
    }
    let mut logos = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_logo = path.is_file()
            && path
                .file_name()
                .and_then(|n| n.to_str())
                .and_then(|n| n.strip_prefix("imagen_"))
                .is_some_and(|rest| rest.contains('.'));
        if is_logo {
            logos.push(path);
        }
    }
    logos.sort();
    Ok(logos)
}

impl CompanyService {
    /// Upsert companies from spreadsheet rows, attaching logos by position.
    ///
    /// The n-th non-blank row gets `logos[n]` when it exists; blank rows are
    /// skipped and take no logo. A failing row is logged and counted, and
    /// the batch continues. `progress` sees every row with its outcome.
    pub fn import_rows<F>(&self, rows: &[SheetRow], logos: &[PathBuf], mut progress: F) -> ImportReport
    where
        F: FnMut(&SheetRow, &RowOutcome),
    {
        let mut report = ImportReport::default();
        let mut slot = 0;

        for row in rows {
            let outcome = if row.is_blank() {
                RowOutcome::Skipped
            } else {
                let logo = logos.get(slot).map(PathBuf::as_path);
                slot += 1;
                self.import_row(row, logo).unwrap_or_else(|e| {
                    tracing::error!(row = row.row_number, company = %row.company_name, error = %e, "import row failed");
                    RowOutcome::Failed { error: e.to_string() }
                })
            };
            report.record(&outcome);
            progress(row, &outcome);
        }

        tracing::info!(
            rows = report.rows,
            created = report.created,
            updated = report.updated,
            skipped = report.skipped,
            errored = report.errored,
            "import finished"
        );
        report
    }

    fn import_row(&self, row: &SheetRow, logo: Option<&Path>) -> Result<RowOutcome, ServiceError> {
        let mut existing = None;
        if !row.code.is_empty() {
            existing = self.find_by_code(&row.code)?;
        }
        if existing.is_none() && !row.company_name.is_empty() {
            existing = self.find_by_company_name(&row.company_name)?;
        }

        // Read before touching the database so a bad file leaves no record behind.
        let logo = match logo {
            Some(path) => {
                let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
                let data = fs::read(path).map_err(|e| {
                    ServiceError::Internal(format!("cannot read logo {}: {}", path.display(), e))
                })?;
                Some((file_name, data))
            }
            None => None,
        };
        let has_logo = logo.is_some();

        match existing {
            Some(company) => {
                let names = CompanyPatch {
                    client_name: Some(row.client_name.clone()),
                    company_name: Some(row.company_name.clone()),
                    ..Default::default()
                };
                let updated = match &logo {
                    Some((file_name, data)) => self.attach_logo(&company, file_name, data, names)?,
                    None => self.update(company.id, names)?,
                };
                tracing::info!(row = row.row_number, code = %updated.code, "company updated from import");
                Ok(RowOutcome::Updated { code: updated.code, logo: has_logo })
            }
            None => {
                let created = self.create(NewCompany {
                    client_name: row.client_name.clone(),
                    company_name: row.company_name.clone(),
                    code: Some(row.code.clone()),
                    ..Default::default()
                })?;
                if let Some((file_name, data)) = &logo {
                    self.attach_logo(&created, file_name, data, CompanyPatch::default())?;
                }
                Ok(RowOutcome::Created { code: created.code, logo: has_logo })
            }
        }
    }
}
