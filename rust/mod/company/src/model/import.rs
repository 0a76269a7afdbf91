use std::path::PathBuf;

use serde::Serialize;

/// One data row of the import spreadsheet (columns A, B, C).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetRow {
    /// 1-based worksheet row number, for progress output.
    pub row_number: u32,
    pub client_name: String,
    pub company_name: String,
    pub code: String,
}

impl SheetRow {
    pub fn new(row_number: u32, client_name: &str, company_name: &str, code: &str) -> Self {
        Self {
            row_number,
            client_name: client_name.trim().to_string(),
            company_name: company_name.trim().to_string(),
            code: code.trim().to_string(),
        }
    }

    /// Rows with neither a client nor a company name are skipped.
    pub fn is_blank(&self) -> bool {
        self.client_name.is_empty() && self.company_name.is_empty()
    }
}

/// An image written by the extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedImage {
    /// 1-based position in extraction order.
    pub ordinal: usize,
    pub path: PathBuf,
}

/// What happened to a single spreadsheet row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    Created { code: String, logo: bool },
    Updated { code: String, logo: bool },
    Skipped,
    Failed { error: String },
}

/// Totals for one import run.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ImportReport {
    /// Data rows read from the sheet, blank ones included.
    pub rows: usize,
    /// Non-blank rows that were attempted.
    pub processed: usize,
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
    pub errored: usize,
}

impl ImportReport {
    pub(crate) fn record(&mut self, outcome: &RowOutcome) {
        self.rows += 1;
        match outcome {
            RowOutcome::Skipped => self.skipped += 1,
            RowOutcome::Created { .. } => {
                self.processed += 1;
                self.created += 1;
            }
            RowOutcome::Updated { .. } => {
                self.processed += 1;
                self.updated += 1;
            }
            RowOutcome::Failed { .. } => {
                self.processed += 1;
                self.errored += 1;
            }
        }
    }
}
