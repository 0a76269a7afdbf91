//! Bulk import from a spreadsheet plus the logos embedded in it.
//!
//! 1. [`extract_images`] copies the workbook's media into a directory as
//!    `imagen_001.png`, `imagen_002.jpg`, ...
//! 2. [`read_sheet_rows`] reads client name, company name and code from
//!    the first worksheet.
//! 3. [`CompanyService::import_rows`](crate::service::CompanyService::import_rows)
//!    pairs the n-th non-blank row with the n-th image and upserts records.

mod extract;
mod pairer;
mod sheet;

#[cfg(test)]
pub(crate) mod fixture;

use thiserror::Error;

pub use extract::{MAX_LISTED_ENTRIES, extract_images};
pub use pairer::collect_logos;
pub use sheet::read_sheet_rows;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("file not found: {0}")]
    NotFound(String),

    #[error("not a valid xlsx/zip archive: {0}")]
    InvalidArchive(String),

    #[error("no images found in archive")]
    NoImages {
        /// First archive entries, sorted, to help locate the images.
        entries: Vec<String>,
    },

    #[error("cannot read workbook: {0}")]
    InvalidWorkbook(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
