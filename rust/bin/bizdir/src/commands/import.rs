//! `bizdir import`

use std::path::Path;

use company::import::{ImportError, collect_logos, read_sheet_rows};
use company::model::{ImportReport, RowOutcome};

use crate::context::Context;

/// Import companies from `xlsx`, pairing rows with extracted logos.
///
/// Returns `None` when logos are required but none are available; the
/// caller treats that as a warning, not a failure.
pub fn run(ctx: &Context, xlsx: &Path, logos_dir: &Path, skip_logos: bool) -> anyhow::Result<Option<ImportReport>> {
    if !xlsx.is_file() {
        anyhow::bail!("spreadsheet not found: {}", xlsx.display());
    }

    let logos = if skip_logos {
        Vec::new()
    } else {
        let logos = match collect_logos(logos_dir) {
            Ok(logos) => logos,
            Err(ImportError::NotFound(_)) => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        if logos.is_empty() {
            println!("Warning: no extracted logos found in {}", logos_dir.display());
            println!("Run `bizdir extract-images {}` first, or pass --skip-logos.", xlsx.display());
            return Ok(None);
        }
        println!("Found {} logos in {}", logos.len(), logos_dir.display());
        logos
    };

    let rows = read_sheet_rows(xlsx)?;
    println!("Read {} rows from {}\n", rows.len(), xlsx.display());

    let companies = ctx.companies()?;
    let report = companies.import_rows(&rows, &logos, |row, outcome| match outcome {
        RowOutcome::Created { code, logo } => {
            println!("  row {}: created {} [{}]{}", row.row_number, row.company_name, code, logo_note(*logo))
        }
        RowOutcome::Updated { code, logo } => {
            println!("  row {}: updated {} [{}]{}", row.row_number, row.company_name, code, logo_note(*logo))
        }
        RowOutcome::Skipped => println!("  row {}: empty, skipped", row.row_number),
        RowOutcome::Failed { error } => {
            println!("  row {}: error on {}: {}", row.row_number, row.company_name, error)
        }
    });

    println!("\nImport finished:");
    println!("  processed: {}", report.processed);
    println!("  created:   {}", report.created);
    println!("  updated:   {}", report.updated);
    println!("  skipped:   {}", report.skipped);
    println!("  errors:    {}", report.errored);
    Ok(Some(report))
}

fn logo_note(logo: bool) -> &'static str {
    if logo { " with logo" } else { "" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::testing::test_context;

    #[test]
    fn test_missing_spreadsheet_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = test_context(dir.path());
        let err = run(&ctx, &dir.path().join("none.xlsx"), dir.path(), true).unwrap_err();
        assert!(err.to_string().contains("spreadsheet not found"));
    }

    #[test]
    fn test_missing_logos_warns_and_stops() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = test_context(dir.path());
        let xlsx = dir.path().join("companies.xlsx");
        std::fs::write(&xlsx, b"not parsed before the logo check").unwrap();

        let out = run(&ctx, &xlsx, &dir.path().join("extracted_logos"), false).unwrap();
        assert!(out.is_none());

        let empty = dir.path().join("empty_logos");
        std::fs::create_dir(&empty).unwrap();
        assert!(run(&ctx, &xlsx, &empty, false).unwrap().is_none());
    }

    #[test]
    fn test_skip_logos_reaches_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = test_context(dir.path());
        let xlsx = dir.path().join("companies.xlsx");
        std::fs::write(&xlsx, b"garbage").unwrap();
        assert!(run(&ctx, &xlsx, dir.path(), true).is_err());
    }

    #[test]
    fn test_unreadable_logos_dir_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = test_context(dir.path());
        let xlsx = dir.path().join("companies.xlsx");
        std::fs::write(&xlsx, b"not parsed before the logo check").unwrap();
        let not_a_dir = dir.path().join("extracted_logos");
        std::fs::write(&not_a_dir, b"file").unwrap();

        assert!(run(&ctx, &xlsx, &not_a_dir, false).is_err());
    }
}
