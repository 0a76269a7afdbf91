use std::path::Path;

use calamine::{Data, Reader, Xlsx, open_workbook};

use crate::import::ImportError;
use crate::model::SheetRow;

/// Cell text as the import expects it: trimmed, integral numbers without a
/// fractional part.
fn cell_text(cell: &Data) -> String {
    let text = match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => {
            format!("{}", *f as i64)
        }
        other => other.to_string(),
    };
    text.trim().to_string()
}

/// Read columns A (client), B (company) and C (code) of the first
/// worksheet. Row 1 holds headers; every later row up to the last
/// populated one is returned, blank rows included.
pub fn read_sheet_rows(path: &Path) -> Result<Vec<SheetRow>, ImportError> {
    if !path.is_file() {
        return Err(ImportError::NotFound(path.display().to_string()));
    }

    let mut workbook: Xlsx<_> =
        open_workbook(path).map_err(|e| ImportError::InvalidWorkbook(format!("{}", e)))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ImportError::InvalidWorkbook("workbook has no worksheets".into()))?
        .map_err(|e| ImportError::InvalidWorkbook(e.to_string()))?;

    let Some((last_row, _)) = range.end() else {
        return Ok(Vec::new());
    };

    let rows = (1..=last_row)
        .map(|r| {
            let cell = |c: u32| range.get_value((r, c)).map(cell_text).unwrap_or_default();
            SheetRow::new(r + 1, &cell(0), &cell(1), &cell(2))
        })
        .collect::<Vec<_>>();

    tracing::debug!(path = %path.display(), rows = rows.len(), "sheet read");
    Ok(rows)
}
