use std::fs::{self, File};
use std::io;
use std::path::Path;

use zip::ZipArchive;

use crate::import::ImportError;
use crate::model::ExtractedImage;

/// Archive entries reported when no image is found.
pub const MAX_LISTED_ENTRIES: usize = 30;

const IMAGE_EXTENSIONS: &[&str] = &[".png", ".jpg", ".jpeg", ".gif", ".bmp", ".emf", ".wmf"];

/// Pick the image entries of an xlsx archive.
///
/// Excel stores pictures under `xl/media/`. Files from other producers may
/// put them elsewhere, so fall back to any `/media/` folder, then to image
/// extensions.
fn image_entries(names: &[String]) -> Vec<String> {
    let strategies: [&dyn Fn(&str) -> bool; 3] = [
        &|n| n.starts_with("xl/media/"),
        &|n| n.to_lowercase().contains("/media/"),
        &|n| {
            let lower = n.to_lowercase();
            IMAGE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
        },
    ];

    for matches in strategies {
        let mut found: Vec<String> = names
            .iter()
            .filter(|n| !n.ends_with('/') && matches(n.as_str()))
            .cloned()
            .collect();
        if !found.is_empty() {
            found.sort();
            return found;
        }
    }
    Vec::new()
}

/// Output name for the `ordinal`-th image: `imagen_007.png`.
fn output_name(ordinal: usize, entry: &str) -> String {
    let ext = Path::new(entry)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
        .unwrap_or_else(|| ".png".to_string());
    format!("imagen_{:03}{}", ordinal, ext)
}

/// Extract every embedded image of `xlsx_path` into `output_dir`.
///
/// The output directory is emptied first. Images are written in entry-name
/// order; an entry that fails to extract is logged and skipped without
/// shifting the numbering of the others.
pub fn extract_images(xlsx_path: &Path, output_dir: &Path) -> Result<Vec<ExtractedImage>, ImportError> {
    if !xlsx_path.is_file() {
        return Err(ImportError::NotFound(xlsx_path.display().to_string()));
    }

    if output_dir.exists() {
        tracing::info!(dir = %output_dir.display(), "clearing previous output");
        fs::remove_dir_all(output_dir)?;
    }
    fs::create_dir_all(output_dir)?;

    let file = File::open(xlsx_path)?;
    let mut archive =
        ZipArchive::new(file).map_err(|e| ImportError::InvalidArchive(e.to_string()))?;

    let names: Vec<String> = archive.file_names().map(str::to_string).collect();
    let candidates = image_entries(&names);
    if candidates.is_empty() {
        let mut entries = names;
        entries.sort();
        entries.truncate(MAX_LISTED_ENTRIES);
        return Err(ImportError::NoImages { entries });
    }
    tracing::info!(count = candidates.len(), "images found in archive");

    let mut extracted = Vec::with_capacity(candidates.len());
    for (idx, entry) in candidates.iter().enumerate() {
        let ordinal = idx + 1;
        let path = output_dir.join(output_name(ordinal, entry));

        let result = archive
            .by_name(entry)
            .map_err(|e| io::Error::other(e.to_string()))
            .and_then(|mut source| {
                let mut target = File::create(&path)?;
                io::copy(&mut source, &mut target)
            });

        match result {
            Ok(bytes) => {
                tracing::debug!(%entry, path = %path.display(), bytes, "image extracted");
                extracted.push(ExtractedImage { ordinal, path });
            }
            Err(e) => tracing::error!(%entry, error = %e, "failed to extract image"),
        }
    }

    Ok(extracted)
}
