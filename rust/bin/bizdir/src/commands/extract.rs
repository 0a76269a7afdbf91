//! `bizdir extract-images`

use std::path::Path;

use company::import::{ImportError, extract_images};

/// Extract the workbook's images and print what was written.
pub fn run(xlsx: &Path, output_dir: &Path) -> anyhow::Result<usize> {
    println!("Opening: {}", xlsx.display());
    println!("Extracting to: {}\n", output_dir.display());

    let images = match extract_images(xlsx, output_dir) {
        Ok(images) => images,
        Err(ImportError::NoImages { entries }) => {
            println!("No images found in the workbook.\n");
            println!("Workbook contents:");
            for entry in &entries {
                println!("   {}", entry);
            }
            anyhow::bail!("no images found in {}", xlsx.display());
        }
        Err(e) => return Err(e.into()),
    };

    for image in &images {
        let size = std::fs::metadata(&image.path).map(|m| m.len()).unwrap_or(0);
        let name = image
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        println!("  ✓ {} ({:.1} KB)", name, size as f64 / 1024.0);
    }
    println!("\n{} images extracted to {}", images.len(), output_dir.display());
    Ok(images.len())
}
