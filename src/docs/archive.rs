use std::fs::File;
use std::path::Path;

use tracing::info;

use super::PipelineError;

/// Unpacks `zip_path` into `into`, unless `expected_dir` (the directory the
/// archive is known to create) already exists. Returns whether anything was
/// extracted.
pub fn extract_archive(
    zip_path: &Path,
    into: &Path,
    expected_dir: &Path,
) -> Result<bool, PipelineError> {
    if expected_dir.exists() {
        info!(
            "Extract directory {} already exists, skipping extraction.",
            expected_dir.display()
        );
        return Ok(false);
    }

    info!("Extracting {}...", zip_path.display());
    let file = File::open(zip_path)?;
    let mut archive = zip::ZipArchive::new(file)?;
    archive.extract(into)?;
    info!("Extracted {} entries to {}", archive.len(), into.display());

    Ok(true)
}
