use std::path::Path;

use tracing::{info, warn};
use walkdir::WalkDir;

use super::{Document, PipelineError};

/// Reads every file under `root` whose extension is in `extensions`.
///
/// Files that cannot be read as UTF-8 are logged and skipped. The result is
/// sorted by relative path.
pub fn collect_documents(root: &Path, extensions: &[&str]) -> Result<Vec<Document>, PipelineError> {
    let mut documents = Vec::new();
    let mut matched = 0usize;

    for entry in WalkDir::new(root) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let wanted = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| extensions.contains(&ext));
        if !wanted {
            continue;
        }
        matched += 1;

        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Error processing {}: {}", path.display(), e);
                continue;
            }
        };

        let relative = path.strip_prefix(root).unwrap_or(path);
        let filename = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        documents.push(Document { content, filename });
    }

    documents.sort_by(|a, b| a.filename.cmp(&b.filename));
    info!("Found {} files, processed {} documents", matched, documents.len());

    Ok(documents)
}
