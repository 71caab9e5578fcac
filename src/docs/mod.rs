//! Download a documentation archive, unpack it, and load its markdown files
//! into a full-text index.

pub mod archive;
pub mod collect;
pub mod fetch;
pub mod index;

use std::path::PathBuf;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

pub use index::{SearchHit, SqliteFtsIndex, TextIndex};

pub const DEFAULT_ARCHIVE_URL: &str = "https://github.com/jlowin/fastmcp/archive/refs/heads/main.zip";
pub const DEFAULT_ARCHIVE_NAME: &str = "fastmcp-main.zip";
pub const DEFAULT_EXTRACT_DIR: &str = "fastmcp-main";
pub const DEFAULT_EXTENSIONS: &[&str] = &["md", "mdx"];

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("download of {url} failed with status {status}")]
    Status { url: String, status: u16 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("index error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("no documents found under {0}")]
    NoDocuments(PathBuf),
}

/// A text file picked up from the unpacked tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub content: String,
    /// Path relative to the tree root, always `/`-separated.
    pub filename: String,
}

#[derive(Debug, Clone)]
pub struct DocsConfig {
    pub archive_url: String,
    pub workdir: PathBuf,
    pub archive_name: String,
    pub extract_dir: String,
    pub extensions: Vec<String>,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            archive_url: DEFAULT_ARCHIVE_URL.to_string(),
            workdir: PathBuf::from("."),
            archive_name: DEFAULT_ARCHIVE_NAME.to_string(),
            extract_dir: DEFAULT_EXTRACT_DIR.to_string(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }
}

impl DocsConfig {
    pub fn archive_path(&self) -> PathBuf {
        self.workdir.join(&self.archive_name)
    }

    pub fn extract_path(&self) -> PathBuf {
        self.workdir.join(&self.extract_dir)
    }
}

/// Runs download, extract, collect and fit in order. Any failure ends the run.
/// Returns how many documents were indexed.
pub async fn run(
    config: &DocsConfig,
    client: &Client,
    index: &dyn TextIndex,
) -> Result<usize, PipelineError> {
    let archive_path = config.archive_path();
    let extract_path = config.extract_path();

    fetch::download_archive(client, &config.archive_url, &archive_path).await?;
    archive::extract_archive(&archive_path, &config.workdir, &extract_path)?;

    let extensions: Vec<&str> = config.extensions.iter().map(String::as_str).collect();
    let documents = collect::collect_documents(&extract_path, &extensions)?;
    if documents.is_empty() {
        return Err(PipelineError::NoDocuments(extract_path));
    }

    info!("Building search index...");
    let count = documents.len();
    index.fit(documents).await?;
    info!("Index built with {} documents", count);

    Ok(count)
}
