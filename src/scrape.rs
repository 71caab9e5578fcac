//! Fetching web pages as plain text through a reader service, plus the small
//! text helpers the `scrape` tool reports with.

use std::env;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, warn};

pub const DEFAULT_READER_BASE: &str = "https://r.jina.ai/";
pub const READER_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("reader returned {status}: {body}")]
    Status { status: u16, body: String },
}

#[async_trait]
pub trait PageReader: Send + Sync {
    async fn read(&self, url: &str) -> Result<String, ScrapeError>;
}

/// Reader that asks a r.jina.ai-style service for a text rendition of a page
/// by appending the target URL to the service base.
pub struct JinaReader {
    client: Client,
    base_url: String,
}

impl JinaReader {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ScrapeError> {
        let client = Client::builder().timeout(READER_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Uses `READER_BASE_URL` when set.
    pub fn new_from_env() -> Result<Self, ScrapeError> {
        let base = env::var("READER_BASE_URL").unwrap_or_else(|_| DEFAULT_READER_BASE.to_string());
        Self::new(base)
    }

    pub fn reader_url(&self, url: &str) -> String {
        if self.base_url.ends_with('/') {
            format!("{}{}", self.base_url, url)
        } else {
            format!("{}/{}", self.base_url, url)
        }
    }
}

#[async_trait]
impl PageReader for JinaReader {
    async fn read(&self, url: &str) -> Result<String, ScrapeError> {
        let reader_url = self.reader_url(url);
        debug!("GET {}", reader_url);

        let response = self.client.get(&reader_url).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ScrapeError::Status { status, body });
        }

        Ok(response.text().await?)
    }
}

/// Returns the page text, or a one-line description of what went wrong.
pub async fn scrape_web(reader: &dyn PageReader, url: &str) -> String {
    match reader.read(url).await {
        Ok(text) => text,
        Err(e) => {
            warn!("scrape of {} failed: {}", url, e);
            format!("Error scraping {}: {}", url, e)
        }
    }
}

/// Case-insensitive, non-overlapping count of `word` in `text`.
pub fn count_occurrences(text: &str, word: &str) -> usize {
    text.to_lowercase().matches(&word.to_lowercase()).count()
}

/// Up to `limit` snippets around case-insensitive matches of `word`, with
/// `radius` characters on each side and newlines flattened. Matches are
/// scanned one character apart, so overlapping hits each get a snippet.
pub fn occurrence_contexts(text: &str, word: &str, limit: usize, radius: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let needle: Vec<char> = word.to_lowercase().chars().collect();
    if needle.is_empty() {
        return Vec::new();
    }

    let lowered: Vec<char> = chars
        .iter()
        .map(|c| {
            let mut lower = c.to_lowercase();
            match (lower.next(), lower.next()) {
                (Some(l), None) => l,
                _ => *c,
            }
        })
        .collect();

    let mut contexts = Vec::new();
    let mut pos = 0;
    while contexts.len() < limit && pos + needle.len() <= lowered.len() {
        if lowered[pos..pos + needle.len()] == needle[..] {
            let start = pos.saturating_sub(radius);
            let end = (pos + needle.len() + radius).min(chars.len());
            let snippet: String = chars[start..end]
                .iter()
                .map(|&c| if c == '\n' { ' ' } else { c })
                .collect();
            contexts.push(snippet);
        }
        pos += 1;
    }

    contexts
}
