use std::path::Path;

use reqwest::Client;
use tracing::info;

use super::PipelineError;

/// Downloads `url` to `dest` unless `dest` is already there.
///
/// Presence is the only check; a partial or stale file is reused as is.
/// Returns whether a download happened.
pub async fn download_archive(
    client: &Client,
    url: &str,
    dest: &Path,
) -> Result<bool, PipelineError> {
    if dest.exists() {
        info!("Zip file {} already exists, skipping download.", dest.display());
        return Ok(false);
    }

    info!("Downloading {}...", url);
    let response = client.get(url).send().await?;

    if !response.status().is_success() {
        return Err(PipelineError::Status {
            url: url.to_string(),
            status: response.status().as_u16(),
        });
    }

    let bytes = response.bytes().await?;
    if let Some(parent) = dest.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(dest, &bytes).await?;
    info!("Downloaded {} ({} bytes)", dest.display(), bytes.len());

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn existing_file_skips_download() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("archive.zip");
        std::fs::write(&dest, b"already here").unwrap();

        // Unroutable URL: reaching the network would fail the test.
        let downloaded = download_archive(&Client::new(), "http://127.0.0.1:9/never", &dest)
            .await
            .unwrap();

        assert!(!downloaded);
        assert_eq!(std::fs::read(&dest).unwrap(), b"already here");
    }
}
