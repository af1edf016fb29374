//! Fetch-validate-write sequence for a single document.
//!
//! The body is buffered in memory and the destination file is only created
//! once every check has passed, so a rejected response never leaves a
//! truncated or empty file behind.

use crate::error::DownloadError;
use crate::filename::url_to_filename;
use crate::results::DownloadOutcome;
use crate::utils::file_exists;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use std::path::Path;
use std::time::Duration;
use tokio::io::AsyncWriteExt;

/// Downloads documents of one type into a directory
#[derive(Debug, Clone)]
pub struct Downloader {
    client: Client,
    extension: String,
    content_type: String,
}

impl Downloader {
    /// Create a downloader whose client gives up after `timeout`
    pub fn new(timeout: Duration, extension: &str, content_type: &str) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, extension, content_type))
    }

    pub fn with_client(client: Client, extension: &str, content_type: &str) -> Self {
        Self {
            client,
            extension: extension.trim_start_matches('.').to_lowercase(),
            content_type: content_type.to_string(),
        }
    }

    /// Download `url` into `output_dir`, skipping it if the file is already there
    pub async fn download(&self, url: &str, output_dir: &Path) -> Result<DownloadOutcome, DownloadError> {
        let filename = url_to_filename(url, &self.extension).ok_or_else(|| DownloadError::InvalidUrl {
            url: url.to_string(),
        })?;
        let path = output_dir.join(filename);

        if file_exists(&path) {
            ::log::info!("File already exists, skipping: {}", path.display());
            return Ok(DownloadOutcome::Skipped { path });
        }

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DownloadError::from_reqwest(url, e))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(DownloadError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if !content_type.contains(&self.content_type) {
            return Err(DownloadError::ContentType {
                url: url.to_string(),
                found: content_type,
                expected: self.content_type.clone(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| DownloadError::from_reqwest(url, e))?;
        if body.is_empty() {
            return Err(DownloadError::EmptyBody {
                url: url.to_string(),
            });
        }

        let io_err = |source| DownloadError::Io {
            path: path.clone(),
            source,
        };
        let mut file = tokio::fs::File::create(&path).await.map_err(io_err)?;
        file.write_all(&body).await.map_err(io_err)?;
        file.flush().await.map_err(io_err)?;

        ::log::info!(
            "Successfully downloaded {} bytes: {} -> {}",
            body.len(),
            url,
            path.display()
        );
        Ok(DownloadOutcome::Downloaded {
            bytes: body.len() as u64,
            path,
        })
    }
}
