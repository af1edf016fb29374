use crate::config::CacheMode;
use crate::error::CacheError;
use crate::fetchers::PageFetcher;
use crate::utils::file_exists;
use std::path::Path;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

/// What `ensure_cached` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    /// The cache file was already there; nothing was fetched
    Present,
    /// The page was fetched and written
    Fetched { bytes: usize },
}

/// Make sure `path` holds a copy of `url`, fetching it once if the file is missing.
///
/// A failed or empty fetch leaves the cache untouched so the next run tries again.
pub async fn ensure_cached(
    fetcher: &dyn PageFetcher,
    url: &str,
    path: &Path,
    mode: CacheMode,
) -> Result<CacheStatus, CacheError> {
    if file_exists(path) {
        ::log::info!("Using cached page {}", path.display());
        return Ok(CacheStatus::Present);
    }

    ::log::info!("No cached page at {}; fetching with {} fetcher", path.display(), fetcher.name());
    let content = fetcher.fetch(url).await?;
    if content.trim().is_empty() {
        return Err(CacheError::EmptyPage {
            url: url.to_string(),
        });
    }
    write_cache(path, &content, mode).await?;

    Ok(CacheStatus::Fetched {
        bytes: content.len(),
    })
}

/// Write page content to the cache file
pub async fn write_cache(path: &Path, content: &str, mode: CacheMode) -> Result<(), CacheError> {
    let io_err = |source| CacheError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut options = OpenOptions::new();
    options.create(true);
    match mode {
        CacheMode::Overwrite => options.write(true).truncate(true),
        CacheMode::Append => options.append(true),
    };

    let mut file = options.open(path).await.map_err(io_err)?;
    file.write_all(content.as_bytes()).await.map_err(io_err)?;
    if mode == CacheMode::Append {
        file.write_all(b"\n").await.map_err(io_err)?;
    }
    file.flush().await.map_err(io_err)?;

    ::log::debug!("Wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}

/// Read the cached page back as text; invalid UTF-8 is replaced, not rejected
pub async fn read_cache(path: &Path) -> Result<String, CacheError> {
    let bytes = tokio::fs::read(path).await.map_err(|source| CacheError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
