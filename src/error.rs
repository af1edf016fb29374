//! Error types for each pipeline stage.
//!
//! Every stage returns its own error enum. The orchestrator logs these and
//! moves on; none of them aborts a run.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while acquiring a page.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection, DNS, TLS or body-read failure.
    #[error("network error fetching {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The HTTP client could not be constructed.
    #[error("could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The HTTP client timed out.
    #[error("timeout fetching {url}")]
    Timeout { url: String },

    /// Server answered with a non-2xx status.
    #[error("HTTP {status} fetching {url}")]
    HttpStatus { url: String, status: u16 },

    /// No WebDriver session could be created.
    #[error("could not start a WebDriver session at {webdriver_url}: {message}")]
    WebDriver {
        webdriver_url: String,
        message: String,
    },

    /// A browser command (navigate, find, read HTML) failed.
    #[error("browser failed while {context} {url}: {source}")]
    Browser {
        url: String,
        context: &'static str,
        #[source]
        source: fantoccini::error::CmdError,
    },

    /// The rendered fetch exceeded its overall time budget.
    #[error("rendering {url} did not finish within {secs} seconds")]
    RenderTimeout { url: String, secs: u64 },
}

impl FetchError {
    /// Classifies a reqwest error as a timeout or a general network failure.
    pub fn from_reqwest(url: impl Into<String>, source: reqwest::Error) -> Self {
        let url = url.into();
        if source.is_timeout() {
            Self::Timeout { url }
        } else {
            Self::Network { url, source }
        }
    }
}

/// Errors produced while populating or reading the local page cache.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The fetch succeeded but returned nothing worth caching.
    #[error("fetched page {url} was empty; not caching it")]
    EmptyPage { url: String },

    #[error("IO error on cache file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors produced while downloading a single document.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// The link could not be parsed into a usable URL.
    #[error("invalid URL: {url}")]
    InvalidUrl { url: String },

    #[error("network error downloading {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("timeout downloading {url}")]
    Timeout { url: String },

    /// Anything other than 200 OK.
    #[error("HTTP {status} downloading {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("invalid content type for {url}: {found:?} (expected {expected})")]
    ContentType {
        url: String,
        found: String,
        expected: String,
    },

    /// The server sent 200 with no body; no file is created.
    #[error("downloaded 0 bytes for {url}; not creating file")]
    EmptyBody { url: String },

    #[error("IO error writing to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DownloadError {
    pub fn from_reqwest(url: impl Into<String>, source: reqwest::Error) -> Self {
        let url = url.into();
        if source.is_timeout() {
            Self::Timeout { url }
        } else {
            Self::Network { url, source }
        }
    }

    /// Short stable label used in logs and summaries.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidUrl { .. } => "invalid_url",
            Self::Network { .. } | Self::Timeout { .. } => "transport",
            Self::HttpStatus { .. } | Self::ContentType { .. } => "protocol",
            Self::EmptyBody { .. } => "integrity",
            Self::Io { .. } => "filesystem",
        }
    }
}

/// Errors produced while building a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// Extensions must be non-empty and alphanumeric
    #[error("invalid file extension {0:?}")]
    InvalidExtension(String),
}
