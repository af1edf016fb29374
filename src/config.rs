use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Strategy used to acquire the source page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetcherKind {
    /// Plain HTTP GET of the page
    Static,
    /// Fully rendered DOM through a WebDriver-controlled browser
    Rendered,
}

/// How a freshly fetched page is written to the cache file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheMode {
    /// Truncate the cache file before writing
    Overwrite,
    /// Append to whatever the cache file already holds
    Append,
}

/// Configuration for a harvest run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvestConfig {
    /// Page to scan for document links
    #[serde(default = "default_page_url")]
    pub page_url: String,

    /// Local copy of the page's HTML
    #[serde(default = "default_cache_file")]
    pub cache_file: PathBuf,

    /// Directory that receives downloaded documents
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Target file extension, without the leading dot
    #[serde(default = "default_extension")]
    pub extension: String,

    /// MIME type a download's Content-Type must contain
    #[serde(default = "default_content_type")]
    pub content_type: String,

    #[serde(default = "default_fetcher")]
    pub fetcher: FetcherKind,

    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Run the browser without a window
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Per-download client timeout
    #[serde(default = "default_download_timeout_secs")]
    pub download_timeout_secs: u64,

    /// Overall budget for a rendered page fetch
    #[serde(default = "default_render_timeout_secs")]
    pub render_timeout_secs: u64,

    /// Client timeout for a static page fetch (client default when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetch_timeout_secs: Option<u64>,

    #[serde(default = "default_cache_mode")]
    pub cache_mode: CacheMode,

    /// Regex patterns a link must match (any of them) to be downloaded
    #[serde(default)]
    pub include_patterns: Vec<String>,

    /// Regex patterns that reject a link (these take precedence)
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
}

fn default_page_url() -> String {
    "https://www.gojo.com/en/SDS".to_string()
}

fn default_cache_file() -> PathBuf {
    PathBuf::from("gojo.html")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("PDFs/")
}

fn default_extension() -> String {
    "pdf".to_string()
}

fn default_content_type() -> String {
    "application/pdf".to_string()
}

fn default_fetcher() -> FetcherKind {
    FetcherKind::Rendered
}

/// Default value for webdriver_url
fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_headless() -> bool {
    true
}

fn default_download_timeout_secs() -> u64 {
    30
}

/// 5 minutes
fn default_render_timeout_secs() -> u64 {
    300
}

fn default_cache_mode() -> CacheMode {
    CacheMode::Overwrite
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            page_url: default_page_url(),
            cache_file: default_cache_file(),
            output_dir: default_output_dir(),
            extension: default_extension(),
            content_type: default_content_type(),
            fetcher: default_fetcher(),
            webdriver_url: default_webdriver_url(),
            headless: default_headless(),
            download_timeout_secs: default_download_timeout_secs(),
            render_timeout_secs: default_render_timeout_secs(),
            fetch_timeout_secs: None,
            cache_mode: default_cache_mode(),
            include_patterns: Vec::new(),
            exclude_patterns: Vec::new(),
        }
    }
}

impl HarvestConfig {
    /// Create a configuration for the given page with default values
    pub fn new(page_url: &str) -> Self {
        Self {
            page_url: page_url.to_string(),
            ..Self::default()
        }
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };

        let mut file = File::open(path).map_err(io_err)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents).map_err(io_err)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Apply overrides from the environment
    pub fn apply_env(&mut self) {
        // Override the WebDriver URL with an environment variable if provided
        if let Ok(webdriver_url) = std::env::var("WEBDRIVER_URL") {
            if !webdriver_url.is_empty() {
                self.webdriver_url = webdriver_url;
            }
        }
    }

    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }

    pub fn render_timeout(&self) -> Duration {
        Duration::from_secs(self.render_timeout_secs)
    }

    pub fn fetch_timeout(&self) -> Option<Duration> {
        self.fetch_timeout_secs.map(Duration::from_secs)
    }

    /// Extension with any leading dot removed and lower-cased
    pub fn normalized_extension(&self) -> String {
        self.extension.trim_start_matches('.').to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = HarvestConfig::default();
        assert_eq!(config.page_url, "https://www.gojo.com/en/SDS");
        assert_eq!(config.cache_file, PathBuf::from("gojo.html"));
        assert_eq!(config.output_dir, PathBuf::from("PDFs/"));
        assert_eq!(config.content_type, "application/pdf");
        assert_eq!(config.fetcher, FetcherKind::Rendered);
        assert_eq!(config.cache_mode, CacheMode::Overwrite);
        assert_eq!(config.download_timeout(), Duration::from_secs(30));
        assert_eq!(config.render_timeout(), Duration::from_secs(300));
        assert!(config.fetch_timeout().is_none());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = HarvestConfig::from_json(
            r#"{"page_url": "https://x.test/docs", "fetcher": "static", "cache_mode": "append"}"#,
        )
        .unwrap();
        assert_eq!(config.page_url, "https://x.test/docs");
        assert_eq!(config.fetcher, FetcherKind::Static);
        assert_eq!(config.cache_mode, CacheMode::Append);
        assert_eq!(config.extension, "pdf");
        assert_eq!(config.webdriver_url, "http://localhost:4444");
    }

    #[test]
    fn test_invalid_json() {
        let result = HarvestConfig::from_json(r#"{"fetcher": "carrier-pigeon"}"#);
        assert!(matches!(result, Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"extension": ".DOCX", "output_dir": "docs"}}"#).unwrap();

        let config = HarvestConfig::from_file(file.path()).unwrap();
        assert_eq!(config.normalized_extension(), "docx");
        assert_eq!(config.output_dir, PathBuf::from("docs"));
    }

    #[test]
    fn test_missing_file() {
        let result = HarvestConfig::from_file("/definitely/not/here.json");
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
