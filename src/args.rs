use clap::{Parser, ValueEnum};
use doc_harvest::{CacheMode, FetcherKind, HarvestConfig};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "doc-harvest")]
#[command(about = "Download every document linked from a web page")]
#[command(version)]
pub struct Args {
    /// Page to scan for document links
    pub url: Option<String>,

    /// Path to JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Local copy of the page's HTML
    #[arg(long)]
    pub cache_file: Option<PathBuf>,

    /// Directory that receives the documents
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// File extension to look for (e.g. pdf)
    #[arg(short, long)]
    pub extension: Option<String>,

    /// MIME type a download must declare
    #[arg(long)]
    pub content_type: Option<String>,

    /// How to fetch the page
    #[arg(short, long, value_enum)]
    pub fetcher: Option<FetcherArg>,

    /// WebDriver server for the rendered fetcher
    #[arg(long)]
    pub webdriver_url: Option<String>,

    /// Show the browser window during a rendered fetch
    #[arg(long)]
    pub headed: bool,

    /// Per-download timeout in seconds
    #[arg(long)]
    pub download_timeout: Option<u64>,

    /// Rendered fetch timeout in seconds
    #[arg(long)]
    pub render_timeout: Option<u64>,

    /// How a freshly fetched page is written to the cache file
    #[arg(long, value_enum)]
    pub cache_mode: Option<CacheModeArg>,

    /// Only download links matching this regex (repeatable)
    #[arg(long = "include")]
    pub include_patterns: Vec<String>,

    /// Never download links matching this regex (repeatable)
    #[arg(long = "exclude")]
    pub exclude_patterns: Vec<String>,

    /// Print the run summary as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum FetcherArg {
    Static,
    Rendered,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum CacheModeArg {
    Overwrite,
    Append,
}

impl From<FetcherArg> for FetcherKind {
    fn from(arg: FetcherArg) -> Self {
        match arg {
            FetcherArg::Static => FetcherKind::Static,
            FetcherArg::Rendered => FetcherKind::Rendered,
        }
    }
}

impl From<CacheModeArg> for CacheMode {
    fn from(arg: CacheModeArg) -> Self {
        match arg {
            CacheModeArg::Overwrite => CacheMode::Overwrite,
            CacheModeArg::Append => CacheMode::Append,
        }
    }
}

impl Args {
    /// Apply command-line flags on top of a loaded configuration
    pub fn apply_to(&self, config: &mut HarvestConfig) {
        if let Some(url) = &self.url {
            config.page_url = url.clone();
        }
        if let Some(path) = &self.cache_file {
            config.cache_file = path.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(ext) = &self.extension {
            config.extension = ext.clone();
        }
        if let Some(content_type) = &self.content_type {
            config.content_type = content_type.clone();
        }
        if let Some(fetcher) = self.fetcher {
            config.fetcher = fetcher.into();
        }
        if let Some(webdriver_url) = &self.webdriver_url {
            config.webdriver_url = webdriver_url.clone();
        }
        if self.headed {
            config.headless = false;
        }
        if let Some(secs) = self.download_timeout {
            config.download_timeout_secs = secs;
        }
        if let Some(secs) = self.render_timeout {
            config.render_timeout_secs = secs;
        }
        if let Some(mode) = self.cache_mode {
            config.cache_mode = mode.into();
        }
        config.include_patterns.extend(self.include_patterns.iter().cloned());
        config.exclude_patterns.extend(self.exclude_patterns.iter().cloned());
    }
}
