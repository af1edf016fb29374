//! Fetch a page, pull out links to documents of one file type, and download
//! each one that is not already on disk.

pub mod cache;
pub mod config;
pub mod download;
pub mod error;
pub mod extract;
pub mod fetchers;
pub mod filename;
pub mod filter;
pub mod pipeline;
pub mod results;
pub mod utils;

// Re-export commonly used types for convenience
pub use config::{CacheMode, FetcherKind, HarvestConfig};
pub use download::Downloader;
pub use error::{CacheError, ConfigError, DownloadError, FetchError};
pub use extract::{LinkExtractor, LinkSet};
pub use fetchers::{PageFetcher, RenderedFetcher, StaticFetcher};
pub use pipeline::Harvester;
pub use results::{DownloadOutcome, RunSummary};
