pub mod fetcher;
pub mod rendered;
pub mod static_http;

pub use fetcher::PageFetcher;
pub use rendered::RenderedFetcher;
pub use static_http::StaticFetcher;

use crate::config::{FetcherKind, HarvestConfig};
use crate::error::FetchError;

/// Builds the page fetcher selected by the configuration
pub fn from_config(config: &HarvestConfig) -> Result<Box<dyn PageFetcher>, FetchError> {
    match config.fetcher {
        FetcherKind::Static => Ok(Box::new(StaticFetcher::new(config.fetch_timeout())?)),
        FetcherKind::Rendered => Ok(Box::new(RenderedFetcher::new(
            &config.webdriver_url,
            config.headless,
            config.render_timeout(),
        ))),
    }
}
