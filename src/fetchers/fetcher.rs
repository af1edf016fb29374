use crate::error::FetchError;
use async_trait::async_trait;

/// Anything that can turn a page URL into its HTML
///
/// Implementations differ only in how the page is obtained; callers never
/// need to know which one they hold.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch the full content of `url`
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;

    /// Short name used in log lines
    fn name(&self) -> &'static str;
}
