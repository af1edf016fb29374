use crate::cache::{self, CacheStatus};
use crate::config::HarvestConfig;
use crate::download::Downloader;
use crate::error::ConfigError;
use crate::extract::LinkExtractor;
use crate::fetchers::{self, PageFetcher};
use crate::filter::LinkFilter;
use crate::results::RunSummary;
use crate::utils::{create_directory, directory_exists};

/// Permission bits for the output directory
const OUTPUT_DIR_MODE: u32 = 0o755;

/// Runs the whole fetch, extract, filter and download pass for one page
pub struct Harvester {
    config: HarvestConfig,
    fetcher: Option<Box<dyn PageFetcher>>,
}

impl Harvester {
    /// Create a harvester; the page fetcher is chosen from the configuration
    /// unless one is supplied with `with_fetcher`
    pub fn new(config: HarvestConfig) -> Self {
        Self {
            config,
            fetcher: None,
        }
    }

    /// Use a specific page fetcher instead of the configured one
    pub fn with_fetcher(mut self, fetcher: Box<dyn PageFetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// Execute one run.
    ///
    /// Only an unusable configuration is an error. Every other failure is
    /// logged and the run carries on to the next step or link.
    pub async fn run(&self) -> Result<RunSummary, ConfigError> {
        let config = &self.config;
        let extractor = LinkExtractor::new(&config.normalized_extension())?;
        let filter = LinkFilter::new(&config.include_patterns, &config.exclude_patterns)?;

        let mut summary = RunSummary::default();

        // A failure here is not fatal; the writes below will report it again
        if !directory_exists(&config.output_dir) {
            match create_directory(&config.output_dir, OUTPUT_DIR_MODE) {
                Ok(()) => ::log::info!("Created output directory {}", config.output_dir.display()),
                Err(e) => ::log::error!(
                    "Failed to create output directory {}: {}",
                    config.output_dir.display(),
                    e
                ),
            }
        }

        let page = match self.load_page().await {
            Some(page) => page,
            None => return Ok(summary),
        };

        let links = extractor.extract(&page);
        summary.links_found = links.len();
        ::log::info!("Found {} .{} links", links.len(), extractor.extension());

        let links = filter.apply(links);
        summary.links_accepted = links.len();

        let downloader = match Downloader::new(
            config.download_timeout(),
            extractor.extension(),
            &config.content_type,
        ) {
            Ok(downloader) => downloader,
            Err(e) => {
                ::log::error!("Failed to build download client: {}", e);
                summary.failed = links.len();
                return Ok(summary);
            }
        };

        for (index, link) in links.iter().enumerate() {
            ::log::debug!("Link {}/{}: {}", index + 1, links.len(), link);
            let result = downloader.download(link, &config.output_dir).await;
            if let Err(e) = &result {
                ::log::error!("Download failed [{}]: {}", e.kind(), e);
            }
            summary.record(&result);
        }

        ::log::info!(
            "Run complete: {} downloaded, {} skipped, {} failed",
            summary.downloaded,
            summary.skipped,
            summary.failed
        );
        Ok(summary)
    }

    /// Make sure the page cache exists, then read it. `None` means nothing to process.
    async fn load_page(&self) -> Option<String> {
        let config = &self.config;

        let built;
        let fetcher: &dyn PageFetcher = match &self.fetcher {
            Some(fetcher) => &**fetcher,
            None => {
                built = match fetchers::from_config(config) {
                    Ok(fetcher) => fetcher,
                    Err(e) => {
                        ::log::error!("Failed to set up page fetcher: {}", e);
                        return None;
                    }
                };
                &*built
            }
        };

        match cache::ensure_cached(fetcher, &config.page_url, &config.cache_file, config.cache_mode).await {
            Ok(CacheStatus::Fetched { bytes }) => {
                ::log::info!("Cached {} bytes of {}", bytes, config.page_url)
            }
            Ok(CacheStatus::Present) => {}
            Err(e) => {
                ::log::error!("Could not obtain page {}: {}", config.page_url, e);
                return None;
            }
        }

        match cache::read_cache(&config.cache_file).await {
            Ok(page) => Some(page),
            Err(e) => {
                ::log::error!("{}", e);
                None
            }
        }
    }
}
