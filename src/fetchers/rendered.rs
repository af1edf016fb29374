use super::PageFetcher;
use crate::error::FetchError;
use async_trait::async_trait;
use fantoccini::error::CmdError;
use fantoccini::wd::Capabilities;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::json;
use std::fmt::Display;
use std::future::Future;
use std::time::{Duration, Instant};
use tokio::time::timeout;

/// Upper bound on ending the browser session once the page is in hand
const CLOSE_TIMEOUT: Duration = Duration::from_secs(10);

/// Common WebDriver endpoints tried when the configured one refuses
const FALLBACK_WEBDRIVER_URLS: [&str; 4] = [
    "http://localhost:9515", // ChromeDriver default
    "http://localhost:4723", // Appium default
    "http://localhost:9222", // Chrome debug port default
    "http://127.0.0.1:4444", // Try with IP instead of localhost
];

/// Fetches the fully rendered DOM of a page through a WebDriver browser session
#[derive(Debug, Clone)]
pub struct RenderedFetcher {
    webdriver_url: String,
    headless: bool,
    timeout: Duration,
}

impl RenderedFetcher {
    pub fn new(webdriver_url: &str, headless: bool, timeout: Duration) -> Self {
        Self {
            webdriver_url: webdriver_url.to_string(),
            headless,
            timeout,
        }
    }

    /// Chrome options for the session
    fn capabilities(&self) -> Capabilities {
        let mut args = vec![
            "--disable-gpu",
            "--window-size=1920,1080",
            "--no-sandbox",
            "--disable-setuid-sandbox",
        ];
        if self.headless {
            args.insert(0, "--headless=new");
        }

        let mut caps = Capabilities::new();
        caps.insert("goog:chromeOptions".to_string(), json!({ "args": args }));
        caps
    }

    /// Connects to the configured WebDriver, then to the usual local fallbacks
    async fn connect(&self) -> Result<Client, FetchError> {
        let first_error = match ClientBuilder::native()
            .capabilities(self.capabilities())
            .connect(&self.webdriver_url)
            .await
        {
            Ok(client) => {
                ::log::debug!("Connected to WebDriver at {}", self.webdriver_url);
                return Ok(client);
            }
            Err(e) => {
                ::log::error!(
                    "Failed to connect to WebDriver at {}: {}",
                    self.webdriver_url,
                    e
                );
                e.to_string()
            }
        };

        for url in FALLBACK_WEBDRIVER_URLS {
            if url == self.webdriver_url {
                continue;
            }

            ::log::info!("Trying fallback WebDriver URL: {}", url);
            if let Ok(client) = ClientBuilder::native()
                .capabilities(self.capabilities())
                .connect(url)
                .await
            {
                ::log::debug!("Connected to fallback WebDriver at {}", url);
                return Ok(client);
            }
        }

        ::log::error!(
            "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
        );
        Err(FetchError::WebDriver {
            webdriver_url: self.webdriver_url.clone(),
            message: first_error,
        })
    }

    /// Navigates and returns the outer HTML of the document element
    async fn render(client: &Client, url: &str) -> Result<String, FetchError> {
        // Navigation returns once the page load has completed
        client
            .goto(url)
            .await
            .map_err(|e| browser_error(url, "navigating to", e))?;

        let root = client
            .wait()
            .for_element(Locator::Css("html"))
            .await
            .map_err(|e| browser_error(url, "waiting for the document of", e))?;

        root.html(false)
            .await
            .map_err(|e| browser_error(url, "reading the HTML of", e))
    }
}

fn browser_error(url: &str, context: &'static str, source: CmdError) -> FetchError {
    if source.to_string().contains("Unable to find session") {
        ::log::warn!("Lost browser session while {} {}", context, url);
    }
    FetchError::Browser {
        url: url.to_string(),
        context,
        source,
    }
}

/// Awaits a session close for at most `limit`; returns false if it failed or hung
async fn close_session<F, E>(close: F, limit: Duration) -> bool
where
    F: Future<Output = Result<(), E>>,
    E: Display,
{
    match timeout(limit, close).await {
        Ok(Ok(())) => true,
        Ok(Err(e)) => {
            ::log::warn!("Failed to close browser session: {}", e);
            false
        }
        Err(_) => {
            ::log::warn!(
                "Browser session did not close within {} seconds",
                limit.as_secs()
            );
            false
        }
    }
}

#[async_trait]
impl PageFetcher for RenderedFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        ::log::info!("Scraping: {}", url);
        let started = Instant::now();
        let timed_out = || FetchError::RenderTimeout {
            url: url.to_string(),
            secs: self.timeout.as_secs(),
        };

        let client = timeout(self.timeout, self.connect())
            .await
            .map_err(|_| timed_out())??;

        let remaining = self.timeout.saturating_sub(started.elapsed());
        let result = match timeout(remaining, Self::render(&client, url)).await {
            Ok(result) => result,
            Err(_) => Err(timed_out()),
        };

        // Close the session whatever happened above
        close_session(client.close(), CLOSE_TIMEOUT).await;

        match &result {
            Ok(html) => ::log::debug!(
                "Rendered {} ({} bytes) in {:.2} seconds",
                url,
                html.len(),
                started.elapsed().as_secs_f64()
            ),
            Err(e) => ::log::error!("{}", e),
        }
        result
    }

    fn name(&self) -> &'static str {
        "rendered"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headless_capabilities() {
        let fetcher = RenderedFetcher::new("http://localhost:4444", true, Duration::from_secs(300));
        let caps = fetcher.capabilities();
        let args = caps["goog:chromeOptions"]["args"].as_array().unwrap();
        assert_eq!(args[0], "--headless=new");
        assert!(args.iter().any(|a| a == "--no-sandbox"));
        assert!(args.iter().any(|a| a == "--window-size=1920,1080"));
    }

    #[tokio::test]
    async fn test_close_session_is_bounded() {
        let started = Instant::now();
        let hung = std::future::pending::<Result<(), String>>();
        assert!(!close_session(hung, Duration::from_millis(50)).await);
        assert!(started.elapsed() < Duration::from_secs(5));

        assert!(close_session(async { Ok::<(), String>(()) }, Duration::from_millis(50)).await);
        assert!(!close_session(async { Err("gone".to_string()) }, Duration::from_millis(50)).await);
    }

    #[test]
    fn test_windowed_capabilities() {
        let fetcher = RenderedFetcher::new("http://localhost:4444", false, Duration::from_secs(300));
        let caps = fetcher.capabilities();
        let args = caps["goog:chromeOptions"]["args"].as_array().unwrap();
        assert!(!args.iter().any(|a| a.as_str().unwrap().starts_with("--headless")));
    }
}
