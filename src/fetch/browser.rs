//! Script-rendered fetch via a WebDriver-controlled headless Chrome.
//!
//! Substantially slower and heavier than the static fetch; only used
//! when the browser fallback capability is enabled.

use std::time::Duration;

use scraper::Html;
use thirtyfour::error::WebDriverError;
use thirtyfour::prelude::*;
use tokio::runtime::Runtime;
use tracing::{debug, warn};

use super::{ensure_scheme, visible_text, FetchError, FetchStrategy, FetchedPage};

/// Extra wall-clock wait after load so client-side rendering settles.
const RENDER_SETTLE: Duration = Duration::from_secs(2);

pub struct BrowserFetcher {
    webdriver_url: String,
    /// Private runtime so the rest of the pipeline stays synchronous.
    runtime: Runtime,
}

impl BrowserFetcher {
    pub fn new(webdriver_url: &str) -> anyhow::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .worker_threads(1)
            .build()?;
        Ok(BrowserFetcher {
            webdriver_url: webdriver_url.to_string(),
            runtime,
        })
    }

    async fn fetch_rendered(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let mut caps = DesiredCapabilities::chrome();
        caps.add_chrome_option(
            "args",
            vec![
                "--headless=new",
                "--no-sandbox",
                "--disable-dev-shm-usage",
                "--disable-gpu",
                "--window-size=1920,1080",
            ],
        )
        .map_err(|e| FetchError::Other(format!("chrome capabilities: {}", e)))?;

        let driver = WebDriver::new(&self.webdriver_url, caps)
            .await
            .map_err(|e| FetchError::Other(format!("webdriver connect: {}", e)))?;

        let result = async {
            driver
                .goto(url)
                .await
                .map_err(|e| classify_webdriver_error(&e))?;

            // Body present means the document loaded; the settle delay
            // gives client-side rendering time to finish.
            driver
                .query(By::Tag("body"))
                .first()
                .await
                .map_err(|e| classify_webdriver_error(&e))?;
            tokio::time::sleep(RENDER_SETTLE).await;

            let html = driver
                .source()
                .await
                .map_err(|e| classify_webdriver_error(&e))?;

            Ok::<String, FetchError>(html)
        }
        .await;

        // Close the session even when navigation failed.
        if let Err(e) = driver.quit().await {
            warn!("failed to quit browser session: {}", e);
        }

        let html = result?;
        let document = Html::parse_document(&html);
        let text = visible_text(&document);

        debug!(url, chars = text.len(), "browser fetch complete");

        Ok(FetchedPage {
            url: url.to_string(),
            html,
            visible_text: text,
            js_heavy: false,
        })
    }
}

impl FetchStrategy for BrowserFetcher {
    fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let url = ensure_scheme(url);
        self.runtime.block_on(self.fetch_rendered(&url))
    }

    fn name(&self) -> &'static str {
        "browser"
    }
}

fn classify_webdriver_error(err: &WebDriverError) -> FetchError {
    let text = err.to_string();
    let lowered = text.to_lowercase();
    if lowered.contains("timeout") || lowered.contains("timed out") {
        FetchError::Timeout
    } else if lowered.contains("connection") || lowered.contains("refused") {
        FetchError::ConnectionFailed
    } else {
        FetchError::Other(text)
    }
}
