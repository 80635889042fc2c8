//! Page fetching strategies.
//!
//! Two interchangeable implementations sit behind one trait: a fast
//! static HTTP fetch, and a headless-browser fetch for pages that render
//! their content client-side. The orchestrator depends only on the trait
//! and selects the browser path by capability flag.

mod browser;
mod static_http;

pub use browser::BrowserFetcher;
pub use static_http::StaticFetcher;

use scraper::Html;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a fetch failed. Failures are terminal for the club in this run:
/// no partial extraction is attempted and nothing is retried.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum FetchError {
    #[error("Timeout")]
    Timeout,
    #[error("Connection failed")]
    ConnectionFailed,
    #[error("HTTP {0}")]
    HttpError(u16),
    #[error("Too many redirects")]
    TooManyRedirects,
    #[error("{0}")]
    Other(String),
}

/// A fetched page, ready for extraction.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// URL actually fetched (scheme added, redirects followed).
    pub url: String,
    pub html: String,
    /// Page text with script/style/head content stripped.
    pub visible_text: String,
    /// Heuristic: the static fetch believes the real content is rendered
    /// client-side and a browser pass would see more.
    pub js_heavy: bool,
}

impl FetchedPage {
    pub fn dom(&self) -> Html {
        Html::parse_document(&self.html)
    }
}

pub trait FetchStrategy: Send {
    fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError>;

    /// Short label for logging.
    fn name(&self) -> &'static str;
}

/// Prefix bare host names so reqwest/webdriver accept them.
pub fn ensure_scheme(url: &str) -> String {
    let trimmed = url.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    }
}

/// Text a visitor would actually see: every text node outside
/// script/style/noscript/head, whitespace-joined.
pub fn visible_text(document: &Html) -> String {
    let mut out = String::new();
    for node in document.tree.nodes() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .map(|el| matches!(el.name(), "script" | "style" | "noscript" | "head"))
                .unwrap_or(false)
        });
        if hidden {
            continue;
        }
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(trimmed);
        }
    }
    out
}
