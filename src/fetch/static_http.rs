//! Static HTTP fetch: one GET with a browser-like user agent.
//!
//! Certificate verification is disabled on purpose: small club sites
//! routinely serve broken TLS chains and the data is public anyway.

use std::time::Duration;

use scraper::{Html, Selector};
use tracing::debug;

use super::{ensure_scheme, visible_text, FetchError, FetchStrategy, FetchedPage};

const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const MAX_REDIRECTS: usize = 5;

/// Script `src` markers that point at a client-side rendering framework.
const FRAMEWORK_MARKERS: [&str; 6] = ["react", "vue", "angular", "next", "nuxt", "ember"];
/// This many framework script tags and the markup is almost certainly a
/// shell waiting for hydration.
const FRAMEWORK_SCRIPT_THRESHOLD: usize = 3;

pub struct StaticFetcher {
    client: reqwest::blocking::Client,
    /// Pages with less visible text than this are flagged JS-heavy.
    min_visible_text: usize,
}

impl StaticFetcher {
    pub fn new(timeout: Duration, min_visible_text: usize) -> anyhow::Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .danger_accept_invalid_certs(true)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()?;
        Ok(StaticFetcher {
            client,
            min_visible_text,
        })
    }

    fn classify_error(err: &reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout
        } else if err.is_redirect() {
            FetchError::TooManyRedirects
        } else if err.is_connect() {
            FetchError::ConnectionFailed
        } else {
            FetchError::Other(err.to_string())
        }
    }
}

impl FetchStrategy for StaticFetcher {
    fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let url = ensure_scheme(url);

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| Self::classify_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpError(status.as_u16()));
        }

        let final_url = response.url().to_string();
        let html = response.text().map_err(|e| Self::classify_error(&e))?;

        let document = Html::parse_document(&html);
        let text = visible_text(&document);
        let js_heavy = looks_js_heavy(&document, &text, self.min_visible_text);

        debug!(
            url = %final_url,
            chars = text.len(),
            js_heavy,
            "static fetch complete"
        );

        Ok(FetchedPage {
            url: final_url,
            html,
            visible_text: text,
            js_heavy,
        })
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

/// Heuristic trigger for the browser fallback, not a guarantee: either
/// the page has implausibly little visible text, or its markup is mostly
/// framework bootstrap scripts.
fn looks_js_heavy(document: &Html, text: &str, min_visible_text: usize) -> bool {
    if text.len() < min_visible_text {
        return true;
    }
    framework_script_count(document) >= FRAMEWORK_SCRIPT_THRESHOLD
}

fn framework_script_count(document: &Html) -> usize {
    let Ok(selector) = Selector::parse("script[src]") else {
        return 0;
    };
    document
        .select(&selector)
        .filter(|el| {
            el.value()
                .attr("src")
                .map(|src| {
                    let src = src.to_lowercase();
                    FRAMEWORK_MARKERS.iter().any(|m| src.contains(m))
                })
                .unwrap_or(false)
        })
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_pages_are_flagged_js_heavy() {
        let html = "<html><body><div id='root'></div></body></html>";
        let doc = Html::parse_document(html);
        let text = visible_text(&doc);
        assert!(looks_js_heavy(&doc, &text, 200));
    }

    #[test]
    fn framework_bundles_are_flagged_js_heavy() {
        let filler = "Plenty of readable words here. ".repeat(20);
        let html = format!(
            r#"<html><body><p>{}</p>
               <script src="/static/react-dom.min.js"></script>
               <script src="/static/react.min.js"></script>
               <script src="/chunks/next-runtime.js"></script>
               </body></html>"#,
            filler
        );
        let doc = Html::parse_document(&html);
        let text = visible_text(&doc);
        assert!(text.len() >= 200);
        assert!(looks_js_heavy(&doc, &text, 200));
    }

    #[test]
    fn ordinary_pages_are_not_flagged() {
        let filler = "Tennis all summer on our six hard courts. ".repeat(10);
        let html = format!(
            "<html><body><p>{}</p><script src='/js/jquery.js'></script></body></html>",
            filler
        );
        let doc = Html::parse_document(&html);
        let text = visible_text(&doc);
        assert!(!looks_js_heavy(&doc, &text, 200));
    }
}
