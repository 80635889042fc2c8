//! Per-club orchestration.
//!
//! For one club: consult the reference book, fetch the page, run the
//! extractors for fields still missing, optionally re-fetch with the
//! browser strategy, and classify the outcome. Failures stay local to
//! the club; the worst result is a `Failed` status with whatever
//! reference data survived.

use tracing::{debug, info, warn};

use crate::extract;
use crate::fetch::{FetchStrategy, FetchedPage};
use crate::reference::ReferenceBook;
use crate::types::{ClubRecord, EmailField, Field, RefSource, ScrapeStatus};

/// Below this many populated informational fields a nominally-successful
/// static fetch is considered "minimal" and worth a browser retry.
const MIN_DATA_FIELDS: usize = 3;

pub struct ClubScraper {
    reference: ReferenceBook,
    static_fetcher: Box<dyn FetchStrategy>,
    /// Script-rendered fallback; present only when enabled.
    browser_fetcher: Option<Box<dyn FetchStrategy>>,
}

impl ClubScraper {
    pub fn new(
        reference: ReferenceBook,
        static_fetcher: Box<dyn FetchStrategy>,
        browser_fetcher: Option<Box<dyn FetchStrategy>>,
    ) -> Self {
        ClubScraper {
            reference,
            static_fetcher,
            browser_fetcher,
        }
    }

    pub fn reference(&self) -> &ReferenceBook {
        &self.reference
    }

    /// Process one roster row into a finished record.
    pub fn scrape_club(&self, name: &str, website: &str) -> ClubRecord {
        let mut record = ClubRecord::new(name, website);

        // Seed from reference data first; these values outrank anything
        // the page says.
        let preload = self.reference.lookup(name, website).cloned();
        let preloaded_informational = match &preload {
            Some(entry) => {
                seed_from_reference(&mut record, entry);
                entry.has_informational_fields()
            }
            None => false,
        };

        // Rows without a website never trigger a fetch; whatever the
        // reference book contributed is all we will ever have for them.
        if website.trim().is_empty() {
            record.website = Field::Unknown;
            record.status = ScrapeStatus::NoWebsite;
            return record;
        }

        let page = match self.static_fetcher.fetch(website) {
            Ok(page) => page,
            Err(reason) => {
                // Preload survives a failed fetch.
                warn!(club = name, %reason, "fetch failed");
                record.status = ScrapeStatus::Failed(reason);
                return record;
            }
        };

        let newly_extracted = extract::fill_missing(&mut record, &page);
        debug!(
            club = name,
            newly_extracted,
            js_heavy = page.js_heavy,
            "static extraction pass done"
        );

        let clean_preload = newly_extracted == 0 && preloaded_informational;
        let hybrid_page = if self.should_retry_with_browser(&record, &page, clean_preload) {
            self.browser_refetch(name, website)
        } else {
            None
        };

        let mut hybrid = false;
        if let Some(rendered) = hybrid_page {
            let added = extract::fill_missing(&mut record, &rendered);
            info!(club = name, added, "browser pass merged");
            hybrid = true;
        }

        record.status = if hybrid {
            ScrapeStatus::SuccessHybrid {
                preloaded: preloaded_informational,
            }
        } else if clean_preload {
            // Safe unwrap-free: clean_preload implies a preload entry.
            let source = preload.map(|e| e.source).unwrap_or(RefSource::Combined);
            ScrapeStatus::PreLoaded(source)
        } else if page.js_heavy {
            ScrapeStatus::SuccessLimited
        } else {
            ScrapeStatus::Success
        };

        record
    }

    /// Upgrade decision: retry with the browser when the static fetch
    /// flagged the page as JS-heavy, or when it nominally succeeded but
    /// left the record nearly empty (and the record isn't a clean
    /// pre-load, where thin extraction is expected).
    fn should_retry_with_browser(
        &self,
        record: &ClubRecord,
        page: &FetchedPage,
        clean_preload: bool,
    ) -> bool {
        if self.browser_fetcher.is_none() {
            return false;
        }
        if page.js_heavy {
            return true;
        }
        record.populated_data_fields() < MIN_DATA_FIELDS && !clean_preload
    }

    fn browser_refetch(&self, name: &str, website: &str) -> Option<FetchedPage> {
        let fetcher = self.browser_fetcher.as_ref()?;
        info!(club = name, "retrying with {} fetch", fetcher.name());
        match fetcher.fetch(website) {
            Ok(page) => Some(page),
            Err(reason) => {
                // The static result stands; the upgrade was best-effort.
                warn!(club = name, %reason, "browser fetch failed");
                None
            }
        }
    }
}

/// Copy every non-sentinel reference field into the fresh record.
fn seed_from_reference(record: &mut ClubRecord, entry: &crate::types::ReferenceEntry) {
    if let Field::Known(addr) = &entry.email {
        record.email = EmailField::Address(addr.clone());
    }
    record.website.fill_from(&entry.website);
    record.location.fill_from(&entry.location);
    record.club_type.fill_from(&entry.club_type);
    record.membership_status.fill_from(&entry.membership_status);
    record.court_count.fill_from(&entry.court_count);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::FetchError;
    use crate::types::ReferenceEntry;

    /// Scripted fetch strategy: returns canned pages or errors in order.
    pub struct StubFetcher {
        responses: std::sync::Mutex<Vec<Result<FetchedPage, FetchError>>>,
    }

    impl StubFetcher {
        pub fn new(responses: Vec<Result<FetchedPage, FetchError>>) -> Self {
            StubFetcher {
                responses: std::sync::Mutex::new(responses),
            }
        }
    }

    impl FetchStrategy for StubFetcher {
        fn fetch(&self, _url: &str) -> Result<FetchedPage, FetchError> {
            let mut responses = self.responses.lock().unwrap();
            if responses.is_empty() {
                Err(FetchError::Other("stub exhausted".to_string()))
            } else {
                responses.remove(0)
            }
        }

        fn name(&self) -> &'static str {
            "stub"
        }
    }

    pub fn text_page(text: &str, js_heavy: bool) -> FetchedPage {
        FetchedPage {
            url: "https://club.example.ca".to_string(),
            html: format!("<html><body><p>{}</p></body></html>", text),
            visible_text: text.to_string(),
            js_heavy,
        }
    }

    fn reference_with_email() -> ReferenceBook {
        let mut book = ReferenceBook::default();
        let mut entry = ReferenceEntry::new("River Club", crate::types::RefSource::Association);
        entry.email = Field::known("a@x.com");
        entry.location = Field::known("Toronto");
        book.insert(entry);
        book
    }

    #[test]
    fn preload_outranks_scraped_email() {
        let page = text_page(
            "Contact us at different@club.ca. Toronto's friendliest private club with 6 courts.",
            false,
        );
        let scraper = ClubScraper::new(
            reference_with_email(),
            Box::new(StubFetcher::new(vec![Ok(page)])),
            None,
        );
        let record = scraper.scrape_club("River Club", "riverclub.ca");
        assert_eq!(record.email.address(), Some("a@x.com"));
        assert_eq!(record.location.as_str(), "Toronto");
    }

    #[test]
    fn fetch_failure_keeps_preload_and_reports_reason() {
        let scraper = ClubScraper::new(
            reference_with_email(),
            Box::new(StubFetcher::new(vec![Err(FetchError::HttpError(404))])),
            None,
        );
        let record = scraper.scrape_club("River Club", "riverclub.ca");
        assert_eq!(record.status, ScrapeStatus::Failed(FetchError::HttpError(404)));
        assert_eq!(record.email.address(), Some("a@x.com"));
        assert_eq!(record.location.as_str(), "Toronto");
        assert!(record.court_count.is_unknown());
    }

    #[test]
    fn no_website_short_circuits_without_fetch() {
        // Stub would panic the count if called: give it nothing.
        let scraper = ClubScraper::new(
            ReferenceBook::default(),
            Box::new(StubFetcher::new(vec![])),
            None,
        );
        let record = scraper.scrape_club("River Club", "");
        assert_eq!(record.status, ScrapeStatus::NoWebsite);
        assert!(record.website.is_unknown());
        assert!(record.location.is_unknown());
        assert!(record.email.is_unknown());
    }

    #[test]
    fn no_website_still_consults_reference() {
        let scraper = ClubScraper::new(
            reference_with_email(),
            Box::new(StubFetcher::new(vec![])),
            None,
        );
        let record = scraper.scrape_club("River Club", "   ");
        assert_eq!(record.status, ScrapeStatus::NoWebsite);
        assert_eq!(record.email.address(), Some("a@x.com"));
        assert_eq!(record.location.as_str(), "Toronto");
    }

    #[test]
    fn js_heavy_without_browser_is_limited() {
        let page = text_page("short", true);
        let scraper = ClubScraper::new(
            ReferenceBook::default(),
            Box::new(StubFetcher::new(vec![Ok(page)])),
            None,
        );
        let record = scraper.scrape_club("Shell Club", "shell.ca");
        assert_eq!(record.status, ScrapeStatus::SuccessLimited);
    }

    #[test]
    fn js_heavy_with_browser_becomes_hybrid() {
        let thin = text_page("loading", true);
        let rendered = text_page(
            "Welcome to our Toronto private club. 8 hard courts, open year-round. info@shell.ca",
            false,
        );
        let scraper = ClubScraper::new(
            ReferenceBook::default(),
            Box::new(StubFetcher::new(vec![Ok(thin)])),
            Some(Box::new(StubFetcher::new(vec![Ok(rendered)]))),
        );
        let record = scraper.scrape_club("Shell Club", "shell.ca");
        assert_eq!(record.status, ScrapeStatus::SuccessHybrid { preloaded: false });
        assert_eq!(record.location.as_str(), "Toronto");
        assert_eq!(record.court_count.as_str(), "8");
    }

    #[test]
    fn minimal_data_triggers_browser_retry() {
        // Static fetch succeeds but extracts almost nothing.
        let sparse = text_page("Welcome! Renovations underway, check back soon and often.", false);
        let rendered = text_page(
            "Mississauga community courts: 4 clay courts, accepting members.",
            false,
        );
        let scraper = ClubScraper::new(
            ReferenceBook::default(),
            Box::new(StubFetcher::new(vec![Ok(sparse)])),
            Some(Box::new(StubFetcher::new(vec![Ok(rendered)]))),
        );
        let record = scraper.scrape_club("Quiet Club", "quiet.ca");
        assert_eq!(record.status, ScrapeStatus::SuccessHybrid { preloaded: false });
        assert_eq!(record.location.as_str(), "Mississauga");
    }

    #[test]
    fn browser_failure_falls_back_to_static_classification() {
        let thin = text_page("loading", true);
        let scraper = ClubScraper::new(
            ReferenceBook::default(),
            Box::new(StubFetcher::new(vec![Ok(thin)])),
            Some(Box::new(StubFetcher::new(vec![Err(FetchError::Timeout)]))),
        );
        let record = scraper.scrape_club("Shell Club", "shell.ca");
        assert_eq!(record.status, ScrapeStatus::SuccessLimited);
    }

    #[test]
    fn pure_preload_is_classified_preloaded() {
        // Page adds nothing; everything useful was pre-loaded.
        let mut book = ReferenceBook::default();
        let mut entry = ReferenceEntry::new("Banbury Tennis Club", crate::types::RefSource::City);
        entry.court_count = Field::known("4");
        entry.membership_status = Field::known("Open");
        entry.location = Field::known("Toronto");
        entry.club_type = Field::known("Public");
        book.insert(entry);

        let empty_page = text_page(
            "This worthwhile page has plenty of words but none of them describe anything useful \
             about facilities or how to reach anyone at all.",
            false,
        );
        let scraper = ClubScraper::new(
            book,
            Box::new(StubFetcher::new(vec![Ok(empty_page)])),
            None,
        );
        let record = scraper.scrape_club("Banbury Tennis Club", "banbury.ca");
        assert_eq!(
            record.status,
            ScrapeStatus::PreLoaded(crate::types::RefSource::City)
        );
        assert_eq!(record.court_count.as_str(), "4");
    }

    #[test]
    fn idempotent_on_fetch_failure() {
        let make = || {
            ClubScraper::new(
                reference_with_email(),
                Box::new(StubFetcher::new(vec![Err(FetchError::Timeout)])),
                None,
            )
        };
        let a = make().scrape_club("River Club", "riverclub.ca");
        let b = make().scrape_club("River Club", "riverclub.ca");
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }
}
