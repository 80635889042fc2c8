//! End-to-end pipeline tests using a scripted fetch strategy in place of
//! the network.

use std::sync::Mutex;
use std::time::Duration;

use clubscout::fetch::{FetchError, FetchStrategy, FetchedPage};
use clubscout::pipeline::ClubScraper;
use clubscout::progress::StatusBoard;
use clubscout::reference::ReferenceBook;
use clubscout::runner::{run_batch, BatchOptions};
use clubscout::storage;
use clubscout::types::{
    ClubRecord, EmailField, Field, RefSource, ReferenceEntry, RosterEntry, ScrapeStatus,
};

/// Returns canned responses in order; errors once exhausted.
struct ScriptedFetcher {
    responses: Mutex<Vec<Result<FetchedPage, FetchError>>>,
}

impl ScriptedFetcher {
    fn new(responses: Vec<Result<FetchedPage, FetchError>>) -> Self {
        ScriptedFetcher {
            responses: Mutex::new(responses),
        }
    }
}

impl FetchStrategy for ScriptedFetcher {
    fn fetch(&self, _url: &str) -> Result<FetchedPage, FetchError> {
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Err(FetchError::Other("script exhausted".to_string()))
        } else {
            responses.remove(0)
        }
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

fn page_with_text(text: &str, js_heavy: bool) -> FetchedPage {
    FetchedPage {
        url: "https://club.example.ca".to_string(),
        html: format!("<html><body><p>{}</p></body></html>", text),
        visible_text: text.to_string(),
        js_heavy,
    }
}

fn reference_for(name: &str, email: &str, courts: &str) -> ReferenceBook {
    let mut book = ReferenceBook::default();
    let mut entry = ReferenceEntry::new(name, RefSource::Association);
    entry.email = Field::known(email);
    entry.court_count = Field::known(courts);
    book.insert(entry);
    book
}

#[test]
fn scenario_a_no_website_row_short_circuits() {
    let scraper = ClubScraper::new(
        ReferenceBook::default(),
        Box::new(ScriptedFetcher::new(vec![])),
        None,
    );

    let record = scraper.scrape_club("River Club", "");

    assert_eq!(record.status, ScrapeStatus::NoWebsite);
    assert!(record.website.is_unknown());
    assert!(record.location.is_unknown());
    assert!(record.email.is_unknown());
    assert!(record.club_type.is_unknown());
    assert!(record.court_count.is_unknown());
    assert!(record.operating_season.is_unknown());
}

#[test]
fn scenario_b_http_error_keeps_preload() {
    let scraper = ClubScraper::new(
        reference_for("River Club", "a@x.com", "4"),
        Box::new(ScriptedFetcher::new(vec![Err(FetchError::HttpError(404))])),
        None,
    );

    let record = scraper.scrape_club("River Club", "riverclub.ca");

    assert_eq!(record.status, ScrapeStatus::Failed(FetchError::HttpError(404)));
    assert_eq!(record.email.address(), Some("a@x.com"));
    assert_eq!(record.court_count.as_str(), "4");
    assert!(record.location.is_unknown());
}

#[test]
fn scenario_c_js_limited_page_upgrades_through_browser() {
    // 50 characters of shell content, flagged JS-heavy by the static pass.
    let shell = page_with_text("Loading... please wait while the app starts up", true);
    let rendered = page_with_text(
        "Riverdale is a private club in Toronto with 6 clay courts, open year-round. \
         Reach us at info@riverdale.ca",
        false,
    );

    let scraper = ClubScraper::new(
        ReferenceBook::default(),
        Box::new(ScriptedFetcher::new(vec![Ok(shell)])),
        Some(Box::new(ScriptedFetcher::new(vec![Ok(rendered)]))),
    );

    let record = scraper.scrape_club("Riverdale Club", "riverdale.ca");

    assert_eq!(record.status, ScrapeStatus::SuccessHybrid { preloaded: false });
    assert_eq!(record.location.as_str(), "Toronto");
    assert_eq!(record.club_type.as_str(), "Private");
    assert_eq!(record.court_count.as_str(), "6");
    assert_eq!(record.email.address(), Some("info@riverdale.ca"));
    assert_eq!(record.operating_season.as_str(), "Year-round");
}

#[test]
fn preload_precedence_survives_full_run() {
    let page = page_with_text(
        "Contact scraped@club.ca. A community facility in Markham with 12 hard courts.",
        false,
    );
    let scraper = ClubScraper::new(
        reference_for("River Club", "a@x.com", "4"),
        Box::new(ScriptedFetcher::new(vec![Ok(page)])),
        None,
    );

    let record = scraper.scrape_club("River Club", "riverclub.ca");

    // Pre-loaded values outrank anything the page said.
    assert_eq!(record.email.address(), Some("a@x.com"));
    assert_eq!(record.court_count.as_str(), "4");
    // Still-missing fields were filled from the page.
    assert_eq!(record.location.as_str(), "Markham");
    assert_eq!(record.club_type.as_str(), "Community");
}

#[test]
fn idempotent_fetch_failure_output() {
    let run = || {
        let scraper = ClubScraper::new(
            reference_for("River Club", "a@x.com", "4"),
            Box::new(ScriptedFetcher::new(vec![Err(FetchError::Timeout)])),
            None,
        );
        scraper.scrape_club("River Club", "riverclub.ca")
    };

    let first = run();
    let second = run();
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_vec(&first).unwrap(),
        serde_json::to_vec(&second).unwrap()
    );
}

#[test]
fn batch_persists_incrementally_and_round_trips() {
    let roster = vec![
        RosterEntry {
            name: "Good Club".to_string(),
            website: "good.ca".to_string(),
        },
        RosterEntry {
            name: "Bad Club".to_string(),
            website: "bad.ca".to_string(),
        },
        RosterEntry {
            name: "Offline Club".to_string(),
            website: "".to_string(),
        },
    ];

    let good_page = page_with_text(
        "Accepting new members! 8 outdoor courts in Oakville. Email club@good.ca",
        false,
    );
    let scraper = ClubScraper::new(
        ReferenceBook::default(),
        Box::new(ScriptedFetcher::new(vec![
            Ok(good_page),
            Err(FetchError::ConnectionFailed),
        ])),
        None,
    );

    let status = StatusBoard::new();
    let results_path = std::env::temp_dir().join(format!(
        "clubscout_pipeline_test_{}.json",
        std::process::id()
    ));
    let options = BatchOptions {
        delay: Duration::from_millis(0),
        limit: None,
    };

    let results = run_batch(&scraper, &roster, &status, &options, &results_path).unwrap();
    assert_eq!(results.len(), 3);

    assert_eq!(results[0].status, ScrapeStatus::Success);
    assert_eq!(results[0].location.as_str(), "Oakville");
    assert_eq!(results[0].membership_status.as_str(), "Open");
    assert_eq!(results[0].email.address(), Some("club@good.ca"));

    assert_eq!(
        results[1].status,
        ScrapeStatus::Failed(FetchError::ConnectionFailed)
    );
    assert_eq!(results[2].status, ScrapeStatus::NoWebsite);

    let snap = status.snapshot();
    assert!(!snap.running);
    assert_eq!(snap.total, 3);
    assert_eq!(snap.successful, 1);
    assert_eq!(snap.failed, 2);

    // The persisted store matches what the runner returned.
    let persisted: Vec<ClubRecord> = storage::load_results(&results_path).unwrap();
    assert_eq!(persisted, results);
    let _ = std::fs::remove_file(&results_path);
}

#[test]
fn contact_form_page_yields_channel_only_not_address() {
    let html = r#"<html><body>
        <nav><a href="/contact">Contact</a></nav>
        <p>Founded in 1975, our club welcomes players of every level in Ajax.</p>
    </body></html>"#;
    let page = FetchedPage {
        url: "https://formclub.ca".to_string(),
        html: html.to_string(),
        visible_text: "Founded in 1975, our club welcomes players of every level in Ajax."
            .to_string(),
        js_heavy: false,
    };

    let scraper = ClubScraper::new(
        ReferenceBook::default(),
        Box::new(ScriptedFetcher::new(vec![Ok(page)])),
        None,
    );
    let record = scraper.scrape_club("Form Club", "formclub.ca");

    assert_eq!(record.email, EmailField::ContactChannelOnly);
    assert_eq!(record.email.address(), None);
    assert_eq!(record.location.as_str(), "Ajax");
}
