//! Batch runner: sequential iteration over the roster.
//!
//! One in-flight fetch at a time, a politeness delay between clubs,
//! incremental persistence after every club, and a cooperative stop
//! check at each club boundary. A failure never aborts the batch; it
//! becomes that club's status.

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use tracing::info;

use crate::pipeline::ClubScraper;
use crate::progress::StatusBoard;
use crate::storage;
use crate::types::{ClubRecord, RosterEntry};

pub struct BatchOptions {
    /// Blocking sleep between clubs on the worker's own path.
    pub delay: Duration,
    /// Process only the first N roster rows (testing aid).
    pub limit: Option<usize>,
}

impl Default for BatchOptions {
    fn default() -> Self {
        BatchOptions {
            delay: Duration::from_millis(500),
            limit: None,
        }
    }
}

/// Run the whole roster through the scraper. Returns every record
/// produced, including those already persisted incrementally.
pub fn run_batch(
    scraper: &ClubScraper,
    roster: &[RosterEntry],
    status: &StatusBoard,
    options: &BatchOptions,
    results_path: &Path,
) -> Result<Vec<ClubRecord>> {
    let roster = match options.limit {
        Some(limit) => &roster[..roster.len().min(limit)],
        None => roster,
    };

    status.begin(roster.len());
    let mut results = Vec::with_capacity(roster.len());

    for (index, entry) in roster.iter().enumerate() {
        if status.stop_requested() {
            info!(processed = results.len(), "stop requested, ending batch");
            break;
        }

        status.advance(index + 1, &entry.name);
        info!(
            club = %entry.name,
            url = %entry.website,
            "processing {}/{}",
            index + 1,
            roster.len()
        );

        let record = scraper.scrape_club(&entry.name, &entry.website);
        status.record_outcome(record.status.is_success());
        results.push(record);

        // Persist after every club; a crash loses at most one.
        storage::save_results(results_path, &results)?;

        if index + 1 < roster.len() && !status.stop_requested() {
            std::thread::sleep(options.delay);
        }
    }

    status.finish();
    info!(
        total = results.len(),
        successful = status.snapshot().successful,
        failed = status.snapshot().failed,
        "batch complete"
    );
    Ok(results)
}
