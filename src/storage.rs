//! Result persistence: JSON store, roster loading, CSV export.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::types::{ClubRecord, RosterEntry};

/// Column order for the delimited export; one column per schema field.
pub const EXPORT_COLUMNS: [&str; 11] = [
    "Club Name",
    "Website",
    "Location",
    "Email",
    "Club Type",
    "Membership Status",
    "Waitlist Length",
    "Number of Courts",
    "Court Surface",
    "Operating Season",
    "Scrape Status",
];

/// Load the input roster. Accepts `Website URL` or `Website` for the URL
/// column; a missing club name is a hard error (the name is the record's
/// identity anchor), a missing URL is just an empty string.
pub fn load_roster(path: &Path) -> Result<Vec<RosterEntry>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open roster {}", path.display()))?;
    let headers = reader.headers()?.clone();

    let name_idx = headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case("Club Name"))
        .context("roster is missing a 'Club Name' column")?;
    let url_idx = headers.iter().position(|h| {
        h.eq_ignore_ascii_case("Website URL") || h.eq_ignore_ascii_case("Website")
    });

    let mut roster = Vec::new();
    for record in reader.records() {
        let record = record?;
        let name = record.get(name_idx).unwrap_or("").trim();
        if name.is_empty() {
            continue;
        }
        let website = url_idx
            .and_then(|i| record.get(i))
            .unwrap_or("")
            .trim()
            .to_string();
        roster.push(RosterEntry {
            name: name.to_string(),
            website,
        });
    }

    info!(clubs = roster.len(), path = %path.display(), "loaded roster");
    Ok(roster)
}

/// Persist the full result list. Called after every club so a crash
/// mid-run loses at most one club's work.
pub fn save_results(path: &Path, records: &[ClubRecord]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(records)?;
    fs::write(path, json).with_context(|| format!("failed to write results to {}", path.display()))
}

pub fn load_results(path: &Path) -> Result<Vec<ClubRecord>> {
    if !path.exists() {
        return Ok(vec![]);
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read results from {}", path.display()))?;
    let records: Vec<ClubRecord> =
        serde_json::from_str(&content).context("failed to parse results JSON")?;
    Ok(records)
}

/// Export records as CSV with the fixed column order.
pub fn export_csv(path: &Path, records: &[ClubRecord]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    write_csv(&mut writer, records)?;
    writer.flush()?;
    info!(rows = records.len(), path = %path.display(), "exported CSV");
    Ok(())
}

fn write_csv<W: std::io::Write>(writer: &mut csv::Writer<W>, records: &[ClubRecord]) -> Result<()> {
    writer.write_record(EXPORT_COLUMNS)?;
    for record in records {
        writer.write_record([
            record.name.as_str(),
            record.website.as_str(),
            record.location.as_str(),
            record.email.as_str(),
            record.club_type.as_str(),
            record.membership_status.as_str(),
            record.waitlist_length.as_str(),
            record.court_count.as_str(),
            record.court_surface.as_str(),
            record.operating_season.as_str(),
            &record.status.to_string(),
        ])?;
    }
    Ok(())
}
