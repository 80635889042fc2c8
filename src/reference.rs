//! Reference data merger.
//!
//! Loads the configured reference datasets, builds a lookup table keyed
//! by normalized club name AND normalized website URL, and answers "what
//! do we already know about this club". Built once at startup, read-only
//! afterwards. A dataset that cannot be read is skipped with a warning;
//! it simply contributes nothing.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use csv::StringRecord;
use tracing::{info, warn};

use crate::config::{ReferenceKind, ReferenceSourceConfig};
use crate::normalize::{normalize_name, normalize_url};
use crate::types::{Field, RefSource, ReferenceEntry};

#[derive(Debug, Default)]
pub struct ReferenceBook {
    entries: HashMap<String, ReferenceEntry>,
}

impl ReferenceBook {
    /// Load every configured dataset. Missing or unreadable sources are
    /// logged and skipped, never fatal.
    pub fn load(sources: &[ReferenceSourceConfig]) -> Self {
        let mut book = ReferenceBook::default();

        for source in sources {
            match book.load_source(source) {
                Ok(rows) => info!(
                    source = %source.name,
                    rows,
                    "loaded reference dataset"
                ),
                Err(e) => warn!(
                    source = %source.name,
                    "could not load reference dataset: {:#}",
                    e
                ),
            }
        }

        book
    }

    fn load_source(&mut self, source: &ReferenceSourceConfig) -> Result<usize> {
        let rows = read_rows(&source.path, source.kind)
            .with_context(|| format!("reading {}", source.path.display()))?;
        let count = rows.len();
        for entry in rows {
            self.insert(entry);
        }
        Ok(count)
    }

    /// Insert one raw-row entry under both of its keys. On collision the
    /// existing entry is amended: only its unknown fields are filled, and
    /// the source tag widens. Existing values are never overwritten.
    pub fn insert(&mut self, entry: ReferenceEntry) {
        let name_key = normalize_name(&entry.name);
        let url_key = match &entry.website {
            Field::Known(url) => normalize_url(url),
            Field::Unknown => String::new(),
        };

        for key in [name_key, url_key] {
            if key.is_empty() {
                continue;
            }
            match self.entries.get_mut(&key) {
                Some(existing) => existing.amend(&entry),
                None => {
                    self.entries.insert(key, entry.clone());
                }
            }
        }
    }

    /// Name-key match first, URL-key fallback. Deterministic and
    /// side-effect-free.
    pub fn lookup(&self, name: &str, url: &str) -> Option<&ReferenceEntry> {
        let name_key = normalize_name(name);
        if !name_key.is_empty() {
            if let Some(entry) = self.entries.get(&name_key) {
                return Some(entry);
            }
        }
        let url_key = normalize_url(url);
        if !url_key.is_empty() {
            return self.entries.get(&url_key);
        }
        None
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Operator-facing load summary.
    pub fn summary(&self) -> String {
        let with_email = self.entries.values().filter(|e| e.email.is_known()).count();
        let with_courts = self
            .entries
            .values()
            .filter(|e| e.court_count.is_known())
            .count();
        let with_membership = self
            .entries
            .values()
            .filter(|e| e.membership_status.is_known())
            .count();
        format!(
            "{} lookup entries ({} with email, {} with court counts, {} with membership status)",
            self.entries.len(),
            with_email,
            with_courts,
            with_membership
        )
    }
}

fn read_rows(path: &Path, kind: ReferenceKind) -> Result<Vec<ReferenceEntry>> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();
    let mut rows = Vec::new();

    for record in reader.records() {
        let record = record?;
        if let Some(entry) = entry_from_row(&headers, &record, kind) {
            rows.push(entry);
        }
    }

    Ok(rows)
}

/// Value of a named column in a row, empty when the column is absent.
fn column<'a>(headers: &StringRecord, record: &'a StringRecord, name: &str) -> &'a str {
    headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case(name))
        .and_then(|i| record.get(i))
        .map(str::trim)
        .unwrap_or("")
}

/// Map one CSV row to a reference entry. The two dataset kinds carry
/// different columns; rows without a club name are dropped.
fn entry_from_row(
    headers: &StringRecord,
    record: &StringRecord,
    kind: ReferenceKind,
) -> Option<ReferenceEntry> {
    let col = |name: &str| column(headers, record, name);

    let name = col("name");
    if name.is_empty() {
        return None;
    }

    let mut entry = match kind {
        ReferenceKind::Association => {
            let mut e = ReferenceEntry::new(name, RefSource::Association);
            e.email = Field::known(col("email"));
            e.location = Field::known(col("location"));
            e
        }
        ReferenceKind::City => {
            let mut e = ReferenceEntry::new(name, RefSource::City);
            e.court_count = parse_court_count(col("courts"));
            e.membership_status = map_membership_status(col("membership_status"));
            e
        }
    };

    entry.website = Field::known(col("website_url"));
    entry.club_type = map_club_type(col("type"));
    Some(entry)
}

/// Court counts arrive as "12", "12.0", or junk; keep only clean integers.
fn parse_court_count(raw: &str) -> Field {
    let raw = raw.trim().trim_end_matches(".0");
    match raw.parse::<u32>() {
        Ok(n) if n > 0 => Field::known(n.to_string()),
        _ => Field::Unknown,
    }
}

/// Reference datasets use their own type vocabulary; fold it into the
/// standard labels by substring.
pub fn map_club_type(raw: &str) -> Field {
    let lowered = raw.to_lowercase();
    if lowered.contains("private") {
        Field::known("Private")
    } else if lowered.contains("public") || lowered.contains("community") {
        Field::known("Public")
    } else if lowered.contains("commercial") || lowered.contains("associate") {
        Field::known("Commercial")
    } else {
        Field::Unknown
    }
}

pub fn map_membership_status(raw: &str) -> Field {
    let lowered = raw.to_lowercase();
    if lowered.contains("open") {
        Field::known("Open")
    } else if lowered.contains("wait") {
        Field::known("Waitlist")
    } else if lowered.contains("closed") || lowered.contains("full") {
        Field::known("Closed")
    } else {
        Field::Unknown
    }
}
