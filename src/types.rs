//! Core record schema.
//!
//! "Unknown" is a type-level concept here: every schema field is either a
//! known value or the `Unknown` sentinel, never absent. The sentinel only
//! becomes the string "N/A" at the serialization boundary.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::fetch::FetchError;

/// A schema field: a concrete extracted/pre-loaded value, or unknown.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Field {
    Known(String),
    #[default]
    Unknown,
}

impl Field {
    pub fn known(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.trim().is_empty() {
            Field::Unknown
        } else {
            Field::Known(value)
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Field::Unknown)
    }

    pub fn is_known(&self) -> bool {
        !self.is_unknown()
    }

    pub fn as_str(&self) -> &str {
        match self {
            Field::Known(value) => value,
            Field::Unknown => "N/A",
        }
    }

    /// Take `other`'s value only if this field is still unknown.
    pub fn fill_from(&mut self, other: &Field) -> bool {
        if self.is_unknown() && other.is_known() {
            *self = other.clone();
            true
        } else {
            false
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Field {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Field {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw.trim().is_empty() || raw == "N/A" {
            Ok(Field::Unknown)
        } else {
            Ok(Field::Known(raw))
        }
    }
}

/// The email field carries one extra state beyond the usual sentinel: the
/// page exposed a contact form but no address. That is a weaker signal
/// than an address and must stay distinguishable (a form is not an
/// outreach target).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EmailField {
    Address(String),
    ContactChannelOnly,
    #[default]
    Unknown,
}

pub const CONTACT_CHANNEL_LABEL: &str = "Contact form available";

impl EmailField {
    pub fn is_unknown(&self) -> bool {
        matches!(self, EmailField::Unknown)
    }

    /// A real, sendable address (not a contact-form placeholder).
    pub fn address(&self) -> Option<&str> {
        match self {
            EmailField::Address(addr) => Some(addr),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            EmailField::Address(addr) => addr,
            EmailField::ContactChannelOnly => CONTACT_CHANNEL_LABEL,
            EmailField::Unknown => "N/A",
        }
    }
}

impl fmt::Display for EmailField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for EmailField {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EmailField {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw.trim().is_empty() || raw == "N/A" {
            Ok(EmailField::Unknown)
        } else if raw == CONTACT_CHANNEL_LABEL {
            Ok(EmailField::ContactChannelOnly)
        } else {
            Ok(EmailField::Address(raw))
        }
    }
}

/// Which reference dataset(s) a pre-loaded entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RefSource {
    /// Provincial association club directory (names, emails, types).
    Association,
    /// Municipal facility open data (court counts, membership status).
    City,
    /// Fields contributed by both datasets.
    Combined,
}

impl RefSource {
    pub fn combine(self, other: RefSource) -> RefSource {
        if self == other {
            self
        } else {
            RefSource::Combined
        }
    }
}

impl fmt::Display for RefSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RefSource::Association => "association",
            RefSource::City => "city",
            RefSource::Combined => "association+city",
        };
        f.write_str(label)
    }
}

/// Outcome classification for one processed club.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScrapeStatus {
    /// Fields extracted cleanly from the fetched page.
    Success,
    /// Fetch succeeded but the visible text was too thin to trust
    /// (JS-heavy page, no browser fallback ran).
    SuccessLimited,
    /// The browser fallback re-fetched the page and filled in fields the
    /// static pass missed.
    SuccessHybrid { preloaded: bool },
    /// Everything useful came from reference data; the page added nothing.
    PreLoaded(RefSource),
    /// Roster row had no website; only reference data was consulted.
    NoWebsite,
    Failed(FetchError),
}

impl fmt::Display for ScrapeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScrapeStatus::Success => write!(f, "Success"),
            ScrapeStatus::SuccessLimited => write!(f, "JS-heavy (limited data)"),
            ScrapeStatus::SuccessHybrid { preloaded: true } => {
                write!(f, "Success (Hybrid+Pre-loaded)")
            }
            ScrapeStatus::SuccessHybrid { preloaded: false } => write!(f, "Success (Hybrid)"),
            ScrapeStatus::PreLoaded(source) => write!(f, "Pre-loaded ({})", source),
            ScrapeStatus::NoWebsite => write!(f, "No website"),
            ScrapeStatus::Failed(reason) => write!(f, "Failed - {}", reason),
        }
    }
}

impl ScrapeStatus {
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            ScrapeStatus::Success
                | ScrapeStatus::SuccessHybrid { .. }
                | ScrapeStatus::PreLoaded(_)
        )
    }
}

/// One row of the output schema. Created per scrape, mutated field by
/// field during extraction, then persisted and never touched again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClubRecord {
    #[serde(rename = "Club Name")]
    pub name: String,
    #[serde(rename = "Website")]
    pub website: Field,
    #[serde(rename = "Location")]
    pub location: Field,
    #[serde(rename = "Email")]
    pub email: EmailField,
    #[serde(rename = "Club Type")]
    pub club_type: Field,
    #[serde(rename = "Membership Status")]
    pub membership_status: Field,
    #[serde(rename = "Waitlist Length")]
    pub waitlist_length: Field,
    #[serde(rename = "Number of Courts")]
    pub court_count: Field,
    #[serde(rename = "Court Surface")]
    pub court_surface: Field,
    #[serde(rename = "Operating Season")]
    pub operating_season: Field,
    #[serde(rename = "Scrape Status")]
    pub status: ScrapeStatus,
}

impl ClubRecord {
    pub fn new(name: &str, website: &str) -> Self {
        ClubRecord {
            name: name.to_string(),
            website: Field::known(website),
            location: Field::Unknown,
            email: EmailField::Unknown,
            club_type: Field::Unknown,
            membership_status: Field::Unknown,
            waitlist_length: Field::Unknown,
            court_count: Field::Unknown,
            court_surface: Field::Unknown,
            operating_season: Field::Unknown,
            status: ScrapeStatus::Success,
        }
    }

    /// How many of the seven countable informational fields hold data
    /// (operating season excluded: it rarely appears in markup and would
    /// skew the minimal-data retry trigger). The contact-form placeholder
    /// counts; the page did yield a signal.
    pub fn populated_data_fields(&self) -> usize {
        let mut count = 0;
        if self.location.is_known() {
            count += 1;
        }
        if !self.email.is_unknown() {
            count += 1;
        }
        for field in [
            &self.club_type,
            &self.membership_status,
            &self.waitlist_length,
            &self.court_count,
            &self.court_surface,
        ] {
            if field.is_known() {
                count += 1;
            }
        }
        count
    }

    /// Names of informational fields still missing, in schema order. The
    /// contact-form placeholder still counts as a missing address.
    pub fn missing_data_fields(&self) -> Vec<String> {
        let mut missing = Vec::new();
        if self.location.is_unknown() {
            missing.push("Location".to_string());
        }
        if self.email.address().is_none() {
            missing.push("Email".to_string());
        }
        let rest: [(&Field, &str); 6] = [
            (&self.club_type, "Club Type"),
            (&self.membership_status, "Membership Status"),
            (&self.waitlist_length, "Waitlist Length"),
            (&self.court_count, "Number of Courts"),
            (&self.court_surface, "Court Surface"),
            (&self.operating_season, "Operating Season"),
        ];
        for (field, label) in rest {
            if field.is_unknown() {
                missing.push(label.to_string());
            }
        }
        missing
    }
}

/// A partial club record contributed by reference datasets, plus the
/// source tag. Built once at startup, immutable afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceEntry {
    pub name: String,
    pub website: Field,
    pub email: Field,
    pub location: Field,
    pub club_type: Field,
    pub membership_status: Field,
    pub court_count: Field,
    pub source: RefSource,
}

impl ReferenceEntry {
    pub fn new(name: &str, source: RefSource) -> Self {
        ReferenceEntry {
            name: name.to_string(),
            website: Field::Unknown,
            email: Field::Unknown,
            location: Field::Unknown,
            club_type: Field::Unknown,
            membership_status: Field::Unknown,
            court_count: Field::Unknown,
            source,
        }
    }

    /// Fold another source's row into this entry: only fields still
    /// unknown here are taken, and the source tag widens to reflect the
    /// combination. A later source never blanks or replaces an earlier
    /// source's value.
    pub fn amend(&mut self, other: &ReferenceEntry) {
        self.website.fill_from(&other.website);
        self.email.fill_from(&other.email);
        self.location.fill_from(&other.location);
        self.club_type.fill_from(&other.club_type);
        self.membership_status.fill_from(&other.membership_status);
        self.court_count.fill_from(&other.court_count);
        self.source = self.source.combine(other.source);
    }

    /// True when the entry holds something beyond name/email, the bar a
    /// record must clear to count as genuinely pre-loaded.
    pub fn has_informational_fields(&self) -> bool {
        self.location.is_known()
            || self.club_type.is_known()
            || self.membership_status.is_known()
            || self.court_count.is_known()
    }
}

/// One roster row: a club to process.
#[derive(Debug, Clone)]
pub struct RosterEntry {
    pub name: String,
    pub website: String,
}
