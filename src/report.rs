//! Data completeness reporting.

use std::fmt::Write as _;

use crate::types::ClubRecord;

pub struct FieldCoverage {
    pub field: &'static str,
    pub found: usize,
    pub missing: usize,
}

impl FieldCoverage {
    pub fn percentage(&self) -> f64 {
        let total = self.found + self.missing;
        if total == 0 {
            0.0
        } else {
            self.found as f64 / total as f64 * 100.0
        }
    }
}

/// Per-field found/missing counts across all records.
pub fn field_coverage(records: &[ClubRecord]) -> Vec<FieldCoverage> {
    fn count(records: &[ClubRecord], known: impl Fn(&ClubRecord) -> bool) -> usize {
        records.iter().filter(|r| known(r)).count()
    }

    let rows: [(&'static str, usize); 8] = [
        ("Location", count(records, |r| r.location.is_known())),
        ("Email", count(records, |r| r.email.address().is_some())),
        ("Club Type", count(records, |r| r.club_type.is_known())),
        (
            "Membership Status",
            count(records, |r| r.membership_status.is_known()),
        ),
        (
            "Waitlist Length",
            count(records, |r| r.waitlist_length.is_known()),
        ),
        (
            "Number of Courts",
            count(records, |r| r.court_count.is_known()),
        ),
        ("Court Surface", count(records, |r| r.court_surface.is_known())),
        (
            "Operating Season",
            count(records, |r| r.operating_season.is_known()),
        ),
    ];

    rows.into_iter()
        .map(|(field, found)| FieldCoverage {
            field,
            found,
            missing: records.len() - found,
        })
        .collect()
}

/// Operator-facing analysis report.
pub fn completeness_report(records: &[ClubRecord]) -> String {
    let mut report = String::new();
    let total = records.len();
    let successful = records.iter().filter(|r| r.status.is_success()).count();

    let _ = writeln!(report, "{}", "=".repeat(70));
    let _ = writeln!(report, "Data Analysis Report");
    let _ = writeln!(report, "{}", "=".repeat(70));
    let _ = writeln!(report, "Total clubs: {}", total);
    if total > 0 {
        let _ = writeln!(
            report,
            "Successfully scraped: {} ({:.1}%)",
            successful,
            successful as f64 / total as f64 * 100.0
        );
    }
    let _ = writeln!(report);
    let _ = writeln!(report, "{:<22} {:>8} {:>8} {:>9}", "Field", "Found", "Missing", "Coverage");
    let _ = writeln!(report, "{}", "-".repeat(70));

    for row in field_coverage(records) {
        let _ = writeln!(
            report,
            "{:<22} {:>8} {:>8} {:>8.1}%",
            row.field,
            row.found,
            row.missing,
            row.percentage()
        );
    }

    // Clubs that report a waitlist are the interesting outreach targets.
    let waitlisted: Vec<&ClubRecord> = records
        .iter()
        .filter(|r| r.membership_status.as_str().contains("Waitlist"))
        .collect();
    if !waitlisted.is_empty() {
        let _ = writeln!(report);
        let _ = writeln!(report, "Clubs with waitlists ({}):", waitlisted.len());
        for club in waitlisted.iter().take(10) {
            let _ = writeln!(report, "  - {}: {}", club.name, club.waitlist_length);
        }
        if waitlisted.len() > 10 {
            let _ = writeln!(report, "  ... and {} more", waitlisted.len() - 10);
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EmailField, Field, ScrapeStatus};

    fn record(name: &str, email: Option<&str>, waitlist: Option<&str>) -> ClubRecord {
        let mut r = ClubRecord::new(name, "x.ca");
        if let Some(addr) = email {
            r.email = EmailField::Address(addr.to_string());
        }
        if let Some(len) = waitlist {
            r.membership_status = Field::known("Waitlist");
            r.waitlist_length = Field::known(len);
        }
        r.status = ScrapeStatus::Success;
        r
    }

    #[test]
    fn coverage_counts_real_addresses_only() {
        let mut contact_only = record("A", None, None);
        contact_only.email = EmailField::ContactChannelOnly;
        let records = vec![contact_only, record("B", Some("b@x.ca"), None)];

        let coverage = field_coverage(&records);
        let email_row = coverage.iter().find(|c| c.field == "Email").unwrap();
        assert_eq!(email_row.found, 1);
        assert_eq!(email_row.missing, 1);
    }

    #[test]
    fn report_lists_waitlisted_clubs() {
        let records = vec![
            record("Quiet Club", None, None),
            record("Busy Club", Some("info@busy.ca"), Some("45")),
        ];
        let report = completeness_report(&records);
        assert!(report.contains("Total clubs: 2"));
        assert!(report.contains("Busy Club: 45"));
        assert!(!report.contains("Quiet Club: "));
    }
}
