//! Facility extraction: court count, court surface, waitlist length.

use regex::Regex;

use crate::types::Field;

/// Court counts outside this range are treated as noise ("500 courts" is
/// a typo or a marketing number, not a facility).
const COURT_RANGE: std::ops::RangeInclusive<u32> = 1..=50;

const COURT_COUNT_PATTERNS: [&str; 4] = [
    r"(\d+)\s+(?:(?:indoor|outdoor|hard|clay|grass|tennis)\s+)*courts?",
    r"courts?[:\s]+(\d+)",
    r"total\s+of\s+(\d+)\s+courts?",
    r"(\d+)[-\s]court\b",
];

const SPELLED_COUNTS: [(&str, u32); 10] = [
    ("one", 1),
    ("two", 2),
    ("three", 3),
    ("four", 4),
    ("five", 5),
    ("six", 6),
    ("seven", 7),
    ("eight", 8),
    ("nine", 9),
    ("ten", 10),
];

/// Number of courts. Patterns run in priority order; within a pattern,
/// the first match inside the sanity range wins and out-of-range matches
/// are skipped rather than ending the scan.
pub fn extract_court_count(text: &str) -> Field {
    let lowered = text.to_lowercase();

    for pattern in COURT_COUNT_PATTERNS {
        let Ok(re) = Regex::new(pattern) else {
            continue;
        };
        for caps in re.captures_iter(&lowered) {
            if let Some(count) = caps.get(1).and_then(|m| m.as_str().parse::<u32>().ok()) {
                if COURT_RANGE.contains(&count) {
                    return Field::known(count.to_string());
                }
            }
        }
    }

    // Spelled-out counts ("six courts").
    if let Ok(re) = Regex::new(r"\b(one|two|three|four|five|six|seven|eight|nine|ten)\s+(?:tennis\s+)?courts?\b") {
        if let Some(caps) = re.captures(&lowered) {
            let word = &caps[1];
            if let Some((_, n)) = SPELLED_COUNTS.iter().find(|(w, _)| *w == word) {
                return Field::known(n.to_string());
            }
        }
    }

    Field::Unknown
}

/// Surface labels and the keywords that signal them, in output order.
const SURFACE_RULES: [(&str, &[&str]); 6] = [
    ("Hard", &["hard court", "hardcourt", "hard-court"]),
    ("Clay", &["clay", "har-tru"]),
    ("Grass", &["grass court", "grass courts"]),
    ("Synthetic", &["synthetic", "artificial turf", "artificial grass"]),
    ("Indoor", &["indoor"]),
    ("Outdoor", &["outdoor"]),
];

/// Court surfaces: multi-label, joined with ", ". "Outdoor" is dropped
/// when "Indoor" is also present: an indoor facility is not purely
/// outdoor, so the weaker label would mislead.
pub fn extract_court_surface(text: &str) -> Field {
    let lowered = text.to_lowercase();
    let mut found: Vec<&str> = Vec::new();

    for (label, keywords) in SURFACE_RULES {
        if keywords.iter().any(|k| lowered.contains(k)) {
            found.push(label);
        }
    }

    if found.contains(&"Indoor") {
        found.retain(|label| *label != "Outdoor");
    }

    if found.is_empty() {
        Field::Unknown
    } else {
        Field::known(found.join(", "))
    }
}

const WAITLIST_NUMBER_PATTERNS: [&str; 5] = [
    r"waitlist[:\s]+(\d+)",
    r"wait(?:ing)?\s+list[:\s]+(\d+)",
    r"(\d+)\s*(?:people|members|players)?\s+on\s+(?:the\s+|our\s+)?waitlist",
    r"(\d+)\s*(?:people|members|players)?\s+on\s+(?:the\s+|our\s+)?wait(?:ing)?\s+list",
    r"(\d+)\s*year\s+wait(?:list)?",
];

/// Waitlist length: a number when one is stated near the waitlist
/// wording, "0" for explicit no-waitlist phrases, "Long" for qualitative
/// long-waitlist phrases, and a textual placeholder when a waitlist is
/// mentioned with no size at all.
pub fn extract_waitlist_length(text: &str) -> Field {
    let lowered = text.to_lowercase();

    for pattern in WAITLIST_NUMBER_PATTERNS {
        let Ok(re) = Regex::new(pattern) else {
            continue;
        };
        if let Some(caps) = re.captures(&lowered) {
            if let Some(m) = caps.get(1) {
                return Field::known(m.as_str());
            }
        }
    }

    if let Ok(re) = Regex::new(r"no\s+wait(?:ing)?\s*list|waitlist\s+is\s+closed") {
        if re.is_match(&lowered) {
            return Field::known("0");
        }
    }
    if let Ok(re) = Regex::new(r"(?:long|extensive)\s+wait(?:ing)?\s*list|several\s+years?") {
        if re.is_match(&lowered) {
            return Field::known("Long");
        }
    }

    if lowered.contains("waitlist") || lowered.contains("wait list") || lowered.contains("waiting list") {
        return Field::known("Yes (number not specified)");
    }

    Field::Unknown
}
