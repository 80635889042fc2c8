//! Location extraction: which metro-area city the club is in.

use regex::Regex;

use crate::types::Field;

/// Known Greater-Toronto-Area municipalities and districts. Matching is
/// a case-insensitive substring scan; the first hit wins, so the bigger
/// centres sit first.
const GTA_CITIES: [&str; 24] = [
    "Toronto",
    "Mississauga",
    "Brampton",
    "Hamilton",
    "Markham",
    "Vaughan",
    "Richmond Hill",
    "Oakville",
    "Burlington",
    "Oshawa",
    "Pickering",
    "Ajax",
    "Whitby",
    "Newmarket",
    "Aurora",
    "Milton",
    "Caledon",
    "Georgina",
    "Stouffville",
    "King",
    "Etobicoke",
    "Scarborough",
    "North York",
    "East York",
];

/// City extraction: gazetteer scan first, then an "<City>, ON" pattern,
/// then the words preceding a Canadian postal code.
pub fn extract_location(text: &str) -> Field {
    let lowered = text.to_lowercase();
    for city in GTA_CITIES {
        if lowered.contains(&city.to_lowercase()) {
            return Field::known(city);
        }
    }

    // "Anytown, ON". Runs on the original case so "on" the preposition
    // doesn't match.
    if let Ok(re) = Regex::new(r"([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)\s*,\s*ON\b") {
        if let Some(caps) = re.captures(text) {
            return Field::known(caps[1].trim());
        }
    }

    // Words ahead of a postal code: "... Anytown M1B 2K3".
    if let Ok(re) = Regex::new(r"([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)\s*,?\s+[A-Z]\d[A-Z]\s*\d[A-Z]\d") {
        if let Some(caps) = re.captures(text) {
            return Field::known(caps[1].trim());
        }
    }

    Field::Unknown
}
