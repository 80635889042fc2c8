//! Name/URL normalization for record linkage.
//!
//! Two differently-formatted strings a human would call "the same club"
//! should collapse to equal keys for the common variations (case,
//! whitespace, protocol, www prefix, "Tennis Club"/"TC" suffix). This is
//! a matching heuristic, not a guarantee.

/// Canonical matching key for a club name: lowercase, collapsed
/// whitespace, "tennis club"/"tc" tokens removed. Empty input yields an
/// empty key, which matches nothing.
pub fn normalize_name(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    let mut words: Vec<&str> = lowered.split_whitespace().collect();

    // Drop "tennis club" as a pair, then any standalone "tc".
    let mut i = 0;
    while i + 1 < words.len() {
        if words[i] == "tennis" && words[i + 1] == "club" {
            words.drain(i..=i + 1);
        } else {
            i += 1;
        }
    }
    words.retain(|w| *w != "tc");

    words.join(" ")
}

/// Canonical matching key for a website URL: lowercase, scheme and
/// leading `www.` stripped, trailing slash removed.
pub fn normalize_url(raw: &str) -> String {
    let mut url = raw.trim().to_lowercase();

    for scheme in ["https://", "http://"] {
        if let Some(rest) = url.strip_prefix(scheme) {
            url = rest.to_string();
            break;
        }
    }
    if let Some(rest) = url.strip_prefix("www.") {
        url = rest.to_string();
    }
    while url.ends_with('/') {
        url.pop();
    }

    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_keys_collapse_suffix_variants() {
        assert_eq!(normalize_name("ABC  Tennis   Club"), normalize_name("abc tc"));
        assert_eq!(normalize_name("Agincourt Tennis Club"), "agincourt");
        assert_eq!(normalize_name("Banbury TC"), "banbury");
    }

    #[test]
    fn name_key_empty_input_is_empty() {
        assert_eq!(normalize_name(""), "");
        assert_eq!(normalize_name("   "), "");
        assert_eq!(normalize_name("Tennis Club"), "");
    }

    #[test]
    fn name_key_keeps_unrelated_words() {
        assert_eq!(normalize_name("North York Racquet Centre"), "north york racquet centre");
    }

    #[test]
    fn url_keys_collapse_protocol_and_case() {
        assert_eq!(
            normalize_url("https://www.Example.com/"),
            normalize_url("example.com")
        );
        assert_eq!(normalize_url("HTTP://WWW.CLUB.CA/courts/"), "club.ca/courts");
    }

    #[test]
    fn url_key_empty_input_is_empty() {
        assert_eq!(normalize_url(""), "");
        assert_eq!(normalize_url("  "), "");
    }
}
