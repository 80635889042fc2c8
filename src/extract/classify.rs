//! Keyword classifiers: club type, membership status, operating season.
//!
//! Each classifier is an ordered rule list over lowercased page text;
//! the first rule that matches decides the value.

use crate::types::Field;

/// How a rule's keywords must appear in the text.
pub enum Needle {
    /// At least one keyword present.
    Any(&'static [&'static str]),
    /// Every keyword present (co-occurrence, not adjacency).
    All(&'static [&'static str]),
}

pub struct KeywordRule {
    pub needle: Needle,
    pub value: &'static str,
}

impl KeywordRule {
    fn matches(&self, text_lower: &str) -> bool {
        match self.needle {
            Needle::Any(keywords) => keywords.iter().any(|k| text_lower.contains(k)),
            Needle::All(keywords) => keywords.iter().all(|k| text_lower.contains(k)),
        }
    }
}

fn first_match(text: &str, rules: &[KeywordRule]) -> Field {
    let lowered = text.to_lowercase();
    for rule in rules {
        if rule.matches(&lowered) {
            return Field::known(rule.value);
        }
    }
    Field::Unknown
}

const CLUB_TYPE_RULES: &[KeywordRule] = &[
    KeywordRule {
        needle: Needle::Any(&["private club", "members only", "members-only", "membership required"]),
        value: "Private",
    },
    KeywordRule {
        needle: Needle::All(&["public", "tennis"]),
        value: "Public",
    },
    KeywordRule {
        needle: Needle::Any(&["semi-private", "semi private"]),
        value: "Semi-Private",
    },
    KeywordRule {
        needle: Needle::Any(&["community"]),
        value: "Community",
    },
];

pub fn extract_club_type(text: &str) -> Field {
    first_match(text, CLUB_TYPE_RULES)
}

// Waitlist phrases outrank "accepting members": a page saying both is
// read conservatively as having a waitlist.
const MEMBERSHIP_RULES: &[KeywordRule] = &[
    KeywordRule {
        needle: Needle::Any(&["waitlist", "wait list", "waiting list"]),
        value: "Waitlist",
    },
    KeywordRule {
        needle: Needle::Any(&[
            "accepting members",
            "accepting new members",
            "membership available",
            "memberships available",
            "open membership",
            "accepting applications",
        ]),
        value: "Open",
    },
    KeywordRule {
        needle: Needle::Any(&["membership closed", "not accepting", "full capacity"]),
        value: "Closed",
    },
];

pub fn extract_membership_status(text: &str) -> Field {
    first_match(text, MEMBERSHIP_RULES)
}

// Indoor and outdoor courts together imply year-round play.
const SEASON_RULES: &[KeywordRule] = &[
    KeywordRule {
        needle: Needle::Any(&["year-round", "year round", "all year"]),
        value: "Year-round",
    },
    KeywordRule {
        needle: Needle::All(&["indoor", "outdoor"]),
        value: "Year-round",
    },
    KeywordRule {
        needle: Needle::All(&["seasonal", "april"]),
        value: "Seasonal (Spring-Fall)",
    },
    KeywordRule {
        needle: Needle::All(&["seasonal", "may"]),
        value: "Seasonal (Spring-Fall)",
    },
    KeywordRule {
        needle: Needle::All(&["seasonal", "spring"]),
        value: "Seasonal (Spring-Fall)",
    },
    KeywordRule {
        needle: Needle::Any(&["seasonal", "outdoor only"]),
        value: "Seasonal",
    },
];

pub fn extract_operating_season(text: &str) -> Field {
    first_match(text, SEASON_RULES)
}
