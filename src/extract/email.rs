//! Email extraction.
//!
//! Priority order: mailto links, declared meta tags, contact/footer
//! regions, a ranked scan of the whole page text, then a de-obfuscation
//! pass for "name AT domain DOT com" spellings. If all of that fails but
//! the page links to a contact page, that weaker signal is reported as
//! its own state rather than an address.

use regex::Regex;
use scraper::{Html, Selector};

const EMAIL_PATTERN: &str = r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b";

/// Placeholder/non-contact addresses that must never win.
const BLACKLIST: [&str; 10] = [
    "example.com",
    "domain.com",
    "email.com",
    "test.com",
    "placeholder",
    "noreply",
    "no-reply",
    "sentry",
    "wixpress",
    "@2x",
];

/// Role addresses beat personal/generic ones when both appear.
const ROLE_PREFIXES: [&str; 7] = [
    "info@",
    "contact@",
    "tennis@",
    "club@",
    "admin@",
    "membership@",
    "office@",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmailFinding {
    Address(String),
    /// A contact page exists but no address could be extracted.
    ContactChannelOnly,
    NotFound,
}

pub fn extract_email(dom: &Html, page_text: &str) -> EmailFinding {
    if let Some(addr) = from_mailto_link(dom) {
        return EmailFinding::Address(addr);
    }
    if let Some(addr) = from_meta_tag(dom) {
        return EmailFinding::Address(addr);
    }
    if let Some(addr) = from_contact_region(dom) {
        return EmailFinding::Address(addr);
    }
    if let Some(addr) = best_email_in(page_text) {
        return EmailFinding::Address(addr);
    }
    if let Some(addr) = from_obfuscated(page_text) {
        return EmailFinding::Address(addr);
    }
    if has_contact_page_link(dom) {
        return EmailFinding::ContactChannelOnly;
    }
    EmailFinding::NotFound
}

fn from_mailto_link(dom: &Html) -> Option<String> {
    let selector = Selector::parse(r#"a[href^="mailto:"]"#).ok()?;
    for link in dom.select(&selector) {
        let href = link.value().attr("href")?;
        let addr = href
            .trim_start_matches("mailto:")
            .split('?')
            .next()
            .unwrap_or("")
            .trim();
        if is_plausible(addr) {
            return Some(addr.to_string());
        }
    }
    None
}

fn from_meta_tag(dom: &Html) -> Option<String> {
    let selector =
        Selector::parse(r#"meta[name="email"], meta[itemprop="email"], meta[property="og:email"]"#)
            .ok()?;
    for meta in dom.select(&selector) {
        if let Some(content) = meta.value().attr("content") {
            let addr = content.trim();
            if is_plausible(addr) {
                return Some(addr.to_string());
            }
        }
    }
    None
}

/// Scan just the contact/footer portions of the page before falling back
/// to the whole text; an address found there is almost always the club's
/// real contact channel.
fn from_contact_region(dom: &Html) -> Option<String> {
    let selector =
        Selector::parse(r#"footer, address, [class*="contact"], [id*="contact"]"#).ok()?;
    for region in dom.select(&selector) {
        let text = region.text().collect::<Vec<_>>().join(" ");
        if let Some(addr) = best_email_in(&text) {
            return Some(addr);
        }
    }
    None
}

/// First role-keyword address in the text, else the first address that
/// survives the blacklist.
fn best_email_in(text: &str) -> Option<String> {
    let re = Regex::new(EMAIL_PATTERN).ok()?;
    let mut fallback: Option<String> = None;

    for m in re.find_iter(text) {
        let addr = m.as_str();
        if !is_plausible(addr) {
            continue;
        }
        let lowered = addr.to_lowercase();
        if ROLE_PREFIXES.iter().any(|p| lowered.starts_with(p)) {
            return Some(addr.to_string());
        }
        if fallback.is_none() {
            fallback = Some(addr.to_string());
        }
    }

    fallback
}

fn from_obfuscated(text: &str) -> Option<String> {
    let re = Regex::new(
        r"(?i)\b([a-z0-9._%+-]+)\s*[\(\[]?\s*\bat\b\s*[\)\]]?\s*([a-z0-9-]+(?:\.[a-z0-9-]+)*)\s*[\(\[]?\s*\bdot\b\s*[\)\]]?\s*([a-z]{2,})\b",
    )
    .ok()?;
    let caps = re.captures(text)?;
    let addr = format!("{}@{}.{}", &caps[1], &caps[2], &caps[3]);
    if is_plausible(&addr) {
        Some(addr.to_lowercase())
    } else {
        None
    }
}

fn has_contact_page_link(dom: &Html) -> bool {
    let Ok(selector) = Selector::parse("a[href]") else {
        return false;
    };
    dom.select(&selector).any(|link| {
        let href = link.value().attr("href").unwrap_or("").to_lowercase();
        let label = link.text().collect::<String>().to_lowercase();
        href.contains("contact") || label.contains("contact us")
    })
}

fn is_plausible(addr: &str) -> bool {
    if !addr.contains('@') || addr.len() < 6 {
        return false;
    }
    let lowered = addr.to_lowercase();
    !BLACKLIST.iter().any(|b| lowered.contains(b))
}
