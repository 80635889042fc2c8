//! Field extractors.
//!
//! One independent heuristic per schema field. Shared contract: favor
//! precision over recall, first/strongest match wins, and always degrade
//! to the unknown sentinel instead of erroring. Rules live in ordered
//! lists so they can be tested and re-ordered independently.

mod classify;
mod email;
mod facilities;
mod location;

pub use classify::{extract_club_type, extract_membership_status, extract_operating_season};
pub use email::{extract_email, EmailFinding};
pub use facilities::{extract_court_count, extract_court_surface, extract_waitlist_length};
pub use location::extract_location;

use crate::fetch::FetchedPage;
use crate::types::{ClubRecord, EmailField};

/// Run every extractor whose field is still unknown on `record` and fill
/// in what they find. Fields already populated (by reference data or an
/// earlier pass) are left alone; pre-loaded data outranks scraped data
/// unconditionally. Returns how many fields were newly filled.
pub fn fill_missing(record: &mut ClubRecord, page: &FetchedPage) -> usize {
    let dom = page.dom();
    let text = &page.visible_text;
    let mut filled = 0;

    if record.email.address().is_none() {
        match (&record.email, extract_email(&dom, text)) {
            (EmailField::Unknown, EmailFinding::Address(addr)) => {
                record.email = EmailField::Address(addr);
                filled += 1;
            }
            (EmailField::Unknown, EmailFinding::ContactChannelOnly) => {
                record.email = EmailField::ContactChannelOnly;
                filled += 1;
            }
            // An address is strictly stronger than a contact-form placeholder.
            (EmailField::ContactChannelOnly, EmailFinding::Address(addr)) => {
                record.email = EmailField::Address(addr);
                filled += 1;
            }
            _ => {}
        }
    }

    if record.location.is_unknown() && record.location.fill_from(&extract_location(text)) {
        filled += 1;
    }
    if record.club_type.is_unknown() && record.club_type.fill_from(&extract_club_type(text)) {
        filled += 1;
    }
    if record.membership_status.is_unknown()
        && record
            .membership_status
            .fill_from(&extract_membership_status(text))
    {
        filled += 1;
    }
    if record.waitlist_length.is_unknown()
        && record
            .waitlist_length
            .fill_from(&extract_waitlist_length(text))
    {
        filled += 1;
    }
    if record.court_count.is_unknown() && record.court_count.fill_from(&extract_court_count(text))
    {
        filled += 1;
    }
    if record.court_surface.is_unknown()
        && record.court_surface.fill_from(&extract_court_surface(text))
    {
        filled += 1;
    }
    if record.operating_season.is_unknown()
        && record
            .operating_season
            .fill_from(&extract_operating_season(text))
    {
        filled += 1;
    }

    filled
}
