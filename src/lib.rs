//! Clubscout: tennis club data enrichment.
//!
//! Scrapes club websites into a fixed record schema, reconciles the
//! extracted fields against pre-loaded reference datasets, and drives
//! email outreach for clubs whose records remain incomplete.

pub mod config;
pub mod extract;
pub mod fetch;
pub mod normalize;
pub mod outreach;
pub mod pipeline;
pub mod progress;
pub mod reference;
pub mod report;
pub mod runner;
pub mod storage;
pub mod types;

pub use types::*;
