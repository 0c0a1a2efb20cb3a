//! CiteTrail Acquisition
//!
//! Turns a paper descriptor into document bytes and document bytes into
//! page-ordered text:
//! - `DocumentAcquirer` — ordered fallback chain (direct PDF URL,
//!   landing-page scrape, DOI resolver, last-resort link)
//! - `LopdfParser` — PDF bytes to page texts
//! - scraping helpers for the landing-page and resolver routes

pub mod acquirer;
pub mod mock;
pub mod parser;
pub mod scrape;

pub use acquirer::DocumentAcquirer;
pub use mock::MockAcquisition;
pub use parser::{LopdfParser, PlainTextParser};
