//! Collaborator contracts consumed by the crawler
//!
//! The traversal core only ever talks to the outside world through these
//! three traits. Implementations live in `citetrail-search` and
//! `citetrail-acquire`; mocks ship next to them for scheduler tests.

use crate::errors::Result;
use crate::model::PaperDescriptor;
use async_trait::async_trait;

/// Literature-search provider: query string to ordered candidate papers.
///
/// An empty list means "no match"; provider errors are surfaced as `Err` and
/// treated identically to an empty list by the scheduler.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<PaperDescriptor>>;
}

/// Document acquisition: descriptor to document bytes, or `None` when no
/// strategy in the fallback chain produced a document.
#[async_trait]
pub trait AcquisitionService: Send + Sync {
    async fn acquire(&self, paper: &PaperDescriptor) -> Result<Option<Vec<u8>>>;
}

/// Document parser: raw bytes to page-ordered page texts.
///
/// CPU-bound, no I/O, so the contract is synchronous. The caller
/// concatenates pages into a single document-order string.
pub trait DocumentParser: Send + Sync {
    fn parse(&self, bytes: &[u8]) -> Result<Vec<String>>;
}
