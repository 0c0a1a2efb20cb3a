//! CiteTrail Search Provider
//!
//! Implements the `SearchProvider` collaborator contract over the Serper
//! Google-Scholar endpoint, plus a scripted mock for scheduler tests.

pub mod mock;
pub mod serper;

pub use mock::MockSearchProvider;
pub use serper::SerperScholarClient;
