//! CiteTrail Crawler
//!
//! The citation-graph traversal core:
//! - `segmenter` — document text to ordered citation strings
//! - `identity` — canonical paper keys for deduplication
//! - `graph` — the bounded, insertion-ordered graph store
//! - `frontier` — the level-synchronous BFS scheduler
//! - `output` — the JSON artifact handed to downstream stages

pub mod frontier;
pub mod graph;
pub mod identity;
pub mod output;
pub mod segmenter;

pub use frontier::{Crawler, CrawlerConfig};
pub use graph::{Admission, GraphStore};
pub use identity::{canonical_key, CanonicalKey};
pub use segmenter::{split_references, SegmentedDocument};
