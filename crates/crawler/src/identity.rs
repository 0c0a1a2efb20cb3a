//! Canonical paper identity
//!
//! Two descriptors with the same canonical key are the same paper. A DOI is
//! authoritative and compared verbatim after trimming; without one, the
//! title is case-folded and its whitespace runs collapsed. No fuzzy
//! matching: near-duplicate titles stay distinct papers.

use citetrail_common::model::PaperDescriptor;
use std::fmt;

/// The deduplication identity of a paper.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalKey(String);

impl CanonicalKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CanonicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Compute the canonical key for a descriptor.
///
/// Pure and deterministic: the same descriptor always yields the same key.
pub fn canonical_key(paper: &PaperDescriptor) -> CanonicalKey {
    if let Some(doi) = paper.doi.as_deref() {
        let doi = doi.trim();
        if !doi.is_empty() {
            return CanonicalKey(doi.to_string());
        }
    }
    CanonicalKey(normalize_title(&paper.title))
}

/// Case-fold a title and collapse internal whitespace runs.
fn normalize_title(title: &str) -> String {
    title
        .split_whitespace()
        .map(|word| word.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doi_wins_over_title() {
        let paper = PaperDescriptor::titled("Some Title").with_doi("10.1/X");
        assert_eq!(canonical_key(&paper).as_str(), "10.1/X");
    }

    #[test]
    fn test_doi_is_trimmed_but_case_sensitive() {
        let padded = PaperDescriptor::titled("T").with_doi("  10.1/X ");
        let lower = PaperDescriptor::titled("T").with_doi("10.1/x");
        assert_eq!(canonical_key(&padded).as_str(), "10.1/X");
        assert_ne!(canonical_key(&padded), canonical_key(&lower));
    }

    #[test]
    fn test_empty_doi_falls_back_to_title() {
        let paper = PaperDescriptor::titled("Fallback Title").with_doi("   ");
        assert_eq!(canonical_key(&paper).as_str(), "fallback title");
    }

    #[test]
    fn test_title_normalization() {
        let a = PaperDescriptor::titled("Deep   Learning\tFor Graphs");
        let b = PaperDescriptor::titled("deep learning for graphs");
        assert_eq!(canonical_key(&a), canonical_key(&b));
    }

    #[test]
    fn test_key_is_idempotent() {
        let paper = PaperDescriptor::titled("A Stable Title").with_doi("10.5/stable");
        assert_eq!(canonical_key(&paper), canonical_key(&paper));
    }

    #[test]
    fn test_title_variants_stay_distinct() {
        // No fuzzy matching: punctuation differences are different papers.
        let a = PaperDescriptor::titled("Graphs: A Survey");
        let b = PaperDescriptor::titled("Graphs A Survey");
        assert_ne!(canonical_key(&a), canonical_key(&b));
    }
}
