//! Paper descriptor model
//!
//! The descriptor is produced by the search provider or by reference
//! resolution and is immutable once created. Identity (deduplication) is
//! derived from it by the crawler, not stored on it.

use serde::{Deserialize, Serialize};

/// A candidate paper as described by the literature-search provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaperDescriptor {
    /// Paper title
    pub title: String,

    /// Publication year, when the provider knows it
    #[serde(default)]
    pub year: Option<i32>,

    /// Citation count reported by the provider
    #[serde(default)]
    pub cited_by: u64,

    /// DOI, when one could be extracted
    #[serde(default)]
    pub doi: Option<String>,

    /// Direct link to the document
    #[serde(default)]
    pub pdf_url: Option<String>,

    /// Landing page that may link to the document
    #[serde(default)]
    pub landing_url: Option<String>,

    /// Last-resort URL from the provider
    #[serde(default)]
    pub fallback_url: Option<String>,
}

impl PaperDescriptor {
    /// Create a descriptor carrying only a title.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            year: None,
            cited_by: 0,
            doi: None,
            pdf_url: None,
            landing_url: None,
            fallback_url: None,
        }
    }

    /// Attach a DOI.
    pub fn with_doi(mut self, doi: impl Into<String>) -> Self {
        self.doi = Some(doi.into());
        self
    }

    /// Attach a direct document URL.
    pub fn with_pdf_url(mut self, url: impl Into<String>) -> Self {
        self.pdf_url = Some(url.into());
        self
    }
}
