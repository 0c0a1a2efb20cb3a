//! Canned acquisition service for tests

use async_trait::async_trait;
use citetrail_common::collab::AcquisitionService;
use citetrail_common::errors::Result;
use citetrail_common::model::PaperDescriptor;
use std::collections::HashMap;

/// Mock acquisition keyed by paper title; unknown papers yield no document.
#[derive(Default)]
pub struct MockAcquisition {
    documents: HashMap<String, Vec<u8>>,
}

impl MockAcquisition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a text document for a paper title.
    pub fn with_document(mut self, title: &str, text: &str) -> Self {
        self.documents.insert(title.to_string(), text.as_bytes().to_vec());
        self
    }
}

#[async_trait]
impl AcquisitionService for MockAcquisition {
    async fn acquire(&self, paper: &PaperDescriptor) -> Result<Option<Vec<u8>>> {
        Ok(self.documents.get(&paper.title).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_document() {
        let acquisition = MockAcquisition::new().with_document("Known", "document text");
        let bytes = acquisition
            .acquire(&PaperDescriptor::titled("Known"))
            .await
            .unwrap();
        assert_eq!(bytes.as_deref(), Some(b"document text".as_slice()));
    }

    #[tokio::test]
    async fn test_unknown_paper_has_no_document() {
        let acquisition = MockAcquisition::new();
        let bytes = acquisition
            .acquire(&PaperDescriptor::titled("Unknown"))
            .await
            .unwrap();
        assert!(bytes.is_none());
    }
}
