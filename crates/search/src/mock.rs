//! Scripted search provider for tests

use async_trait::async_trait;
use citetrail_common::collab::SearchProvider;
use citetrail_common::errors::Result;
use citetrail_common::model::PaperDescriptor;
use std::collections::HashMap;

/// Mock provider returning canned responses keyed by exact query string.
/// Unknown queries resolve to an empty candidate list.
#[derive(Default)]
pub struct MockSearchProvider {
    responses: HashMap<String, Vec<PaperDescriptor>>,
}

impl MockSearchProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a response for a query.
    pub fn with_response(mut self, query: &str, papers: Vec<PaperDescriptor>) -> Self {
        self.responses.insert(query.to_string(), papers);
        self
    }
}

#[async_trait]
impl SearchProvider for MockSearchProvider {
    async fn search(&self, query: &str) -> Result<Vec<PaperDescriptor>> {
        Ok(self.responses.get(query).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_response() {
        let provider = MockSearchProvider::new()
            .with_response("known query", vec![PaperDescriptor::titled("Known Paper")]);

        let hits = provider.search("known query").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Known Paper");
    }

    #[tokio::test]
    async fn test_unknown_query_is_empty() {
        let provider = MockSearchProvider::new();
        assert!(provider.search("anything").await.unwrap().is_empty());
    }
}
