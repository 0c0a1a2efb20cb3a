//! Serper Google-Scholar client
//!
//! Sends the query as a JSON POST and maps the provider's organic hits into
//! paper descriptors. Provider order is preserved; the caller decides how
//! many candidates it trusts.

use async_trait::async_trait;
use citetrail_common::collab::SearchProvider;
use citetrail_common::config::SearchConfig;
use citetrail_common::errors::{AppError, Result};
use citetrail_common::model::PaperDescriptor;
use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;

/// Scholar search client backed by the Serper API
pub struct SerperScholarClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    max_results: usize,
    max_retries: u32,
}

#[derive(Serialize)]
struct ScholarRequest<'a> {
    q: &'a str,
}

#[derive(Deserialize, Default)]
struct ScholarResponse {
    #[serde(default)]
    organic: Vec<ScholarHit>,
}

#[derive(Deserialize)]
struct ScholarHit {
    #[serde(default)]
    title: Option<String>,

    /// The provider reports the year as a number or as "Unknown Year".
    #[serde(default, deserialize_with = "de_year")]
    year: Option<i32>,

    #[serde(default, rename = "citedBy")]
    cited_by: u64,

    #[serde(default, rename = "pdfUrl")]
    pdf_url: Option<String>,

    #[serde(default, rename = "htmlUrl")]
    html_url: Option<String>,

    #[serde(default)]
    link: Option<String>,
}

/// Accept an integer year, a numeric string, or any placeholder text.
fn de_year<'de, D>(deserializer: D) -> std::result::Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_i64().map(|y| y as i32),
        Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

impl SerperScholarClient {
    /// Create a new client from the search configuration.
    pub fn new(api_key: String, config: &SearchConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Configuration {
                message: format!("failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            max_results: config.max_results,
            max_retries: config.max_retries,
        })
    }

    /// Make request with retry
    async fn request_with_retry(&self, query: &str) -> Result<ScholarResponse> {
        let max_retries = self.max_retries.max(1);
        let mut last_error = None;

        for attempt in 0..max_retries {
            if attempt > 0 {
                // Exponential backoff
                let delay = Duration::from_millis(100 * 2_u64.pow(attempt));
                tokio::time::sleep(delay).await;
            }

            match self.make_request(query).await {
                Ok(response) => return Ok(response),
                Err(e) => {
                    tracing::warn!(
                        attempt = attempt + 1,
                        max_retries = max_retries,
                        error = %e,
                        "Scholar search request failed, retrying"
                    );
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| AppError::Search {
            message: "Unknown error after retries".to_string(),
        }))
    }

    async fn make_request(&self, query: &str) -> Result<ScholarResponse> {
        let url = format!("{}/scholar", self.base_url);

        let response = self
            .client
            .post(&url)
            .header("X-API-KEY", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&ScholarRequest { q: query })
            .send()
            .await
            .map_err(|e| AppError::Search {
                message: format!("Request failed: {}", e),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Search {
                message: format!("API error {}: {}", status, body),
            });
        }

        response.json().await.map_err(|e| AppError::Search {
            message: format!("Failed to parse response: {}", e),
        })
    }
}

#[async_trait]
impl SearchProvider for SerperScholarClient {
    async fn search(&self, query: &str) -> Result<Vec<PaperDescriptor>> {
        let response = self.request_with_retry(query).await?;

        Ok(response
            .organic
            .into_iter()
            .take(self.max_results)
            .map(descriptor_from_hit)
            .collect())
    }
}

/// Map a raw scholar hit into a paper descriptor.
///
/// The DOI is pulled out of the result link when it points at doi.org; the
/// link itself is kept as a last-resort URL.
fn descriptor_from_hit(hit: ScholarHit) -> PaperDescriptor {
    let doi = hit
        .link
        .as_deref()
        .and_then(|link| link.split_once("doi.org/"))
        .map(|(_, doi)| doi.to_string())
        .filter(|doi| !doi.is_empty());

    PaperDescriptor {
        title: hit.title.unwrap_or_else(|| "No Title".to_string()),
        year: hit.year,
        cited_by: hit.cited_by,
        doi,
        pdf_url: hit.pdf_url,
        landing_url: hit.html_url,
        fallback_url: hit.link,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit_from_json(json: &str) -> ScholarHit {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_doi_extracted_from_link() {
        let hit = hit_from_json(
            r#"{"title": "Paper One", "link": "https://doi.org/10.1000/xyz123"}"#,
        );
        let paper = descriptor_from_hit(hit);
        assert_eq!(paper.doi.as_deref(), Some("10.1000/xyz123"));
        assert_eq!(
            paper.fallback_url.as_deref(),
            Some("https://doi.org/10.1000/xyz123")
        );
    }

    #[test]
    fn test_non_doi_link_kept_as_fallback_only() {
        let hit = hit_from_json(r#"{"title": "Paper Two", "link": "https://example.org/p2"}"#);
        let paper = descriptor_from_hit(hit);
        assert!(paper.doi.is_none());
        assert_eq!(paper.fallback_url.as_deref(), Some("https://example.org/p2"));
    }

    #[test]
    fn test_year_variants() {
        let numeric = hit_from_json(r#"{"title": "A", "year": 2020}"#);
        let textual = hit_from_json(r#"{"title": "B", "year": "2021"}"#);
        let unknown = hit_from_json(r#"{"title": "C", "year": "Unknown Year"}"#);
        assert_eq!(numeric.year, Some(2020));
        assert_eq!(textual.year, Some(2021));
        assert_eq!(unknown.year, None);
    }

    #[test]
    fn test_missing_title_gets_placeholder() {
        let hit = hit_from_json(r#"{"citedBy": 7}"#);
        let paper = descriptor_from_hit(hit);
        assert_eq!(paper.title, "No Title");
        assert_eq!(paper.cited_by, 7);
    }

    #[test]
    fn test_response_without_organic_is_empty() {
        let response: ScholarResponse = serde_json::from_str("{}").unwrap();
        assert!(response.organic.is_empty());
    }
}
