//! Document acquisition fallback chain
//!
//! Routes are tried in a fixed order until one yields document bytes:
//! a direct PDF URL, a landing-page scrape, the DOI resolver, and the
//! provider's last-resort link. Every miss — HTTP failure, non-2xx status,
//! no link found, oversized or non-PDF payload — collapses into the shared
//! "not found" outcome.

use crate::scrape;
use async_trait::async_trait;
use citetrail_common::collab::AcquisitionService;
use citetrail_common::config::AcquisitionConfig;
use citetrail_common::errors::{AppError, Result};
use citetrail_common::model::PaperDescriptor;
use std::time::Duration;
use tracing::{debug, info, warn};

const PDF_MAGIC: &[u8] = b"%PDF";

/// Acquisition service implementing the URL/DOI-driven fallback chain
pub struct DocumentAcquirer {
    client: reqwest::Client,
    doi_resolver_base: String,
    max_document_bytes: usize,
}

/// One way of reaching a paper's document.
#[derive(Debug, Clone)]
enum DocumentRoute {
    /// Direct link to the document itself
    Direct(String),
    /// Page expected to link to the document
    Landing(String),
    /// DOI to be resolved through the configured resolver
    Resolver(String),
}

impl DocumentAcquirer {
    /// Create a new acquirer from the acquisition configuration.
    pub fn new(config: &AcquisitionConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| AppError::Configuration {
                message: format!("failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            doi_resolver_base: config.doi_resolver_base.trim_end_matches('/').to_string(),
            max_document_bytes: config.max_document_bytes,
        })
    }

    /// The ordered candidate routes for a paper.
    fn routes(paper: &PaperDescriptor) -> Vec<DocumentRoute> {
        let mut routes = Vec::new();
        if let Some(url) = &paper.pdf_url {
            routes.push(DocumentRoute::Direct(url.clone()));
        }
        if let Some(url) = &paper.landing_url {
            routes.push(DocumentRoute::Landing(url.clone()));
        }
        if let Some(doi) = &paper.doi {
            routes.push(DocumentRoute::Resolver(doi.clone()));
        }
        if let Some(url) = &paper.fallback_url {
            routes.push(DocumentRoute::Landing(url.clone()));
        }
        routes
    }

    async fn fetch_route(&self, route: &DocumentRoute) -> Result<Option<Vec<u8>>> {
        match route {
            DocumentRoute::Direct(url) => self.download(url).await,
            DocumentRoute::Landing(url) => {
                let html = match self.fetch_page(url).await? {
                    Some(html) => html,
                    None => return Ok(None),
                };
                let link = scrape::pdf_link(&html)
                    .and_then(|link| scrape::absolutize(&link, url));
                match link {
                    Some(link) => self.download(&link).await,
                    None => {
                        debug!(page = %url, "no document link found on landing page");
                        Ok(None)
                    }
                }
            }
            DocumentRoute::Resolver(doi) => {
                let page_url = format!("{}/{}", self.doi_resolver_base, doi);
                let html = match self.fetch_page(&page_url).await? {
                    Some(html) => html,
                    None => return Ok(None),
                };
                let link = scrape::resolver_embed_src(&html)
                    .and_then(|link| scrape::absolutize(&link, &page_url));
                match link {
                    Some(link) => self.download(&link).await,
                    None => {
                        debug!(doi = %doi, "resolver page has no document frame");
                        Ok(None)
                    }
                }
            }
        }
    }

    /// GET a page and return its body text, or `None` on a non-2xx status.
    async fn fetch_page(&self, url: &str) -> Result<Option<String>> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            debug!(url = %url, status = %response.status(), "page fetch failed");
            return Ok(None);
        }
        Ok(Some(response.text().await?))
    }

    /// Download document bytes, or `None` when the payload is unusable.
    async fn download(&self, url: &str) -> Result<Option<Vec<u8>>> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            warn!(url = %url, status = %response.status(), "document download failed");
            return Ok(None);
        }

        let bytes = response.bytes().await?;
        if bytes.len() > self.max_document_bytes {
            warn!(url = %url, size = bytes.len(), "document exceeds size limit, discarding");
            return Ok(None);
        }
        if !bytes.starts_with(PDF_MAGIC) {
            debug!(url = %url, "payload is not a PDF, discarding");
            return Ok(None);
        }

        Ok(Some(bytes.to_vec()))
    }
}

#[async_trait]
impl AcquisitionService for DocumentAcquirer {
    async fn acquire(&self, paper: &PaperDescriptor) -> Result<Option<Vec<u8>>> {
        let routes = Self::routes(paper);
        if routes.is_empty() {
            info!(paper = %paper.title, "no document source available");
            return Ok(None);
        }

        for route in &routes {
            match self.fetch_route(route).await {
                Ok(Some(bytes)) => {
                    debug!(paper = %paper.title, route = ?route, size = bytes.len(), "document acquired");
                    return Ok(Some(bytes));
                }
                Ok(None) => continue,
                Err(e) => {
                    // A failing route is a miss, not a failure of the chain.
                    warn!(paper = %paper.title, route = ?route, error = %e, "route failed");
                    continue;
                }
            }
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_order() {
        let paper = PaperDescriptor {
            title: "Full Source Paper".into(),
            year: Some(2020),
            cited_by: 10,
            doi: Some("10.1/x".into()),
            pdf_url: Some("https://host.org/p.pdf".into()),
            landing_url: Some("https://host.org/p".into()),
            fallback_url: Some("https://scholar.example/p".into()),
        };
        let routes = DocumentAcquirer::routes(&paper);
        assert_eq!(routes.len(), 4);
        assert!(matches!(&routes[0], DocumentRoute::Direct(url) if url.ends_with(".pdf")));
        assert!(matches!(&routes[1], DocumentRoute::Landing(_)));
        assert!(matches!(&routes[2], DocumentRoute::Resolver(doi) if doi == "10.1/x"));
        assert!(matches!(&routes[3], DocumentRoute::Landing(_)));
    }

    #[test]
    fn test_no_routes_without_sources() {
        let paper = PaperDescriptor::titled("Bare Title");
        assert!(DocumentAcquirer::routes(&paper).is_empty());
    }
}
