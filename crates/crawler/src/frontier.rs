//! Level-synchronous BFS frontier scheduler
//!
//! Drives the traversal: seeds are registered into the graph store, then each
//! level's papers are expanded by acquiring their documents, segmenting out
//! citation strings, and resolving each citation back to a canonical paper.
//! Newly admitted papers form the next level's frontier. The run halts when
//! the frontier is empty, the depth cap is passed, or the store is full.
//!
//! Document fetches within a level run concurrently under a bounded,
//! order-preserving pool; resolution and admission stay sequential in
//! (level, paper, reference) order, so results are deterministic given
//! deterministic collaborators.

use crate::graph::{Admission, GraphStore};
use crate::identity::canonical_key;
use crate::segmenter::split_references;
use citetrail_common::collab::{AcquisitionService, DocumentParser, SearchProvider};
use citetrail_common::model::PaperDescriptor;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tokio::time::timeout;
use tracing::{debug, info, instrument, warn};

/// Scheduler limits and knobs
#[derive(Debug, Clone)]
pub struct CrawlerConfig {
    /// Maximum number of papers in the graph
    pub max_papers: usize,
    /// Maximum BFS depth
    pub max_level: u32,
    /// Bounded pool size for per-paper document fetches within a level
    pub fetch_concurrency: usize,
    /// Outer timeout applied to each collaborator call
    pub collaborator_timeout: Duration,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_papers: 100,
            max_level: 3,
            fetch_concurrency: 4,
            collaborator_timeout: Duration::from_secs(45),
        }
    }
}

/// The BFS traversal engine
pub struct Crawler {
    search: Arc<dyn SearchProvider>,
    acquisition: Arc<dyn AcquisitionService>,
    parser: Arc<dyn DocumentParser>,
    config: CrawlerConfig,
    shutdown: watch::Receiver<bool>,
}

impl Crawler {
    pub fn new(
        search: Arc<dyn SearchProvider>,
        acquisition: Arc<dyn AcquisitionService>,
        parser: Arc<dyn DocumentParser>,
        config: CrawlerConfig,
    ) -> Self {
        // A receiver whose sender is gone keeps reporting the last value,
        // so a crawler without an external shutdown signal never cancels.
        let (_tx, shutdown) = watch::channel(false);
        Self {
            search,
            acquisition,
            parser,
            config,
            shutdown,
        }
    }

    /// Attach a cancellation signal. When it flips to `true`, no further
    /// per-paper work is launched and the store is returned as-is.
    pub fn with_shutdown(mut self, shutdown: watch::Receiver<bool>) -> Self {
        self.shutdown = shutdown;
        self
    }

    fn is_cancelled(&self) -> bool {
        *self.shutdown.borrow()
    }

    /// Expand the graph from the seed descriptors.
    ///
    /// Partial results are valid: per-node failures and cancellation leave
    /// whatever the store holds at that point.
    pub async fn run(&self, seeds: Vec<PaperDescriptor>) -> GraphStore {
        let store = Arc::new(Mutex::new(GraphStore::new(self.config.max_papers)));

        let mut frontier = self.seed(&store, seeds).await;
        let mut level: u32 = 1;

        while !frontier.is_empty() && level <= self.config.max_level {
            if store.lock().await.is_full() {
                info!(level, "graph is full, stopping traversal");
                break;
            }
            if self.is_cancelled() {
                info!(level, "cancellation requested, stopping traversal");
                break;
            }

            info!(level, frontier = frontier.len(), "processing level");
            frontier = self.process_level(&store, frontier, level).await;
            level += 1;
        }

        let store = match Arc::try_unwrap(store) {
            Ok(store) => store.into_inner(),
            Err(shared) => shared.lock().await.clone(),
        };
        info!(papers = store.len(), "traversal finished");
        store
    }

    /// Register seed descriptors, establishing the initial frontier.
    async fn seed(
        &self,
        store: &Arc<Mutex<GraphStore>>,
        seeds: Vec<PaperDescriptor>,
    ) -> Vec<PaperDescriptor> {
        let mut frontier = Vec::new();
        let mut store = store.lock().await;

        for seed in seeds {
            let key = canonical_key(&seed);
            match store.try_admit(key, seed.clone()) {
                Admission::Admitted => frontier.push(seed),
                Admission::Duplicate => debug!(paper = %seed.title, "duplicate seed skipped"),
                Admission::CapReached => {
                    warn!(paper = %seed.title, "seed set exceeds the graph size cap");
                    break;
                }
            }
        }

        frontier
    }

    /// Process one frontier level, returning the next one.
    ///
    /// Fetches are concurrent but consumed in paper order; admission for an
    /// earlier paper happens while later fetches are still in flight.
    async fn process_level(
        &self,
        store: &Arc<Mutex<GraphStore>>,
        papers: Vec<PaperDescriptor>,
        level: u32,
    ) -> Vec<PaperDescriptor> {
        let mut next_frontier = Vec::new();

        let fetches = stream::iter(
            papers
                .into_iter()
                .map(|paper| self.fetch_references(store.clone(), paper, level)),
        )
        .buffered(self.config.fetch_concurrency.max(1));
        futures::pin_mut!(fetches);

        while let Some((paper, references)) = fetches.next().await {
            let Some(references) = references else {
                // Acquisition miss or skip: the paper stays a leaf.
                continue;
            };
            if references.is_empty() {
                info!(paper = %paper.title, "no references detected");
                continue;
            }

            info!(paper = %paper.title, refs = references.len(), "resolving references");
            if !self.resolve_references(store, &references, &mut next_frontier).await {
                // Terminal condition reached mid-level; the rest of the
                // frontier is dropped.
                break;
            }
        }

        next_frontier
    }

    /// Acquire, parse, and segment one paper's document.
    ///
    /// Returns `None` when no document was obtained and an empty list when a
    /// document was obtained but yielded no references.
    #[instrument(skip(self, store, paper), fields(paper = %paper.title))]
    async fn fetch_references(
        &self,
        store: Arc<Mutex<GraphStore>>,
        paper: PaperDescriptor,
        level: u32,
    ) -> (PaperDescriptor, Option<Vec<String>>) {
        if self.is_cancelled() {
            return (paper, None);
        }
        // Caps are rechecked before every acquisition is launched.
        if store.lock().await.is_full() {
            debug!("graph is full, skipping acquisition");
            return (paper, None);
        }

        let acquired = match timeout(
            self.config.collaborator_timeout,
            self.acquisition.acquire(&paper),
        )
        .await
        {
            Err(_) => {
                warn!("document acquisition timed out");
                None
            }
            Ok(Err(e)) => {
                warn!(error = %e, "document acquisition failed");
                None
            }
            Ok(Ok(None)) => {
                info!("no document obtained, paper stays a leaf");
                None
            }
            Ok(Ok(Some(bytes))) => Some(bytes),
        };

        let Some(bytes) = acquired else {
            return (paper, None);
        };

        let pages = match self.parser.parse(&bytes) {
            Ok(pages) => pages,
            Err(e) => {
                warn!(error = %e, "document parse failed, treating as empty");
                return (paper, Some(Vec::new()));
            }
        };

        let document = split_references(&pages.join("\n"));
        debug!(
            body_len = document.body.len(),
            refs = document.references.len(),
            "document segmented"
        );

        (paper, Some(document.references))
    }

    /// Resolve citation strings in order, admitting new papers.
    ///
    /// Returns `false` when the traversal hit a terminal condition (cap
    /// reached or cancellation) and the level must stop.
    async fn resolve_references(
        &self,
        store: &Arc<Mutex<GraphStore>>,
        citations: &[String],
        next_frontier: &mut Vec<PaperDescriptor>,
    ) -> bool {
        for citation in citations {
            if self.is_cancelled() {
                return false;
            }
            if store.lock().await.is_full() {
                return false;
            }

            let candidates = match timeout(
                self.config.collaborator_timeout,
                self.search.search(citation),
            )
            .await
            {
                Err(_) => {
                    warn!(citation = %preview(citation), "citation search timed out");
                    Vec::new()
                }
                Ok(Err(e)) => {
                    warn!(citation = %preview(citation), error = %e, "citation search failed");
                    Vec::new()
                }
                Ok(Ok(candidates)) => candidates,
            };

            // The provider's top result is trusted; no further ranking.
            let Some(candidate) = candidates.into_iter().next() else {
                debug!(citation = %preview(citation), "citation unresolved");
                continue;
            };

            let key = canonical_key(&candidate);
            match store.lock().await.try_admit(key, candidate.clone()) {
                Admission::Admitted => {
                    info!(paper = %candidate.title, "new paper admitted");
                    next_frontier.push(candidate);
                }
                Admission::Duplicate => {
                    debug!(paper = %candidate.title, "paper already known");
                }
                Admission::CapReached => return false,
            }
        }

        true
    }
}

/// Shorten a citation string for log output.
fn preview(citation: &str) -> String {
    const MAX: usize = 80;
    if citation.chars().count() <= MAX {
        citation.to_string()
    } else {
        let cut: String = citation.chars().take(MAX).collect();
        format!("{}...", cut)
    }
}
