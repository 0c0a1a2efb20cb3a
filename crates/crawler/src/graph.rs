//! Bounded, insertion-ordered graph store
//!
//! The accumulated mapping of canonical key to paper record. Written only by
//! the scheduler, read by the caller at completion. Admission is a single
//! check-then-insert so the size cap holds exactly even when the store is
//! shared behind a lock.

use crate::identity::CanonicalKey;
use citetrail_common::model::PaperDescriptor;
use std::collections::HashMap;

/// Outcome of an admission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// The paper was new and the store had room.
    Admitted,
    /// The key is already present; the store is unchanged.
    Duplicate,
    /// The store is at capacity; the store is unchanged.
    CapReached,
}

/// Discovery-ordered store of admitted papers
#[derive(Debug, Clone)]
pub struct GraphStore {
    index: HashMap<CanonicalKey, usize>,
    papers: Vec<PaperDescriptor>,
    max_papers: usize,
}

impl GraphStore {
    /// Create an empty store with a hard size cap.
    pub fn new(max_papers: usize) -> Self {
        Self {
            index: HashMap::new(),
            papers: Vec::new(),
            max_papers,
        }
    }

    /// Number of admitted papers.
    pub fn len(&self) -> usize {
        self.papers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.papers.is_empty()
    }

    /// Whether the size cap has been reached.
    pub fn is_full(&self) -> bool {
        self.papers.len() >= self.max_papers
    }

    pub fn contains(&self, key: &CanonicalKey) -> bool {
        self.index.contains_key(key)
    }

    pub fn get(&self, key: &CanonicalKey) -> Option<&PaperDescriptor> {
        self.index.get(key).map(|&i| &self.papers[i])
    }

    /// Admit a paper at most once, never past the cap.
    pub fn try_admit(&mut self, key: CanonicalKey, paper: PaperDescriptor) -> Admission {
        if self.index.contains_key(&key) {
            return Admission::Duplicate;
        }
        if self.is_full() {
            return Admission::CapReached;
        }
        self.index.insert(key, self.papers.len());
        self.papers.push(paper);
        Admission::Admitted
    }

    /// Admitted papers in discovery order.
    pub fn papers(&self) -> &[PaperDescriptor] {
        &self.papers
    }

    /// Consume the store, yielding papers in discovery order.
    pub fn into_papers(self) -> Vec<PaperDescriptor> {
        self.papers
    }
}
