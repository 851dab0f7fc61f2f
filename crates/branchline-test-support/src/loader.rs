//! Test content loaders — fake `ContentLoader` implementations for tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use branchline_core::content::ContentLoader;
use branchline_core::error::ContentError;
use branchline_core::story::StoryGraph;

/// A content loader that returns a copy of a fixed graph on every call and
/// counts how many times it was asked.
#[derive(Debug)]
pub struct StaticContentLoader {
    graph: StoryGraph,
    loads: AtomicUsize,
}

impl StaticContentLoader {
    /// Create a loader that serves `graph`.
    #[must_use]
    pub fn new(graph: StoryGraph) -> Self {
        Self {
            graph,
            loads: AtomicUsize::new(0),
        }
    }

    /// Number of `load` calls so far.
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentLoader for StaticContentLoader {
    async fn load(&self) -> Result<StoryGraph, ContentError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(self.graph.clone())
    }
}

/// A content loader that always fails with the configured error.
#[derive(Debug)]
pub struct FailingContentLoader(pub ContentError);

impl Default for FailingContentLoader {
    fn default() -> Self {
        Self(ContentError::Network("connection refused".into()))
    }
}

#[async_trait]
impl ContentLoader for FailingContentLoader {
    async fn load(&self) -> Result<StoryGraph, ContentError> {
        Err(self.0.clone())
    }
}
