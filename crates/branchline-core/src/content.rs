//! Content loader abstraction.

use async_trait::async_trait;

use crate::error::ContentError;
use crate::story::StoryGraph;

/// Source of the story document.
///
/// Implementations perform exactly one retrieval per call, never retry and
/// never cache. The returned graph is only known to be well-formed; callers
/// must still run [`StoryGraph::validate`].
#[async_trait]
pub trait ContentLoader: Send + Sync {
    /// Fetches and deserializes the story graph.
    async fn load(&self) -> Result<StoryGraph, ContentError>;
}
