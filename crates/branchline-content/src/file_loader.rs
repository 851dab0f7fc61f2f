//! Local-file implementation of the `ContentLoader` trait, for offline play
//! and authoring previews.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::info;

use branchline_core::content::ContentLoader;
use branchline_core::error::ContentError;
use branchline_core::story::StoryGraph;

/// Reads the story document from a JSON file on every call.
#[derive(Debug, Clone)]
pub struct FileContentLoader {
    path: PathBuf,
}

impl FileContentLoader {
    /// Creates a loader for the document at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ContentLoader for FileContentLoader {
    async fn load(&self) -> Result<StoryGraph, ContentError> {
        let document = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| ContentError::Io(format!("{}: {e}", self.path.display())))?;
        let graph = StoryGraph::from_json(&document)?;
        info!(path = %self.path.display(), scene_count = graph.len(), "story document read");
        Ok(graph)
    }
}
