//! HTTP implementation of the `ContentLoader` trait.

use async_trait::async_trait;
use tracing::{debug, info, instrument};

use branchline_core::content::ContentLoader;
use branchline_core::error::ContentError;
use branchline_core::story::StoryGraph;

/// Published location of the story document.
pub const DEFAULT_CONTENT_URL: &str =
    "https://raw.githubusercontent.com/mindoken/data_for_novel/main/data_for_novel/data.json";

/// Fetches the story document with a single HTTP GET.
///
/// No timeout is configured beyond the transport's defaults, so a request
/// that never completes leaves the caller waiting.
#[derive(Debug, Clone)]
pub struct HttpContentLoader {
    client: reqwest::Client,
    url: String,
}

impl HttpContentLoader {
    /// Creates a loader for `url` with a default client.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), url)
    }

    /// Creates a loader that reuses an existing client.
    #[must_use]
    pub fn with_client(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    /// The document URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ContentLoader for HttpContentLoader {
    #[instrument(skip(self), fields(url = %self.url))]
    async fn load(&self) -> Result<StoryGraph, ContentError> {
        debug!("fetching story document");

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| ContentError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ContentError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ContentError::Network(e.to_string()))?;
        let graph = StoryGraph::from_json(&body)?;

        info!(scene_count = graph.len(), "story document fetched");
        Ok(graph)
    }
}
