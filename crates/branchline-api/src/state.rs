//! Shared application state.

use std::sync::Arc;

use branchline_narrative::application::session::NarrativeSession;
use tokio::sync::Mutex;

/// Application state shared across all request handlers.
///
/// The session sits behind an async mutex so selections are applied one at a
/// time, in arrival order.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The player's narrative session.
    pub session: Arc<Mutex<NarrativeSession>>,
}

impl AppState {
    /// Create new application state around an already-started session.
    #[must_use]
    pub fn new(session: NarrativeSession) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
        }
    }
}
