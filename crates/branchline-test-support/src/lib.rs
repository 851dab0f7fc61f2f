//! Shared test fakes and fixtures for the Branchline narrative engine.

mod fixtures;
mod loader;
mod progress;

pub use fixtures::{branching_graph, start_end_graph, three_scene_graph};
pub use loader::{FailingContentLoader, StaticContentLoader};
pub use progress::{FailingProgressStore, InMemoryProgressStore};
