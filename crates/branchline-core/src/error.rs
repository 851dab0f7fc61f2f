//! Error taxonomy for the narrative engine.
//!
//! Load-time errors (`ContentError`, `GraphError`) halt a session before any
//! scene is shown. `StorageError` is never fatal to play. `SceneNotFound`
//! during play means the content contract was violated and forward progress
//! stops. `SelectionError` is a caller error and never changes state.

use thiserror::Error;

/// Failure to retrieve or deserialize the story document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentError {
    /// The transport failed before a response was received.
    #[error("story unavailable: network error: {0}")]
    Network(String),

    /// The content source answered with a non-success status.
    #[error("story unavailable: content source returned status {0}")]
    Status(u16),

    /// The document did not have the `{ "scenes": [...] }` shape.
    #[error("story unavailable: malformed story document: {0}")]
    Deserialize(String),

    /// A local content file could not be read.
    #[error("story unavailable: {0}")]
    Io(String),
}

/// A structurally invalid story graph. Indicates an authoring bug.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// The document contains zero scenes.
    #[error("invalid story: the story contains no scenes")]
    Empty,

    /// A choice points outside `0..scene_count`.
    #[error(
        "invalid story: scene {scene} choice {choice} targets scene {target}, \
         but only {scene_count} scenes exist"
    )]
    TargetOutOfRange {
        /// Index of the scene holding the bad choice.
        scene: usize,
        /// Position of the bad choice within the scene's options.
        choice: usize,
        /// The offending target.
        target: i64,
        /// Number of scenes in the graph.
        scene_count: usize,
    },
}

/// Lookup of a scene index outside the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("scene not found: index {index} (story has {scene_count} scenes)")]
pub struct SceneNotFound {
    /// The requested index.
    pub index: usize,
    /// Number of scenes in the graph.
    pub scene_count: usize,
}

/// Failure reading or writing the persisted progress record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// The underlying storage medium failed.
    #[error("progress storage I/O error: {0}")]
    Io(String),

    /// A record exists but does not hold a non-negative decimal integer.
    #[error("progress record is corrupt: {0}")]
    Corrupt(String),

    /// The store can no longer accept writes.
    #[error("progress storage unavailable: {0}")]
    Unavailable(String),
}

/// A selection the session refuses without changing state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SelectionError {
    /// The session has not reached a playable state.
    #[error("the story is not ready for selections")]
    NotReady,

    /// The current scene is terminal; it has no options to select.
    #[error("the story has ended; no options remain")]
    StoryEnded,

    /// `choice_index` is not a position within the current scene's options.
    #[error("choice {choice_index} does not exist; the current scene has {option_count} options")]
    ChoiceOutOfRange {
        /// The requested position.
        choice_index: usize,
        /// Number of options on the current scene.
        option_count: usize,
    },

    /// The selection was issued from a view that an earlier transition has
    /// already replaced.
    #[error("selection was made at story version {expected}, but the story is at version {actual}")]
    StaleSelection {
        /// Version of the view the caller selected from.
        expected: u64,
        /// Version of the playthrough.
        actual: u64,
    },
}

/// Top-level error returned by narrative session operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NarrativeError {
    /// The story could not be fetched or deserialized.
    #[error(transparent)]
    Content(#[from] ContentError),

    /// The story was fetched but is structurally invalid.
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// An internal-consistency fault: a validated graph led to a missing scene.
    #[error(transparent)]
    SceneNotFound(#[from] SceneNotFound),

    /// The caller asked for a transition that is not allowed.
    #[error(transparent)]
    Selection(#[from] SelectionError),
}
