//! Commands for the Narrative Session.

use branchline_core::command::Command;
use uuid::Uuid;

/// Command to follow one of the current scene's options.
#[derive(Debug, Clone)]
pub struct SelectOption {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Version of the scene view the player chose from. Any transition since
    /// that view was produced makes the selection stale.
    pub version: u64,
    /// Position of the chosen option within that scene's options.
    pub choice_index: usize,
}

impl SelectOption {
    /// Creates a selection with a fresh correlation ID.
    #[must_use]
    pub fn new(version: u64, choice_index: usize) -> Self {
        Self {
            correlation_id: Uuid::new_v4(),
            version,
            choice_index,
        }
    }
}

impl Command for SelectOption {
    fn command_type(&self) -> &'static str {
        "narrative.select_option"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to return to the first scene.
#[derive(Debug, Clone)]
pub struct RestartStory {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
}

impl RestartStory {
    /// Creates a restart with a fresh correlation ID.
    #[must_use]
    pub fn new() -> Self {
        Self {
            correlation_id: Uuid::new_v4(),
        }
    }
}

impl Default for RestartStory {
    fn default() -> Self {
        Self::new()
    }
}

impl Command for RestartStory {
    fn command_type(&self) -> &'static str {
        "narrative.restart_story"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
