//! Domain events for the Narrative Session.

use serde::Serialize;

/// Outcome of an accepted transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NarrativeEvent {
    /// The player followed an option into a scene that offers further choices.
    SceneEntered {
        /// Scene the option was chosen from.
        from_scene: usize,
        /// Position of the chosen option.
        choice_index: usize,
        /// The new current scene.
        scene_index: usize,
    },
    /// The player followed an option into a terminal scene.
    StoryEnded {
        /// Scene the option was chosen from.
        from_scene: usize,
        /// Position of the chosen option.
        choice_index: usize,
        /// The terminal scene.
        scene_index: usize,
    },
    /// The playthrough returned to the first scene.
    Restarted {
        /// Scene that was current before the restart.
        from_scene: usize,
    },
}

impl NarrativeEvent {
    /// The event type name, as it appears in logs.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::SceneEntered { .. } => "narrative.scene_entered",
            Self::StoryEnded { .. } => "narrative.story_ended",
            Self::Restarted { .. } => "narrative.restarted",
        }
    }

    /// The scene that is current once this event has happened.
    #[must_use]
    pub fn scene_index(&self) -> usize {
        match self {
            Self::SceneEntered { scene_index, .. } | Self::StoryEnded { scene_index, .. } => {
                *scene_index
            }
            Self::Restarted { .. } => 0,
        }
    }
}
