//! The playthrough state machine.
//!
//! A `Playthrough` only exists for a validated graph. It is `Ready` while the
//! current scene has options, `Ended` once it has none, and `Faulted` if a
//! transition ever leads outside the graph.
//!
//! Every accepted transition bumps the playthrough's version. A selection
//! names the version of the view it was made from, so once any transition has
//! happened, every other selection made from the same view is stale, even if
//! the story has looped back to the same scene.

use branchline_core::error::{GraphError, NarrativeError, SceneNotFound, SelectionError};
use branchline_core::story::{Scene, StoryGraph};

use super::commands::{RestartStory, SelectOption};
use super::events::NarrativeEvent;

/// Picks the scene a new playthrough starts on: the saved index when it still
/// exists in the graph, otherwise the first scene.
#[must_use]
pub fn resolve_initial_index(saved_index: Option<usize>, scene_count: usize) -> usize {
    saved_index.filter(|&index| index < scene_count).unwrap_or(0)
}

/// One player's traversal of a story graph.
#[derive(Debug)]
pub struct Playthrough {
    graph: StoryGraph,
    current: usize,
    version: u64,
    fault: Option<SceneNotFound>,
}

impl Playthrough {
    /// Validates `graph` and positions the playthrough on the resolved
    /// initial scene.
    ///
    /// # Errors
    ///
    /// Returns `GraphError` if the graph is empty or any choice targets a
    /// scene outside it.
    pub fn begin(graph: StoryGraph, saved_index: Option<usize>) -> Result<Self, GraphError> {
        graph.validate()?;
        let current = resolve_initial_index(saved_index, graph.len());
        Ok(Self {
            graph,
            current,
            version: 0,
            fault: None,
        })
    }

    /// The loaded story.
    #[must_use]
    pub fn graph(&self) -> &StoryGraph {
        &self.graph
    }

    /// Index of the scene currently displayed.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Number of transitions applied since the playthrough began.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// The scene currently displayed.
    ///
    /// # Errors
    ///
    /// Returns `SceneNotFound` if the current index is outside the graph.
    pub fn current_scene(&self) -> Result<&Scene, SceneNotFound> {
        self.graph.scene_at(self.current)
    }

    /// `true` once the current scene is terminal.
    #[must_use]
    pub fn is_ended(&self) -> bool {
        self.current_scene().is_ok_and(Scene::is_terminal)
    }

    /// The fault that halted forward progress, if any.
    #[must_use]
    pub fn fault(&self) -> Option<SceneNotFound> {
        self.fault
    }

    /// Follows an option of the current scene.
    ///
    /// On success the current index moves to the option's target. On any
    /// error the current index is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `NarrativeError::Selection` when the selection is stale, the
    /// story has ended, or `choice_index` is out of range, and
    /// `NarrativeError::SceneNotFound` if the target scene does not exist or
    /// the playthrough has already faulted.
    pub fn select_option(&mut self, command: &SelectOption) -> Result<NarrativeEvent, NarrativeError> {
        if let Some(fault) = self.fault {
            return Err(fault.into());
        }

        let (target, ended) = match self.resolve_target(command) {
            Ok(resolved) => resolved,
            Err(NarrativeError::SceneNotFound(fault)) => {
                self.fault = Some(fault);
                return Err(fault.into());
            }
            Err(e) => return Err(e),
        };

        let from_scene = self.current;
        self.current = target;
        self.version += 1;
        let event = if ended {
            NarrativeEvent::StoryEnded {
                from_scene,
                choice_index: command.choice_index,
                scene_index: target,
            }
        } else {
            NarrativeEvent::SceneEntered {
                from_scene,
                choice_index: command.choice_index,
                scene_index: target,
            }
        };
        Ok(event)
    }

    /// Returns to the first scene. Allowed from any state; it also clears a
    /// fault, since scene 0 always exists in a validated graph.
    pub fn restart(&mut self, _command: &RestartStory) -> NarrativeEvent {
        let from_scene = self.current;
        self.current = 0;
        self.version += 1;
        self.fault = None;
        NarrativeEvent::Restarted { from_scene }
    }

    /// Returns the target index of the selected option and whether the
    /// target scene is terminal, without changing state.
    fn resolve_target(&self, command: &SelectOption) -> Result<(usize, bool), NarrativeError> {
        if command.version != self.version {
            return Err(SelectionError::StaleSelection {
                expected: command.version,
                actual: self.version,
            }
            .into());
        }

        let scene = self.graph.scene_at(self.current)?;
        if scene.is_terminal() {
            return Err(SelectionError::StoryEnded.into());
        }
        let choice = scene
            .options
            .get(command.choice_index)
            .ok_or(SelectionError::ChoiceOutOfRange {
                choice_index: command.choice_index,
                option_count: scene.options.len(),
            })?;

        // Negative targets fall out of range and are reported as not found.
        let target = choice.target_index().unwrap_or(usize::MAX);
        let next = self.graph.scene_at(target)?;
        Ok((target, next.is_terminal()))
    }
}
