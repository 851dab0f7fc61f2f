//! The scene graph: scenes, choices and the story that indexes them.
//!
//! A scene's identity is its position in `StoryGraph::scenes`. Graphs arrive
//! from an untrusted source, so every traversal must be preceded by
//! [`StoryGraph::validate`].

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ContentError, GraphError, SceneNotFound};

/// An outgoing edge from a scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    /// Text shown on the selectable control.
    #[serde(rename = "text")]
    pub label: String,
    /// Index of the destination scene. Signed so that negative targets in the
    /// document surface as a `GraphError` rather than a parse failure.
    #[serde(rename = "nextIndex")]
    pub target: i64,
}

impl Choice {
    /// Returns the target as a scene index, or `None` if it is negative.
    #[must_use]
    pub fn target_index(&self) -> Option<usize> {
        usize::try_from(self.target).ok()
    }
}

/// One narrative node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scene {
    /// Opaque identifier resolved by the rendering layer.
    #[serde(default)]
    pub image: String,
    /// Narrative text shown to the player.
    pub text: String,
    /// Choices in presentation order.
    pub options: Vec<Choice>,
}

impl Scene {
    /// A scene is terminal iff it has no options.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.options.is_empty()
    }
}

/// The complete story as delivered by the content source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryGraph {
    /// Scenes indexed `0..N`.
    pub scenes: Vec<Scene>,
}

impl StoryGraph {
    /// Creates a graph from an ordered list of scenes.
    #[must_use]
    pub fn new(scenes: Vec<Scene>) -> Self {
        Self { scenes }
    }

    /// Deserializes a story document of shape `{ "scenes": [...] }`.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::Deserialize` for any other shape.
    pub fn from_json(document: &str) -> Result<Self, ContentError> {
        serde_json::from_str(document).map_err(|e| ContentError::Deserialize(e.to_string()))
    }

    /// Number of scenes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    /// Returns `true` if the graph holds no scenes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// Checks that the graph is non-empty and every choice target is in range.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::Empty` for a graph without scenes and
    /// `GraphError::TargetOutOfRange` for the first choice whose target is
    /// negative or `>= len()`.
    pub fn validate(&self) -> Result<(), GraphError> {
        if self.scenes.is_empty() {
            return Err(GraphError::Empty);
        }
        let scene_count = self.scenes.len();
        for (scene_index, scene) in self.scenes.iter().enumerate() {
            for (choice_index, choice) in scene.options.iter().enumerate() {
                let in_range = choice.target_index().is_some_and(|t| t < scene_count);
                if !in_range {
                    return Err(GraphError::TargetOutOfRange {
                        scene: scene_index,
                        choice: choice_index,
                        target: choice.target,
                        scene_count,
                    });
                }
            }
        }
        Ok(())
    }

    /// Bounds-checked scene lookup.
    ///
    /// # Errors
    ///
    /// Returns `SceneNotFound` if `index` is outside the graph.
    pub fn scene_at(&self, index: usize) -> Result<&Scene, SceneNotFound> {
        self.scenes.get(index).ok_or(SceneNotFound {
            index,
            scene_count: self.scenes.len(),
        })
    }

    /// Reports places where the content may not behave as its author expects.
    ///
    /// Terminal-ness is structural (empty options), so a final scene that
    /// still has options, or an earlier scene with none, is flagged. Scenes no
    /// path from scene 0 can reach are flagged as well. Out-of-range targets
    /// are ignored here; `validate` owns them.
    #[must_use]
    pub fn authoring_warnings(&self) -> Vec<AuthoringWarning> {
        let mut warnings = Vec::new();
        let Some(last) = self.scenes.len().checked_sub(1) else {
            return warnings;
        };

        for (index, scene) in self.scenes.iter().enumerate() {
            if index == last && !scene.is_terminal() {
                warnings.push(AuthoringWarning::LastSceneHasOptions { scene: index });
            } else if index != last && scene.is_terminal() {
                warnings.push(AuthoringWarning::TerminalBeforeEnd { scene: index });
            }
        }

        let reachable = self.reachable_from_start();
        warnings.extend(
            reachable
                .iter()
                .enumerate()
                .filter(|(_, seen)| !**seen)
                .map(|(index, _)| AuthoringWarning::Unreachable { scene: index }),
        );

        warnings
    }

    /// Lists `(scene_index, image)` pairs whose image identifier the rendering
    /// layer cannot resolve.
    #[must_use]
    pub fn unresolved_images<F>(&self, is_known: F) -> Vec<(usize, &str)>
    where
        F: Fn(&str) -> bool,
    {
        self.scenes
            .iter()
            .enumerate()
            .filter(|(_, scene)| !is_known(&scene.image))
            .map(|(index, scene)| (index, scene.image.as_str()))
            .collect()
    }

    fn reachable_from_start(&self) -> Vec<bool> {
        let mut seen = vec![false; self.scenes.len()];
        let mut queue = VecDeque::from([0_usize]);
        seen[0] = true;
        while let Some(index) = queue.pop_front() {
            for choice in &self.scenes[index].options {
                let Some(target) = choice.target_index() else {
                    continue;
                };
                if target < seen.len() && !seen[target] {
                    seen[target] = true;
                    queue.push_back(target);
                }
            }
        }
        seen
    }
}

/// A non-fatal content diagnostic for story authors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AuthoringWarning {
    /// The final scene has options, so the story never ends there.
    LastSceneHasOptions {
        /// Scene index.
        scene: usize,
    },
    /// A scene before the final one has no options and ends the story early.
    TerminalBeforeEnd {
        /// Scene index.
        scene: usize,
    },
    /// No path from scene 0 leads here.
    Unreachable {
        /// Scene index.
        scene: usize,
    },
}

impl fmt::Display for AuthoringWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LastSceneHasOptions { scene } => {
                write!(f, "scene {scene} is the last scene but still has options")
            }
            Self::TerminalBeforeEnd { scene } => {
                write!(f, "scene {scene} has no options but is not the last scene")
            }
            Self::Unreachable { scene } => write!(f, "scene {scene} is unreachable from scene 0"),
        }
    }
}
