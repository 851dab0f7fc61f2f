//! Query handlers for the Narrative Session.
//!
//! Read-only views handed to the rendering layer.

use serde::Serialize;

use branchline_core::error::SceneNotFound;

use crate::domain::aggregates::Playthrough;

/// One selectable option, in presentation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionView {
    /// Position to pass back as `choice_index` when selecting.
    pub choice_index: usize,
    /// Text for the selectable control.
    pub label: String,
}

/// Everything a renderer needs to paint the current scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SceneView {
    /// Index of the scene.
    pub scene_index: usize,
    /// Playthrough version this view was taken at; pass back as `version`
    /// when selecting.
    pub version: u64,
    /// Image identifier for the external resolver.
    pub image: String,
    /// Narrative text.
    pub text: String,
    /// Options in document order.
    pub options: Vec<OptionView>,
    /// `true` if the story ends here.
    pub terminal: bool,
}

/// Builds the view of the playthrough's current scene.
///
/// # Errors
///
/// Returns `SceneNotFound` if the current index is outside the graph.
pub fn current_scene_view(playthrough: &Playthrough) -> Result<SceneView, SceneNotFound> {
    let scene = playthrough.current_scene()?;
    Ok(SceneView {
        scene_index: playthrough.current_index(),
        version: playthrough.version(),
        image: scene.image.clone(),
        text: scene.text.clone(),
        options: scene
            .options
            .iter()
            .enumerate()
            .map(|(choice_index, choice)| OptionView {
                choice_index,
                label: choice.label.clone(),
            })
            .collect(),
        terminal: scene.is_terminal(),
    })
}
