//! The narrative session: one player's run of the story, constructed with the
//! content loader and progress store it should use.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use branchline_core::content::ContentLoader;
use branchline_core::error::{NarrativeError, SelectionError};
use branchline_core::progress::ProgressStore;

use crate::application::command_handlers::{self, Transition};
use crate::application::progress_writer::ProgressWriter;
use crate::application::query_handlers::{SceneView, current_scene_view};
use crate::domain::aggregates::Playthrough;
use crate::domain::commands::{RestartStory, SelectOption};

/// Externally visible lifecycle of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SessionStatus {
    /// Start has not completed.
    Loading,
    /// The current scene has options.
    Ready {
        /// Current scene.
        scene_index: usize,
    },
    /// The current scene is terminal. Only a restart leaves this state.
    Ended {
        /// Current scene.
        scene_index: usize,
    },
    /// The story could not be loaded or was invalid. No scene is shown.
    LoadFailed {
        /// Human-readable cause.
        reason: String,
    },
    /// A transition led outside the story; forward progress is halted.
    Faulted {
        /// Scene that was current when the fault occurred.
        scene_index: usize,
    },
}

#[derive(Debug)]
enum Phase {
    Loading,
    LoadFailed(NarrativeError),
    Playing {
        playthrough: Playthrough,
        writer: ProgressWriter,
    },
}

/// A narrative session with injected collaborators.
///
/// Every mutation takes `&mut self`, so at most one selection is in flight at
/// a time; the progress write it issues runs in the background.
pub struct NarrativeSession {
    loader: Arc<dyn ContentLoader>,
    store: Arc<dyn ProgressStore>,
    phase: Phase,
}

impl std::fmt::Debug for NarrativeSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NarrativeSession")
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

impl NarrativeSession {
    /// Creates a session in the `Loading` state. Nothing is fetched until
    /// [`start`](Self::start) is called.
    #[must_use]
    pub fn new(loader: Arc<dyn ContentLoader>, store: Arc<dyn ProgressStore>) -> Self {
        Self {
            loader,
            store,
            phase: Phase::Loading,
        }
    }

    /// Loads the story and saved position and enters the resolved scene.
    ///
    /// Calling `start` again reloads everything from scratch, exactly as a
    /// relaunch would. Writes queued by the previous playthrough are applied
    /// before the saved position is read again.
    ///
    /// # Errors
    ///
    /// Returns `NarrativeError::Content` or `NarrativeError::Graph` when the
    /// story cannot be played; the session is then in `LoadFailed`.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub async fn start(&mut self) -> Result<SceneView, NarrativeError> {
        if let Phase::Playing { writer, .. } = std::mem::replace(&mut self.phase, Phase::Loading) {
            writer.flush().await;
        }
        match command_handlers::handle_start(self.loader.as_ref(), self.store.as_ref()).await {
            Ok(playthrough) => {
                let scene = current_scene_view(&playthrough)?;
                let writer = ProgressWriter::spawn(Arc::clone(&self.store));
                self.phase = Phase::Playing {
                    playthrough,
                    writer,
                };
                Ok(scene)
            }
            Err(e) => {
                self.phase = Phase::LoadFailed(e.clone());
                Err(e)
            }
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn status(&self) -> SessionStatus {
        match &self.phase {
            Phase::Loading => SessionStatus::Loading,
            Phase::LoadFailed(e) => SessionStatus::LoadFailed {
                reason: e.to_string(),
            },
            Phase::Playing { playthrough, .. } => {
                let scene_index = playthrough.current_index();
                if playthrough.fault().is_some() {
                    SessionStatus::Faulted { scene_index }
                } else if playthrough.is_ended() {
                    SessionStatus::Ended { scene_index }
                } else {
                    SessionStatus::Ready { scene_index }
                }
            }
        }
    }

    /// Index of the current scene once the session is playing.
    #[must_use]
    pub fn current_index(&self) -> Option<usize> {
        match &self.phase {
            Phase::Playing { playthrough, .. } => Some(playthrough.current_index()),
            Phase::Loading | Phase::LoadFailed(_) => None,
        }
    }

    /// View of the current scene.
    ///
    /// # Errors
    ///
    /// Returns `SelectionError::NotReady` while loading, the load error after
    /// a failed start, and `NarrativeError::SceneNotFound` once faulted.
    pub fn current_scene(&self) -> Result<SceneView, NarrativeError> {
        let playthrough = self.playthrough()?;
        if let Some(fault) = playthrough.fault() {
            return Err(fault.into());
        }
        Ok(current_scene_view(playthrough)?)
    }

    /// Follows an option of the current scene.
    ///
    /// # Errors
    ///
    /// See [`command_handlers::handle_select_option`]; additionally returns the
    /// load state error when the session is not playing.
    pub fn select_option(&mut self, command: &SelectOption) -> Result<Transition, NarrativeError> {
        let (playthrough, writer) = self.playing_mut()?;
        command_handlers::handle_select_option(playthrough, command, writer)
    }

    /// Returns to the first scene and persists that position.
    ///
    /// # Errors
    ///
    /// Returns the load state error when the session is not playing.
    pub fn restart(&mut self, command: &RestartStory) -> Result<Transition, NarrativeError> {
        let (playthrough, writer) = self.playing_mut()?;
        let transition = command_handlers::handle_restart(playthrough, command, writer)?;
        info!("story restarted");
        Ok(transition)
    }

    fn playthrough(&self) -> Result<&Playthrough, NarrativeError> {
        match &self.phase {
            Phase::Playing { playthrough, .. } => Ok(playthrough),
            Phase::Loading => Err(SelectionError::NotReady.into()),
            Phase::LoadFailed(e) => Err(e.clone()),
        }
    }

    fn playing_mut(&mut self) -> Result<(&mut Playthrough, &ProgressWriter), NarrativeError> {
        match &mut self.phase {
            Phase::Playing {
                playthrough,
                writer,
            } => Ok((playthrough, &*writer)),
            Phase::Loading => Err(SelectionError::NotReady.into()),
            Phase::LoadFailed(e) => Err(e.clone()),
        }
    }
}
