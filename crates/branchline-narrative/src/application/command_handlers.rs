//! Command handlers for the Narrative Session.
//!
//! Each handler drives the playthrough state machine and hands the resulting
//! position to the progress writer. Transitions are applied in memory first;
//! persistence follows without blocking them.

use tracing::{debug, error, info, instrument, warn};

use branchline_core::command::Command;
use branchline_core::content::ContentLoader;
use branchline_core::error::NarrativeError;
use branchline_core::progress::ProgressStore;

use crate::application::progress_writer::{PendingWrite, ProgressWriter};
use crate::application::query_handlers::{SceneView, current_scene_view};
use crate::domain::aggregates::Playthrough;
use crate::domain::commands::{RestartStory, SelectOption};
use crate::domain::events::NarrativeEvent;

/// Result of an accepted transition.
#[derive(Debug)]
pub struct Transition {
    /// What happened.
    pub event: NarrativeEvent,
    /// The scene that is now current.
    pub scene: SceneView,
    /// Confirmation for the progress write the transition issued.
    pub write: PendingWrite,
}

/// Handles session start: loads the story and the saved position together,
/// validates the story and resolves the initial scene.
///
/// A failed progress read is logged and treated as no saved progress.
///
/// # Errors
///
/// Returns `NarrativeError::Content` if the story cannot be fetched and
/// `NarrativeError::Graph` if it is structurally invalid.
#[instrument(skip_all)]
pub async fn handle_start(
    loader: &dyn ContentLoader,
    store: &dyn ProgressStore,
) -> Result<Playthrough, NarrativeError> {
    let (graph, saved) = tokio::join!(loader.load(), store.read());

    let graph = graph.inspect_err(|e| error!(error = %e, "failed to load story"))?;
    let saved_index = saved.unwrap_or_else(|e| {
        warn!(error = %e, "failed to read saved progress; starting from the first scene");
        None
    });

    for warning in graph.authoring_warnings() {
        warn!(%warning, "story authoring issue");
    }
    for (scene_index, _) in graph.unresolved_images(|image| !image.trim().is_empty()) {
        warn!(scene_index, "scene has no image identifier");
    }

    let playthrough = Playthrough::begin(graph, saved_index)
        .inspect_err(|e| error!(error = %e, "story failed validation"))?;

    let scene_index = playthrough.current_index();
    if let Some(saved) = saved_index.filter(|&saved| saved != scene_index) {
        warn!(
            saved_index = saved,
            scene_count = playthrough.graph().len(),
            "saved progress is outside the story; starting from the first scene"
        );
    }
    info!(
        scene_index,
        scene_count = playthrough.graph().len(),
        resumed = saved_index == Some(scene_index),
        "narrative session ready"
    );

    Ok(playthrough)
}

/// Handles the `SelectOption` command: applies the transition and queues the
/// new position for persistence.
///
/// # Errors
///
/// Returns `NarrativeError::Selection` for a rejected selection (no state
/// change) and `NarrativeError::SceneNotFound` if the content contract was
/// violated.
#[instrument(
    skip_all,
    fields(
        correlation_id = %command.correlation_id(),
        version = command.version,
        choice_index = command.choice_index,
    )
)]
pub fn handle_select_option(
    playthrough: &mut Playthrough,
    command: &SelectOption,
    writer: &ProgressWriter,
) -> Result<Transition, NarrativeError> {
    let event = match playthrough.select_option(command) {
        Ok(event) => event,
        Err(NarrativeError::SceneNotFound(fault)) => {
            error!(error = %fault, "selected option leads outside the story");
            return Err(fault.into());
        }
        Err(e) => {
            debug!(error = %e, command = command.command_type(), "selection rejected");
            return Err(e);
        }
    };

    finish_transition(playthrough, event, writer)
}

/// Handles the `RestartStory` command: returns to the first scene and queues
/// index 0 for persistence, so the next launch also starts from the beginning.
///
/// # Errors
///
/// Returns `NarrativeError::SceneNotFound` only if the first scene is missing,
/// which a validated story rules out.
#[instrument(skip_all, fields(correlation_id = %command.correlation_id()))]
pub fn handle_restart(
    playthrough: &mut Playthrough,
    command: &RestartStory,
    writer: &ProgressWriter,
) -> Result<Transition, NarrativeError> {
    let event = playthrough.restart(command);
    finish_transition(playthrough, event, writer)
}

fn finish_transition(
    playthrough: &Playthrough,
    event: NarrativeEvent,
    writer: &ProgressWriter,
) -> Result<Transition, NarrativeError> {
    let scene = current_scene_view(playthrough)?;
    let write = writer.submit(event.scene_index());
    info!(
        event = event.event_type(),
        scene_index = event.scene_index(),
        "narrative transition"
    );
    Ok(Transition {
        event,
        scene,
        write,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use branchline_core::error::{ContentError, GraphError, SelectionError, StorageError};
    use branchline_core::story::{Choice, Scene, StoryGraph};
    use branchline_test_support::{
        FailingContentLoader, FailingProgressStore, InMemoryProgressStore, StaticContentLoader,
        start_end_graph, three_scene_graph,
    };

    use super::*;

    #[tokio::test]
    async fn test_handle_start_on_fresh_install_begins_at_first_scene() {
        // Arrange
        let loader = StaticContentLoader::new(start_end_graph());
        let store = InMemoryProgressStore::new();

        // Act
        let playthrough = handle_start(&loader, &store).await.unwrap();

        // Assert
        assert_eq!(playthrough.current_index(), 0);
        assert_eq!(loader.load_count(), 1);
    }

    #[tokio::test]
    async fn test_handle_start_resumes_saved_index() {
        let loader = StaticContentLoader::new(three_scene_graph());
        let store = InMemoryProgressStore::with_index(2);

        let playthrough = handle_start(&loader, &store).await.unwrap();

        assert_eq!(playthrough.current_index(), 2);
    }

    #[tokio::test]
    async fn test_handle_start_ignores_saved_index_outside_story() {
        let loader = StaticContentLoader::new(three_scene_graph());
        let store = InMemoryProgressStore::with_index(40);

        let playthrough = handle_start(&loader, &store).await.unwrap();

        assert_eq!(playthrough.current_index(), 0);
    }

    #[tokio::test]
    async fn test_handle_start_treats_unreadable_progress_as_absent() {
        let loader = StaticContentLoader::new(three_scene_graph());

        let playthrough = handle_start(&loader, &FailingProgressStore).await.unwrap();

        assert_eq!(playthrough.current_index(), 0);
    }

    #[tokio::test]
    async fn test_handle_start_treats_corrupt_progress_as_absent() {
        let loader = StaticContentLoader::new(three_scene_graph());
        let store = InMemoryProgressStore::with_raw("banana");

        let playthrough = handle_start(&loader, &store).await.unwrap();

        assert_eq!(playthrough.current_index(), 0);
    }

    #[tokio::test]
    async fn test_handle_start_accepts_scenes_without_images() {
        let graph = StoryGraph::from_json(
            r#"{"scenes":[{"text":"Start","options":[{"text":"Go","nextIndex":1}]},{"text":"End","options":[]}]}"#,
        )
        .unwrap();
        let loader = StaticContentLoader::new(graph);

        let playthrough = handle_start(&loader, &InMemoryProgressStore::new())
            .await
            .unwrap();

        assert_eq!(playthrough.current_index(), 0);
        assert_eq!(playthrough.graph().unresolved_images(|image| !image.is_empty()).len(), 2);
    }

    #[tokio::test]
    async fn test_handle_start_fails_when_content_unavailable() {
        let loader = FailingContentLoader(ContentError::Status(500));
        let store = InMemoryProgressStore::with_index(1);

        let result = handle_start(&loader, &store).await;

        assert!(matches!(
            result,
            Err(NarrativeError::Content(ContentError::Status(500)))
        ));
    }

    #[tokio::test]
    async fn test_handle_start_fails_on_invalid_graph() {
        let graph = StoryGraph::new(vec![Scene {
            image: "void".to_owned(),
            text: "Lost".to_owned(),
            options: vec![Choice {
                label: "Jump".to_owned(),
                target: 3,
            }],
        }]);
        let loader = StaticContentLoader::new(graph);

        let result = handle_start(&loader, &InMemoryProgressStore::new()).await;

        assert!(matches!(
            result,
            Err(NarrativeError::Graph(GraphError::TargetOutOfRange { target: 3, .. }))
        ));
    }

    #[tokio::test]
    async fn test_handle_select_option_persists_new_index() {
        // Arrange
        let store = InMemoryProgressStore::new();
        let writer = ProgressWriter::spawn(Arc::new(store.clone()));
        let mut playthrough = Playthrough::begin(start_end_graph(), None).unwrap();

        // Act
        let transition =
            handle_select_option(&mut playthrough, &SelectOption::new(0, 0), &writer).unwrap();
        transition.write.confirm().await.unwrap();

        // Assert
        assert_eq!(transition.scene.text, "End");
        assert!(transition.scene.terminal);
        assert_eq!(store.raw().as_deref(), Some("1"));
    }

    #[tokio::test]
    async fn test_handle_select_option_keeps_index_when_write_fails() {
        let writer = ProgressWriter::spawn(Arc::new(FailingProgressStore));
        let mut playthrough = Playthrough::begin(three_scene_graph(), None).unwrap();

        let transition =
            handle_select_option(&mut playthrough, &SelectOption::new(0, 1), &writer).unwrap();
        let write = transition.write.confirm().await;

        assert!(matches!(write, Err(StorageError::Io(_))));
        assert_eq!(playthrough.current_index(), 2);
    }

    #[tokio::test]
    async fn test_handle_select_option_rejection_writes_nothing() {
        let store = InMemoryProgressStore::new();
        let writer = ProgressWriter::spawn(Arc::new(store.clone()));
        let mut playthrough = Playthrough::begin(three_scene_graph(), None).unwrap();

        let result = handle_select_option(&mut playthrough, &SelectOption::new(0, 5), &writer);

        assert!(matches!(
            result,
            Err(NarrativeError::Selection(SelectionError::ChoiceOutOfRange { .. }))
        ));
        // A later write proves the queue is drained past any earlier one.
        writer.submit(0).confirm().await.unwrap();
        assert_eq!(store.writes(), vec![0]);
    }

    #[tokio::test]
    async fn test_handle_restart_persists_first_scene() {
        let store = InMemoryProgressStore::with_index(1);
        let writer = ProgressWriter::spawn(Arc::new(store.clone()));
        let mut playthrough = Playthrough::begin(start_end_graph(), Some(1)).unwrap();

        let transition = handle_restart(&mut playthrough, &RestartStory::new(), &writer).unwrap();
        transition.write.confirm().await.unwrap();

        assert_eq!(transition.event, NarrativeEvent::Restarted { from_scene: 1 });
        assert_eq!(transition.scene.scene_index, 0);
        assert_eq!(store.read().await, Ok(Some(0)));
    }
}
