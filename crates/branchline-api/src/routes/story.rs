//! Routes for the Narrative Session.

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use branchline_core::command::Command;
use branchline_narrative::application::command_handlers::Transition;
use branchline_narrative::application::query_handlers::SceneView;
use branchline_narrative::application::session::SessionStatus;
use branchline_narrative::domain::commands::{RestartStory, SelectOption};
use branchline_narrative::domain::events::NarrativeEvent;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /select.
#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    /// The `version` of the scene view the player chose from.
    pub version: u64,
    /// Position of the chosen option.
    pub choice_index: usize,
}

/// Response body for GET /scene.
#[derive(Debug, Serialize)]
pub struct SceneResponse {
    /// Session lifecycle state.
    pub session: SessionStatus,
    /// The scene to render.
    pub scene: SceneView,
}

/// Response body returned after an accepted transition.
#[derive(Debug, Serialize)]
pub struct TransitionResponse {
    /// What happened.
    pub event: NarrativeEvent,
    /// Session lifecycle state after the transition.
    pub session: SessionStatus,
    /// The scene to render next.
    pub scene: SceneView,
}

impl TransitionResponse {
    // The progress write is left to finish in the background; failures are
    // logged by the writer.
    fn from_transition(transition: Transition, session: SessionStatus) -> Self {
        Self {
            event: transition.event,
            session,
            scene: transition.scene,
        }
    }
}

/// GET /scene
async fn current_scene(State(state): State<AppState>) -> Result<Json<SceneResponse>, ApiError> {
    let session = state.session.lock().await;
    let scene = session.current_scene()?;
    Ok(Json(SceneResponse {
        session: session.status(),
        scene,
    }))
}

/// POST /select
#[instrument(skip(state, request), fields(version = request.version, choice_index = request.choice_index))]
async fn select_option(
    State(state): State<AppState>,
    Json(request): Json<SelectRequest>,
) -> Result<Json<TransitionResponse>, ApiError> {
    let command = SelectOption::new(request.version, request.choice_index);

    info!(correlation_id = %command.correlation_id(), "handling select_option command");

    let mut session = state.session.lock().await;
    let transition = session.select_option(&command)?;

    Ok(Json(TransitionResponse::from_transition(
        transition,
        session.status(),
    )))
}

/// POST /restart
#[instrument(skip(state))]
async fn restart(State(state): State<AppState>) -> Result<Json<TransitionResponse>, ApiError> {
    let command = RestartStory::new();

    info!(correlation_id = %command.correlation_id(), "handling restart_story command");

    let mut session = state.session.lock().await;
    let transition = session.restart(&command)?;

    Ok(Json(TransitionResponse::from_transition(
        transition,
        session.status(),
    )))
}

/// Returns the router for the story context.
#[must_use]
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/scene", get(current_scene))
        .route("/select", post(select_option))
        .route("/restart", post(restart))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use branchline_core::story::StoryGraph;
    use branchline_narrative::application::session::NarrativeSession;
    use branchline_test_support::{
        FailingContentLoader, InMemoryProgressStore, StaticContentLoader, start_end_graph,
    };
    use serde_json::Value;
    use tower::ServiceExt;

    async fn started_state(graph: StoryGraph) -> AppState {
        let mut session = NarrativeSession::new(
            Arc::new(StaticContentLoader::new(graph)),
            Arc::new(InMemoryProgressStore::new()),
        );
        session.start().await.unwrap();
        AppState::new(session)
    }

    async fn failed_state() -> AppState {
        let mut session = NarrativeSession::new(
            Arc::new(FailingContentLoader::default()),
            Arc::new(InMemoryProgressStore::new()),
        );
        session.start().await.unwrap_err();
        AppState::new(session)
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body_bytes).unwrap()
    }

    fn select_request(body: &Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/select")
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(body).unwrap()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_current_scene_returns_200_with_scene() {
        // Arrange
        let app = router().with_state(started_state(start_end_graph()).await);
        let request = Request::builder()
            .uri("/scene")
            .body(Body::empty())
            .unwrap();

        // Act
        let response = app.oneshot(request).await.unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["session"]["status"], "ready");
        assert_eq!(json["scene"]["text"], "Start");
        assert_eq!(json["scene"]["options"][0]["label"], "Go");
    }

    #[tokio::test]
    async fn test_current_scene_returns_503_when_story_unavailable() {
        let app = router().with_state(failed_state().await);
        let request = Request::builder()
            .uri("/scene")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let json = body_json(response).await;
        assert_eq!(json["error"], "story_unavailable");
    }

    #[tokio::test]
    async fn test_select_returns_200_with_next_scene() {
        let app = router().with_state(started_state(start_end_graph()).await);
        let body = serde_json::json!({ "version": 0, "choice_index": 0 });

        let response = app.oneshot(select_request(&body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["event"]["type"], "story_ended");
        assert_eq!(json["session"]["status"], "ended");
        assert_eq!(json["scene"]["text"], "End");
        assert_eq!(json["scene"]["terminal"], true);
    }

    #[tokio::test]
    async fn test_select_returns_400_for_unknown_choice() {
        let app = router().with_state(started_state(start_end_graph()).await);
        let body = serde_json::json!({ "version": 0, "choice_index": 3 });

        let response = app.oneshot(select_request(&body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"], "choice_out_of_range");
    }

    #[tokio::test]
    async fn test_select_returns_422_for_missing_body() {
        let app = router().with_state(started_state(start_end_graph()).await);

        let response = app
            .oneshot(select_request(&serde_json::json!({})))
            .await
            .unwrap();

        // Axum returns 422 for deserialization failures.
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
