//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use branchline_core::content::ContentLoader;
use branchline_core::progress::ProgressStore;
use branchline_core::story::StoryGraph;
use branchline_narrative::application::session::NarrativeSession;
use branchline_test_support::{InMemoryProgressStore, StaticContentLoader};
use http_body_util::BodyExt;
use tower::ServiceExt;

use branchline_api::build_router;
use branchline_api::state::AppState;

/// Start a session over the given loader and store and build the full app
/// router around it, the same way `main.rs` does. A failed start is kept in
/// the session, as in production.
pub async fn build_test_app(
    loader: Arc<dyn ContentLoader>,
    store: Arc<dyn ProgressStore>,
) -> Router {
    let mut session = NarrativeSession::new(loader, store);
    let _ = session.start().await;
    build_router(AppState::new(session))
}

/// Build the app over a static story and the given in-memory store.
pub async fn build_story_app(graph: StoryGraph, store: &InMemoryProgressStore) -> Router {
    build_test_app(
        Arc::new(StaticContentLoader::new(graph)),
        Arc::new(store.clone()),
    )
    .await
}

/// Wait until the background progress writer has issued `count` writes.
pub async fn wait_for_writes(store: &InMemoryProgressStore, count: usize) -> Vec<usize> {
    for _ in 0..200 {
        let writes = store.writes();
        if writes.len() >= count {
            return writes;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("expected {count} progress writes, saw {:?}", store.writes());
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    send(app, request).await
}

/// Send a POST request with no body and return the response.
pub async fn post_empty(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}
