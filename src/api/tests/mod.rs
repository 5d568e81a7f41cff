use super::*;
use crate::pipeline::test_helpers::{
    FakeExtractor, FakeResolver, FakeStages, RecordingFetcher, pipeline_with, two_track_pipeline,
};
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use std::time::Duration;
use tower::ServiceExt;

mod ui;

/// Router over the given fake stages with default configuration
fn router_for(stages: &FakeStages) -> Router {
    create_router(
        Arc::new(stages.pipeline.clone()),
        Arc::new(Config::default()),
    )
}

/// Send one request and collect status, content type and body text
async fn send(app: Router, request: Request<Body>) -> (StatusCode, String, String) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, content_type, String::from_utf8(body.to_vec()).unwrap())
}

fn form_post(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/process_input")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_api_server_spawns_and_stops_on_shutdown() {
    let stages = two_track_pipeline();
    let mut config = Config::default();
    config.server.bind_address = "127.0.0.1:0".parse().unwrap();

    let (tx, rx) = tokio::sync::oneshot::channel::<()>();
    let handle = tokio::spawn(start_api_server(
        Arc::new(stages.pipeline.clone()),
        Arc::new(config),
        async move {
            rx.await.ok();
        },
    ));

    tokio::time::sleep(Duration::from_millis(50)).await;
    tx.send(()).unwrap();

    let result = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("server should stop after shutdown signal")
        .unwrap();
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let stages = two_track_pipeline();
    let request = Request::builder()
        .uri("/nope")
        .body(Body::empty())
        .unwrap();

    let (status, _, _) = send(router_for(&stages), request).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_empty_source_renders_ok() {
    let stages = pipeline_with(
        FakeExtractor::with_queries(&[]),
        FakeResolver::new(),
        RecordingFetcher::new(),
    );

    let (status, _, body) = send(router_for(&stages), form_post("user_input=x")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Found 0 track(s)<br>Done: 0/0 track(s) saved to /music"));
    assert!(!body.contains("class=\"banner\""));
}
