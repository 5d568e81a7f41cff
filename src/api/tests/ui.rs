use super::*;
use std::sync::atomic::Ordering;

#[tokio::test]
async fn test_index_serves_form() {
    let stages = two_track_pipeline();
    let request = Request::builder().uri("/").body(Body::empty()).unwrap();

    let (status, content_type, body) = send(router_for(&stages), request).await;

    assert_eq!(status, StatusCode::OK);
    assert!(content_type.starts_with("text/html"));
    assert!(body.contains(r#"action="/process_input""#));
    assert!(body.contains(r#"name="user_input""#));
}

#[tokio::test]
async fn test_two_tracks_render_one_line_each() {
    let stages = two_track_pipeline();

    let (status, content_type, body) = send(
        router_for(&stages),
        form_post("user_input=https%3A%2F%2Fopen.spotify.com%2Fplaylist%2Fabc"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(content_type.starts_with("text/html"));
    assert!(body.contains(concat!(
        "Found 2 track(s)<br>",
        "[1/2] Artist A - Song 1<br>",
        "Match: https://www.youtube.com/watch?v=vid1<br>",
        "[2/2] Artist B - Song 2<br>",
        "Match: https://www.youtube.com/watch?v=vid2<br>",
        "Done: 2/2 track(s) saved to /music",
    )));
    assert!(body.contains("https://open.spotify.com/playlist/abc"));
    assert!(!body.contains("class=\"banner\""));
    assert_eq!(stages.fetcher.fetched().len(), 2);
}

#[tokio::test]
async fn test_get_is_rejected_without_running_pipeline() {
    let stages = two_track_pipeline();
    let request = Request::builder()
        .uri("/process_input")
        .body(Body::empty())
        .unwrap();

    let response = router_for(&stages).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(
        response.headers().get(header::ALLOW).unwrap().to_str().unwrap(),
        "POST"
    );
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"Unsupported method: GET");
    assert_eq!(stages.extractor.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_other_methods_name_themselves() {
    let stages = two_track_pipeline();
    let request = Request::builder()
        .method("PUT")
        .uri("/process_input")
        .body(Body::empty())
        .unwrap();

    let (status, _, body) = send(router_for(&stages), request).await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body, "Unsupported method: PUT");
    assert_eq!(stages.extractor.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_empty_input_is_bad_request() {
    let stages = two_track_pipeline();

    let (status, _, body) = send(router_for(&stages), form_post("user_input=+++")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("Please enter a Spotify playlist, album or track link."));
    assert_eq!(stages.extractor.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_missing_field_is_bad_request() {
    let stages = two_track_pipeline();

    let (status, _, _) = send(router_for(&stages), form_post("")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(stages.extractor.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_extraction_failure_shows_banner() {
    let stages = pipeline_with(
        FakeExtractor::failing(),
        FakeResolver::new(),
        RecordingFetcher::new(),
    );

    let (status, _, body) = send(router_for(&stages), form_post("user_input=hello")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains(r#"<div class="banner" role="alert">Could not read tracks"#));
}

#[tokio::test]
async fn test_fetch_failure_keeps_partial_output() {
    let stages = pipeline_with(
        FakeExtractor::with_queries(&["Artist A - Song 1", "Artist B - Song 2", "C - 3"]),
        FakeResolver::new(),
        RecordingFetcher::failing_on(&["https://www.youtube.com/watch?v=vid2"]),
    );

    let (status, _, body) = send(router_for(&stages), form_post("user_input=x")).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body.contains("1 of 3 track(s) saved. Failed to fetch"));
    assert!(body.contains("Match: https://www.youtube.com/watch?v=vid1"));
    assert!(body.contains("Stopping: 1 remaining track(s) not attempted"));
    assert!(!body.contains("C - 3<br>"));
}

#[tokio::test]
async fn test_unmatched_query_is_not_found() {
    let stages = pipeline_with(
        FakeExtractor::with_queries(&["Obscure - Demo"]),
        FakeResolver::failing_on(&["Obscure - Demo"]),
        RecordingFetcher::new(),
    );

    let (status, _, body) = send(router_for(&stages), form_post("user_input=x")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("Failed to resolve"));
}

#[tokio::test]
async fn test_track_titles_are_escaped() {
    let stages = pipeline_with(
        FakeExtractor::with_queries(&["<script>alert(1)</script> - Tune"]),
        FakeResolver::new(),
        RecordingFetcher::new(),
    );

    let (status, _, body) = send(router_for(&stages), form_post("user_input=x")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(!body.contains("<script>"));
    assert!(body.contains("&lt;script&gt;alert(1)&lt;/script&gt; - Tune"));
}

#[tokio::test]
async fn test_failed_request_leaves_nothing_for_the_next_one() {
    // First run fetches vid1 and fails; the second run gets vid2 and vid3
    let stages = pipeline_with(
        FakeExtractor::with_queries(&["Artist A - Song 1", "Artist B - Song 2"]),
        FakeResolver::new(),
        RecordingFetcher::failing_on(&["https://www.youtube.com/watch?v=vid1"]),
    );
    let app = router_for(&stages);

    let (status, _, failed) = send(app.clone(), form_post("user_input=first")).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(failed.contains("Failed to"));
    assert!(failed.contains("Stopping: 1 remaining track(s) not attempted"));

    let (status, _, body) = send(app, form_post("user_input=second")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.matches("Found 2 track(s)").count(), 1);
    assert!(body.contains("watch?v=vid2<br>"));
    assert!(body.contains("Done: 2/2 track(s) saved to /music"));
    assert!(!body.contains("vid1"));
    assert!(!body.contains("Failed to"));
    assert!(!body.contains("Stopping:"));
    assert!(!body.contains("class=\"banner\""));
}
