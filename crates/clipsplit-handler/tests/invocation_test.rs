mod helpers;

use clipsplit_handler::handle_payload;
use clipsplit_processing::test_helpers::MockExtractor;
use helpers::{event_payload, TestApp, BUCKET};
use serde_json::Value;

const VIDEO: &[u8] = b"\0\0\0\x18ftypmp42-video-bytes";
const MP3: &[u8] = b"ID3\x04\x00-audio-bytes";

fn message(body: &str) -> String {
    let body: Value = serde_json::from_str(body).expect("body should be JSON");
    body["message"].as_str().unwrap_or_default().to_string()
}

#[tokio::test]
async fn upload_is_split_into_audio_and_video() {
    let app = TestApp::new(MockExtractor::returning(MP3)).await;
    app.upload("videos/clip1.mp4", VIDEO).await;

    let response = handle_payload(&app.orchestrator, &event_payload(BUCKET, "videos/clip1.mp4")).await;

    assert_eq!(response.status_code, 200);
    assert_eq!(
        message(&response.body),
        "Audio file successfully extracted and saved to data/clip1/audio.mp3 in uploads-bucket."
    );
    assert_eq!(app.read("data/clip1/audio.mp3").await.unwrap(), MP3);
    assert_eq!(app.read("data/clip1/video.mp4").await.unwrap(), VIDEO);
    assert!(!app.path_of("videos/clip1.mp4").exists());
}

#[tokio::test]
async fn response_serializes_with_status_code_field() {
    let app = TestApp::new(MockExtractor::returning(MP3)).await;
    app.upload("trip.mp4", VIDEO).await;

    let response = handle_payload(&app.orchestrator, &event_payload(BUCKET, "trip.mp4")).await;
    let json = serde_json::to_value(&response).unwrap();

    assert_eq!(json["statusCode"], 200);
    assert!(json["body"].is_string());
}

#[tokio::test]
async fn record_without_s3_fields_returns_400() {
    let app = TestApp::new(MockExtractor::returning(MP3)).await;

    let response = handle_payload(&app.orchestrator, r#"{"Records": [{"s3": {}}]}"#).await;

    assert_eq!(response.status_code, 400);
    assert_eq!(message(&response.body), "Error processing event. Key not found.");
    assert_eq!(app.extractor.call_count(), 0);
}

#[tokio::test]
async fn missing_source_object_returns_500() {
    let app = TestApp::new(MockExtractor::returning(MP3)).await;

    let response = handle_payload(&app.orchestrator, &event_payload(BUCKET, "videos/gone.mp4")).await;

    assert_eq!(response.status_code, 500);
    assert_eq!(message(&response.body), "Error interacting with storage.");
    assert!(app.read("data/gone/audio.mp3").await.is_none());
}

#[tokio::test]
async fn corrupt_video_returns_500_and_keeps_original() {
    let app = TestApp::new(MockExtractor::failing_decode("Invalid data found when processing input")).await;
    app.upload("videos/corrupt.mp4", b"garbage").await;

    let response = handle_payload(&app.orchestrator, &event_payload(BUCKET, "videos/corrupt.mp4")).await;

    assert_eq!(response.status_code, 500);
    assert_eq!(message(&response.body), "Error extracting audio from video.");
    assert_eq!(app.read("videos/corrupt.mp4").await.unwrap(), b"garbage");
    assert!(app.read("data/corrupt/audio.mp3").await.is_none());
    assert!(app.read("data/corrupt/video.mp4").await.is_none());
}

#[tokio::test]
async fn relocated_video_event_is_not_reprocessed() {
    let app = TestApp::new(MockExtractor::returning(MP3)).await;
    app.upload("videos/clip1.mp4", VIDEO).await;

    let first = handle_payload(&app.orchestrator, &event_payload(BUCKET, "videos/clip1.mp4")).await;
    assert_eq!(first.status_code, 200);

    // The relocated video fires a new object-created event
    let second =
        handle_payload(&app.orchestrator, &event_payload(BUCKET, "data/clip1/video.mp4")).await;

    assert_eq!(second.status_code, 200);
    assert_eq!(app.extractor.call_count(), 1);
    assert_eq!(app.read("data/clip1/video.mp4").await.unwrap(), VIDEO);
}

#[tokio::test]
async fn url_encoded_key_resolves_to_stored_object() {
    let app = TestApp::new(MockExtractor::returning(MP3)).await;
    app.upload("videos/summer trip (1).mp4", VIDEO).await;

    let response = handle_payload(
        &app.orchestrator,
        &event_payload(BUCKET, "videos/summer+trip+%281%29.mp4"),
    )
    .await;

    assert_eq!(response.status_code, 200);
    assert!(app.read("data/summer trip (1)/audio.mp3").await.is_some());
}
