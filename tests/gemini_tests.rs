//! Gemini adapter tests against a mocked API endpoint

use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use voicenotes::application::ports::{Polisher, ServiceError, Transcriber};
use voicenotes::domain::audio::{AudioMimeType, AudioPayload};
use voicenotes::domain::language::Language;
use voicenotes::infrastructure::{GeminiPolisher, GeminiTranscriber};

fn audio() -> AudioPayload {
    AudioPayload::new(vec![1, 2, 3], AudioMimeType::Webm)
}

fn text_response(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "candidates": [
            {"content": {"parts": [{"text": text}]}}
        ]
    }))
}

#[tokio::test]
async fn transcriber_sends_audio_and_extracts_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path_regex(r".*:generateContent$"))
        .and(body_string_contains("inlineData"))
        .and(body_string_contains("audio/webm"))
        .respond_with(text_response("hello world"))
        .expect(1)
        .mount(&server)
        .await;

    let transcriber = GeminiTranscriber::new("test-key").with_base_url(server.uri());
    let text = transcriber.transcribe(&audio()).await.unwrap();

    assert_eq!(text, "hello world");
}

#[tokio::test]
async fn transcriber_maps_unauthorized_to_bad_credential() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let transcriber = GeminiTranscriber::new("bad-key").with_base_url(server.uri());
    let err = transcriber.transcribe(&audio()).await.unwrap_err();

    assert!(matches!(err, ServiceError::BadCredential));
}

#[tokio::test]
async fn transcriber_maps_throttling_to_overloaded() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let transcriber = GeminiTranscriber::new("key").with_base_url(server.uri());
    let err = transcriber.transcribe(&audio()).await.unwrap_err();

    assert!(err.is_transient());
    assert!(matches!(err, ServiceError::Overloaded(_)));
}

#[tokio::test]
async fn transcriber_maps_server_error_to_request_failed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let transcriber = GeminiTranscriber::new("key").with_base_url(server.uri());
    let err = transcriber.transcribe(&audio()).await.unwrap_err();

    assert!(matches!(err, ServiceError::RequestFailed(_)));
    assert!(!err.is_transient());
}

#[tokio::test]
async fn transcriber_treats_missing_candidates_as_empty() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"candidates": []})))
        .mount(&server)
        .await;

    let transcriber = GeminiTranscriber::new("key").with_base_url(server.uri());
    let err = transcriber.transcribe(&audio()).await.unwrap_err();

    assert!(matches!(err, ServiceError::EmptyResult));
}

#[tokio::test]
async fn transcriber_treats_blank_text_as_empty() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(text_response("   \n  "))
        .mount(&server)
        .await;

    let transcriber = GeminiTranscriber::new("key").with_base_url(server.uri());
    let err = transcriber.transcribe(&audio()).await.unwrap_err();

    assert!(matches!(err, ServiceError::EmptyResult));
}

#[tokio::test]
async fn transcriber_surfaces_error_bodies() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": {"message": "quota exhausted", "code": 429}
        })))
        .mount(&server)
        .await;

    let transcriber = GeminiTranscriber::new("key").with_base_url(server.uri());
    let err = transcriber.transcribe(&audio()).await.unwrap_err();

    assert!(matches!(err, ServiceError::Overloaded(_)));
}

#[tokio::test]
async fn polisher_prompt_carries_language_and_instructions() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_string_contains("French"))
        .and(body_string_contains("User Instructions"))
        .and(body_string_contains("as a haiku"))
        .and(body_string_contains("um hello"))
        .respond_with(text_response("# Bonjour"))
        .expect(1)
        .mount(&server)
        .await;

    let polisher = GeminiPolisher::new("key").with_base_url(server.uri());
    let language: Language = "fr".parse().unwrap();
    let text = polisher
        .polish("um hello", &language, Some("as a haiku"))
        .await
        .unwrap();

    assert_eq!(text, "# Bonjour");
}

#[tokio::test]
async fn polisher_default_prompt_uses_cleanup_checklist() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_string_contains("Remove filler words"))
        .respond_with(text_response("polished"))
        .expect(1)
        .mount(&server)
        .await;

    let polisher = GeminiPolisher::new("key").with_base_url(server.uri());
    let text = polisher
        .polish("raw", &Language::default(), None)
        .await
        .unwrap();

    assert_eq!(text, "polished");
}

#[tokio::test]
async fn polisher_maps_forbidden_to_bad_credential() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let polisher = GeminiPolisher::new("key").with_base_url(server.uri());
    let err = polisher
        .polish("raw", &Language::default(), None)
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::BadCredential));
}
