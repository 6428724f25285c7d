use std::collections::HashMap;

use axum::Router;
use axum::extract::Query;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::post;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use transcript_relay::application::ports::{TranscriptionEngine, TranscriptionError};
use transcript_relay::infrastructure::audio::DeepgramEngine;

const SUCCESS_BODY: &str = r#"{
    "metadata": { "request_id": "abc", "duration": 1.5 },
    "results": {
        "channels": [
            { "alternatives": [ { "transcript": "Hello from Deepgram", "confidence": 0.97 } ] }
        ]
    }
}"#;

async fn start_mock_deepgram_server(
    response_status: u16,
    response_body: &'static str,
) -> (String, oneshot::Sender<()>) {
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let app = Router::new().route(
        "/v1/listen",
        post(
            move |headers: HeaderMap, Query(query): Query<HashMap<String, String>>| async move {
                let authorized = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    == Some("Token test-key");
                if !authorized || query.get("model").map(String::as_str) != Some("nova-2") {
                    return (
                        StatusCode::UNAUTHORIZED,
                        r#"{"err_code":"INVALID_AUTH","err_msg":"Invalid credentials."}"#,
                    )
                        .into_response();
                }
                let status = StatusCode::from_u16(response_status).unwrap();
                (status, response_body).into_response()
            },
        ),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{}", addr);

    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            })
            .await
            .ok();
    });

    (base_url, shutdown_tx)
}

fn engine(base_url: &str, key: &str) -> DeepgramEngine {
    DeepgramEngine::new(key.to_string(), Some(base_url.to_string()), None)
}

#[tokio::test]
async fn given_valid_audio_when_deepgram_transcribes_then_returns_first_alternative() {
    let (base_url, shutdown_tx) = start_mock_deepgram_server(200, SUCCESS_BODY).await;

    let result = engine(&base_url, "test-key")
        .transcribe(b"fake audio bytes", "audio/wav")
        .await
        .unwrap();

    assert_eq!(result.transcript, "Hello from Deepgram");
    assert_eq!(result.confidence, Some(0.97));
    assert_eq!(result.raw["metadata"]["request_id"], "abc");
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_base_url_with_trailing_slash_when_transcribing_then_endpoint_is_still_resolved() {
    let (base_url, shutdown_tx) = start_mock_deepgram_server(200, SUCCESS_BODY).await;

    let result = engine(&format!("{}/", base_url), "test-key")
        .transcribe(b"audio", "audio/wav")
        .await;

    assert!(result.is_ok());
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_wrong_credentials_when_transcribing_then_returns_backend_reported_error() {
    let (base_url, shutdown_tx) = start_mock_deepgram_server(200, SUCCESS_BODY).await;

    let result = engine(&base_url, "wrong-key")
        .transcribe(b"audio", "audio/wav")
        .await;

    match result {
        Err(TranscriptionError::BackendReported(detail)) => {
            assert!(detail.contains("INVALID_AUTH"));
            assert!(detail.contains("401"));
        }
        other => panic!("expected backend error, got {:?}", other),
    }
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_server_error_with_plain_body_when_transcribing_then_returns_backend_reported_error() {
    let (base_url, shutdown_tx) = start_mock_deepgram_server(503, "upstream unavailable").await;

    let result = engine(&base_url, "test-key")
        .transcribe(b"audio", "audio/wav")
        .await;

    match result {
        Err(TranscriptionError::BackendReported(detail)) => {
            assert!(detail.contains("upstream unavailable"));
        }
        other => panic!("expected backend error, got {:?}", other),
    }
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_success_status_with_error_document_when_transcribing_then_error_is_not_dropped() {
    let body = r#"{"err_code":"Bad Request","err_msg":"corrupt or unsupported data"}"#;
    let (base_url, shutdown_tx) = start_mock_deepgram_server(200, body).await;

    let result = engine(&base_url, "test-key")
        .transcribe(b"audio", "audio/wav")
        .await;

    assert!(matches!(result, Err(TranscriptionError::BackendReported(_))));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_response_without_channels_when_transcribing_then_returns_decoding_failed() {
    let body = r#"{"results": {"channels": []}}"#;
    let (base_url, shutdown_tx) = start_mock_deepgram_server(200, body).await;

    let result = engine(&base_url, "test-key")
        .transcribe(b"audio", "audio/wav")
        .await;

    assert!(matches!(result, Err(TranscriptionError::DecodingFailed(_))));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_channel_without_alternatives_when_transcribing_then_returns_decoding_failed() {
    let body = r#"{"results": {"channels": [{"alternatives": []}]}}"#;
    let (base_url, shutdown_tx) = start_mock_deepgram_server(200, body).await;

    let result = engine(&base_url, "test-key")
        .transcribe(b"audio", "audio/wav")
        .await;

    assert!(matches!(result, Err(TranscriptionError::DecodingFailed(_))));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_non_json_success_body_when_transcribing_then_returns_decoding_failed() {
    let (base_url, shutdown_tx) = start_mock_deepgram_server(200, "<html>oops</html>").await;

    let result = engine(&base_url, "test-key")
        .transcribe(b"audio", "audio/wav")
        .await;

    assert!(matches!(result, Err(TranscriptionError::DecodingFailed(_))));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_unreachable_backend_when_transcribing_then_returns_api_request_failed() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let result = engine(&base_url, "test-key")
        .transcribe(b"audio", "audio/wav")
        .await;

    assert!(matches!(result, Err(TranscriptionError::ApiRequestFailed(_))));
}
