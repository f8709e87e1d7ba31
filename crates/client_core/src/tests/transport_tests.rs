use super::*;

use std::time::Duration;

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use shared::error::ErrorSource;
use tokio::{net::TcpListener, sync::Mutex};

use crate::upload::{FileInput, UploadController};

#[derive(Debug, Clone)]
struct ReceivedField {
    name: Option<String>,
    file_name: Option<String>,
    content_type: Option<String>,
    bytes: Vec<u8>,
}

#[derive(Clone)]
enum Reply {
    Json(StatusCode, serde_json::Value),
    Text(StatusCode, &'static str),
    Slow(Duration),
}

#[derive(Clone)]
struct ServerState {
    reply: Reply,
    received: Arc<Mutex<Vec<Vec<ReceivedField>>>>,
}

async fn handle_analyze(State(state): State<ServerState>, mut multipart: Multipart) -> impl IntoResponse {
    let mut fields = Vec::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().map(str::to_string);
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map(|b| b.to_vec()).unwrap_or_default();
        fields.push(ReceivedField {
            name,
            file_name,
            content_type,
            bytes,
        });
    }
    state.received.lock().await.push(fields);

    match state.reply {
        Reply::Json(status, body) => (status, Json(body)).into_response(),
        Reply::Text(status, body) => (status, body).into_response(),
        Reply::Slow(delay) => {
            tokio::time::sleep(delay).await;
            (StatusCode::OK, "late").into_response()
        }
    }
}

async fn handle_health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn spawn_analysis_server(reply: Reply) -> (String, Arc<Mutex<Vec<Vec<ReceivedField>>>>) {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let received = Arc::new(Mutex::new(Vec::new()));
    let state = ServerState {
        reply,
        received: received.clone(),
    };
    let app = Router::new()
        .route("/analyze/", post(handle_analyze))
        .route("/health", get(handle_health))
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}"), received)
}

fn transport_for(api_url: String) -> HttpAnalysisTransport {
    HttpAnalysisTransport::new(&ClientSettings {
        api_url,
        request_timeout_secs: 1,
        connect_timeout_secs: 1,
        ..ClientSettings::default()
    })
    .expect("transport")
}

fn sample_request() -> AnalysisRequest {
    let mut controller = UploadController::default();
    controller.select_file(Some(FileInput::new("plug.png", b"png-bytes".to_vec())));
    AnalysisRequest::from_selected(controller.current_file().expect("selected"))
}

#[tokio::test]
async fn posts_single_multipart_file_field() {
    let (api_url, received) = spawn_analysis_server(Reply::Json(
        StatusCode::OK,
        serde_json::json!({ "overall_assessment": "PASS", "analysis": "# Title\n- item" }),
    ))
    .await;
    let transport = transport_for(api_url);

    let result = transport.analyze(sample_request()).await.expect("analysis");
    assert_eq!(result.overall_assessment(), "PASS");
    assert_eq!(result.analysis_text(), "# Title\n- item");

    let received = received.lock().await;
    assert_eq!(received.len(), 1);
    let fields = &received[0];
    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0].name.as_deref(), Some("file"));
    assert_eq!(fields[0].file_name.as_deref(), Some("plug.png"));
    assert_eq!(fields[0].content_type.as_deref(), Some("image/png"));
    assert_eq!(fields[0].bytes, b"png-bytes");
}

#[tokio::test]
async fn service_detail_becomes_error_message() {
    let (api_url, _received) = spawn_analysis_server(Reply::Json(
        StatusCode::PAYLOAD_TOO_LARGE,
        serde_json::json!({ "detail": "file too large" }),
    ))
    .await;

    let err = transport_for(api_url)
        .analyze(sample_request())
        .await
        .expect_err("must fail");
    assert_eq!(err.kind, ErrorSource::Service);
    assert_eq!(err.message, "file too large");
}

#[tokio::test]
async fn service_failure_without_detail_uses_status_fallback() {
    let (api_url, _received) =
        spawn_analysis_server(Reply::Text(StatusCode::INTERNAL_SERVER_ERROR, "boom")).await;

    let err = transport_for(api_url)
        .analyze(sample_request())
        .await
        .expect_err("must fail");
    assert_eq!(err.kind, ErrorSource::Service);
    assert_eq!(err.message, "Request failed with status code 500");
}

#[tokio::test]
async fn malformed_success_body_is_transport_error() {
    let (api_url, _received) =
        spawn_analysis_server(Reply::Json(StatusCode::OK, serde_json::json!({ "analysis": 3 })))
            .await;

    let err = transport_for(api_url)
        .analyze(sample_request())
        .await
        .expect_err("must fail");
    assert_eq!(err.kind, ErrorSource::Transport);
    assert_eq!(err.message, MALFORMED_RESPONSE_MESSAGE);
}

#[tokio::test]
async fn unreachable_service_yields_generic_transport_error() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let err = transport_for(format!("http://{addr}"))
        .analyze(sample_request())
        .await
        .expect_err("must fail");
    assert_eq!(err.kind, ErrorSource::Transport);
    assert_eq!(err.message, GENERIC_FAILURE_MESSAGE);
}

#[tokio::test]
async fn slow_service_times_out() {
    let (api_url, _received) = spawn_analysis_server(Reply::Slow(Duration::from_secs(3))).await;

    let err = transport_for(api_url)
        .analyze(sample_request())
        .await
        .expect_err("must time out");
    assert_eq!(err.kind, ErrorSource::Transport);
    assert_eq!(err.message, TIMEOUT_MESSAGE);
}

#[tokio::test]
async fn health_probe_reports_status() {
    let (api_url, _received) =
        spawn_analysis_server(Reply::Text(StatusCode::OK, "unused")).await;

    let status = transport_for(api_url).check_health().await.expect("health");
    assert_eq!(status, "ok");
}

#[test]
fn service_failure_ignores_non_string_detail() {
    let err = service_failure(422, br#"{"detail":[{"msg":"field required"}]}"#);
    assert_eq!(err.kind, ErrorSource::Service);
    assert_eq!(err.message, "Request failed with status code 422");
}

#[test]
fn service_failure_passes_detail_through_verbatim() {
    let err = service_failure(413, br#"{"detail":" File exceeds 10 MB. "}"#);
    assert_eq!(err.kind, ErrorSource::Service);
    assert_eq!(err.message, " File exceeds 10 MB. ");
}

#[test]
fn service_failure_treats_blank_detail_as_missing() {
    let err = service_failure(500, br#"{"detail":"   "}"#);
    assert_eq!(err.message, "Request failed with status code 500");
}

#[test]
fn decode_success_preserves_unknown_assessment() {
    let result = decode_success(br#"{"overall_assessment":"UNSURE","analysis":"text"}"#)
        .expect("decode");
    assert_eq!(result.overall_assessment(), "UNSURE");
    assert!(!result.assessment().is_pass());
}

#[test]
fn endpoint_is_relative_to_base_path() {
    let transport = HttpAnalysisTransport::new(&ClientSettings {
        api_url: "http://example.com/inspect".into(),
        ..ClientSettings::default()
    })
    .expect("transport");
    assert_eq!(
        transport.endpoint(ANALYZE_PATH).expect("url").as_str(),
        "http://example.com/inspect/analyze/"
    );
}
