use textgram::run_with_config_path;
use textgram::services::sender::SendMode;
use wiremock::MockServer;
use wiremock::http::Method;

mod common;

use crate::common::{mount_error, mount_send_message, render_config};

#[tokio::test]
async fn message_mode_posts_form_encoded_chat_id_and_text() {
    let server = MockServer::start().await;
    mount_send_message(&server).await;

    let out_dir = tempfile::tempdir().unwrap();
    let cfg = render_config(
        &server.uri(),
        "/nonexistent/font.ttf", // message mode never touches the font
        out_dir.path().to_str().unwrap(),
        "#000000",
        "#FFFFFF",
    );

    run_with_config_path(
        cfg.path().to_str().unwrap(),
        "Hello from the tests",
        SendMode::Message,
    )
    .await
    .unwrap();

    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 1, "exactly one request, no retry");

    let request = &received[0];
    assert_eq!(request.method, Method::POST);
    assert_eq!(request.url.path(), "/botTEST/sendMessage");

    let content_type = request
        .headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(
        content_type.starts_with("application/x-www-form-urlencoded"),
        "unexpected content type: {content_type}"
    );

    let body = String::from_utf8_lossy(&request.body);
    assert!(body.contains("chat_id=42"), "body was: {body}");
    assert!(body.contains("text=Hello"), "body was: {body}");

    // No file side effects in message mode
    assert!(
        std::fs::read_dir(out_dir.path()).unwrap().next().is_none(),
        "message mode must not write files"
    );

    server.verify().await;
}

#[tokio::test]
async fn message_mode_surfaces_api_rejection_as_failure() {
    let server = MockServer::start().await;
    mount_error(&server, "sendMessage", 400).await;

    let out_dir = tempfile::tempdir().unwrap();
    let cfg = render_config(
        &server.uri(),
        "/nonexistent/font.ttf",
        out_dir.path().to_str().unwrap(),
        "#000000",
        "#FFFFFF",
    );

    let err = run_with_config_path(cfg.path().to_str().unwrap(), "Hello", SendMode::Message)
        .await
        .unwrap_err();
    let message = err.to_string();
    assert!(
        message.contains("chat not found"),
        "error should carry the api description, got: {message}"
    );

    // Terminal outcome: the single rejected request is all the server sees.
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
    server.verify().await;
}
