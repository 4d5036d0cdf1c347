use bridge_core::component::Component;
use bridge_core::config::BridgeConfig;
use bridge_core::error::http_request::HttpRequestError;
use bridge_core::form::FormValue;
use bridge_core::host::memory::MemoryWindow;
use bridge_core::host::{Document, HostWindow};
use bridge_core::http_request::IframeHttpRequest;

use models::HttpRequestOptions;

use serde_json::json;
use tempfile::TempDir;

/// **VALUE**: Verifies options persisted in `bridge.json` drive a real request.
///
/// **WHY THIS MATTERS**: Deployments tune the redirect window per environment. If the
/// loaded options were ignored every request would wait the default three seconds.
#[tokio::test(start_paused = true)]
async fn given_config_on_disk_when_request_sent_then_uses_persisted_timings() {
    // GIVEN: A config disabling redirect settling
    let dir = TempDir::new().unwrap();
    let mut config = BridgeConfig::default();
    config.http = HttpRequestOptions {
        timeout_ms: 3_000,
        redirect_timeout_ms: 0,
    };
    config.save(dir.path()).unwrap();
    let loaded = BridgeConfig::load(dir.path()).unwrap();

    // WHEN: A request lands on another path than requested
    let window = MemoryWindow::top_level("http://localhost/");
    let mut request = IframeHttpRequest::new(
        window.clone(),
        "/login",
        Some(FormValue::from(json!({"user": "ada", "remember": true}))),
        "POST",
        Some(loaded.http),
    )
    .unwrap();
    let response = request.send_async().unwrap();
    let iframe = window
        .document()
        .query_selector(&format!("#{}", request.iframe_id()))
        .unwrap();
    window
        .document()
        .set_frame_content(&iframe, "http://localhost/welcome", "WELCOME");
    request.handle_load();

    // THEN: Resolved at once with that page
    let response = response.await.unwrap();
    assert_eq!(response.data, "WELCOME");
}

/// **VALUE**: Verifies the full request life: submit, redirect hop, final page, cleanup.
///
/// **BUG THIS CATCHES**: Would catch a relative request url compared against the frame's
/// absolute location without resolution, making every load look like a redirect.
#[tokio::test(start_paused = true)]
async fn given_relative_url_with_redirect_when_final_page_loads_then_resolves_and_cleans_up() {
    // GIVEN: A relative url resolved against the page
    let window = MemoryWindow::top_level("http://localhost/app/");
    let mut request = IframeHttpRequest::new(window.clone(), "segment-1", None, "GET", None).unwrap();
    let response = request.send_async().unwrap();
    let document = window.document();
    let iframe = document
        .query_selector(&format!("#{}", request.iframe_id()))
        .unwrap();

    // WHEN: A hop, then the requested page
    document.set_frame_content(&iframe, "http://localhost/app/redirecting", "HOP");
    request.handle_load();
    document.set_frame_content(&iframe, "http://localhost/app/segment-1", "FINAL");
    request.handle_load();

    // THEN: The final page wins and settling removed the hidden elements
    assert_eq!(response.await.unwrap().data, "FINAL");
    assert!(!document.has_element_id(request.wrapper_id()));
    assert!(document.query_selector("form").is_none());
    request.dispose();
}

#[tokio::test(start_paused = true)]
async fn given_silent_server_when_timeout_elapses_then_rejects_with_timeout() {
    let window = MemoryWindow::top_level("http://localhost/");
    let options = HttpRequestOptions {
        timeout_ms: 3,
        redirect_timeout_ms: 3_000,
    };
    let mut request =
        IframeHttpRequest::new(window, "http://localhost/segment-1", None, "GET", Some(options))
            .unwrap();

    let response = request.send_async().unwrap().await.unwrap_err();

    assert_eq!(response.data, "");
    match response.error {
        Some(HttpRequestError::Timeout { message, .. }) => assert_eq!(message, "TIMEOUT"),
        other => panic!("Expected timeout, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn given_two_requests_when_sent_then_wrappers_do_not_collide() {
    let window = MemoryWindow::top_level("http://localhost/");
    let mut first =
        IframeHttpRequest::new(window.clone(), "http://localhost/a", None, "GET", None).unwrap();
    let _first_response = first.send_async().unwrap();
    let mut second =
        IframeHttpRequest::new(window.clone(), "http://localhost/b", None, "GET", None).unwrap();
    let _second_response = second.send_async().unwrap();

    assert_ne!(first.wrapper_id(), second.wrapper_id());
    assert_eq!(window.document().submitted_forms().len(), 2);
}
