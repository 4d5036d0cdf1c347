use crate::HTTP_WRAPPER_ID_PREFIX;
use crate::component::Component;
use crate::error::http_request::{HttpRequestError, TIMEOUT_MESSAGE};
use crate::form::FormValue;
use crate::host::memory::{MemoryWindow, NodeId};
use crate::host::{Document, HostWindow};
use crate::http_request::{HttpOutcome, IframeHttpRequest};

use models::{HttpMethod, HttpRequestOptions, HttpRequestOptionsBuilder};

use serde_json::json;

const REQUEST_URL: &str = "http://localhost/segment-1";

fn options(timeout_ms: u64, redirect_timeout_ms: i64) -> HttpRequestOptions {
    HttpRequestOptionsBuilder::default()
        .with_timeout_ms(timeout_ms)
        .with_redirect_timeout_ms(redirect_timeout_ms)
        .build()
        .unwrap()
}

fn request(window: &MemoryWindow, options: HttpRequestOptions) -> IframeHttpRequest<MemoryWindow> {
    IframeHttpRequest::new(window.clone(), REQUEST_URL, None, "GET", Some(options)).unwrap()
}

fn iframe_of(window: &MemoryWindow, request: &IframeHttpRequest<MemoryWindow>) -> NodeId {
    window
        .document()
        .query_selector(&format!("#{}", request.iframe_id()))
        .unwrap()
}

fn error_of(outcome: HttpOutcome) -> HttpRequestError {
    let response = outcome.unwrap_err();
    assert_eq!(response.data, "");
    response.error.unwrap()
}

#[test]
fn given_missing_url_when_constructed_then_error() {
    let window = MemoryWindow::top_level("http://localhost/");

    let result = IframeHttpRequest::new(window, "", None, "GET", None);

    match result {
        Err(HttpRequestError::MissingUrl { message, .. }) => {
            assert_eq!(message, "Missing \"url\" reference.");
        }
        Err(other) => panic!("Expected missing url, got {other}"),
        Ok(_) => panic!("Expected missing url"),
    }
}

/// **VALUE**: Verifies only GET and POST are accepted, case-insensitively.
///
/// **WHY THIS MATTERS**: Forms can only submit GET or POST. Any other method silently
/// degrades to GET in browsers, sending the request somewhere the caller did not intend.
#[test]
fn given_methods_when_constructed_then_only_get_and_post_accepted() {
    // GIVEN: A window
    let window = MemoryWindow::top_level("http://localhost/");

    // WHEN/THEN: post is accepted in any case
    let post = IframeHttpRequest::new(window.clone(), REQUEST_URL, None, "post", None).unwrap();
    assert_eq!(post.method(), HttpMethod::Post);

    // WHEN/THEN: PUT is rejected with the method named
    match IframeHttpRequest::new(window, REQUEST_URL, None, "PUT", None) {
        Err(HttpRequestError::UnsupportedMethod { message, .. }) => {
            assert_eq!(message, "Method not supported \"PUT\"");
        }
        Err(other) => panic!("Expected unsupported method, got {other}"),
        Ok(_) => panic!("Expected unsupported method"),
    }
}

#[test]
fn given_no_options_when_constructed_then_defaults_used() {
    let window = MemoryWindow::top_level("http://localhost/");

    let request = IframeHttpRequest::new(window, REQUEST_URL, None, "GET", None).unwrap();

    assert_eq!(*request.options(), HttpRequestOptions::default());
    assert!(request.wrapper_id().starts_with(HTTP_WRAPPER_ID_PREFIX));
    assert_eq!(request.iframe_id(), format!("{}_iframe", request.wrapper_id()));
}

/// **VALUE**: Verifies the hidden form and iframe are wired to each other.
///
/// **BUG THIS CATCHES**: Would catch a form `target` that differs from the iframe `name`,
/// which makes the browser open the response in a new window instead.
#[tokio::test(start_paused = true)]
async fn given_post_with_data_when_sent_then_hidden_form_targets_hidden_iframe() {
    // GIVEN: A POST request with data
    let window = MemoryWindow::top_level("http://localhost/");
    let data = FormValue::from(json!({"user": {"name": "ada"}}));
    let mut request =
        IframeHttpRequest::new(window.clone(), REQUEST_URL, Some(data), "POST", None).unwrap();

    // WHEN: Sending
    let _response = request.send_async().unwrap();

    // THEN: A hidden wrapper holds the form and the iframe
    let document = window.document();
    let wrapper = document
        .query_selector(&format!("#{}", request.wrapper_id()))
        .unwrap();
    assert_eq!(document.attribute(&wrapper, "style").as_deref(), Some("display:none"));

    let iframe = iframe_of(&window, &request);
    let iframe_id = request.iframe_id();
    assert_eq!(document.attribute(&iframe, "name").as_deref(), Some(iframe_id.as_str()));
    assert_eq!(document.attribute(&iframe, "src").as_deref(), Some("about:blank"));
    assert_eq!(document.attribute(&iframe, "width").as_deref(), Some("0"));

    let form = document.query_selector("form").unwrap();
    assert_eq!(document.attribute(&form, "target").as_deref(), Some(iframe_id.as_str()));
    assert_eq!(document.attribute(&form, "action").as_deref(), Some(REQUEST_URL));
    assert_eq!(document.attribute(&form, "method").as_deref(), Some("POST"));
    let input = document.query_selector("input").unwrap();
    assert_eq!(document.attribute(&input, "name").as_deref(), Some("user[name]"));
    assert_eq!(document.submitted_forms(), vec![form]);
}

#[tokio::test(start_paused = true)]
async fn given_load_at_requested_path_when_handled_then_resolves_with_body() {
    let window = MemoryWindow::top_level("http://localhost/");
    let mut request = request(&window, options(3000, 0));
    let response = request.send_async().unwrap();
    let iframe = iframe_of(&window, &request);

    window
        .document()
        .set_frame_content(&iframe, "http://localhost/segment-1", "TEST_RESULT");
    request.handle_load();

    let response = response.await.unwrap();
    assert_eq!(response.data, "TEST_RESULT");
    assert!(response.error.is_none());
}

/// **VALUE**: Verifies the hidden form and iframe leave the page as soon as the response
/// settles, without waiting for disposal.
///
/// **WHY THIS MATTERS**: Callers often keep the request object around after reading the
/// response. Each one would otherwise leave a hidden iframe in the page.
///
/// **BUG THIS CATCHES**: Would catch cleanup that only runs in `dispose`, or a late `load`
/// reading a frame that was already removed.
#[tokio::test(start_paused = true)]
async fn given_settled_response_when_request_kept_then_hidden_elements_removed() {
    // GIVEN: A sent request with its hidden iframe in the page
    let window = MemoryWindow::top_level("http://localhost/");
    let mut request = request(&window, options(3000, 0));
    let response = request.send_async().unwrap();
    let iframe = iframe_of(&window, &request);
    let document = window.document();
    assert_eq!(document.elements_by_tag("iframe"), vec![iframe]);

    // WHEN: The response settles
    document.set_frame_content(&iframe, REQUEST_URL, "DONE");
    request.handle_load();
    assert_eq!(response.await.unwrap().data, "DONE");

    // THEN: Wrapper, form, iframe and listener are gone while the request lives on
    assert!(!request.is_disposed());
    assert!(document.elements_by_tag("iframe").is_empty());
    assert!(document.elements_by_tag("form").is_empty());
    assert!(!document.has_element_id(request.wrapper_id()));
    assert_eq!(document.load_listener_count(), 0);

    // AND: A late load and a later disposal are harmless
    request.handle_load();
    request.dispose();
    assert!(request.is_disposed());
}

#[tokio::test(start_paused = true)]
async fn given_path_case_differs_when_loaded_then_treated_as_same_path() {
    let window = MemoryWindow::top_level("http://localhost/");
    let mut request = request(&window, options(3000, 3000));
    let response = request.send_async().unwrap();
    let iframe = iframe_of(&window, &request);

    window
        .document()
        .set_frame_content(&iframe, "http://LOCALHOST/Segment-1?x=1", "TEST_RESULT");
    request.handle_load();

    assert_eq!(response.await.unwrap().data, "TEST_RESULT");
}

/// **VALUE**: Verifies the latest load within the redirect window wins.
///
/// **WHY THIS MATTERS**: Login flows bounce through intermediate pages. Resolving with the
/// first hop would hand the caller an interstitial instead of the final response.
#[tokio::test(start_paused = true)]
async fn given_redirect_then_final_load_when_handled_then_resolves_with_last_result() {
    // GIVEN: Redirect settling enabled
    let window = MemoryWindow::top_level("http://localhost/");
    let mut request = request(&window, options(3000, 3));
    let response = request.send_async().unwrap();
    let iframe = iframe_of(&window, &request);
    let document = window.document();

    // WHEN: An intermediate page loads, then the requested one
    document.set_frame_content(&iframe, "http://localhost/segment-2", "TEST_RESULT_1");
    request.handle_load();
    document.set_frame_content(&iframe, "http://localhost/segment-1", "TEST_RESULT_2");
    request.handle_load();

    // THEN: The final page is the response
    assert_eq!(response.await.unwrap().data, "TEST_RESULT_2");
}

#[tokio::test(start_paused = true)]
async fn given_redirect_without_followup_when_window_elapses_then_resolves_with_hop() {
    let window = MemoryWindow::top_level("http://localhost/");
    let mut request = request(&window, options(3000, 3));
    let response = request.send_async().unwrap();
    let iframe = iframe_of(&window, &request);

    window
        .document()
        .set_frame_content(&iframe, "http://localhost/elsewhere", "MOVED");
    request.handle_load();

    assert_eq!(response.await.unwrap().data, "MOVED");
}

#[tokio::test(start_paused = true)]
async fn given_redirect_and_settling_disabled_when_loaded_then_resolves_immediately() {
    let window = MemoryWindow::top_level("http://localhost/");
    let mut request = request(&window, options(3000, 0));
    let response = request.send_async().unwrap();
    let iframe = iframe_of(&window, &request);
    let document = window.document();

    document.set_frame_content(&iframe, "http://localhost/segment-2", "FIRST");
    request.handle_load();
    document.set_frame_content(&iframe, "http://localhost/segment-1", "SECOND");
    request.handle_load();

    assert_eq!(response.await.unwrap().data, "FIRST");
}

/// **VALUE**: Verifies a blocked frame rejects with the access error when settling is off.
///
/// **BUG THIS CATCHES**: Would catch an access failure resolved as an empty success,
/// which callers cannot tell apart from an empty response body.
#[tokio::test(start_paused = true)]
async fn given_cross_origin_frame_without_settling_when_loaded_then_rejects_with_access() {
    // GIVEN: Settling disabled and a frame that cannot be read
    let window = MemoryWindow::top_level("http://localhost/");
    let mut request = request(&window, options(3000, 0));
    let response = request.send_async().unwrap();
    let iframe = iframe_of(&window, &request);
    window.document().block_frame(&iframe, "Blocked a frame");

    // WHEN: It loads
    request.handle_load();

    // THEN: Access error
    match error_of(response.await) {
        HttpRequestError::Access { message, .. } => assert_eq!(message, "Blocked a frame"),
        other => panic!("Expected access error, got {other}"),
    }
}

#[tokio::test(start_paused = true)]
async fn given_repeated_access_errors_within_window_then_rejects_with_last() {
    let window = MemoryWindow::top_level("http://localhost/");
    let mut request = request(&window, options(3000, 3));
    let response = request.send_async().unwrap();
    let iframe = iframe_of(&window, &request);
    let document = window.document();

    document.block_frame(&iframe, "first block");
    request.handle_load();
    document.block_frame(&iframe, "second block");
    request.handle_load();

    assert_eq!(error_of(response.await).message(), "second block");
}

#[tokio::test(start_paused = true)]
async fn given_no_load_when_timeout_elapses_then_rejects_with_timeout() {
    let window = MemoryWindow::top_level("http://localhost/");
    let mut request = request(&window, options(3, 3000));
    let response = request.send_async().unwrap();

    let error = error_of(response.await);

    assert!(matches!(error, HttpRequestError::Timeout { .. }));
    assert_eq!(error.message(), TIMEOUT_MESSAGE);
    assert!(!request.is_disposed());
    assert!(window.document().elements_by_tag("iframe").is_empty());
}

#[tokio::test(start_paused = true)]
async fn given_submit_failure_when_sent_then_rejects_with_submit_error() {
    let window = MemoryWindow::top_level("http://localhost/");
    window.document().fail_submit("navigation blocked");
    let mut request = request(&window, options(3000, 0));

    let response = request.send_async().unwrap();

    match error_of(response.await) {
        HttpRequestError::Submit { message, .. } => assert_eq!(message, "navigation blocked"),
        other => panic!("Expected submit error, got {other}"),
    }
    assert!(!window.document().has_element_id(request.wrapper_id()));
}

/// **VALUE**: Verifies a second `send_async()` is refused synchronously.
///
/// **BUG THIS CATCHES**: Would catch a second submission building another hidden form
/// and firing the request twice.
#[tokio::test(start_paused = true)]
async fn given_sent_request_when_sent_again_then_already_sent_error() {
    // GIVEN: A request already sent
    let window = MemoryWindow::top_level("http://localhost/");
    let mut request = request(&window, options(3000, 0));
    let _response = request.send_async().unwrap();

    // WHEN: Sending again
    let second = request.send_async();

    // THEN: Refused with the exact message, and only one form was submitted
    match second {
        Err(HttpRequestError::AlreadySent { message, .. }) => {
            assert_eq!(message, "The \"send\" method was already called!");
        }
        Err(other) => panic!("Expected already sent, got {other}"),
        Ok(_) => panic!("Expected already sent"),
    }
    assert_eq!(window.document().submitted_forms().len(), 1);
}

/// **VALUE**: Verifies disposal settles a pending response and cleans the document.
///
/// **WHY THIS MATTERS**: A response that never settles leaks whatever awaits it. The
/// hidden wrapper must not pile up in the page either.
#[tokio::test(start_paused = true)]
async fn given_pending_request_when_disposed_then_rejects_and_removes_wrapper() {
    // GIVEN: A request waiting for its load
    let window = MemoryWindow::top_level("http://localhost/");
    let mut request = request(&window, options(3000, 0));
    let response = request.send_async().unwrap();
    let iframe = iframe_of(&window, &request);

    // WHEN: Disposed twice before any load
    request.dispose();
    request.dispose();
    request.handle_load();

    // THEN: Disposed error, wrapper gone, listener gone
    assert!(matches!(error_of(response.await), HttpRequestError::Disposed { .. }));
    let document = window.document();
    assert!(!document.is_attached(&iframe));
    assert!(!document.has_element_id(request.wrapper_id()));
    assert_eq!(document.load_listener_count(), 0);
}

#[test]
fn given_unsent_request_when_disposed_then_send_refused() {
    let window = MemoryWindow::top_level("http://localhost/");
    let mut request = request(&window, options(3000, 0));

    request.dispose();

    assert!(matches!(
        request.send_async(),
        Err(HttpRequestError::Disposed { .. })
    ));
    assert!(window.document().submitted_forms().is_empty());
}
