use crate::component::Component;
use crate::content::{IframeContent, PARENT_ORIGIN_REQUIRED_MESSAGE};
use crate::error::content::ContentError;
use crate::host::memory::MemoryWindow;
use crate::host::MessageEvent;

use models::FrameMessage;

use serde_json::{Value, json};

const PARENT_ORIGIN: &str = "http://localhost:81";

fn embedded() -> MemoryWindow {
    MemoryWindow::embedded("http://localhost:82/content.html")
}

fn from_parent(message: &FrameMessage) -> MessageEvent {
    MessageEvent::new(PARENT_ORIGIN, message.to_value())
}

fn parent_posts(window: &MemoryWindow) -> Vec<Value> {
    window
        .take_parent_posts()
        .into_iter()
        .map(|post| {
            assert_eq!(post.target_origin, PARENT_ORIGIN);
            post.message
        })
        .collect()
}

#[test]
fn given_empty_parent_origin_when_constructed_then_error() {
    let result = IframeContent::new(embedded(), "");

    match result {
        Err(ContentError::ParentOrigin { message, .. }) => {
            assert_eq!(message, PARENT_ORIGIN_REQUIRED_MESSAGE);
        }
        Ok(_) => panic!("Expected parent origin error"),
    }
}

/// **VALUE**: Verifies the successful handshake end to end from the content side.
///
/// **WHY THIS MATTERS**: This is the exact exchange a real parent drives. Each reply
/// must carry the value the parent checks next or the session never forms.
///
/// **BUG THIS CATCHES**: Would catch the bootstrap being queued instead of posted, the proof
/// not echoing the hash, or queued busy states leaking out before the id is known.
#[test]
fn given_embedded_content_when_handshake_runs_then_adopts_id_and_flushes_queue() {
    // GIVEN: Content embedded under http://localhost:81
    let window = embedded();
    let mut content = IframeContent::new(window.clone(), PARENT_ORIGIN).unwrap();
    assert_eq!(content.parent_origin(), PARENT_ORIGIN);

    // THEN: Only the bootstrap went out
    assert_eq!(parent_posts(&window), vec![json!({"id": ""})]);

    // WHEN: Busy states are signalled before the handshake
    content.signal_busy_state(false);
    content.signal_busy_state(true);
    assert!(parent_posts(&window).is_empty());

    // WHEN: The parent challenges
    let secret = common::handshake_secret("abc123");
    content.handle_message(&from_parent(&FrameMessage::challenge(secret.clone())));

    // THEN: The proof echoes the hash
    assert_eq!(
        parent_posts(&window),
        vec![json!({"id": "", "state": "beforeUpdate", "data": secret})]
    );

    // WHEN: The parent confirms
    content.handle_message(&from_parent(&FrameMessage::confirmation("abc123")));

    // THEN: Id adopted, echo then queue in order (constructor busy state first)
    assert_eq!(content.session_id(), Some("abc123"));
    assert_eq!(
        parent_posts(&window),
        vec![
            json!({"id": "abc123", "state": "mounted"}),
            json!({"id": "abc123", "state": "beforeUpdate"}),
            json!({"id": "abc123", "state": "updated"}),
            json!({"id": "abc123", "state": "beforeUpdate"}),
        ]
    );
}

#[test]
fn given_established_session_when_busy_signalled_then_posted_immediately() {
    let window = embedded();
    let mut content = IframeContent::new(window.clone(), PARENT_ORIGIN).unwrap();
    content.handle_message(&from_parent(&FrameMessage::confirmation("abc123")));
    parent_posts(&window);

    content.signal_busy_state(false);

    assert_eq!(
        parent_posts(&window),
        vec![json!({"id": "abc123", "state": "updated"})]
    );
}

#[test]
fn given_wrong_origin_when_message_handled_then_ignored() {
    let window = embedded();
    let mut content = IframeContent::new(window.clone(), PARENT_ORIGIN).unwrap();
    parent_posts(&window);

    content.handle_message(&MessageEvent::new(
        "http://localhost:9999",
        FrameMessage::confirmation("abc123").to_value(),
    ));

    assert_eq!(content.session_id(), None);
    assert!(parent_posts(&window).is_empty());
}

/// **VALUE**: Verifies falsy payloads never advance the handshake.
///
/// **BUG THIS CATCHES**: Would catch `""` or `false` being read as an empty-id message and
/// answered, which posts a bogus proof to the parent.
#[test]
fn given_falsy_payloads_when_handled_then_no_state_change() {
    // GIVEN: Content waiting for a challenge
    let window = embedded();
    let mut content = IframeContent::new(window.clone(), PARENT_ORIGIN).unwrap();
    parent_posts(&window);

    // WHEN: Falsy payloads arrive from the right origin
    for payload in [Value::Null, json!(false), json!(""), json!(0)] {
        content.handle_message(&MessageEvent::new(PARENT_ORIGIN, payload));
    }

    // THEN: Nothing changed
    assert_eq!(content.session_id(), None);
    assert!(parent_posts(&window).is_empty());
}

#[test]
fn given_top_level_window_when_constructed_then_standalone_and_silent() {
    let window = MemoryWindow::top_level("http://localhost:82/content.html");

    let mut content = IframeContent::new(window.clone(), PARENT_ORIGIN).unwrap();
    content.signal_busy_state(true);
    content.handle_message(&from_parent(&FrameMessage::confirmation("abc123")));
    content.dispose();

    assert!(content.is_standalone());
    assert_eq!(content.session_id(), None);
    assert!(parent_posts(&window).is_empty());
    assert_eq!(window.message_listener_count(), 0);
}

/// **VALUE**: Verifies disposal after the handshake posts busy then destroyed, exactly once.
///
/// **WHY THIS MATTERS**: The parent removes the iframe on `destroyed`. A duplicate would be
/// harmless there, but a missing one leaves a dead iframe on the page.
#[test]
fn given_established_session_when_disposed_twice_then_single_teardown() {
    // GIVEN: An established session
    let window = embedded();
    let mut content = IframeContent::new(window.clone(), PARENT_ORIGIN).unwrap();
    content.handle_message(&from_parent(&FrameMessage::confirmation("abc123")));
    parent_posts(&window);

    // WHEN: Disposing twice
    content.dispose();
    content.dispose();

    // THEN: Busy, then destroyed, then nothing
    assert_eq!(
        parent_posts(&window),
        vec![
            json!({"id": "abc123", "state": "beforeUpdate"}),
            json!({"id": "abc123", "state": "destroyed"}),
        ]
    );
    assert_eq!(window.message_listener_count(), 0);
    assert!(content.is_disposed());
    assert!(content.owning_context().is_none());
}

#[test]
fn given_no_session_when_disposed_then_nothing_posted() {
    let window = embedded();
    let mut content = IframeContent::new(window.clone(), PARENT_ORIGIN).unwrap();
    content.signal_busy_state(false);
    parent_posts(&window);

    content.dispose();
    content.handle_message(&from_parent(&FrameMessage::confirmation("abc123")));

    assert!(parent_posts(&window).is_empty());
    assert_eq!(content.session_id(), None);
}
