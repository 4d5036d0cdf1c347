use crate::handshake_tests::helpers::{CONTENT_URL, PARENT_ORIGIN, Pair};

use bridge_core::component::Component;
use bridge_core::host::{HostWindow, MessageEvent};

use models::{FrameMessage, LoaderEventType, MessageState};

/// **VALUE**: Verifies a real loader and content agree on one session id.
///
/// **WHY THIS MATTERS**: This is the whole point of the handshake. Unit tests drive each
/// side with hand-made messages; only pairing them proves the two halves fit.
///
/// **BUG THIS CATCHES**: Would catch the two sides disagreeing on the secret encoding,
/// the loader posting to the wrong origin, or the content adopting an empty id.
#[test]
fn given_loader_and_content_when_pumped_then_both_share_session_id() {
    // GIVEN: A parent page embedding the content
    let mut pair = Pair::new();

    // WHEN: The iframe loads and messages flow
    pair.loader.handle_load();
    pair.pump();

    // THEN: Same id on both sides and the loader is mounted
    let loader_id = pair.loader.session_id().map(str::to_string);
    assert!(loader_id.is_some());
    assert_eq!(pair.content.session_id().map(str::to_string), loader_id);
    assert!(pair.loader.is_mounted());
    assert_eq!(
        pair.events(),
        vec![
            LoaderEventType::BeforeCreate,
            LoaderEventType::Created,
            LoaderEventType::BeforeMount,
            LoaderEventType::Mounted,
            LoaderEventType::BeforeUpdate,
        ]
    );
}

/// **VALUE**: Verifies status changes made before the handshake arrive in order.
///
/// **WHY THIS MATTERS**: Content usually reports busy/idle while it is still booting,
/// before any id exists. The parent must see the same sequence once the session forms.
#[test]
fn given_busy_states_before_handshake_when_pumped_then_loader_sees_same_order() {
    // GIVEN: A pair where the content reports a sequence before any delivery
    let mut pair = Pair::new();
    let sequence = [false, true, true, false, true, false];
    for busy in sequence {
        pair.content.signal_busy_state(busy);
    }
    pair.clear_events();

    // WHEN: The handshake completes
    pair.pump();

    // THEN: Mounted, the constructor's busy state, then the sequence in order
    let mut expected = vec![LoaderEventType::Mounted, LoaderEventType::BeforeUpdate];
    expected.extend(sequence.iter().map(|busy| {
        if *busy {
            LoaderEventType::BeforeUpdate
        } else {
            LoaderEventType::Updated
        }
    }));
    assert_eq!(pair.events(), expected);
}

#[test]
fn given_established_session_when_busy_signalled_then_loader_updates() {
    let mut pair = Pair::new();
    pair.pump();
    pair.clear_events();

    pair.content.signal_busy_state(true);
    pair.content.signal_busy_state(false);
    pair.pump();

    assert_eq!(
        pair.events(),
        vec![LoaderEventType::BeforeUpdate, LoaderEventType::Updated]
    );
}

/// **VALUE**: Verifies disposing the content tears the loader down too.
///
/// **BUG THIS CATCHES**: Would catch the content posting `destroyed` with an empty id,
/// which the loader discards, leaving the iframe attached forever.
#[test]
fn given_established_session_when_content_disposed_then_loader_disposed() {
    // GIVEN: An established session
    let mut pair = Pair::new();
    pair.pump();
    let root = *pair.loader.root_element().unwrap();
    pair.clear_events();

    // WHEN: The content shuts down
    pair.content.dispose();
    pair.pump();

    // THEN: The loader went through its teardown and removed the iframe
    assert_eq!(
        pair.events(),
        vec![
            LoaderEventType::BeforeUpdate,
            LoaderEventType::BeforeDestroy,
            LoaderEventType::Destroyed,
        ]
    );
    assert!(pair.loader.is_disposed());
    assert!(!pair.parent.document().is_attached(&root));
    assert_eq!(pair.parent.message_listener_count(), 0);
    assert_eq!(pair.child.message_listener_count(), 0);
}

#[test]
fn given_loader_disposed_when_content_reports_then_nothing_delivered() {
    let mut pair = Pair::new();
    pair.pump();
    pair.loader.dispose();
    pair.clear_events();

    pair.content.signal_busy_state(true);
    pair.pump();

    assert!(pair.events().is_empty());
}

/// **VALUE**: Verifies a same-origin script cannot obtain the session id.
///
/// **WHY THIS MATTERS**: Another script on the content origin sees every broadcast. If
/// it could trigger a confirmation without the secret it could spoof status updates.
///
/// **BUG THIS CATCHES**: Would catch a loader that replies to any empty-id message with
/// the id, as an early protocol revision did.
#[test]
fn given_interloper_without_secret_when_handshaking_then_never_confirmed() {
    // GIVEN: A loader whose content never ran
    let mut pair = Pair::new();
    pair.child.take_parent_posts();
    let content_origin = pair.child.origin();
    let session_id = pair.loader.session_id().unwrap().to_string();

    // WHEN: An interloper bootstraps and answers with guesses
    for message in [
        FrameMessage::handshake_request(),
        FrameMessage::proof("0"),
        FrameMessage::proof("not-the-hash"),
    ] {
        pair.loader
            .handle_message(&MessageEvent::new(content_origin.clone(), message.to_value()));
    }

    // THEN: Only challenges went out
    let posts = pair.parent.document().take_frame_posts();
    assert_eq!(posts.len(), 3);
    assert!(
        posts
            .iter()
            .all(|post| post.message.get("id") == Some(&serde_json::json!("")))
    );
    assert!(
        posts
            .iter()
            .all(|post| !post.message.to_string().contains(&session_id))
    );
    assert!(!pair.loader.is_mounted());
}

#[test]
fn given_content_from_unexpected_origin_when_pumped_then_loader_ignores_it() {
    let mut pair = Pair::new();
    pair.child.take_parent_posts();

    pair.loader.handle_message(&MessageEvent::new(
        PARENT_ORIGIN,
        FrameMessage::handshake_request().to_value(),
    ));
    pair.loader.handle_message(&MessageEvent::new(
        "http://localhost:82.evil.test",
        FrameMessage::status("whatever", MessageState::Destroyed).to_value(),
    ));

    assert!(pair.parent.document().take_frame_posts().is_empty());
    assert!(!pair.loader.is_disposed());
}

#[test]
fn given_disposal_twice_on_both_sides_then_single_teardown_each() {
    let mut pair = Pair::new();
    pair.pump();
    pair.clear_events();

    pair.loader.dispose();
    pair.loader.dispose();
    pair.content.dispose();
    pair.content.dispose();
    let delivered = pair.pump();

    assert_eq!(
        pair.events(),
        vec![LoaderEventType::BeforeDestroy, LoaderEventType::Destroyed]
    );
    // busy then destroyed from the content, both ignored by the disposed loader
    assert_eq!(delivered, 2);
    assert_eq!(pair.loader.url(), CONTENT_URL);
}
