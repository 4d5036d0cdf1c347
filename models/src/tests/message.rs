use crate::{FrameMessage, MessageState};

use serde_json::{Value, json};

/// **VALUE**: Verifies every falsy payload a page can post decodes to nothing.
///
/// **WHY THIS MATTERS**: `postMessage` is a shared channel. Unrelated scripts post
/// `undefined`, `null`, `false` and `""` all the time; each of them must be dropped
/// without advancing the handshake.
///
/// **BUG THIS CATCHES**: Would catch a decoder that maps a falsy value to an empty
/// message, which the loader would read as a handshake request and answer.
#[test]
fn given_falsy_payloads_when_decoded_then_returns_none() {
    let falsies = [Value::Null, json!(false), json!(""), json!(0), json!([])];

    for payload in falsies {
        assert_eq!(FrameMessage::decode(&payload), None, "payload {payload}");
    }
}

#[test]
fn given_empty_object_when_decoded_then_handshake_request() {
    let decoded = FrameMessage::decode(&json!({})).unwrap();

    assert_eq!(decoded, FrameMessage::handshake_request());
    assert!(!decoded.has_id());
}

/// **VALUE**: Verifies malformed fields degrade to "absent" instead of rejecting.
///
/// **BUG THIS CATCHES**: Would catch a strict serde decode that turns `{"id": 5}` into an
/// error path, or one that keeps an unknown state string around as a valid discriminant.
#[test]
fn given_malformed_fields_when_decoded_then_fields_absent() {
    let decoded = FrameMessage::decode(&json!({
        "id": 5,
        "state": "exploded",
        "data": {"nested": true}
    }))
    .unwrap();

    assert_eq!(decoded.id, "");
    assert_eq!(decoded.state, None);
    assert_eq!(decoded.data, None);
}

#[test]
fn given_status_message_when_encoded_then_omits_absent_fields() {
    let message = FrameMessage::status("abc123", MessageState::BeforeUpdate);

    assert_eq!(
        message.to_value(),
        json!({"id": "abc123", "state": "beforeUpdate"})
    );
}

#[test]
fn given_handshake_request_when_encoded_then_only_empty_id() {
    assert_eq!(FrameMessage::handshake_request().to_value(), json!({"id": ""}));
}

#[test]
fn given_encoded_proof_when_decoded_then_equal() {
    let proof = FrameMessage::proof("-1424436592");

    assert_eq!(FrameMessage::decode(&proof.to_value()), Some(proof));
}

#[test]
fn given_empty_data_when_reading_payload_then_treated_as_absent() {
    let message = FrameMessage::challenge("");

    assert_eq!(message.payload(), None);
    assert_eq!(FrameMessage::challenge("42").payload(), Some("42"));
}

/// **VALUE**: Verifies every state travels under its camelCase wire name and decodes back.
///
/// **BUG THIS CATCHES**: Would catch the serde rename being dropped, which would post
/// `"BeforeUpdate"` and leave the parent ignoring every status update.
#[test]
fn given_each_state_when_encoded_then_camel_case_and_decodes_back() {
    let cases = [
        (MessageState::Mounted, "mounted"),
        (MessageState::BeforeUpdate, "beforeUpdate"),
        (MessageState::Updated, "updated"),
        (MessageState::Destroyed, "destroyed"),
    ];

    for (state, wire) in cases {
        let message = FrameMessage::status("s-1", state);
        let value = message.to_value();

        assert_eq!(value["state"], wire);
        assert_eq!(value, serde_json::to_value(&message).unwrap());
        assert_eq!(FrameMessage::decode(&value), Some(message));
    }
    assert_eq!(MessageState::from_busy(true), MessageState::BeforeUpdate);
    assert_eq!(MessageState::from_busy(false), MessageState::Updated);
}
