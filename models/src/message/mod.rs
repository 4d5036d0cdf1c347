//! The message both frames exchange through `postMessage`.
//!
//! Inbound payloads are untrusted: any script on the same origin can post
//! anything. [`FrameMessage::decode`] accepts only a JSON object and reads
//! each field leniently, so a malformed field degrades to "absent" instead
//! of failing the whole message.

use serde::{Deserialize, Serialize};
use serde_json::Value;

const ID_FIELD: &str = "id";
const STATE_FIELD: &str = "state";
const DATA_FIELD: &str = "data";

/// Status discriminant carried by a [`FrameMessage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MessageState {
    Mounted,
    BeforeUpdate,
    Updated,
    Destroyed,
}

impl MessageState {
    /// The state a busy flag maps to: busy is `BeforeUpdate`, idle is `Updated`.
    pub fn from_busy(busy: bool) -> Self {
        if busy {
            MessageState::BeforeUpdate
        } else {
            MessageState::Updated
        }
    }
}

/// One protocol message.
///
/// `id` is empty until the handshake completes. `data` is only used by the
/// handshake to carry the hash challenge and its echo.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FrameMessage {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<MessageState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

impl FrameMessage {
    /// An empty-id message with no state and no data: "send me a challenge".
    pub fn handshake_request() -> Self {
        Self::default()
    }

    /// Parent challenge carrying the hash of the session id.
    pub fn challenge(secret: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            state: None,
            data: Some(secret.into()),
        }
    }

    /// Child proof of receipt: echoes the challenge while still id-less.
    pub fn proof(secret: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            state: Some(MessageState::BeforeUpdate),
            data: Some(secret.into()),
        }
    }

    /// Parent confirmation handing over the session id.
    pub fn confirmation(session_id: impl Into<String>) -> Self {
        Self {
            id: session_id.into(),
            state: None,
            data: None,
        }
    }

    /// A status notification. `id` may be empty if the session is not established yet.
    pub fn status(id: impl Into<String>, state: MessageState) -> Self {
        Self {
            id: id.into(),
            state: Some(state),
            data: None,
        }
    }

    pub fn has_id(&self) -> bool {
        !self.id.is_empty()
    }

    /// The handshake payload, treating an empty string as absent.
    pub fn payload(&self) -> Option<&str> {
        self.data.as_deref().filter(|data| !data.is_empty())
    }

    /// Decode an untrusted payload.
    ///
    /// Returns `None` for anything that is not a JSON object, which covers
    /// `null`, `false`, `""` and every other falsy value a page can post.
    pub fn decode(payload: &Value) -> Option<Self> {
        let object = payload.as_object()?;

        let id = object
            .get(ID_FIELD)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let state = object
            .get(STATE_FIELD)
            .and_then(|state| serde_json::from_value::<MessageState>(state.clone()).ok());
        let data = object
            .get(DATA_FIELD)
            .and_then(Value::as_str)
            .map(str::to_string);

        Some(Self { id, state, data })
    }

    /// Encode for `postMessage`. Absent fields are omitted.
    pub fn to_value(&self) -> Value {
        // Only strings and a unit enum, serialization cannot fail.
        serde_json::to_value(self).unwrap_or_default()
    }
}
