//! The handshake as two pure state machines.
//!
//! Neither machine performs I/O. Each inbound [`FrameMessage`] is applied
//! and yields a [`Transition`]: the messages to post in order, plus at most
//! one [`Signal`] for the driver to act on. Drivers own the transport and
//! the origin filtering; the machines own id matching and queueing.
//!
//! ```text
//!  content                              loader
//!     | {id:""}                            |   bootstrap, bypasses queue
//!     |----------------------------------->|
//!     |            {id:"", data:hash(id)}  |   challenge
//!     |<-----------------------------------|
//!     | {id:"", state:beforeUpdate, data}  |   proof
//!     |----------------------------------->|
//!     |                          {id: id}  |   confirmation, loader is mounted
//!     |<-----------------------------------|
//!     | {id, state:mounted}, queued...     |   adoption and flush
//!     |----------------------------------->|
//! ```
//!
//! [`FrameMessage`]: models::FrameMessage

pub mod handshake;

pub use handshake::{ContentHandshake, LoaderHandshake};

use models::FrameMessage;

/// Something a driver must react to after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// The session is established on this side.
    Established,
    BeforeUpdate,
    Updated,
    /// The other side is going away.
    Destroyed,
}

/// Result of applying one inbound message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transition {
    pub outgoing: Vec<FrameMessage>,
    pub signal: Option<Signal>,
}

impl Transition {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn send(message: FrameMessage) -> Self {
        Self {
            outgoing: vec![message],
            signal: None,
        }
    }

    pub fn signal(signal: Signal) -> Self {
        Self {
            outgoing: Vec::new(),
            signal: Some(signal),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.outgoing.is_empty() && self.signal.is_none()
    }
}
