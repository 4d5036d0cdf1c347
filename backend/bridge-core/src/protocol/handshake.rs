use crate::protocol::{Signal, Transition};

use models::{FrameMessage, MessageState};

use std::collections::VecDeque;

use log::{debug, trace};

/// Parent half of the handshake.
///
/// Holds the session id it generated and never reveals it to a peer that
/// has not echoed the secret back first.
#[derive(Debug, Clone)]
pub struct LoaderHandshake {
    session_id: String,
    secret: String,
    confirmed: bool,
}

impl LoaderHandshake {
    pub fn new(session_id: impl Into<String>) -> Self {
        let session_id = session_id.into();
        let secret = common::handshake_secret(&session_id);
        Self {
            session_id,
            secret,
            confirmed: false,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// Whether a confirmation was ever sent.
    pub fn is_confirmed(&self) -> bool {
        self.confirmed
    }

    pub fn apply(&mut self, message: &FrameMessage) -> Transition {
        if !message.has_id() {
            return self.shake_hands(message);
        }

        if message.id != self.session_id {
            trace!("Ignoring message for foreign session \"{}\"", message.id);
            return Transition::none();
        }

        match message.state {
            Some(MessageState::BeforeUpdate) => Transition::signal(Signal::BeforeUpdate),
            Some(MessageState::Updated) => Transition::signal(Signal::Updated),
            Some(MessageState::Destroyed) => Transition::signal(Signal::Destroyed),
            // The content's own confirmation echo carries nothing new.
            Some(MessageState::Mounted) | None => Transition::none(),
        }
    }

    fn shake_hands(&mut self, message: &FrameMessage) -> Transition {
        if message.payload() != Some(self.secret.as_str()) {
            debug!("Challenging content of session \"{}\"", self.session_id);
            return Transition::send(FrameMessage::challenge(self.secret.clone()));
        }

        debug!("Content proved session \"{}\"", self.session_id);
        let first = !self.confirmed;
        self.confirmed = true;

        Transition {
            outgoing: vec![FrameMessage::confirmation(self.session_id.clone())],
            signal: first.then_some(Signal::Established),
        }
    }
}

/// Child half of the handshake.
///
/// Until an id is adopted every outbound message is queued. Once adopted
/// the id never changes and inbound messages are no longer interpreted.
#[derive(Debug, Clone, Default)]
pub struct ContentHandshake {
    session_id: Option<String>,
    queue: VecDeque<FrameMessage>,
}

impl ContentHandshake {
    pub fn new() -> Self {
        Self::default()
    }

    /// The message that starts the handshake. Sent directly, never queued.
    pub fn bootstrap(&self) -> FrameMessage {
        FrameMessage::handshake_request()
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn is_established(&self) -> bool {
        self.session_id.is_some()
    }

    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Stamp `message` with the session id, or queue it if there is none yet.
    pub fn outbound(&mut self, mut message: FrameMessage) -> Option<FrameMessage> {
        match &self.session_id {
            Some(id) => {
                message.id = id.clone();
                Some(message)
            }
            None => {
                self.queue.push_back(message);
                None
            }
        }
    }

    /// Drop everything still queued. Returns how many messages were dropped.
    pub fn discard_queue(&mut self) -> usize {
        let dropped = self.queue.len();
        self.queue.clear();
        dropped
    }

    pub fn apply(&mut self, message: &FrameMessage) -> Transition {
        if self.session_id.is_some() {
            return Transition::none();
        }

        if !message.has_id() {
            return match message.payload() {
                Some(secret) => {
                    debug!("Answering handshake challenge");
                    Transition::send(FrameMessage::proof(secret))
                }
                None => Transition::none(),
            };
        }

        let id = message.id.clone();
        debug!(
            "Adopted session \"{id}\", flushing {} queued message(s)",
            self.queue.len()
        );

        let mut outgoing = Vec::with_capacity(self.queue.len() + 1);
        outgoing.push(FrameMessage::status(id.clone(), MessageState::Mounted));
        outgoing.extend(self.queue.drain(..).map(|mut queued| {
            queued.id = id.clone();
            queued
        }));
        self.session_id = Some(id);

        Transition {
            outgoing,
            signal: Some(Signal::Established),
        }
    }
}
