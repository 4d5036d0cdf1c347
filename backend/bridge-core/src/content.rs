//! Child side of the bridge.
//!
//! [`IframeContent`] runs in the document an [`IframeLoader`] loaded. It
//! starts the handshake as soon as it is created and reports busy and
//! destroyed states to the parent. A window that is its own parent is
//! standalone: nothing is listened to and nothing is posted.
//!
//! [`IframeLoader`]: crate::loader::IframeLoader

use crate::component::{Component, Lifecycle};
use crate::error::content::ContentError;
use crate::host::{HostWindow, ListenerId, MessageEvent};
use crate::protocol::{ContentHandshake, Signal};

use models::{FrameMessage, MessageState};

use common::ErrorLocation;

use std::panic::Location;

use log::{debug, info, trace};

pub const PARENT_ORIGIN_REQUIRED_MESSAGE: &str =
    "Parent origin(\"parentOrigin\") should be a non-empty string.";

pub struct IframeContent<W: HostWindow> {
    window: W,
    lifecycle: Lifecycle,
    parent_origin: String,
    standalone: bool,
    handshake: ContentHandshake,
    message_listener: Option<ListenerId>,
}

impl<W: HostWindow> IframeContent<W> {
    /// Start the handshake with the parent at `parent_origin`.
    ///
    /// Posts the bootstrap message right away and queues a busy status
    /// until the session is established.
    #[track_caller]
    pub fn new(window: W, parent_origin: &str) -> Result<Self, ContentError> {
        if parent_origin.is_empty() {
            return Err(ContentError::ParentOrigin {
                message: PARENT_ORIGIN_REQUIRED_MESSAGE.to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let standalone = window.is_top_level();
        let message_listener = (!standalone).then(|| window.add_message_listener());

        let mut content = Self {
            window,
            lifecycle: Lifecycle::Active,
            parent_origin: parent_origin.to_string(),
            standalone,
            handshake: ContentHandshake::new(),
            message_listener,
        };

        if standalone {
            debug!("Content is not embedded, staying silent");
        } else {
            content.post(&content.handshake.bootstrap());
            content.send(FrameMessage::status("", MessageState::BeforeUpdate));
        }

        Ok(content)
    }

    /// Tell the parent whether the content is busy. Queued until the session exists.
    pub fn signal_busy_state(&mut self, busy: bool) {
        if !self.lifecycle.is_active() {
            return;
        }
        self.send(FrameMessage::status("", MessageState::from_busy(busy)));
    }

    pub fn session_id(&self) -> Option<&str> {
        self.handshake.session_id()
    }

    pub fn parent_origin(&self) -> &str {
        &self.parent_origin
    }

    pub fn is_standalone(&self) -> bool {
        self.standalone
    }

    /// React to a `message` event delivered to the content window.
    pub fn handle_message(&mut self, event: &MessageEvent) {
        if !self.lifecycle.is_active() || self.standalone {
            return;
        }

        if event.origin != self.parent_origin {
            trace!("Dropping message from unexpected origin {}", event.origin);
            return;
        }

        let Some(message) = FrameMessage::decode(&event.data) else {
            return;
        };

        let transition = self.handshake.apply(&message);
        for outgoing in &transition.outgoing {
            self.post(outgoing);
        }

        if transition.signal == Some(Signal::Established)
            && let Some(id) = self.handshake.session_id()
        {
            info!("Content joined session \"{id}\"");
        }
    }

    fn send(&mut self, message: FrameMessage) {
        if self.standalone {
            return;
        }
        if let Some(message) = self.handshake.outbound(message) {
            self.post(&message);
        }
    }

    fn post(&self, message: &FrameMessage) {
        self.window
            .post_to_parent(message.to_value(), &self.parent_origin);
    }
}

impl<W: HostWindow> Component for IframeContent<W> {
    type Context = W;

    fn owning_context(&self) -> Option<&W> {
        self.lifecycle.is_active().then_some(&self.window)
    }

    /// Post a busy status, stop listening, then post `Destroyed`.
    ///
    /// Before the session exists nothing can be addressed to the parent, so
    /// queued messages are dropped and nothing is posted.
    fn dispose(&mut self) {
        if !self.lifecycle.retire() {
            return;
        }

        let established = self.handshake.is_established();
        if established {
            self.send(FrameMessage::status("", MessageState::BeforeUpdate));
        } else {
            let dropped = self.handshake.discard_queue();
            debug!("Disposed before handshake, dropped {dropped} queued message(s)");
        }

        if let Some(listener) = self.message_listener.take() {
            self.window.remove_message_listener(listener);
        }

        if established {
            self.send(FrameMessage::status("", MessageState::Destroyed));
        }
    }

    fn is_disposed(&self) -> bool {
        !self.lifecycle.is_active()
    }
}

impl<W: HostWindow> Drop for IframeContent<W> {
    fn drop(&mut self) {
        self.dispose();
    }
}
