//! Parent side of the bridge.
//!
//! [`IframeLoader`] creates a root `div` inside a parent container, an
//! iframe inside it, and answers the handshake of the content script that
//! loads in that iframe. Owners observe the iframe's life through
//! [`LoaderEventType`] handlers.
//!
//! The host delivers `message` events through [`IframeLoader::handle_message`]
//! and the iframe's `load` events through [`IframeLoader::handle_load`].

pub mod events;
pub mod options;

pub use events::{EventHandler, EventHandlers, HandlerError, LoaderEvent};
pub use options::{LoaderOptions, LoaderOptionsBuilder, ParentRef};

use crate::LOADER_ID_PREFIX;
use crate::component::{Component, Lifecycle};
use crate::error::loader::LoaderError;
use crate::host::{Document, ElementOf, HostWindow, ListenerId, MessageEvent};
use crate::ids::generate_unique_id;
use crate::protocol::{LoaderHandshake, Signal};

use models::{FrameMessage, LoaderEventType};

use common::ErrorLocation;

use std::collections::BTreeMap;
use std::panic::Location;

use log::{debug, info, trace};

const ROOT_TAG: &str = "div";
const IFRAME_TAG: &str = "iframe";

pub struct IframeLoader<W: HostWindow> {
    window: W,
    lifecycle: Lifecycle,
    url: String,
    origin: String,
    handshake: LoaderHandshake,
    events: EventHandlers<ElementOf<W>>,
    parent_el: ElementOf<W>,
    root_el: Option<ElementOf<W>>,
    iframe: Option<ElementOf<W>>,
    message_listener: Option<ListenerId>,
    load_listener: Option<ListenerId>,
    loaded: bool,
}

impl<W: HostWindow> IframeLoader<W> {
    /// Create the root element and the iframe, and start listening.
    ///
    /// Emits `BeforeCreate` and `Created` before returning.
    #[track_caller]
    pub fn new(window: W, options: LoaderOptions<ElementOf<W>>) -> Result<Self, LoaderError> {
        options.validate()?;

        let document = window.document();
        let origin = common::origin_of(&options.url, Some(&document.base_url())).map_err(|e| {
            LoaderError::Url {
                message: format!("Cannot resolve the origin of \"{}\"", options.url),
                location: ErrorLocation::from(Location::caller()),
                source: e,
            }
        })?;
        let parent_el = resolve_parent(document, options.parent.as_ref())?;
        let session_id = generate_unique_id(document, LOADER_ID_PREFIX);

        let mut loader = Self {
            lifecycle: Lifecycle::Active,
            url: options.url,
            origin,
            handshake: LoaderHandshake::new(session_id),
            events: options.events,
            parent_el,
            root_el: None,
            iframe: None,
            message_listener: None,
            load_listener: None,
            loaded: false,
            window,
        };

        loader.message_listener = Some(loader.window.add_message_listener());
        loader.create(&options.iframe_attributes);

        info!(
            "Loader \"{}\" created for {}",
            loader.handshake.session_id(),
            loader.url
        );
        Ok(loader)
    }

    fn create(&mut self, iframe_attributes: &BTreeMap<String, String>) {
        self.trigger(LoaderEventType::BeforeCreate);

        let document = self.window.document();
        let root = document.create_element(ROOT_TAG);
        document.append_child(&self.parent_el, &root);

        let iframe = document.create_element(IFRAME_TAG);
        for (name, value) in iframe_attributes {
            document.set_attribute(&iframe, name, value);
        }
        document.set_attribute(&iframe, "src", &self.url);
        self.load_listener = Some(document.add_load_listener(&iframe));
        document.append_child(&root, &iframe);

        self.root_el = Some(root);
        self.iframe = Some(iframe);

        self.trigger(LoaderEventType::Created);
    }

    /// The session id, `None` once disposed.
    pub fn session_id(&self) -> Option<&str> {
        self.lifecycle
            .is_active()
            .then(|| self.handshake.session_id())
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Origin messages must come from, derived from the url.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn root_element(&self) -> Option<&ElementOf<W>> {
        self.root_el.as_ref()
    }

    pub fn iframe_element(&self) -> Option<&ElementOf<W>> {
        self.iframe.as_ref()
    }

    pub fn parent_element(&self) -> &ElementOf<W> {
        &self.parent_el
    }

    /// Whether the content completed the handshake.
    pub fn is_mounted(&self) -> bool {
        self.handshake.is_confirmed()
    }

    /// React to a `message` event delivered to the parent window.
    pub fn handle_message(&mut self, event: &MessageEvent) {
        if !self.lifecycle.is_active() {
            return;
        }

        if event.origin != self.origin {
            trace!("Dropping message from unexpected origin {}", event.origin);
            return;
        }

        let Some(message) = FrameMessage::decode(&event.data) else {
            trace!("Dropping malformed message");
            return;
        };

        let transition = self.handshake.apply(&message);
        for outgoing in &transition.outgoing {
            self.post(outgoing);
        }

        match transition.signal {
            Some(Signal::Established) => {
                info!("Loader \"{}\" mounted", self.handshake.session_id());
                self.trigger(LoaderEventType::Mounted);
            }
            Some(Signal::BeforeUpdate) => self.trigger(LoaderEventType::BeforeUpdate),
            Some(Signal::Updated) => self.trigger(LoaderEventType::Updated),
            Some(Signal::Destroyed) => {
                debug!("Content of \"{}\" was destroyed", self.handshake.session_id());
                self.dispose();
            }
            None => {}
        }
    }

    /// React to the iframe's `load` event. Only the first one is reported.
    pub fn handle_load(&mut self) {
        if !self.lifecycle.is_active() || self.loaded {
            return;
        }

        self.loaded = true;
        self.trigger(LoaderEventType::BeforeMount);
    }

    fn post(&self, message: &FrameMessage) {
        if let Some(iframe) = &self.iframe {
            self.window
                .document()
                .post_to_frame(iframe, message.to_value(), &self.origin);
        }
    }

    fn trigger(&mut self, kind: LoaderEventType) {
        let event = LoaderEvent {
            kind,
            el: self.root_el.as_ref(),
            parent_el: &self.parent_el,
            id: self.handshake.session_id(),
        };
        self.events.emit(&event);
    }
}

impl<W: HostWindow> Component for IframeLoader<W> {
    type Context = W;

    fn owning_context(&self) -> Option<&W> {
        self.lifecycle.is_active().then_some(&self.window)
    }

    /// Emit `BeforeDestroy`, remove the elements and the listeners, then emit `Destroyed`.
    fn dispose(&mut self) {
        if !self.lifecycle.is_active() {
            return;
        }

        self.trigger(LoaderEventType::BeforeDestroy);
        self.lifecycle.retire();

        let document = self.window.document();
        if let (Some(iframe), Some(listener)) = (&self.iframe, self.load_listener.take()) {
            document.remove_load_listener(iframe, listener);
        }
        if let Some(root) = self.root_el.take() {
            document.remove_element(&root);
        }
        self.iframe = None;

        if let Some(listener) = self.message_listener.take() {
            self.window.remove_message_listener(listener);
        }

        self.trigger(LoaderEventType::Destroyed);
        self.events.clear();

        info!("Loader \"{}\" disposed", self.handshake.session_id());
    }

    fn is_disposed(&self) -> bool {
        !self.lifecycle.is_active()
    }
}

impl<W: HostWindow> Drop for IframeLoader<W> {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[track_caller]
fn resolve_parent<D: Document>(
    document: &D,
    parent: Option<&ParentRef<D::Element>>,
) -> Result<D::Element, LoaderError> {
    let found = match parent {
        Some(ParentRef::Selector(selector)) => document.query_selector(selector),
        Some(ParentRef::Element(element)) => Some(element.clone()),
        None => None,
    };

    found.ok_or_else(|| LoaderError::ParentNotFound {
        message: format!(
            "Failed to find parent \"{}\".",
            parent.map(ToString::to_string).unwrap_or_default()
        ),
        location: ErrorLocation::from(Location::caller()),
    })
}
