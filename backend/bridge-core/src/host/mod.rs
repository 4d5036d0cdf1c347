//! The DOM provider the bridge runs against.
//!
//! Protocol drivers never touch a browser directly. They talk to a
//! [`HostWindow`] and its [`Document`], and the host pushes inbound events
//! (`message`, `load`) back into the drivers. A browser binding implements
//! these traits over real windows; [`memory`] implements them in process.
//!
//! All methods take `&self`: like the DOM itself, hosts use interior
//! mutability and every call happens on the one event-loop thread.

pub mod memory;

use crate::error::host::HostError;

use std::fmt::Debug;

use serde_json::Value;

/// Handle returned when a listener is registered. Owned by the registering driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

/// A `message` event as delivered to a window.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageEvent {
    /// Origin of the window that posted the message.
    pub origin: String,
    /// The raw posted value. Untrusted.
    pub data: Value,
}

impl MessageEvent {
    pub fn new(origin: impl Into<String>, data: Value) -> Self {
        Self {
            origin: origin.into(),
            data,
        }
    }
}

/// What a same-origin frame exposes once it has loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameSnapshot {
    /// The frame's current `location.href`.
    pub href: String,
    /// The frame body's text content.
    pub body_text: String,
}

pub trait Document {
    type Element: Clone + PartialEq + Debug;

    /// Absolute url relative urls are resolved against.
    fn base_url(&self) -> String;

    fn body(&self) -> Self::Element;

    fn create_element(&self, tag: &str) -> Self::Element;

    fn query_selector(&self, selector: &str) -> Option<Self::Element>;

    /// Whether an attached element currently carries `id`.
    fn has_element_id(&self, id: &str) -> bool;

    /// Whether `element` was created by this document.
    fn owns(&self, element: &Self::Element) -> bool;

    fn set_attribute(&self, element: &Self::Element, name: &str, value: &str);

    fn attribute(&self, element: &Self::Element, name: &str) -> Option<String>;

    fn append_child(&self, parent: &Self::Element, child: &Self::Element);

    /// Detach `element` from its parent. A detached element is left alone.
    fn remove_element(&self, element: &Self::Element);

    fn add_load_listener(&self, frame: &Self::Element) -> ListenerId;

    fn remove_load_listener(&self, frame: &Self::Element, listener: ListenerId);

    /// `frame.contentWindow.postMessage(message, target_origin)`.
    fn post_to_frame(&self, frame: &Self::Element, message: Value, target_origin: &str);

    fn submit_form(&self, form: &Self::Element) -> Result<(), HostError>;

    /// Read the frame's location and body. Fails when the browser blocks access.
    fn read_frame(&self, frame: &Self::Element) -> Result<FrameSnapshot, HostError>;
}

pub trait HostWindow {
    type Document: Document;

    fn document(&self) -> &Self::Document;

    /// True when the window is its own parent, i.e. not embedded in a frame.
    fn is_top_level(&self) -> bool;

    fn add_message_listener(&self) -> ListenerId;

    fn remove_message_listener(&self, listener: ListenerId);

    /// `window.parent.postMessage(message, target_origin)`.
    fn post_to_parent(&self, message: Value, target_origin: &str);
}

/// Element handle type of a window's document.
pub type ElementOf<W> = <<W as HostWindow>::Document as Document>::Element;
