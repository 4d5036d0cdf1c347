//! In-process host: a minimal node tree plus message outboxes.
//!
//! Nothing is delivered automatically. Messages a driver posts land in an
//! outbox (`take_frame_posts`, `take_parent_posts`) and the owner decides
//! when, and to whom, they are delivered as [`MessageEvent`]s. Frame
//! contents and submit failures are scripted, which is what lets tests
//! replay redirects and cross-origin blocks deterministically.
//!
//! [`MessageEvent`]: crate::host::MessageEvent

use crate::error::host::HostError;
use crate::host::{Document, FrameSnapshot, HostWindow, ListenerId};

use common::ErrorLocation;

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::panic::Location;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use log::trace;
use serde_json::Value;

const BODY_TAG: &str = "body";
const BLANK_URL: &str = "about:blank";
const ID_ATTRIBUTE: &str = "id";
const BODY_INDEX: usize = 0;

static NEXT_DOCUMENT_SERIAL: AtomicU64 = AtomicU64::new(1);

/// Element handle of a [`MemoryDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    document: u64,
    index: usize,
}

/// A message captured by an outbox.
#[derive(Debug, Clone, PartialEq)]
pub struct PostedMessage {
    /// The frame the message was posted into, `None` for posts to the parent window.
    pub frame: Option<NodeId>,
    pub message: Value,
    pub target_origin: String,
}

#[derive(Debug)]
struct Node {
    tag: String,
    attributes: BTreeMap<String, String>,
    parent: Option<usize>,
    children: Vec<usize>,
}

impl Node {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attributes: BTreeMap::new(),
            parent: None,
            children: Vec::new(),
        }
    }
}

#[derive(Debug)]
enum FrameBehaviour {
    Loaded(FrameSnapshot),
    Blocked(String),
}

#[derive(Debug)]
struct DomState {
    serial: u64,
    base_url: String,
    nodes: Vec<Node>,
    load_listeners: BTreeMap<ListenerId, usize>,
    frames: HashMap<usize, FrameBehaviour>,
    frame_outbox: Vec<PostedMessage>,
    submit_failure: Option<String>,
    submitted: Vec<usize>,
    next_listener: u64,
}

impl DomState {
    fn is_attached(&self, mut index: usize) -> bool {
        loop {
            if index == BODY_INDEX {
                return true;
            }
            match self.nodes.get(index).and_then(|node| node.parent) {
                Some(parent) => index = parent,
                None => return false,
            }
        }
    }

    /// Attached node indices in document order.
    fn document_order(&self) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![BODY_INDEX];

        while let Some(index) = stack.pop() {
            order.push(index);
            if let Some(node) = self.nodes.get(index) {
                stack.extend(node.children.iter().rev().copied());
            }
        }

        order
    }

    fn allocate_listener(&mut self) -> ListenerId {
        self.next_listener += 1;
        ListenerId(self.next_listener)
    }
}

/// A document backed by an in-memory node tree.
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    state: Rc<RefCell<DomState>>,
}

impl MemoryDocument {
    pub fn new(base_url: impl Into<String>) -> Self {
        let state = DomState {
            serial: NEXT_DOCUMENT_SERIAL.fetch_add(1, Ordering::Relaxed),
            base_url: base_url.into(),
            nodes: vec![Node::new(BODY_TAG)],
            load_listeners: BTreeMap::new(),
            frames: HashMap::new(),
            frame_outbox: Vec::new(),
            submit_failure: None,
            submitted: Vec::new(),
            next_listener: 0,
        };

        Self {
            state: Rc::new(RefCell::new(state)),
        }
    }

    fn node_id(&self, index: usize) -> NodeId {
        NodeId {
            document: self.state.borrow().serial,
            index,
        }
    }

    /// Index of `element` if it belongs to this document.
    fn index_of(&self, element: &NodeId) -> Option<usize> {
        let state = self.state.borrow();
        (element.document == state.serial && element.index < state.nodes.len())
            .then_some(element.index)
    }

    fn allocate_listener(&self) -> ListenerId {
        self.state.borrow_mut().allocate_listener()
    }

    /// Drain every message posted into frames of this document.
    pub fn take_frame_posts(&self) -> Vec<PostedMessage> {
        std::mem::take(&mut self.state.borrow_mut().frame_outbox)
    }

    /// Make `frame` report `href` and `body_text` on its next read.
    pub fn set_frame_content(
        &self,
        frame: &NodeId,
        href: impl Into<String>,
        body_text: impl Into<String>,
    ) {
        if let Some(index) = self.index_of(frame) {
            self.state.borrow_mut().frames.insert(
                index,
                FrameBehaviour::Loaded(FrameSnapshot {
                    href: href.into(),
                    body_text: body_text.into(),
                }),
            );
        }
    }

    /// Make reads of `frame` fail as a cross-origin frame would.
    pub fn block_frame(&self, frame: &NodeId, message: impl Into<String>) {
        if let Some(index) = self.index_of(frame) {
            self.state
                .borrow_mut()
                .frames
                .insert(index, FrameBehaviour::Blocked(message.into()));
        }
    }

    /// Make the next form submissions fail with `message`.
    pub fn fail_submit(&self, message: impl Into<String>) {
        self.state.borrow_mut().submit_failure = Some(message.into());
    }

    pub fn submitted_forms(&self) -> Vec<NodeId> {
        let indices = self.state.borrow().submitted.clone();
        indices.into_iter().map(|index| self.node_id(index)).collect()
    }

    pub fn tag_name(&self, element: &NodeId) -> Option<String> {
        let index = self.index_of(element)?;
        self.state.borrow().nodes.get(index).map(|node| node.tag.clone())
    }

    pub fn children(&self, element: &NodeId) -> Vec<NodeId> {
        let Some(index) = self.index_of(element) else {
            return Vec::new();
        };
        let children = self
            .state
            .borrow()
            .nodes
            .get(index)
            .map(|node| node.children.clone())
            .unwrap_or_default();
        children.into_iter().map(|child| self.node_id(child)).collect()
    }

    pub fn is_attached(&self, element: &NodeId) -> bool {
        self.index_of(element)
            .is_some_and(|index| self.state.borrow().is_attached(index))
    }

    /// Attached elements with `tag`, in document order.
    pub fn elements_by_tag(&self, tag: &str) -> Vec<NodeId> {
        let tag = tag.to_ascii_lowercase();
        let indices: Vec<usize> = {
            let state = self.state.borrow();
            state
                .document_order()
                .into_iter()
                .filter(|index| state.nodes.get(*index).is_some_and(|node| node.tag == tag))
                .collect()
        };
        indices.into_iter().map(|index| self.node_id(index)).collect()
    }

    pub fn load_listener_count(&self) -> usize {
        self.state.borrow().load_listeners.len()
    }
}

impl Document for MemoryDocument {
    type Element = NodeId;

    fn base_url(&self) -> String {
        self.state.borrow().base_url.clone()
    }

    fn body(&self) -> NodeId {
        self.node_id(BODY_INDEX)
    }

    fn create_element(&self, tag: &str) -> NodeId {
        let index = {
            let mut state = self.state.borrow_mut();
            state.nodes.push(Node::new(tag));
            state.nodes.len() - 1
        };
        self.node_id(index)
    }

    fn query_selector(&self, selector: &str) -> Option<NodeId> {
        let selector = selector.trim();
        if selector.is_empty() {
            return None;
        }

        let found = {
            let state = self.state.borrow();
            let matches = |node: &Node| match selector.strip_prefix('#') {
                Some(id) => node.attributes.get(ID_ATTRIBUTE).is_some_and(|v| v == id),
                None => node.tag.eq_ignore_ascii_case(selector),
            };

            state
                .document_order()
                .into_iter()
                .find(|index| state.nodes.get(*index).is_some_and(matches))
        };

        found.map(|index| self.node_id(index))
    }

    fn has_element_id(&self, id: &str) -> bool {
        self.query_selector(&format!("#{id}")).is_some()
    }

    fn owns(&self, element: &NodeId) -> bool {
        self.index_of(element).is_some()
    }

    fn set_attribute(&self, element: &NodeId, name: &str, value: &str) {
        if let Some(index) = self.index_of(element)
            && let Some(node) = self.state.borrow_mut().nodes.get_mut(index)
        {
            node.attributes
                .insert(name.to_ascii_lowercase(), value.to_string());
        }
    }

    fn attribute(&self, element: &NodeId, name: &str) -> Option<String> {
        let index = self.index_of(element)?;
        self.state
            .borrow()
            .nodes
            .get(index)
            .and_then(|node| node.attributes.get(&name.to_ascii_lowercase()).cloned())
    }

    fn append_child(&self, parent: &NodeId, child: &NodeId) {
        let (Some(parent), Some(child)) = (self.index_of(parent), self.index_of(child)) else {
            return;
        };
        if parent == child {
            return;
        }

        self.remove_element(&self.node_id(child));

        let mut state = self.state.borrow_mut();
        if let Some(node) = state.nodes.get_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = state.nodes.get_mut(parent) {
            node.children.push(child);
        }
    }

    fn remove_element(&self, element: &NodeId) {
        let Some(index) = self.index_of(element) else {
            return;
        };

        let mut state = self.state.borrow_mut();
        let Some(parent) = state.nodes.get_mut(index).and_then(|node| node.parent.take()) else {
            return;
        };
        if let Some(node) = state.nodes.get_mut(parent) {
            node.children.retain(|child| *child != index);
        }
    }

    fn add_load_listener(&self, frame: &NodeId) -> ListenerId {
        let mut state = self.state.borrow_mut();
        let listener = state.allocate_listener();
        state.load_listeners.insert(listener, frame.index);
        listener
    }

    fn remove_load_listener(&self, frame: &NodeId, listener: ListenerId) {
        let mut state = self.state.borrow_mut();
        if state.load_listeners.get(&listener) == Some(&frame.index) {
            state.load_listeners.remove(&listener);
        }
    }

    fn post_to_frame(&self, frame: &NodeId, message: Value, target_origin: &str) {
        trace!("Frame post to {target_origin}: {message}");
        self.state.borrow_mut().frame_outbox.push(PostedMessage {
            frame: Some(*frame),
            message,
            target_origin: target_origin.to_string(),
        });
    }

    fn submit_form(&self, form: &NodeId) -> Result<(), HostError> {
        let mut state = self.state.borrow_mut();
        if let Some(message) = state.submit_failure.clone() {
            return Err(HostError::Submit {
                message,
                location: ErrorLocation::from(Location::caller()),
            });
        }
        state.submitted.push(form.index);
        Ok(())
    }

    fn read_frame(&self, frame: &NodeId) -> Result<FrameSnapshot, HostError> {
        let state = self.state.borrow();
        match state.frames.get(&frame.index) {
            Some(FrameBehaviour::Loaded(snapshot)) => Ok(snapshot.clone()),
            Some(FrameBehaviour::Blocked(message)) => Err(HostError::Access {
                message: message.clone(),
                location: ErrorLocation::from(Location::caller()),
            }),
            None => Ok(FrameSnapshot {
                href: BLANK_URL.to_string(),
                body_text: String::new(),
            }),
        }
    }
}

#[derive(Debug)]
struct WindowState {
    top_level: bool,
    message_listeners: BTreeSet<ListenerId>,
    parent_outbox: Vec<PostedMessage>,
}

/// A window around a [`MemoryDocument`].
#[derive(Debug, Clone)]
pub struct MemoryWindow {
    document: MemoryDocument,
    state: Rc<RefCell<WindowState>>,
}

impl MemoryWindow {
    /// A window that is its own parent.
    pub fn top_level(base_url: impl Into<String>) -> Self {
        Self::with_document(MemoryDocument::new(base_url), true)
    }

    /// A window loaded inside a frame of some other window.
    pub fn embedded(base_url: impl Into<String>) -> Self {
        Self::with_document(MemoryDocument::new(base_url), false)
    }

    fn with_document(document: MemoryDocument, top_level: bool) -> Self {
        Self {
            document,
            state: Rc::new(RefCell::new(WindowState {
                top_level,
                message_listeners: BTreeSet::new(),
                parent_outbox: Vec::new(),
            })),
        }
    }

    /// Origin of this window's document, `"null"` if its url is opaque or invalid.
    pub fn origin(&self) -> String {
        common::origin_of(&self.document.base_url(), None)
            .unwrap_or_else(|_| String::from("null"))
    }

    /// Drain every message posted to the parent window.
    pub fn take_parent_posts(&self) -> Vec<PostedMessage> {
        std::mem::take(&mut self.state.borrow_mut().parent_outbox)
    }

    pub fn message_listener_count(&self) -> usize {
        self.state.borrow().message_listeners.len()
    }
}

impl HostWindow for MemoryWindow {
    type Document = MemoryDocument;

    fn document(&self) -> &MemoryDocument {
        &self.document
    }

    fn is_top_level(&self) -> bool {
        self.state.borrow().top_level
    }

    fn add_message_listener(&self) -> ListenerId {
        let listener = self.document.allocate_listener();
        self.state.borrow_mut().message_listeners.insert(listener);
        listener
    }

    fn remove_message_listener(&self, listener: ListenerId) {
        self.state.borrow_mut().message_listeners.remove(&listener);
    }

    fn post_to_parent(&self, message: Value, target_origin: &str) {
        trace!("Parent post to {target_origin}: {message}");
        self.state.borrow_mut().parent_outbox.push(PostedMessage {
            frame: None,
            message,
            target_origin: target_origin.to_string(),
        });
    }
}
