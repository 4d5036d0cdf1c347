//! Scripted runs of the bridge against the in-memory host.
//!
//! [`run_handshake`] embeds a content page in a parent page and relays
//! messages between them until both sides are quiet. [`run_request`]
//! submits a form through a hidden iframe and plays a redirecting server.

use crate::error::DemoError;

use bridge_core::component::Component;
use bridge_core::config::BridgeConfig;
use bridge_core::content::IframeContent;
use bridge_core::form::FormValue;
use bridge_core::host::memory::{MemoryWindow, NodeId};
use bridge_core::host::{Document, HostWindow, MessageEvent};
use bridge_core::http_request::IframeHttpRequest;
use bridge_core::loader::{IframeLoader, LoaderOptionsBuilder};

use models::LoaderEventType;

use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, info};
use serde::Serialize;

pub const PARENT_URL: &str = "http://localhost:81/app/index.html";
pub const CONTENT_URL: &str = "http://localhost:82/content.html";
pub const REQUEST_URL: &str = "/app/submit";

const CONTAINER_ID: &str = "app";
const REDIRECT_HOP_URL: &str = "http://localhost:81/app/redirecting";
const FINAL_URL: &str = "http://localhost:81/app/submit";
const REDIRECT_HOP_BODY: &str = "Redirecting...";
const FINAL_BODY: &str = r#"{"status":"ok"}"#;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HandshakeReport {
    pub session_id: String,
    pub events: Vec<LoaderEventType>,
    pub messages_delivered: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestReport {
    pub data: String,
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DemoSummary {
    pub handshake: HandshakeReport,
    pub request: RequestReport,
}

/// Mount content in a parent page, exchange status updates, then let the
/// content shut both sides down.
pub fn run_handshake(config: &BridgeConfig) -> Result<HandshakeReport, DemoError> {
    let parent = MemoryWindow::top_level(PARENT_URL);
    let child = MemoryWindow::embedded(CONTENT_URL);

    let document = parent.document();
    let container = document.create_element("div");
    document.set_attribute(&container, "id", CONTAINER_ID);
    document.append_child(&document.body(), &container);

    let events: Rc<RefCell<Vec<LoaderEventType>>> = Rc::default();
    let mut builder = LoaderOptionsBuilder::<NodeId>::new()
        .with_url(CONTENT_URL)
        .with_defaults(&config.loader);
    if config.loader.parent_selector.is_none() {
        builder = builder.with_parent_element(container);
    }
    for kind in LoaderEventType::ALL {
        let events = Rc::clone(&events);
        builder = builder.with_event(kind, move |event| {
            info!("Loader {:?} (session \"{}\")", event.kind, event.id);
            events.borrow_mut().push(event.kind);
            Ok(())
        });
    }

    let options = builder.build().map_err(DemoError::bridge)?;
    let mut loader = IframeLoader::new(parent.clone(), options).map_err(DemoError::bridge)?;
    let mut content =
        IframeContent::new(child.clone(), &parent.origin()).map_err(DemoError::bridge)?;

    loader.handle_load();
    content.signal_busy_state(false);
    let mut delivered = relay(&parent, &child, &mut loader, &mut content);

    let session_id = content
        .session_id()
        .map(str::to_string)
        .ok_or_else(|| DemoError::demo("Handshake did not complete"))?;
    info!("Session established: {session_id}");

    content.signal_busy_state(true);
    content.signal_busy_state(false);
    delivered += relay(&parent, &child, &mut loader, &mut content);

    content.dispose();
    delivered += relay(&parent, &child, &mut loader, &mut content);

    if !loader.is_disposed() {
        return Err(DemoError::demo("Loader outlived its content"));
    }

    let events = events.borrow().clone();
    Ok(HandshakeReport {
        session_id,
        events,
        messages_delivered: delivered,
    })
}

/// Deliver posted messages in both directions until neither side has more.
///
/// A message only arrives when its target origin matches the receiving window.
fn relay(
    parent: &MemoryWindow,
    child: &MemoryWindow,
    loader: &mut IframeLoader<MemoryWindow>,
    content: &mut IframeContent<MemoryWindow>,
) -> usize {
    let mut delivered = 0;

    loop {
        let mut progressed = false;

        for post in child.take_parent_posts() {
            progressed = true;
            if post.target_origin != parent.origin() {
                debug!("Dropped message for {}", post.target_origin);
                continue;
            }
            loader.handle_message(&MessageEvent::new(child.origin(), post.message));
            delivered += 1;
        }

        for post in parent.document().take_frame_posts() {
            progressed = true;
            if post.target_origin != child.origin() {
                debug!("Dropped message for {}", post.target_origin);
                continue;
            }
            content.handle_message(&MessageEvent::new(parent.origin(), post.message));
            delivered += 1;
        }

        if !progressed {
            return delivered;
        }
    }
}

/// Submit a login form through a hidden iframe. The scripted server answers
/// with a redirect hop, then the requested page.
pub async fn run_request(config: &BridgeConfig) -> Result<RequestReport, DemoError> {
    let window = MemoryWindow::top_level(PARENT_URL);
    let data = FormValue::map([
        ("user", FormValue::from("ada")),
        ("remember", FormValue::from(true)),
    ]);

    let mut request =
        IframeHttpRequest::new(window.clone(), REQUEST_URL, Some(data), "POST", Some(config.http))
            .map_err(DemoError::bridge)?;
    let response = request.send_async().map_err(DemoError::bridge)?;

    let document = window.document();
    let iframe = document
        .query_selector(&format!("#{}", request.iframe_id()))
        .ok_or_else(|| DemoError::demo("Request iframe missing after submit"))?;

    document.set_frame_content(&iframe, REDIRECT_HOP_URL, REDIRECT_HOP_BODY);
    request.handle_load();
    document.set_frame_content(&iframe, FINAL_URL, FINAL_BODY);
    request.handle_load();

    let outcome = response.await;
    request.dispose();

    let report = match outcome {
        Ok(response) => RequestReport {
            data: response.data,
            error: None,
        },
        Err(response) => RequestReport {
            data: response.data,
            error: response.error.map(|e| e.to_string()),
        },
    };
    info!("Request settled: {report:?}");

    Ok(report)
}
