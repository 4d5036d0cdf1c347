//! A request made by submitting a hidden form into a hidden iframe.
//!
//! The response is whatever text the iframe's body holds once it loads.
//! Only same-origin responses can be read. A load that lands on another
//! path than requested is treated as a redirect hop and, when a redirect
//! window is configured, only wins if no newer load arrives within it.
//!
//! The hidden elements leave the document as soon as the response settles,
//! or on disposal if it never does.

mod settle;

use crate::HTTP_WRAPPER_ID_PREFIX;
use crate::component::{Component, Lifecycle};
use crate::error::http_request::{ALREADY_SENT_MESSAGE, HttpRequestError, MISSING_URL_MESSAGE};
use crate::form::{FormValue, append_data_to_form};
use crate::host::{Document, ElementOf, HostWindow, ListenerId};
use crate::ids::generate_unique_id;

use models::{HttpMethod, HttpRequestOptions};

use common::ErrorLocation;

use std::cell::RefCell;
use std::future::Future;
use std::panic::Location;
use std::pin::Pin;
use std::rc::Rc;

use log::{debug, info, trace, warn};
use tokio::sync::{mpsc, oneshot};

const BLANK_URL: &str = "about:blank";
const IFRAME_ID_SUFFIX: &str = "_iframe";

/// The settled value of a request.
#[derive(Debug)]
pub struct IframeHttpResponse {
    /// The iframe body text. Empty on failure.
    pub data: String,
    pub error: Option<HttpRequestError>,
}

impl IframeHttpResponse {
    pub fn succeeded(data: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            error: None,
        }
    }

    pub fn failed(error: HttpRequestError) -> Self {
        Self {
            data: String::new(),
            error: Some(error),
        }
    }
}

/// `Ok` with the body text, `Err` with the failure. Both arms share one shape.
pub type HttpOutcome = Result<IframeHttpResponse, IframeHttpResponse>;

/// Runs on the thread that owns the host window: settling removes the hidden
/// elements from its document.
pub type ResponseFuture = Pin<Box<dyn Future<Output = HttpOutcome>>>;

#[derive(Debug)]
struct RequestElements<E> {
    wrapper: E,
    iframe: E,
    load_listener: ListenerId,
}

/// Taken exactly once, by the settled response or by `dispose`.
type SharedElements<E> = Rc<RefCell<Option<RequestElements<E>>>>;

/// Remove the hidden elements if nobody did yet.
fn release<W: HostWindow>(window: &W, elements: &SharedElements<ElementOf<W>>) -> bool {
    let Some(taken) = elements.borrow_mut().take() else {
        return false;
    };

    let document = window.document();
    document.remove_load_listener(&taken.iframe, taken.load_listener);
    document.remove_element(&taken.wrapper);
    true
}

pub struct IframeHttpRequest<W: HostWindow> {
    window: W,
    lifecycle: Lifecycle,
    url: String,
    method: HttpMethod,
    data: Option<FormValue>,
    options: HttpRequestOptions,
    wrapper_id: String,
    sent: bool,
    elements: SharedElements<ElementOf<W>>,
    loads: Option<mpsc::UnboundedSender<settle::LoadOutcome>>,
    cancel: Option<oneshot::Sender<()>>,
}

impl<W: HostWindow> IframeHttpRequest<W> {
    /// Prepare a request. Nothing touches the document until [`send_async`](Self::send_async).
    ///
    /// `method` is matched case-insensitively and must be `GET` or `POST`.
    #[track_caller]
    pub fn new(
        window: W,
        url: &str,
        data: Option<FormValue>,
        method: &str,
        options: Option<HttpRequestOptions>,
    ) -> Result<Self, HttpRequestError> {
        if url.is_empty() {
            return Err(HttpRequestError::MissingUrl {
                message: MISSING_URL_MESSAGE.to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let method = HttpMethod::parse(method).ok_or_else(|| HttpRequestError::UnsupportedMethod {
            message: format!("Method not supported \"{method}\""),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let wrapper_id = generate_unique_id(window.document(), HTTP_WRAPPER_ID_PREFIX);

        Ok(Self {
            window,
            lifecycle: Lifecycle::Active,
            url: url.to_string(),
            method,
            data,
            options: options.unwrap_or_default(),
            wrapper_id,
            sent: false,
            elements: Rc::default(),
            loads: None,
            cancel: None,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn options(&self) -> &HttpRequestOptions {
        &self.options
    }

    pub fn wrapper_id(&self) -> &str {
        &self.wrapper_id
    }

    pub fn iframe_id(&self) -> String {
        format!("{}{IFRAME_ID_SUFFIX}", self.wrapper_id)
    }

    /// Build the hidden form and iframe, submit, and return the pending response.
    ///
    /// Fails synchronously only for programmer errors: a second call, a call
    /// after disposal, or a form the document does not own. Everything else
    /// is delivered through the returned future.
    #[track_caller]
    pub fn send_async(&mut self) -> Result<ResponseFuture, HttpRequestError>
    where
        W: Clone + 'static,
        ElementOf<W>: 'static,
    {
        if self.sent {
            return Err(HttpRequestError::AlreadySent {
                message: ALREADY_SENT_MESSAGE.to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        if !self.lifecycle.is_active() {
            return Err(HttpRequestError::disposed());
        }
        self.sent = true;

        let document = self.window.document();
        let iframe_id = self.iframe_id();

        let wrapper = document.create_element("div");
        document.set_attribute(&wrapper, "id", &self.wrapper_id);
        document.set_attribute(&wrapper, "style", "display:none");

        let form = document.create_element("form");
        document.set_attribute(&form, "action", &self.url);
        document.set_attribute(&form, "method", self.method.as_str());
        document.set_attribute(&form, "target", &iframe_id);

        let iframe = document.create_element("iframe");
        document.set_attribute(&iframe, "id", &iframe_id);
        document.set_attribute(&iframe, "name", &iframe_id);
        document.set_attribute(&iframe, "width", "0");
        document.set_attribute(&iframe, "height", "0");
        document.set_attribute(&iframe, "src", BLANK_URL);

        append_data_to_form(document, &form, self.data.as_ref()).map_err(|e| {
            HttpRequestError::Form {
                message: format!("Cannot serialize the request data: {e}"),
                location: ErrorLocation::from(Location::caller()),
                source: e,
            }
        })?;

        document.append_child(&wrapper, &form);
        document.append_child(&wrapper, &iframe);
        document.append_child(&document.body(), &wrapper);
        let load_listener = document.add_load_listener(&iframe);

        let requested_path = match common::full_path_of(&self.url, Some(&document.base_url())) {
            Ok(path) => Some(path.to_lowercase()),
            Err(e) => {
                warn!("Cannot resolve request url, no load will match it: {e}");
                None
            }
        };

        let submitted = document.submit_form(&form);

        *self.elements.borrow_mut() = Some(RequestElements {
            wrapper,
            iframe,
            load_listener,
        });

        if let Err(e) = submitted {
            warn!("Submitting {} {} failed: {}", self.method, self.url, e.message());
            let error = HttpRequestError::from(e);
            return Ok(self.respond(async move { Err(IframeHttpResponse::failed(error)) }));
        }

        let (loads_tx, loads_rx) = mpsc::unbounded_channel();
        let (cancel_tx, cancel_rx) = oneshot::channel();
        self.loads = Some(loads_tx);
        self.cancel = Some(cancel_tx);

        info!("Submitted {} {} into \"{}\"", self.method, self.url, iframe_id);
        Ok(self.respond(settle::settle(
            loads_rx,
            cancel_rx,
            requested_path,
            self.options,
        )))
    }

    fn respond<F>(&self, settled: F) -> ResponseFuture
    where
        W: Clone + 'static,
        ElementOf<W>: 'static,
        F: Future<Output = HttpOutcome> + 'static,
    {
        let window = self.window.clone();
        let elements = Rc::clone(&self.elements);
        let wrapper_id = self.wrapper_id.clone();

        Box::pin(async move {
            let outcome = settled.await;
            if release(&window, &elements) {
                trace!("Request \"{wrapper_id}\" settled, hidden elements removed");
            }
            outcome
        })
    }

    /// React to the hidden iframe's `load` event.
    pub fn handle_load(&self) {
        if !self.lifecycle.is_active() {
            return;
        }
        let Some(loads) = &self.loads else {
            return;
        };
        let elements = self.elements.borrow();
        let Some(elements) = elements.as_ref() else {
            trace!("Load after the response settled");
            return;
        };

        let outcome = self.window.document().read_frame(&elements.iframe);
        if loads.send(outcome).is_err() {
            trace!("Load after the response was dropped");
        }
    }
}

impl<W: HostWindow> Component for IframeHttpRequest<W> {
    type Context = W;

    fn owning_context(&self) -> Option<&W> {
        self.lifecycle.is_active().then_some(&self.window)
    }

    /// Cancel a pending response and remove the hidden elements.
    ///
    /// A pending response settles with a disposed error.
    fn dispose(&mut self) {
        if !self.lifecycle.retire() {
            return;
        }

        if let Some(cancel) = self.cancel.take() {
            // The response may already be settled and dropped.
            let _ = cancel.send(());
        }
        self.loads = None;

        release(&self.window, &self.elements);

        debug!("Request \"{}\" disposed", self.wrapper_id);
    }

    fn is_disposed(&self) -> bool {
        !self.lifecycle.is_active()
    }
}

impl<W: HostWindow> Drop for IframeHttpRequest<W> {
    fn drop(&mut self) {
        self.dispose();
    }
}
