//! Turning `load` events into a response.

use crate::error::host::HostError;
use crate::error::http_request::HttpRequestError;
use crate::host::FrameSnapshot;
use crate::http_request::{HttpOutcome, IframeHttpResponse};

use models::HttpRequestOptions;

use common::ErrorLocation;

use std::panic::Location;

use log::{debug, trace};
use tokio::sync::{mpsc, oneshot};
use tokio::time::{Instant, sleep};

/// What a load produced: the frame's state, or why it could not be read.
pub(crate) type LoadOutcome = Result<FrameSnapshot, HostError>;

/// How to treat a load.
#[derive(Debug)]
pub(crate) enum Verdict {
    /// Final answer.
    Settle(HttpOutcome),
    /// Possibly a redirect hop. Keep it unless a later load supersedes it.
    Defer(HttpOutcome),
}

/// Classify one load.
///
/// `requested_path` is the lower-cased full path of the request url, `None`
/// if it could not be resolved, in which case no load counts as landing there.
pub(crate) fn evaluate(
    outcome: LoadOutcome,
    requested_path: Option<&str>,
    redirects_allowed: bool,
) -> Verdict {
    let snapshot = match outcome {
        Ok(snapshot) => snapshot,
        Err(error) => return failed(HttpRequestError::from(error), redirects_allowed),
    };

    let landed_path = match common::full_path_of(&snapshot.href, None) {
        Ok(path) => path.to_lowercase(),
        Err(error) => {
            let error = HttpRequestError::Access {
                message: error.to_string(),
                location: ErrorLocation::from(Location::caller()),
            };
            return failed(error, redirects_allowed);
        }
    };

    let response = Ok(IframeHttpResponse::succeeded(snapshot.body_text));
    if requested_path == Some(landed_path.as_str()) || !redirects_allowed {
        Verdict::Settle(response)
    } else {
        trace!("Load landed on {landed_path}, waiting for redirects to settle");
        Verdict::Defer(response)
    }
}

fn failed(error: HttpRequestError, redirects_allowed: bool) -> Verdict {
    let response = Err(IframeHttpResponse::failed(error));
    if redirects_allowed {
        Verdict::Defer(response)
    } else {
        Verdict::Settle(response)
    }
}

/// Wait for the request to settle.
///
/// Ends on the first of: disposal, a load that settles, the end of a
/// redirect window with no newer load, or the overall timeout.
pub(crate) async fn settle(
    mut loads: mpsc::UnboundedReceiver<LoadOutcome>,
    mut cancel: oneshot::Receiver<()>,
    requested_path: Option<String>,
    options: HttpRequestOptions,
) -> HttpOutcome {
    let redirect_window = options.redirect_window();

    let deadline = sleep(options.timeout());
    tokio::pin!(deadline);
    let redirect = sleep(options.timeout());
    tokio::pin!(redirect);

    let mut pending: Option<HttpOutcome> = None;

    loop {
        tokio::select! {
            biased;

            _ = &mut cancel => {
                debug!("Request disposed before it settled");
                return Err(IframeHttpResponse::failed(HttpRequestError::disposed()));
            }

            Some(outcome) = loads.recv() => {
                match evaluate(outcome, requested_path.as_deref(), redirect_window.is_some()) {
                    Verdict::Settle(response) => return response,
                    Verdict::Defer(response) => {
                        if let Some(window) = redirect_window {
                            redirect.as_mut().reset(Instant::now() + window);
                        }
                        pending = Some(response);
                    }
                }
            }

            _ = &mut redirect, if pending.is_some() => {
                if let Some(response) = pending.take() {
                    return response;
                }
            }

            _ = &mut deadline => {
                debug!("Request timed out after {} ms", options.timeout_ms);
                return Err(IframeHttpResponse::failed(HttpRequestError::timeout()));
            }
        }
    }
}
