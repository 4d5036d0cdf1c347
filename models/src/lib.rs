//! Data exchanged between the layers of the iframe bridge.
//!
//! These are plain records: the wire message both frames post to each
//! other, the lifecycle event kinds a loader reports, and the request
//! options of the iframe HTTP transport. Behaviour lives in `bridge-core`;
//! this crate only decodes and validates.

pub mod error;
pub mod http;
pub mod loader_event;
pub mod message;

pub use common::ErrorLocation;
pub use error::model_error::ModelError;
pub use http::method::HttpMethod;
pub use http::options::{HttpRequestOptions, HttpRequestOptionsBuilder};
pub use loader_event::LoaderEventType;
pub use message::{FrameMessage, MessageState};

#[cfg(test)]
mod tests;
