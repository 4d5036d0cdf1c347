//! Messaging across iframe boundaries.
//!
//! - [`loader::IframeLoader`] embeds a document and authenticates it with a
//!   hash challenge before handing over a session id.
//! - [`content::IframeContent`] is the embedded document's half: it asks
//!   for the challenge, proves receipt, and queues its status updates until
//!   the session exists.
//! - [`http_request::IframeHttpRequest`] submits a hidden form into a
//!   hidden iframe and resolves with the loaded body text.
//!
//! Everything runs against the [`host`] traits. [`host::memory`] provides an
//! in-process host.

pub mod component;
pub mod config;
pub mod content;
pub mod error;
pub mod form;
pub mod host;
pub mod http_request;
pub mod ids;
pub mod loader;
pub mod protocol;

#[cfg(test)]
mod tests;

pub const LOADER_ID_PREFIX: &str = "ildr-";
pub const HTTP_WRAPPER_ID_PREFIX: &str = "IframeHttpRequest_wrapper_";
