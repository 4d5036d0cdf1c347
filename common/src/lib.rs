//! Leaf utilities shared by every layer of the iframe bridge.
//!
//! Nothing in this crate knows about documents, windows or frames. It
//! provides the small primitives the protocol is built from:
//!
//! - **error**: [`ErrorLocation`] call-site tracking and the URL error type
//! - **hash_code**: the 32-bit rolling hash used as the handshake secret
//! - **random**: random strings and collision-free identifiers
//! - **url_path**: origin and full-path resolution for provenance checks

pub mod error;
pub mod hash_code;
pub mod random;
pub mod url_path;

pub use error::error_location::ErrorLocation;
pub use error::url_error::UrlError;
pub use hash_code::{hash_code, handshake_secret};
pub use random::{generate_unique_id, random_string};
pub use url_path::{full_path_of, origin_of};
