use crate::ErrorLocation;

use thiserror::Error as ThisError;

/// A model builder refused its inputs.
#[derive(Debug, ThisError)]
pub enum ModelError {
    /// `HttpRequestOptions` with an unusable value. `field` is its wire key.
    #[error("Request Options Error: \"{field}\" {message} {location}")]
    RequestOptions {
        field: &'static str,
        message: String,
        location: ErrorLocation,
    },
}
