use common::{ErrorLocation, UrlError};

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum LoaderError {
    #[error("Options Error: {message} {location}")]
    Options {
        message: String,
        location: ErrorLocation,
    },

    #[error("Parent Error: {message} {location}")]
    ParentNotFound {
        message: String,
        location: ErrorLocation,
    },

    #[error("Url Error: {message} {location}")]
    Url {
        message: String,
        location: ErrorLocation,
        #[source]
        source: UrlError,
    },
}
