use crate::ErrorLocation;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum UrlError {
    #[error("Url Parse Error: {message} {location}")]
    Parse {
        message: String,
        location: ErrorLocation,
    },
}
