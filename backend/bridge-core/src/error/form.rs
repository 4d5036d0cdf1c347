use common::ErrorLocation;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum FormError {
    #[error("Owner Document Error: {message} {location}")]
    OwnerDocument {
        message: String,
        location: ErrorLocation,
    },
}
