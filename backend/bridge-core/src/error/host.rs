use common::ErrorLocation;

use thiserror::Error as ThisError;

/// Failures reported by the DOM provider.
#[derive(Debug, Clone, ThisError)]
pub enum HostError {
    /// The frame navigated somewhere its document cannot be read from.
    #[error("Access Error: {message} {location}")]
    Access {
        message: String,
        location: ErrorLocation,
    },

    #[error("Submit Error: {message} {location}")]
    Submit {
        message: String,
        location: ErrorLocation,
    },
}

impl HostError {
    pub fn message(&self) -> &str {
        match self {
            HostError::Access { message, .. } | HostError::Submit { message, .. } => message,
        }
    }
}
