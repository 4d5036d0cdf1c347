use common::ErrorLocation;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum ContentError {
    #[error("Parent Origin Error: {message} {location}")]
    ParentOrigin {
        message: String,
        location: ErrorLocation,
    },
}
