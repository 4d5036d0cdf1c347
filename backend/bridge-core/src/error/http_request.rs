use crate::error::form::FormError;
use crate::error::host::HostError;

use common::ErrorLocation;

use std::panic::Location;

use thiserror::Error as ThisError;

pub const TIMEOUT_MESSAGE: &str = "TIMEOUT";
pub const ALREADY_SENT_MESSAGE: &str = "The \"send\" method was already called!";
pub const MISSING_URL_MESSAGE: &str = "Missing \"url\" reference.";
pub const DISPOSED_MESSAGE: &str = "The request was disposed.";

#[derive(Debug, ThisError)]
pub enum HttpRequestError {
    #[error("Url Error: {message} {location}")]
    MissingUrl {
        message: String,
        location: ErrorLocation,
    },

    #[error("Method Error: {message} {location}")]
    UnsupportedMethod {
        message: String,
        location: ErrorLocation,
    },

    #[error("Send Error: {message} {location}")]
    AlreadySent {
        message: String,
        location: ErrorLocation,
    },

    #[error("Form Error: {message} {location}")]
    Form {
        message: String,
        location: ErrorLocation,
        #[source]
        source: FormError,
    },

    #[error("Submit Error: {message} {location}")]
    Submit {
        message: String,
        location: ErrorLocation,
    },

    #[error("Access Error: {message} {location}")]
    Access {
        message: String,
        location: ErrorLocation,
    },

    #[error("Timeout Error: {message} {location}")]
    Timeout {
        message: String,
        location: ErrorLocation,
    },

    #[error("Disposed Error: {message} {location}")]
    Disposed {
        message: String,
        location: ErrorLocation,
    },
}

impl HttpRequestError {
    /// The bare message, without kind prefix or location.
    pub fn message(&self) -> &str {
        match self {
            HttpRequestError::MissingUrl { message, .. }
            | HttpRequestError::UnsupportedMethod { message, .. }
            | HttpRequestError::AlreadySent { message, .. }
            | HttpRequestError::Form { message, .. }
            | HttpRequestError::Submit { message, .. }
            | HttpRequestError::Access { message, .. }
            | HttpRequestError::Timeout { message, .. }
            | HttpRequestError::Disposed { message, .. } => message,
        }
    }

    #[track_caller]
    pub(crate) fn timeout() -> Self {
        HttpRequestError::Timeout {
            message: TIMEOUT_MESSAGE.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub(crate) fn disposed() -> Self {
        HttpRequestError::Disposed {
            message: DISPOSED_MESSAGE.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<HostError> for HttpRequestError {
    #[track_caller]
    fn from(error: HostError) -> Self {
        let location = ErrorLocation::from(Location::caller());
        match error {
            HostError::Access { message, .. } => HttpRequestError::Access { message, location },
            HostError::Submit { message, .. } => HttpRequestError::Submit { message, location },
        }
    }
}
