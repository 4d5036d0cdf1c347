use common::ErrorLocation;

use bridge_core::error::BridgeError;

use std::panic::Location;

use serde::Serialize;
use thiserror::Error;

/// Errors surfaced by the demo binary.
///
/// Serializable so a failed run can still be reported as JSON on stderr.
#[derive(Debug, Error, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum DemoError {
    /// Error from the demo itself (setup, unexpected outcomes)
    #[error("Demo Error: {message} {location}")]
    Demo {
        message: String,
        location: ErrorLocation,
    },

    /// Error from a bridge component
    #[error("Bridge Error: {message} {location}")]
    Bridge {
        message: String,
        location: ErrorLocation,
    },

    /// Config could not be loaded
    #[error("Config Error: {message} {location}")]
    Config {
        message: String,
        location: ErrorLocation,
    },
}

impl DemoError {
    #[track_caller]
    pub fn demo(message: impl Into<String>) -> Self {
        Self::Demo {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn bridge(error: impl Into<BridgeError>) -> Self {
        Self::Bridge {
            message: error.into().to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
