use common::ErrorLocation;

use std::path::PathBuf;

use thiserror::Error as ThisError;

/// Failures loading, saving or validating `bridge.json`.
#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("Bridge Config Read Error: cannot read {path}: {source} {location}")]
    ReadError {
        path: PathBuf,
        location: ErrorLocation,
        #[source]
        source: std::io::Error,
    },

    #[error("Bridge Config Parse Error: {path} is not a valid bridge config: {source} {location}")]
    ParseError {
        path: PathBuf,
        location: ErrorLocation,
        #[source]
        source: serde_json::Error,
    },

    #[error("Bridge Config Write Error: cannot write {path}: {source} {location}")]
    WriteError {
        path: PathBuf,
        location: ErrorLocation,
        #[source]
        source: std::io::Error,
    },

    #[error("Bridge Config Directory Error: {path} does not exist {location}")]
    DirectoryNotFound {
        path: PathBuf,
        location: ErrorLocation,
    },

    #[error("Bridge Config Serialize Error: {source} {location}")]
    SerializeError {
        location: ErrorLocation,
        #[source]
        source: serde_json::Error,
    },

    #[error("Bridge Config Validation Error: {reason} {location}")]
    ValidationError {
        reason: String,
        location: ErrorLocation,
    },
}
