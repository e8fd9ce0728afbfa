// ABOUTME: Application-wide error types for gantry.
// ABOUTME: Uses thiserror for ergonomic error handling.

use std::path::PathBuf;
use thiserror::Error;

use crate::management::{SlotApiError, TransportError};

#[derive(Debug, Error)]
pub enum Error {
    #[error("file already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("configuration file not found in {0}")]
    ConfigNotFound(PathBuf),

    #[error("could not read service configuration {path}: {source}")]
    ServiceConfigurationRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Slot(#[from] SlotApiError),
}

pub type Result<T> = std::result::Result<T, Error>;
