//! Error types for orca-core.

use thiserror::Error;

/// Error type for orca-core operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("MIDI: {0}")]
    Midi(#[from] orca_midi::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Error::InvalidConfig(message.into())
    }
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, Error>;
