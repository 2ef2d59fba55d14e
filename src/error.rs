//! Error types for the paulstretch crate.

use std::fmt;

/// Errors that can occur during time stretching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StretchError {
    /// Invalid stretch configuration (non-finite or non-positive values).
    InvalidConfig(String),
    /// Invalid input audio (no channels, unequal channel lengths, zero rate).
    InvalidInput(String),
    /// Invalid audio format at the WAV boundary.
    InvalidFormat(String),
    /// I/O error.
    IoError(String),
    /// A parallel worker failed; no output was produced.
    WorkerFailure(String),
}

impl fmt::Display for StretchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StretchError::InvalidConfig(msg) => write!(f, "invalid configuration: {}", msg),
            StretchError::InvalidInput(msg) => write!(f, "invalid input: {}", msg),
            StretchError::InvalidFormat(msg) => write!(f, "invalid format: {}", msg),
            StretchError::IoError(msg) => write!(f, "I/O error: {}", msg),
            StretchError::WorkerFailure(msg) => write!(f, "worker failure: {}", msg),
        }
    }
}

impl std::error::Error for StretchError {}

impl From<std::io::Error> for StretchError {
    fn from(err: std::io::Error) -> Self {
        StretchError::IoError(err.to_string())
    }
}
