//! Error types for pomo-widget.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("could not read config {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config format: {0}")]
    ConfigFormat(#[from] serde_json::Error),

    #[error("audio cue failed: {0}")]
    Audio(String),

    #[error("hook `{command}` failed: {source}")]
    Hook {
        command: String,
        source: std::io::Error,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;
