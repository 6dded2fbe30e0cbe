//! TraCI error type.

use thiserror::Error;

/// Errors produced while launching or talking to SUMO.
#[derive(Debug, Error)]
pub enum TraciError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TraCI protocol error: {0}")]
    Protocol(String),

    #[error("expected type tag {expected:#04x}, got {got:#04x}")]
    UnexpectedType { expected: u8, got: u8 },

    #[error("command {command:#04x} failed: {description}")]
    CommandFailed { command: u8, description: String },

    #[error("failed to launch simulator: {0}")]
    Launch(String),

    #[error("could not connect to {addr} after {attempts} attempts")]
    ConnectTimeout { addr: String, attempts: u32 },

    #[error("connection already closed")]
    Closed,
}

pub type TraciResult<T> = Result<T, TraciError>;
