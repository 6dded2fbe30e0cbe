//! Shared error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` where they
//! need it; prefer whichever keeps error sites clean.

use thiserror::Error;

/// The base error type for `st-core`.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for `st-core`.
pub type CoreResult<T> = Result<T, CoreError>;
