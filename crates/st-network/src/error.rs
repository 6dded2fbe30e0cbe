//! Network-loading error type.

use thiserror::Error;

/// Errors produced by `st-network`.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML error at byte {position}: {source}")]
    Xml {
        position: u64,
        #[source]
        source:   quick_xml::Error,
    },

    #[error("<{element}> element is missing the `{attribute}` attribute")]
    MissingAttribute { element: &'static str, attribute: &'static str },
}

pub type NetworkResult<T> = Result<T, NetworkError>;
