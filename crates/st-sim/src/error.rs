use st_traci::TraciError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulator error: {0}")]
    Traci(#[from] TraciError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("observer error: {0}")]
    Observer(String),
}

pub type SimResult<T> = Result<T, SimError>;
