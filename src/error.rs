use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("failed to read from fix stream")]
    Read(#[source] std::io::Error),

    #[error("failed to write results")]
    Write(#[source] std::io::Error),
}
