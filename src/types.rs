//! Shared error and result types

use thiserror::Error;

/// Errors raised by the store and the server bootstrap
#[derive(Debug, Error)]
pub enum CarrosError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CarrosError>;
