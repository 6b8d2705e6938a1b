//! I/O error types.

use thiserror::Error;

/// Result type for I/O operations.
pub type Result<T> = std::result::Result<T, Error>;

/// I/O error types.
#[derive(Error, Debug)]
pub enum Error {
    /// The path cannot be turned into a source reference.
    #[error("malformed source reference: {0}")]
    MalformedSourceReference(String),

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// MRC decoding error.
    #[error("format error: {0}")]
    Format(#[from] mrcvol_mrc::Error),
}
