//! MRC decoding error types.

use thiserror::Error;

/// Result type for MRC decoding.
pub type Result<T> = std::result::Result<T, Error>;

/// MRC decoding error types.
#[derive(Error, Debug)]
pub enum Error {
    /// Fewer than 1024 header bytes were available.
    #[error("truncated header: got {got} of {expected} bytes")]
    TruncatedHeader { got: usize, expected: usize },

    /// The extended header ended before its declared size.
    #[error("truncated extended header: got {got} of {expected} bytes")]
    TruncatedExtendedHeader { got: u64, expected: u64 },

    /// Mode code with no pixel format.
    #[error("unsupported pixel format: mode {0}")]
    UnsupportedPixelFormat(i32),

    /// The data region ended before every sample was read.
    #[error("truncated sample data: decoded {decoded} of {expected} samples")]
    TruncatedSampleData { decoded: usize, expected: usize },

    /// Header extents cannot describe a volume.
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// Axis order is not a permutation of 1, 2, 3 (strict mode only).
    #[error("invalid axis order: mapc={mapc}, mapr={mapr}, maps={maps}")]
    InvalidAxisOrder { mapc: i32, mapr: i32, maps: i32 },

    /// Invalid decoder configuration.
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Core library error.
    #[error("core error: {0}")]
    CoreError(#[from] mrcvol_core::Error),
}
