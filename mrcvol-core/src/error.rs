//! Error types for mrcvol-core.

use thiserror::Error;

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for volume operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Sample index outside the volume extents.
    #[error("index {index:?} out of bounds for volume of dims {dims:?}")]
    IndexOutOfBounds {
        index: [usize; 3],
        dims: [usize; 3],
    },

    /// Axis number outside 0..3.
    #[error("invalid axis: {0}")]
    InvalidAxis(usize),

    /// Volume dimensions cannot be allocated.
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),
}
