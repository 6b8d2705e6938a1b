//! mrcvol-mrc: MRC header parser, pixel format registry, and volume decoder.
//!
//! This crate turns one MRC/CCP4 byte stream into a [`DecodedVolume`]: a
//! typed 3-D array in canonical X, Y, Z order carrying its physical origin,
//! spacing, axis tags, and header labels.
//!
//! # Key Components
//!
//! - [`Header`] - Fixed 1024-byte header plus extended-header skip
//! - [`PixelFormat`] - Mode code registry with per-format decode functions
//! - [`AxisMapping`] - File-order (column, row, section) to canonical axes
//! - [`Assembler`] - Streams samples in file order into the output array
//! - [`MrcDecoder`] - Runs the whole pipeline for one stream
//!
//! # Processing Pipeline
//!
//! 1. Parse the header and detect byte order from the machine stamp
//! 2. Select the pixel format, axis mapping, and coordinate space
//! 3. Assemble samples row by row, then attach labels and axis tags

mod assembler;
mod axis;
pub mod coords;
mod decoder;
mod error;
pub mod header;
pub mod labels;
pub mod mode;

pub use assembler::{Assembled, Assembler};
pub use axis::AxisMapping;
pub use decoder::MrcDecoder;
pub use error::{Error, Result};
pub use header::{Header, HeaderFields, RawHeader, HEADER_SIZE};
pub use mode::{Int16ByteOrder, PixelFormat, SampleCodec};

// Re-export core types for convenience
pub use mrcvol_core::DecodedVolume;

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Largest accepted [`DecodeConfig::row_alignment`].
pub const MAX_ROW_ALIGNMENT: usize = 4096;

/// Decoder options.
///
/// Every field has a default, so partial JSON documents are accepted:
///
/// ```json
/// { "int16_byte_order": "header", "row_alignment": 4 }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeConfig {
    /// Byte order for 16-bit sample fields (modes 1, 3, 6, 12).
    pub int16_byte_order: Int16ByteOrder,
    /// Pad each row to a multiple of this many bytes. `None` reads rows back
    /// to back.
    pub row_alignment: Option<usize>,
    /// Reject axis orders that are not a permutation of 1, 2, 3.
    pub strict_axis_order: bool,
}

impl DecodeConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the 16-bit sample byte order.
    #[must_use]
    pub fn with_int16_byte_order(mut self, order: Int16ByteOrder) -> Self {
        self.int16_byte_order = order;
        self
    }

    /// Sets the row alignment.
    #[must_use]
    pub fn with_row_alignment(mut self, alignment: Option<usize>) -> Self {
        self.row_alignment = alignment;
        self
    }

    /// Enables or disables strict axis order checking.
    #[must_use]
    pub fn with_strict_axis_order(mut self, strict: bool) -> Self {
        self.strict_axis_order = strict;
        self
    }

    /// Load configuration from a JSON file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened, is not valid JSON, or
    /// fails [`validate`](Self::validate).
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let config: Self =
            serde_json::from_reader(reader).map_err(|e| Error::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON string.
    ///
    /// # Errors
    /// Returns an error if the string is not valid JSON or fails
    /// [`validate`](Self::validate).
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| Error::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks option values.
    ///
    /// # Errors
    /// Returns [`Error::ConfigError`] if `row_alignment` is zero or larger
    /// than [`MAX_ROW_ALIGNMENT`].
    pub fn validate(&self) -> Result<()> {
        match self.row_alignment {
            Some(0) => Err(Error::ConfigError(
                "row_alignment must be at least 1".into(),
            )),
            Some(a) if a > MAX_ROW_ALIGNMENT => Err(Error::ConfigError(format!(
                "row_alignment {a} exceeds {MAX_ROW_ALIGNMENT}"
            ))),
            _ => Ok(()),
        }
    }
}
