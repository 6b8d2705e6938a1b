//! mrcvol-core: Core types for decoded volumetric data.
//!
//! This crate provides the storage-side abstractions shared by the MRC
//! decoder and its callers: typed samples, dimensioned volumes with a
//! linear coordinate space, and the bundle that collects decoded results.
//!
//! # Key Components
//!
//! - [`Sample`] / [`SampleKind`] - Element types and their kind tags
//! - [`Volume`] - Dimensioned 3-D array with coordinate metadata
//! - [`DecodedVolume`] - A volume of any supported element type
//! - [`DataBundle`] - Decoded volumes grouped by kind

pub mod bundle;
pub mod coords;
pub mod error;
pub mod sample;
pub mod volume;

pub use bundle::{DataBundle, DecodedVolume, VolumeSummary};
pub use coords::{AxisInfo, CoordinateSpace, NDIM};
pub use error::{Error, Result};
pub use sample::{f16, Complex32, GaussianInt16, Rgb, Sample, SampleKind, UInt4};
pub use volume::Volume;
