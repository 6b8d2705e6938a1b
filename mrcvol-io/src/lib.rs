//! mrcvol-io: Memory-mapped MRC file reading.
//!
//! Entry points that turn file paths into [`DataBundle`]s. Decoding failures
//! are logged and leave the bundle unchanged; only a malformed path is
//! reported as an error.
//!
//! # Key Components
//!
//! - [`MrcFileReader`] - Memory-mapped reader for one MRC file
//! - [`SourceRef`] - Validated path and its `file:` URI
//! - [`read_all_datasets`] / [`read_many`] - Path-to-bundle entry points

mod error;
mod reader;
mod source;

pub use error::{Error, Result};
pub use reader::{MappedFileReader, MrcFileReader};
pub use source::SourceRef;

use log::{error, warn};
use mrcvol_core::DataBundle;
use mrcvol_mrc::{DecodeConfig, MrcDecoder};
use rayon::prelude::*;
use std::io::Read;
use std::path::Path;

/// Reads every volume in an MRC file with default configuration.
///
/// # Errors
/// Returns [`Error::MalformedSourceReference`] if `path` is unusable.
/// All other failures yield an empty bundle.
pub fn read_all_datasets<P: AsRef<Path>>(path: P) -> Result<DataBundle> {
    read_all_datasets_with_config(path, &DecodeConfig::default())
}

/// Reads every volume in an MRC file.
///
/// # Errors
/// Returns [`Error::MalformedSourceReference`] if `path` is unusable.
/// All other failures yield an empty bundle.
pub fn read_all_datasets_with_config<P: AsRef<Path>>(
    path: P,
    config: &DecodeConfig,
) -> Result<DataBundle> {
    let mut bundle = DataBundle::new();

    let reader = match MrcFileReader::open(path) {
        Ok(reader) => reader.with_config(config.clone()),
        Err(e @ Error::MalformedSourceReference(_)) => return Err(e),
        Err(e) => {
            error!("cannot open MRC file: {e}");
            return Ok(bundle);
        }
    };

    if let Err(e) = reader.read_into(&mut bundle) {
        warn!("{}: no volume decoded: {e}", reader.source());
    }
    Ok(bundle)
}

/// Decodes one MRC stream and appends the volume to `bundle`.
///
/// Returns true if a volume was added.
pub fn read_stream_into<R: Read>(
    reader: &mut R,
    source: &str,
    config: &DecodeConfig,
    bundle: &mut DataBundle,
) -> bool {
    match MrcDecoder::with_config(config.clone()).decode(reader, source) {
        Ok(volume) => {
            bundle.push(volume);
            true
        }
        Err(e) => {
            warn!("{source}: no volume decoded: {e}");
            false
        }
    }
}

/// Reads several files in parallel and merges the results in input order.
///
/// # Errors
/// Returns [`Error::MalformedSourceReference`] if any path is unusable.
pub fn read_many<P>(paths: &[P], config: &DecodeConfig) -> Result<DataBundle>
where
    P: AsRef<Path> + Sync,
{
    let bundles: Vec<DataBundle> = paths
        .par_iter()
        .map(|path| read_all_datasets_with_config(path, config))
        .collect::<Result<_>>()?;

    let mut merged = DataBundle::new();
    for bundle in bundles {
        merged.merge(bundle);
    }
    Ok(merged)
}
