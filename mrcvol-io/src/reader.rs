//! Memory-mapped file readers.
//!

use crate::source::SourceRef;
use crate::Result;
use log::debug;
use memmap2::Mmap;
use mrcvol_core::{DataBundle, DecodedVolume};
use mrcvol_mrc::{DecodeConfig, Header, MrcDecoder};
use std::fs::File;
use std::path::{Path, PathBuf};

/// A memory-mapped file reader.
///
/// Uses memmap2 to access file contents without loading the entire file
/// into memory.
pub struct MappedFileReader {
    mmap: Mmap,
    path: PathBuf,
}

impl MappedFileReader {
    /// Opens a file for memory-mapped reading.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or memory-mapped.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(&path)?;
        // SAFETY: The file is opened read-only and we assume it is not modified concurrently.
        // This is the standard safety contract for memory mapping.
        #[allow(unsafe_code)]
        let mmap = unsafe { Mmap::map(&file)? };
        Ok(Self {
            mmap,
            path: path.as_ref().to_path_buf(),
        })
    }

    /// Returns the file contents as a byte slice.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.mmap[..]
    }

    /// Returns the file size in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.mmap.len()
    }

    /// Returns true if the file is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mmap.is_empty()
    }

    /// Path the file was opened with.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// An MRC file reader with memory-mapped I/O.
///
/// The mapping is decoded with [`MrcDecoder::decode_slice`], which reads it
/// through a sequential cursor like [`MrcDecoder::decode`] on any reader.
pub struct MrcFileReader {
    reader: MappedFileReader,
    source: SourceRef,
    decoder: MrcDecoder,
}

impl MrcFileReader {
    /// Opens an MRC file for reading with default configuration.
    ///
    /// The source reference is checked before the file is touched.
    ///
    /// # Errors
    /// Returns [`crate::Error::MalformedSourceReference`] for unusable
    /// paths, or an I/O error if the file cannot be opened or mapped.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let source = SourceRef::from_path(&path)?;
        let reader = MappedFileReader::open(source.path())?;
        debug!("mapped {} ({} bytes)", source, reader.len());
        Ok(Self {
            reader,
            source,
            decoder: MrcDecoder::new(),
        })
    }

    /// Sets the decoder configuration.
    #[must_use]
    pub fn with_config(mut self, config: DecodeConfig) -> Self {
        self.decoder = MrcDecoder::with_config(config);
        self
    }

    /// Returns the file size in bytes.
    #[must_use]
    pub fn file_size(&self) -> usize {
        self.reader.len()
    }

    /// Source reference recorded on decoded volumes.
    #[must_use]
    pub fn source(&self) -> &SourceRef {
        &self.source
    }

    /// Parses the header without touching sample data.
    ///
    /// # Errors
    /// Returns an error if the header or extended header is truncated.
    pub fn header(&self) -> Result<Header> {
        let mut cursor = self.reader.as_bytes();
        Ok(Header::read_from(&mut cursor)?)
    }

    /// Decodes the file into a single volume.
    ///
    /// Extents larger than the mapped data region are rejected before any
    /// sample storage is allocated.
    ///
    /// # Errors
    /// Returns the decoding error; no partial volume is produced.
    pub fn read_volume(&self) -> Result<DecodedVolume> {
        Ok(self
            .decoder
            .decode_slice(self.reader.as_bytes(), self.source.uri())?)
    }

    /// Decodes the file and appends the volume to `bundle`.
    ///
    /// # Errors
    /// Returns the decoding error and leaves `bundle` unchanged.
    pub fn read_into(&self, bundle: &mut DataBundle) -> Result<()> {
        bundle.push(self.read_volume()?);
        Ok(())
    }
}
