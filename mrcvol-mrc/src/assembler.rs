//! Streams the data region into a canonical-order volume.

use crate::axis::{AxisMapping, COLUMN, ROW, SECTION};
use crate::error::{Error, Result};
use crate::header::read_up_to;
use crate::mode::{DecodeFn, PixelFormat, SampleCodec};
use mrcvol_core::{Sample, Volume};
use std::io::{self, Read};

/// Output of a successful assembly.
#[derive(Debug)]
pub struct Assembled<T: Sample> {
    /// The filled volume.
    pub volume: Volume<T>,
    /// Samples whose canonical index fell outside the volume.
    ///
    /// Always zero when the axis mapping is a permutation.
    pub dropped_writes: usize,
}

/// Decode loop driver for one file.
///
/// Samples are read in file order (sections outer, rows middle, columns
/// inner) one row at a time and written to their canonical position.
#[derive(Debug, Clone)]
pub struct Assembler {
    format: PixelFormat,
    mapping: AxisMapping,
    extents: [usize; 3],
    row_alignment: Option<usize>,
    available: Option<usize>,
}

impl Assembler {
    /// Creates an assembler for file-order `extents` `[cols, rows, sections]`.
    #[must_use]
    pub fn new(format: PixelFormat, mapping: AxisMapping, extents: [usize; 3]) -> Self {
        Self {
            format,
            mapping,
            extents,
            row_alignment: None,
            available: None,
        }
    }

    /// Pads each row to a multiple of `alignment` bytes before the next row.
    ///
    /// `None` reads rows back to back.
    #[must_use]
    pub fn with_row_alignment(mut self, alignment: Option<usize>) -> Self {
        self.row_alignment = alignment.filter(|&a| a > 1);
        self
    }

    /// Declares how many data bytes the stream holds.
    ///
    /// A short data region is then rejected before the output volume is
    /// allocated.
    #[must_use]
    pub fn with_available_bytes(mut self, available: Option<usize>) -> Self {
        self.available = available;
        self
    }

    /// Canonical extents of the output volume.
    #[must_use]
    pub fn dims(&self) -> [usize; 3] {
        self.mapping.canonical_dims(self.extents)
    }

    /// Number of logical samples in the data region.
    #[must_use]
    pub fn sample_count(&self) -> usize {
        self.extents
            .iter()
            .fold(1usize, |acc, &e| acc.saturating_mul(e))
    }

    /// Bytes of data per row, excluding padding.
    #[must_use]
    pub fn row_bytes(&self) -> usize {
        self.format.row_bytes(self.extents[COLUMN])
    }

    /// Padding bytes skipped after each row.
    #[must_use]
    pub fn row_padding(&self) -> usize {
        match self.row_alignment {
            Some(align) => (align - self.row_bytes() % align) % align,
            None => 0,
        }
    }

    /// Bytes the data region must hold. The pad after the last row is
    /// optional.
    #[must_use]
    pub fn data_len(&self) -> usize {
        let [_, rows, sections] = self.extents;
        let row_count = rows.saturating_mul(sections);
        if row_count == 0 {
            return 0;
        }
        let stride = self.row_bytes().saturating_add(self.row_padding());
        stride
            .saturating_mul(row_count)
            .saturating_sub(self.row_padding())
    }

    /// Samples that `available` data bytes fully cover, in file order.
    #[must_use]
    pub fn decoded_within(&self, available: usize) -> usize {
        let cols = self.extents[COLUMN];
        let row_bytes = self.row_bytes();
        let stride = row_bytes.saturating_add(self.row_padding());
        if stride == 0 {
            return 0;
        }
        let rows = available / stride;
        let rest = available % stride;
        // A row followed by a short pad is complete
        let (rows, tail) = if rest >= row_bytes {
            (rows + 1, 0)
        } else {
            (rows, rest)
        };
        rows.saturating_mul(cols)
            .saturating_add(self.samples_in(tail))
            .min(self.sample_count())
    }

    /// Samples decodable from the first `bytes` bytes of a row.
    fn samples_in(&self, bytes: usize) -> usize {
        if self.format.is_packed() {
            bytes.saturating_mul(2).min(self.extents[COLUMN])
        } else {
            bytes / self.format.window_len()
        }
    }

    /// Reads and places every sample.
    ///
    /// # Errors
    /// Returns [`Error::TruncatedSampleData`] if the stream ends before the
    /// last sample or when the declared available bytes fall short,
    /// [`Error::IoError`] for other read failures, and [`Error::CoreError`]
    /// if the output volume cannot be allocated.
    pub fn assemble<T, R>(
        &self,
        reader: &mut R,
        codec: SampleCodec,
        decode: DecodeFn<T>,
    ) -> Result<Assembled<T>>
    where
        T: Sample,
        R: Read,
    {
        if let Some(available) = self.available {
            if available < self.data_len() {
                return Err(Error::TruncatedSampleData {
                    decoded: self.decoded_within(available),
                    expected: self.sample_count(),
                });
            }
        }

        let mut volume = Volume::<T>::new(self.dims())?;
        let [cols, rows, sections] = self.extents;
        let window = self.format.window_len();
        let packed = self.format.is_packed();

        let mut row = vec![0u8; self.row_bytes()];
        let padding = self.row_padding() as u64;
        let mut dropped_writes = 0usize;
        let mut rows_done = 0usize;

        for sec in 0..sections {
            for r in 0..rows {
                let got = read_up_to(reader, &mut row)?;
                if got < row.len() {
                    return Err(Error::TruncatedSampleData {
                        decoded: rows_done * cols + self.samples_in(got),
                        expected: self.sample_count(),
                    });
                }

                for col in 0..cols {
                    let start = if packed { col / 2 } else { col * window };
                    let end = if packed { start + 1 } else { start + window };
                    let value = decode(&row[start..end], codec, col % 2 == 0);

                    let mut file_index = [0usize; 3];
                    file_index[COLUMN] = col;
                    file_index[ROW] = r;
                    file_index[SECTION] = sec;
                    if volume
                        .set(self.mapping.canonical_index(file_index), value)
                        .is_err()
                    {
                        dropped_writes += 1;
                    }
                }
                rows_done += 1;

                // A short final pad does not lose any sample.
                if padding > 0 {
                    io::copy(&mut reader.by_ref().take(padding), &mut io::sink())?;
                }
            }
        }

        Ok(Assembled {
            volume,
            dropped_writes,
        })
    }
}
