//! File-order to canonical axis mapping.
//!
//! The header names, for each file axis (column, row, section), the
//! canonical axis (X, Y, Z) it feeds. Values outside `1..=3` fall back to the
//! positional default. Duplicates are accepted: later file axes overwrite
//! earlier ones when placing per-axis values, and the column index wins when
//! several file axes target the same canonical index.

use crate::error::{Error, Result};
use crate::header::HeaderFields;

/// File axis indices.
pub const COLUMN: usize = 0;
/// Row axis.
pub const ROW: usize = 1;
/// Section axis.
pub const SECTION: usize = 2;

/// Canonical destination of each file axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisMapping {
    canonical: [usize; 3],
}

impl Default for AxisMapping {
    fn default() -> Self {
        Self::identity()
    }
}

impl AxisMapping {
    /// Columns to X, rows to Y, sections to Z.
    #[must_use]
    pub const fn identity() -> Self {
        Self {
            canonical: [0, 1, 2],
        }
    }

    /// Builds the mapping from 1-based header values.
    #[must_use]
    pub fn from_header_order(mapc: i32, mapr: i32, maps: i32) -> Self {
        let mut canonical = [0usize; 3];
        for (file_axis, raw) in [mapc, mapr, maps].into_iter().enumerate() {
            canonical[file_axis] = match raw {
                1..=3 => usize::try_from(raw - 1).unwrap_or(file_axis),
                _ => file_axis,
            };
        }
        Self { canonical }
    }

    /// Builds the mapping from parsed header fields.
    #[must_use]
    pub fn from_fields(fields: &HeaderFields) -> Self {
        let [mapc, mapr, maps] = fields.axis_order;
        Self::from_header_order(mapc, mapr, maps)
    }

    /// Like [`from_fields`](Self::from_fields), but rejects anything that is
    /// not a permutation of 1, 2, 3.
    ///
    /// # Errors
    /// Returns [`Error::InvalidAxisOrder`] for out-of-range or repeated values.
    pub fn from_fields_strict(fields: &HeaderFields) -> Result<Self> {
        let [mapc, mapr, maps] = fields.axis_order;
        let in_range = fields.axis_order.iter().all(|v| (1..=3).contains(v));
        let mapping = Self::from_header_order(mapc, mapr, maps);
        if in_range && mapping.is_permutation() {
            Ok(mapping)
        } else {
            Err(Error::InvalidAxisOrder { mapc, mapr, maps })
        }
    }

    /// Canonical axis fed by `file_axis`.
    #[inline]
    #[must_use]
    pub fn canonical_axis(&self, file_axis: usize) -> usize {
        self.canonical[file_axis]
    }

    /// Returns true if every canonical axis is fed by exactly one file axis.
    #[must_use]
    pub fn is_permutation(&self) -> bool {
        let mut seen = [false; 3];
        for &c in &self.canonical {
            seen[c] = true;
        }
        seen.iter().all(|&s| s)
    }

    /// Canonical index of the sample at file position `[col, row, sec]`.
    #[inline]
    #[must_use]
    pub fn canonical_index(&self, file_index: [usize; 3]) -> [usize; 3] {
        let mut out = [0usize; 3];
        out[self.canonical[SECTION]] = file_index[SECTION];
        out[self.canonical[ROW]] = file_index[ROW];
        out[self.canonical[COLUMN]] = file_index[COLUMN];
        out
    }

    /// Places per-file-axis values into canonical slots.
    ///
    /// Slots no file axis maps to keep `fill`.
    #[must_use]
    pub fn place<V: Copy>(&self, per_file_axis: [V; 3], fill: V) -> [V; 3] {
        let mut out = [fill; 3];
        for (file_axis, value) in per_file_axis.into_iter().enumerate() {
            out[self.canonical[file_axis]] = value;
        }
        out
    }

    /// Canonical extents for file-order extents `[cols, rows, sections]`.
    #[must_use]
    pub fn canonical_dims(&self, extents: [usize; 3]) -> [usize; 3] {
        self.place(extents, 1)
    }
}
