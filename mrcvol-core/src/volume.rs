//! Dimensioned 3-D volume with coordinate and descriptive metadata.

use crate::coords::{AxisInfo, CoordinateSpace, NDIM};
use crate::error::{Error, Result};
use crate::sample::{Sample, SampleKind};
use ndarray::{Array3, ArrayView3};
use std::collections::BTreeMap;

/// A 3-D array of samples in canonical `[X, Y, Z]` index order.
///
/// The array is allocated once with its final extents; samples are then
/// written in place by index.
#[derive(Debug, Clone, PartialEq)]
pub struct Volume<T: Sample> {
    data: Array3<T>,
    coordinate_space: CoordinateSpace,
    axes: [AxisInfo; NDIM],
    value_type: String,
    value_unit: String,
    name: String,
    source: String,
    metadata: BTreeMap<String, String>,
}

impl<T: Sample> Volume<T> {
    /// Allocates a volume filled with `T::default()`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidDimensions`] if the sample count or the byte
    /// size of the array overflows `isize`.
    pub fn new(dims: [usize; NDIM]) -> Result<Self> {
        let fits = dims
            .iter()
            .try_fold(1usize, |acc, &d| acc.checked_mul(d))
            .and_then(|n| n.checked_mul(std::mem::size_of::<T>()))
            .is_some_and(|bytes| isize::try_from(bytes).is_ok());
        if !fits {
            return Err(Error::InvalidDimensions(format!(
                "{dims:?} exceeds addressable size"
            )));
        }

        Ok(Self::from_array(Array3::default((dims[0], dims[1], dims[2]))))
    }

    /// Wraps an existing array with default metadata.
    #[must_use]
    pub fn from_array(data: Array3<T>) -> Self {
        Self {
            data,
            coordinate_space: CoordinateSpace::identity(),
            axes: Default::default(),
            value_type: String::new(),
            value_unit: String::new(),
            name: String::new(),
            source: String::new(),
            metadata: BTreeMap::new(),
        }
    }

    /// Element kind of this volume.
    #[must_use]
    pub fn kind(&self) -> SampleKind {
        T::KIND
    }

    /// Extents along X, Y, Z.
    #[must_use]
    pub fn dims(&self) -> [usize; NDIM] {
        let (x, y, z) = self.data.dim();
        [x, y, z]
    }

    /// Total number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if any extent is zero.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Reads the sample at `index`, or `None` when out of bounds.
    #[inline]
    #[must_use]
    pub fn get(&self, index: [usize; NDIM]) -> Option<T> {
        self.data.get(index).copied()
    }

    /// Writes the sample at `index`.
    ///
    /// # Errors
    /// Returns [`Error::IndexOutOfBounds`] when `index` lies outside the volume.
    #[inline]
    pub fn set(&mut self, index: [usize; NDIM], value: T) -> Result<()> {
        let dims = self.dims();
        match self.data.get_mut(index) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(Error::IndexOutOfBounds { index, dims }),
        }
    }

    /// Read-only view of the samples.
    #[must_use]
    pub fn view(&self) -> ArrayView3<'_, T> {
        self.data.view()
    }

    /// Borrows the underlying array.
    #[must_use]
    pub fn data(&self) -> &Array3<T> {
        &self.data
    }

    /// Consumes the volume, returning the underlying array.
    #[must_use]
    pub fn into_data(self) -> Array3<T> {
        self.data
    }

    /// Coordinate space of the volume.
    #[must_use]
    pub fn coordinate_space(&self) -> &CoordinateSpace {
        &self.coordinate_space
    }

    /// Replaces the coordinate space.
    pub fn set_coordinate_space(&mut self, space: CoordinateSpace) {
        self.coordinate_space = space;
    }

    /// Axis name and unit for `axis`.
    #[must_use]
    pub fn axis(&self, axis: usize) -> Option<&AxisInfo> {
        self.axes.get(axis)
    }

    /// Sets the name and unit of `axis`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidAxis`] when `axis >= 3`.
    pub fn set_axis(&mut self, axis: usize, info: AxisInfo) -> Result<()> {
        let slot = self.axes.get_mut(axis).ok_or(Error::InvalidAxis(axis))?;
        *slot = info;
        Ok(())
    }

    /// Kind of quantity stored, e.g. `"intensity"`.
    #[must_use]
    pub fn value_type(&self) -> &str {
        &self.value_type
    }

    /// Unit of the stored quantity.
    #[must_use]
    pub fn value_unit(&self) -> &str {
        &self.value_unit
    }

    /// Sets the value type and unit.
    pub fn set_value_type(&mut self, value_type: impl Into<String>, unit: impl Into<String>) {
        self.value_type = value_type.into();
        self.value_unit = unit.into();
    }

    /// Descriptive name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sets the descriptive name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Identifier of where the data came from.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Sets the source identifier.
    pub fn set_source(&mut self, source: impl Into<String>) {
        self.source = source.into();
    }

    /// String metadata, ordered by key.
    #[must_use]
    pub fn metadata(&self) -> &BTreeMap<String, String> {
        &self.metadata
    }

    /// Inserts a metadata entry, returning any previous value.
    pub fn insert_metadata(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Option<String> {
        self.metadata.insert(key.into(), value.into())
    }
}
