//! Linear coordinate space and axis labels for 3-D volumes.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of axes in a volume.
pub const NDIM: usize = 3;

/// Per-axis linear mapping from sample index to physical position.
///
/// `position[i] = origin[i] + index * spacing[i]`
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CoordinateSpace {
    /// Physical origin per canonical axis (X, Y, Z).
    pub origin: [f64; NDIM],
    /// Sample spacing per canonical axis (X, Y, Z).
    pub spacing: [f64; NDIM],
}

impl Default for CoordinateSpace {
    fn default() -> Self {
        Self::identity()
    }
}

impl CoordinateSpace {
    /// Creates a coordinate space from origins and spacings.
    #[must_use]
    pub fn new(origin: [f64; NDIM], spacing: [f64; NDIM]) -> Self {
        Self { origin, spacing }
    }

    /// Zero origin, unit spacing.
    #[must_use]
    pub fn identity() -> Self {
        Self {
            origin: [0.0; NDIM],
            spacing: [1.0; NDIM],
        }
    }

    /// Physical position of a sample index.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn position(&self, index: [usize; NDIM]) -> [f64; NDIM] {
        let mut out = [0.0; NDIM];
        for (axis, value) in out.iter_mut().enumerate() {
            *value = self.origin[axis] + index[axis] as f64 * self.spacing[axis];
        }
        out
    }
}

/// Name and unit of one volume axis.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AxisInfo {
    /// Axis name, e.g. `"X"`.
    pub name: String,
    /// Physical unit, e.g. `"dist"`.
    pub unit: String,
}

impl AxisInfo {
    /// Creates axis info.
    pub fn new(name: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            unit: unit.into(),
        }
    }
}
