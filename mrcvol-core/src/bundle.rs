//! Tagged volumes and the bundle that collects them.

use crate::coords::{AxisInfo, CoordinateSpace, NDIM};
use crate::sample::{f16, Complex32, GaussianInt16, Rgb, SampleKind, UInt4};
use crate::volume::Volume;
use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A decoded volume of any supported element type.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedVolume {
    /// Packed 4-bit samples.
    UInt4(Volume<UInt4>),
    /// Signed bytes.
    Int8(Volume<i8>),
    /// Unsigned bytes.
    UInt8(Volume<u8>),
    /// Signed 16-bit integers.
    Int16(Volume<i16>),
    /// Unsigned 16-bit integers.
    UInt16(Volume<u16>),
    /// Half precision floats.
    Float16(Volume<f16>),
    /// Single precision floats.
    Float32(Volume<f32>),
    /// Gaussian integers with 16-bit parts.
    GaussianInt16(Volume<GaussianInt16>),
    /// Complex values with 32-bit float parts.
    ComplexFloat32(Volume<Complex32>),
    /// RGB colors.
    Rgb(Volume<Rgb>),
}

/// Applies `$body` to the inner volume regardless of element type.
macro_rules! with_inner {
    ($value:expr, $v:ident => $body:expr) => {
        match $value {
            DecodedVolume::UInt4($v) => $body,
            DecodedVolume::Int8($v) => $body,
            DecodedVolume::UInt8($v) => $body,
            DecodedVolume::Int16($v) => $body,
            DecodedVolume::UInt16($v) => $body,
            DecodedVolume::Float16($v) => $body,
            DecodedVolume::Float32($v) => $body,
            DecodedVolume::GaussianInt16($v) => $body,
            DecodedVolume::ComplexFloat32($v) => $body,
            DecodedVolume::Rgb($v) => $body,
        }
    };
}

macro_rules! impl_variants {
    ($($variant:ident => $ty:ty, $as_fn:ident;)*) => {
        $(
            impl From<Volume<$ty>> for DecodedVolume {
                fn from(volume: Volume<$ty>) -> Self {
                    DecodedVolume::$variant(volume)
                }
            }
        )*

        impl DecodedVolume {
            $(
                #[doc = concat!("Returns the inner volume if this is `", stringify!($variant), "`.")]
                #[must_use]
                pub fn $as_fn(&self) -> Option<&Volume<$ty>> {
                    match self {
                        DecodedVolume::$variant(v) => Some(v),
                        _ => None,
                    }
                }
            )*
        }
    };
}

impl_variants! {
    UInt4 => UInt4, as_uint4;
    Int8 => i8, as_int8;
    UInt8 => u8, as_uint8;
    Int16 => i16, as_int16;
    UInt16 => u16, as_uint16;
    Float16 => f16, as_float16;
    Float32 => f32, as_float32;
    GaussianInt16 => GaussianInt16, as_gaussian_int16;
    ComplexFloat32 => Complex32, as_complex_float32;
    Rgb => Rgb, as_rgb;
}

impl DecodedVolume {
    /// Element kind tag.
    #[must_use]
    pub fn kind(&self) -> SampleKind {
        with_inner!(self, v => v.kind())
    }

    /// Extents along X, Y, Z.
    #[must_use]
    pub fn dims(&self) -> [usize; NDIM] {
        with_inner!(self, v => v.dims())
    }

    /// Coordinate space of the inner volume.
    #[must_use]
    pub fn coordinate_space(&self) -> &CoordinateSpace {
        with_inner!(self, v => v.coordinate_space())
    }

    /// Axis name and unit.
    #[must_use]
    pub fn axis(&self, axis: usize) -> Option<&AxisInfo> {
        with_inner!(self, v => v.axis(axis))
    }

    /// Descriptive name.
    #[must_use]
    pub fn name(&self) -> &str {
        with_inner!(self, v => v.name())
    }

    /// Source identifier.
    #[must_use]
    pub fn source(&self) -> &str {
        with_inner!(self, v => v.source())
    }

    /// String metadata.
    #[must_use]
    pub fn metadata(&self) -> &BTreeMap<String, String> {
        with_inner!(self, v => v.metadata())
    }

    /// Serializable overview of the volume, without sample data.
    #[must_use]
    pub fn summary(&self) -> VolumeSummary {
        with_inner!(self, v => VolumeSummary {
            kind: v.kind(),
            dims: v.dims(),
            coordinate_space: *v.coordinate_space(),
            axes: [0, 1, 2].map(|i| v.axis(i).cloned().unwrap_or_default()),
            value_type: v.value_type().to_string(),
            name: v.name().to_string(),
            source: v.source().to_string(),
            metadata: v.metadata().clone(),
        })
    }
}

/// Overview of a decoded volume.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VolumeSummary {
    /// Element kind.
    pub kind: SampleKind,
    /// Extents along X, Y, Z.
    pub dims: [usize; NDIM],
    /// Origin and spacing.
    pub coordinate_space: CoordinateSpace,
    /// Axis names and units.
    pub axes: [AxisInfo; NDIM],
    /// Kind of quantity stored.
    pub value_type: String,
    /// Descriptive name.
    pub name: String,
    /// Source identifier.
    pub source: String,
    /// String metadata.
    pub metadata: BTreeMap<String, String>,
}

/// Decoded volumes grouped by element kind.
///
/// Each successful decode appends one volume; failed decodes leave the
/// bundle untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataBundle {
    volumes: BTreeMap<SampleKind, Vec<DecodedVolume>>,
}

impl DataBundle {
    /// Creates an empty bundle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a volume under its kind.
    pub fn push(&mut self, volume: impl Into<DecodedVolume>) {
        let volume = volume.into();
        self.volumes.entry(volume.kind()).or_default().push(volume);
    }

    /// Total number of volumes across all kinds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.volumes.values().map(Vec::len).sum()
    }

    /// Returns true if no volume has been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.volumes.values().all(Vec::is_empty)
    }

    /// Volumes of one kind, in insertion order.
    #[must_use]
    pub fn volumes(&self, kind: SampleKind) -> &[DecodedVolume] {
        self.volumes
            .get(&kind)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Number of volumes of one kind.
    #[must_use]
    pub fn count(&self, kind: SampleKind) -> usize {
        self.volumes(kind).len()
    }

    /// Kinds that hold at least one volume.
    pub fn kinds(&self) -> impl Iterator<Item = SampleKind> + '_ {
        self.volumes
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(k, _)| *k)
    }

    /// All volumes, grouped by kind.
    pub fn iter(&self) -> impl Iterator<Item = &DecodedVolume> {
        self.volumes.values().flatten()
    }

    /// Moves all volumes from `other` into this bundle.
    pub fn merge(&mut self, other: DataBundle) {
        for (kind, mut list) in other.volumes {
            self.volumes.entry(kind).or_default().append(&mut list);
        }
    }

    /// Consumes the bundle, returning every volume.
    #[must_use]
    pub fn into_volumes(self) -> Vec<DecodedVolume> {
        self.volumes.into_values().flatten().collect()
    }
}
