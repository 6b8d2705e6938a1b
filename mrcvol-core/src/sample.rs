//! Sample types stored in decoded volumes.
//!
//! Native integer and float samples use the Rust primitives directly, half
//! floats use [`half::f16`] and complex floats use [`num_complex::Complex32`].
//! The remaining composite and sub-byte formats get small `Copy` newtypes here
//! so every volume element type carries its [`SampleKind`] at compile time.

pub use half::f16;
pub use num_complex::Complex32;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tag identifying the element type of a volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SampleKind {
    /// Unsigned 4-bit integer.
    UInt4,
    /// Signed 8-bit integer.
    Int8,
    /// Unsigned 8-bit integer.
    UInt8,
    /// Signed 16-bit integer.
    Int16,
    /// Unsigned 16-bit integer.
    UInt16,
    /// IEEE 754 half precision float.
    Float16,
    /// IEEE 754 single precision float.
    Float32,
    /// Gaussian integer with 16-bit parts.
    GaussianInt16,
    /// Complex number with 32-bit float parts.
    ComplexFloat32,
    /// 8-bit RGB triple.
    Rgb,
}

impl SampleKind {
    /// All kinds in bundle order.
    pub const ALL: [SampleKind; 10] = [
        SampleKind::UInt4,
        SampleKind::Int8,
        SampleKind::UInt8,
        SampleKind::Int16,
        SampleKind::UInt16,
        SampleKind::Float16,
        SampleKind::Float32,
        SampleKind::GaussianInt16,
        SampleKind::ComplexFloat32,
        SampleKind::Rgb,
    ];

    /// Short lowercase name used in summaries.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::UInt4 => "uint4",
            Self::Int8 => "int8",
            Self::UInt8 => "uint8",
            Self::Int16 => "int16",
            Self::UInt16 => "uint16",
            Self::Float16 => "float16",
            Self::Float32 => "float32",
            Self::GaussianInt16 => "gaussian_int16",
            Self::ComplexFloat32 => "complex_float32",
            Self::Rgb => "rgb",
        }
    }
}

impl fmt::Display for SampleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Element type of a [`Volume`](crate::Volume).
pub trait Sample: Copy + Default + fmt::Debug + PartialEq + Send + Sync + 'static {
    /// Kind tag for this element type.
    const KIND: SampleKind;
}

impl Sample for i8 {
    const KIND: SampleKind = SampleKind::Int8;
}

impl Sample for u8 {
    const KIND: SampleKind = SampleKind::UInt8;
}

impl Sample for i16 {
    const KIND: SampleKind = SampleKind::Int16;
}

impl Sample for u16 {
    const KIND: SampleKind = SampleKind::UInt16;
}

impl Sample for f32 {
    const KIND: SampleKind = SampleKind::Float32;
}

impl Sample for f16 {
    const KIND: SampleKind = SampleKind::Float16;
}

impl Sample for Complex32 {
    const KIND: SampleKind = SampleKind::ComplexFloat32;
}

/// Unsigned 4-bit value (0..=15).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UInt4(u8);

impl UInt4 {
    /// Largest representable value.
    pub const MAX: u8 = 0x0F;

    /// Creates a value from the low nibble of `v`.
    #[inline]
    #[must_use]
    pub const fn new(v: u8) -> Self {
        Self(v & Self::MAX)
    }

    /// Returns the value as a byte.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl Sample for UInt4 {
    const KIND: SampleKind = SampleKind::UInt4;
}

/// Gaussian integer `re + im·i` with 16-bit parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GaussianInt16 {
    /// Real part.
    pub re: i16,
    /// Imaginary part.
    pub im: i16,
}

impl GaussianInt16 {
    /// Creates a new Gaussian integer.
    #[inline]
    #[must_use]
    pub const fn new(re: i16, im: i16) -> Self {
        Self { re, im }
    }
}

impl Sample for GaussianInt16 {
    const KIND: SampleKind = SampleKind::GaussianInt16;
}

/// 8-bit per channel RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Creates a new color.
    #[inline]
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl Sample for Rgb {
    const KIND: SampleKind = SampleKind::Rgb;
}
