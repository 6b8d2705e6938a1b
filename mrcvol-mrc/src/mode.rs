//! Pixel format registry.
//!
//! Maps the header `mode` code to a [`PixelFormat`] and provides the
//! per-sample decode functions. Decoders are plain function pointers chosen
//! once per file; byte order travels in an explicit [`SampleCodec`].

use crate::error::{Error, Result};
use crate::header::HeaderFields;
use byteorder::{BigEndian, ByteOrder, LittleEndian};
use mrcvol_core::{f16, Complex32, GaussianInt16, Rgb, SampleKind, UInt4};
use serde::{Deserialize, Serialize};

/// Largest decode window of any format, in bytes.
pub const MAX_WINDOW_LEN: usize = 8;

/// Decodes one sample from its byte window.
///
/// The `bool` is true for even column indices; only packed 4-bit samples
/// look at it.
pub type DecodeFn<T> = fn(&[u8], SampleCodec, bool) -> T;

/// Byte order used for 16-bit sample fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Int16ByteOrder {
    /// Always big-endian, regardless of the machine stamp.
    #[default]
    #[serde(rename = "big")]
    BigEndian,
    /// Same order as the rest of the header.
    #[serde(rename = "header")]
    FollowHeader,
}

/// Byte-order context for sample decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleCodec {
    /// 32-bit fields are little-endian.
    pub little_endian: bool,
    /// Policy for 16-bit fields.
    pub int16_order: Int16ByteOrder,
}

impl SampleCodec {
    /// Creates a codec.
    #[must_use]
    pub fn new(little_endian: bool, int16_order: Int16ByteOrder) -> Self {
        Self {
            little_endian,
            int16_order,
        }
    }

    #[inline]
    fn int16_little_endian(self) -> bool {
        match self.int16_order {
            Int16ByteOrder::BigEndian => false,
            Int16ByteOrder::FollowHeader => self.little_endian,
        }
    }

    /// Reads a signed 16-bit value under the 16-bit policy.
    #[inline]
    #[must_use]
    pub fn read_i16(self, bytes: &[u8]) -> i16 {
        if self.int16_little_endian() {
            LittleEndian::read_i16(bytes)
        } else {
            BigEndian::read_i16(bytes)
        }
    }

    /// Reads an unsigned 16-bit value under the 16-bit policy.
    #[inline]
    #[must_use]
    pub fn read_u16(self, bytes: &[u8]) -> u16 {
        if self.int16_little_endian() {
            LittleEndian::read_u16(bytes)
        } else {
            BigEndian::read_u16(bytes)
        }
    }

    /// Reads a 32-bit float in the header byte order.
    #[inline]
    #[must_use]
    pub fn read_f32(self, bytes: &[u8]) -> f32 {
        if self.little_endian {
            LittleEndian::read_f32(bytes)
        } else {
            BigEndian::read_f32(bytes)
        }
    }
}

/// Supported MRC pixel formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PixelFormat {
    /// Mode 0, unsigned bytes.
    UInt8,
    /// Mode 0 with the IMOD signed-bytes flag.
    Int8,
    /// Mode 1.
    Int16,
    /// Mode 2.
    Float32,
    /// Mode 3, (real, imag) 16-bit pair.
    GaussianInt16,
    /// Mode 4, (real, imag) float pair.
    ComplexFloat32,
    /// Mode 6.
    UInt16,
    /// Mode 12, raw binary16.
    Float16,
    /// Mode 16, three bytes.
    Rgb,
    /// Mode 101, two 4-bit samples per byte.
    UInt4Pair,
}

impl PixelFormat {
    /// Looks up the format for a mode code.
    ///
    /// `signed_bytes` selects between the two mode 0 variants.
    ///
    /// # Errors
    /// Returns [`Error::UnsupportedPixelFormat`] for unknown codes.
    pub fn from_mode(mode: i32, signed_bytes: bool) -> Result<Self> {
        match mode {
            0 if signed_bytes => Ok(Self::Int8),
            0 => Ok(Self::UInt8),
            1 => Ok(Self::Int16),
            2 => Ok(Self::Float32),
            3 => Ok(Self::GaussianInt16),
            4 => Ok(Self::ComplexFloat32),
            6 => Ok(Self::UInt16),
            12 => Ok(Self::Float16),
            16 => Ok(Self::Rgb),
            101 => Ok(Self::UInt4Pair),
            _ => Err(Error::UnsupportedPixelFormat(mode)),
        }
    }

    /// Looks up the format named by a parsed header.
    ///
    /// # Errors
    /// Returns [`Error::UnsupportedPixelFormat`] for unknown codes.
    pub fn for_header(fields: &HeaderFields) -> Result<Self> {
        Self::from_mode(fields.mode, fields.signed_bytes())
    }

    /// Header mode code.
    #[must_use]
    pub const fn mode(self) -> i32 {
        match self {
            Self::UInt8 | Self::Int8 => 0,
            Self::Int16 => 1,
            Self::Float32 => 2,
            Self::GaussianInt16 => 3,
            Self::ComplexFloat32 => 4,
            Self::UInt16 => 6,
            Self::Float16 => 12,
            Self::Rgb => 16,
            Self::UInt4Pair => 101,
        }
    }

    /// Element kind produced by this format.
    #[must_use]
    pub const fn kind(self) -> SampleKind {
        match self {
            Self::UInt8 => SampleKind::UInt8,
            Self::Int8 => SampleKind::Int8,
            Self::Int16 => SampleKind::Int16,
            Self::Float32 => SampleKind::Float32,
            Self::GaussianInt16 => SampleKind::GaussianInt16,
            Self::ComplexFloat32 => SampleKind::ComplexFloat32,
            Self::UInt16 => SampleKind::UInt16,
            Self::Float16 => SampleKind::Float16,
            Self::Rgb => SampleKind::Rgb,
            Self::UInt4Pair => SampleKind::UInt4,
        }
    }

    /// Bytes per logical sample; 0.5 for packed 4-bit.
    #[must_use]
    pub const fn bytes_per_sample(self) -> f32 {
        match self {
            Self::UInt4Pair => 0.5,
            Self::UInt8 | Self::Int8 => 1.0,
            Self::Int16 | Self::UInt16 | Self::Float16 => 2.0,
            Self::Rgb => 3.0,
            Self::Float32 | Self::GaussianInt16 => 4.0,
            Self::ComplexFloat32 => 8.0,
        }
    }

    /// Bytes consumed per physical read.
    #[must_use]
    pub const fn window_len(self) -> usize {
        match self {
            Self::UInt4Pair | Self::UInt8 | Self::Int8 => 1,
            Self::Int16 | Self::UInt16 | Self::Float16 => 2,
            Self::Rgb => 3,
            Self::Float32 | Self::GaussianInt16 => 4,
            Self::ComplexFloat32 => 8,
        }
    }

    /// Two logical samples share one physical byte.
    #[must_use]
    pub const fn is_packed(self) -> bool {
        matches!(self, Self::UInt4Pair)
    }

    /// Bytes occupied by one row of `cols` samples.
    #[must_use]
    pub const fn row_bytes(self, cols: usize) -> usize {
        if self.is_packed() {
            cols.div_ceil(2)
        } else {
            cols * self.window_len()
        }
    }
}

/// Mode 101: low nibble for even columns, high nibble for odd.
#[inline]
#[must_use]
pub fn decode_uint4(window: &[u8], _codec: SampleCodec, even: bool) -> UInt4 {
    if even {
        UInt4::new(window[0] & 0x0F)
    } else {
        UInt4::new((window[0] & 0xF0) >> 4)
    }
}

/// Mode 0, unsigned.
#[inline]
#[must_use]
pub fn decode_uint8(window: &[u8], _codec: SampleCodec, _even: bool) -> u8 {
    window[0]
}

/// Mode 0, signed.
#[inline]
#[must_use]
pub fn decode_int8(window: &[u8], _codec: SampleCodec, _even: bool) -> i8 {
    i8::from_ne_bytes([window[0]])
}

/// Mode 1.
#[inline]
#[must_use]
pub fn decode_int16(window: &[u8], codec: SampleCodec, _even: bool) -> i16 {
    codec.read_i16(window)
}

/// Mode 6.
#[inline]
#[must_use]
pub fn decode_uint16(window: &[u8], codec: SampleCodec, _even: bool) -> u16 {
    codec.read_u16(window)
}

/// Mode 2.
#[inline]
#[must_use]
pub fn decode_float32(window: &[u8], codec: SampleCodec, _even: bool) -> f32 {
    codec.read_f32(window)
}

/// Mode 3.
#[inline]
#[must_use]
pub fn decode_gaussian_int16(window: &[u8], codec: SampleCodec, _even: bool) -> GaussianInt16 {
    GaussianInt16::new(codec.read_i16(&window[0..2]), codec.read_i16(&window[2..4]))
}

/// Mode 4.
#[inline]
#[must_use]
pub fn decode_complex_float32(window: &[u8], codec: SampleCodec, _even: bool) -> Complex32 {
    Complex32::new(codec.read_f32(&window[0..4]), codec.read_f32(&window[4..8]))
}

/// Mode 12.
#[inline]
#[must_use]
pub fn decode_float16(window: &[u8], codec: SampleCodec, _even: bool) -> f16 {
    f16::from_bits(codec.read_u16(window))
}

/// Mode 16.
#[inline]
#[must_use]
pub fn decode_rgb(window: &[u8], _codec: SampleCodec, _even: bool) -> Rgb {
    Rgb::new(window[0], window[1], window[2])
}
