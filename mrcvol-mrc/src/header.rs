//! MRC header parsing.
//!
//! The fixed header is 1024 bytes. All 32-bit integer and float fields follow
//! the byte order named by the machine stamp at offset 212. An extended header
//! of `NSYMBT` bytes may follow; it is skipped without interpretation.

use crate::error::{Error, Result};
use crate::labels;
use byteorder::{BigEndian, ByteOrder, LittleEndian};
use serde::{Deserialize, Serialize};
use std::io::{self, Read};

/// Size of the fixed header in bytes.
pub const HEADER_SIZE: usize = 1024;

/// IMOD stamp value marking files that use the IMOD flag conventions.
pub const IMOD_STAMP: i32 = 1_146_047_817;

/// IMOD flag: bytes are signed.
pub const FLAG_SIGNED_BYTES: i32 = 1;

/// IMOD flag: origin is stored with inverted sign.
pub const FLAG_INVERTED_ORIGIN: i32 = 4;

/// Header field byte offsets.
pub mod offsets {
    pub const NX: usize = 0;
    pub const NY: usize = 4;
    pub const NZ: usize = 8;
    pub const MODE: usize = 12;
    pub const MX: usize = 28;
    pub const MY: usize = 32;
    pub const MZ: usize = 36;
    pub const XLEN: usize = 40;
    pub const YLEN: usize = 44;
    pub const ZLEN: usize = 48;
    pub const MAPC: usize = 64;
    pub const MAPR: usize = 68;
    pub const MAPS: usize = 72;
    pub const DMIN: usize = 76;
    pub const DMAX: usize = 80;
    pub const DMEAN: usize = 84;
    pub const ISPG: usize = 88;
    pub const NSYMBT: usize = 92;
    pub const IMOD_STAMP: usize = 152;
    pub const IMOD_FLAGS: usize = 156;
    pub const ORIGIN_X: usize = 196;
    pub const ORIGIN_Y: usize = 200;
    pub const ORIGIN_Z: usize = 204;
    pub const MAP: usize = 208;
    // Old-style origin shares bytes with MAP and MACHST.
    pub const OLD_ORIGIN_Z: usize = 208;
    pub const OLD_ORIGIN_X: usize = 212;
    pub const OLD_ORIGIN_Y: usize = 216;
    pub const MACHST: usize = 212;
    pub const NLABL: usize = 220;
    pub const LABELS: usize = 224;
}

/// Marker identifying new-style headers.
pub const MAP_MARKER: &[u8; 4] = b"MAP ";

/// The fixed 1024-byte header with its detected byte order.
#[derive(Clone)]
pub struct RawHeader {
    bytes: [u8; HEADER_SIZE],
    little_endian: bool,
}

impl std::fmt::Debug for RawHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawHeader")
            .field("little_endian", &self.little_endian)
            .finish_non_exhaustive()
    }
}

impl RawHeader {
    /// Wraps header bytes, detecting byte order from the machine stamp.
    #[must_use]
    pub fn from_bytes(bytes: [u8; HEADER_SIZE]) -> Self {
        let stamp = [
            bytes[offsets::MACHST],
            bytes[offsets::MACHST + 1],
            bytes[offsets::MACHST + 2],
            bytes[offsets::MACHST + 3],
        ];
        Self {
            bytes,
            little_endian: is_little_endian_stamp(stamp),
        }
    }

    /// Reads exactly [`HEADER_SIZE`] bytes.
    ///
    /// # Errors
    /// Returns [`Error::TruncatedHeader`] if the stream ends early.
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let mut bytes = [0u8; HEADER_SIZE];
        let got = read_up_to(reader, &mut bytes)?;
        if got < HEADER_SIZE {
            return Err(Error::TruncatedHeader {
                got,
                expected: HEADER_SIZE,
            });
        }
        Ok(Self::from_bytes(bytes))
    }

    /// Returns true if multi-byte fields are little-endian.
    #[must_use]
    pub fn little_endian(&self) -> bool {
        self.little_endian
    }

    /// Raw header bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; HEADER_SIZE] {
        &self.bytes
    }

    /// Parses every field used by the decoder.
    #[must_use]
    pub fn fields(&self) -> HeaderFields {
        if self.little_endian {
            parse_fields::<LittleEndian>(&self.bytes, true)
        } else {
            parse_fields::<BigEndian>(&self.bytes, false)
        }
    }
}

/// Machine stamp check.
///
/// `0x44 0x44` and `0x44 0x41` mark little-endian files, `0x11 0x11`
/// big-endian. Unrecognized stamps are treated as little-endian.
#[must_use]
pub fn is_little_endian_stamp(stamp: [u8; 4]) -> bool {
    match stamp {
        [0x44, 0x44 | 0x41, _, _] => true,
        [0x11, 0x11, _, _] => false,
        _ => true,
    }
}

/// Scalar header fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaderFields {
    /// Number of columns (fastest varying in file order).
    pub cols: i32,
    /// Number of rows.
    pub rows: i32,
    /// Number of sections (slowest varying).
    pub sections: i32,
    /// Pixel format code.
    pub mode: i32,
    /// Sampling grid size along X, Y, Z.
    pub grid: [i32; 3],
    /// Cell length along X, Y, Z.
    pub cell_length: [f32; 3],
    /// Canonical axis (1-based) for columns, rows, sections.
    pub axis_order: [i32; 3],
    /// Minimum density value.
    pub dmin: f32,
    /// Maximum density value.
    pub dmax: f32,
    /// Mean density value.
    pub dmean: f32,
    /// Space group number.
    pub ispg: i32,
    /// Extended header size in bytes.
    pub extended_header_size: i32,
    /// IMOD stamp present at offset 152.
    pub is_stamped: bool,
    /// IMOD flag bits.
    pub flag_bits: i32,
    /// New-style origin (X, Y, Z).
    pub origin: [f32; 3],
    /// Old-style origin, reordered to (X, Y, Z).
    pub old_origin: [f32; 3],
    /// `"MAP "` present at offset 208.
    pub has_map_marker: bool,
    /// Detected byte order.
    pub little_endian: bool,
    /// Number of valid labels, clamped to 0..=10.
    pub num_labels: usize,
    /// All ten label fields, one char per byte.
    pub labels: Vec<String>,
}

impl HeaderFields {
    /// Bytes are signed (mode 0).
    #[must_use]
    pub fn signed_bytes(&self) -> bool {
        self.is_stamped && (self.flag_bits & FLAG_SIGNED_BYTES) == FLAG_SIGNED_BYTES
    }

    /// Origin components must be negated.
    #[must_use]
    pub fn inverted_origin(&self) -> bool {
        self.is_stamped && (self.flag_bits & FLAG_INVERTED_ORIGIN) == FLAG_INVERTED_ORIGIN
    }

    /// File-order extents `[cols, rows, sections]`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidDimensions`] if any extent is negative.
    pub fn extents(&self) -> Result<[usize; 3]> {
        let convert = |name: &str, v: i32| {
            usize::try_from(v).map_err(|_| {
                Error::InvalidDimensions(format!("{name} must be non-negative, got {v}"))
            })
        };
        Ok([
            convert("columns", self.cols)?,
            convert("rows", self.rows)?,
            convert("sections", self.sections)?,
        ])
    }

    /// Extended header size, treating negative values as zero.
    #[must_use]
    pub fn extended_header_len(&self) -> u64 {
        u64::try_from(self.extended_header_size).unwrap_or(0)
    }

    /// Labels in use.
    #[must_use]
    pub fn active_labels(&self) -> &[String] {
        &self.labels[..self.num_labels.min(self.labels.len())]
    }
}

fn parse_fields<E: ByteOrder>(bytes: &[u8; HEADER_SIZE], little_endian: bool) -> HeaderFields {
    use offsets::{
        DMAX, DMEAN, DMIN, IMOD_FLAGS, IMOD_STAMP as STAMP, ISPG, MAP, MAPC, MAPR, MAPS, MODE,
        MX, MY, MZ, NLABL, NSYMBT, NX, NY, NZ, OLD_ORIGIN_X, OLD_ORIGIN_Y, OLD_ORIGIN_Z,
        ORIGIN_X, ORIGIN_Y, ORIGIN_Z, XLEN, YLEN, ZLEN,
    };

    let i32_at = |offset: usize| E::read_i32(&bytes[offset..offset + 4]);
    let f32_at = |offset: usize| E::read_f32(&bytes[offset..offset + 4]);

    HeaderFields {
        cols: i32_at(NX),
        rows: i32_at(NY),
        sections: i32_at(NZ),
        mode: i32_at(MODE),
        grid: [i32_at(MX), i32_at(MY), i32_at(MZ)],
        cell_length: [f32_at(XLEN), f32_at(YLEN), f32_at(ZLEN)],
        axis_order: [i32_at(MAPC), i32_at(MAPR), i32_at(MAPS)],
        dmin: f32_at(DMIN),
        dmax: f32_at(DMAX),
        dmean: f32_at(DMEAN),
        ispg: i32_at(ISPG),
        extended_header_size: i32_at(NSYMBT),
        is_stamped: i32_at(STAMP) == IMOD_STAMP,
        flag_bits: i32_at(IMOD_FLAGS),
        origin: [f32_at(ORIGIN_X), f32_at(ORIGIN_Y), f32_at(ORIGIN_Z)],
        old_origin: [
            f32_at(OLD_ORIGIN_X),
            f32_at(OLD_ORIGIN_Y),
            f32_at(OLD_ORIGIN_Z),
        ],
        has_map_marker: &bytes[MAP..MAP + 4] == MAP_MARKER,
        little_endian,
        num_labels: labels::clamp_label_count(i32_at(NLABL)),
        labels: labels::decode_labels(&bytes[offsets::LABELS..]),
    }
}

/// A parsed header with its extended header already skipped.
#[derive(Debug, Clone)]
pub struct Header {
    /// Raw fixed header.
    pub raw: RawHeader,
    /// Parsed fields.
    pub fields: HeaderFields,
}

impl Header {
    /// Reads the fixed header, then reads and discards the extended header.
    ///
    /// On success the stream is positioned at the first data byte.
    ///
    /// # Errors
    /// Returns [`Error::TruncatedHeader`] or [`Error::TruncatedExtendedHeader`]
    /// if the stream ends early.
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let raw = RawHeader::read_from(reader)?;
        let fields = raw.fields();

        let expected = fields.extended_header_len();
        let got = io::copy(&mut reader.by_ref().take(expected), &mut io::sink())?;
        if got < expected {
            return Err(Error::TruncatedExtendedHeader { got, expected });
        }

        Ok(Self { raw, fields })
    }
}

/// Fills `buf` from `reader`, returning the number of bytes read.
///
/// Stops early only at end of stream.
pub(crate) fn read_up_to<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
