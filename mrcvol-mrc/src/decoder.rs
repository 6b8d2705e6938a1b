//! Single-file MRC decoder.

use crate::assembler::{Assembled, Assembler};
use crate::axis::AxisMapping;
use crate::coords;
use crate::error::Result;
use crate::header::Header;
use crate::labels;
use crate::mode::{self, DecodeFn, PixelFormat, SampleCodec};
use crate::DecodeConfig;
use log::{debug, warn};
use mrcvol_core::{CoordinateSpace, DecodedVolume, Sample, Volume};
use std::io::Read;

/// Decodes one MRC stream into a tagged volume.
#[derive(Debug, Clone, Default)]
pub struct MrcDecoder {
    config: DecodeConfig,
}

/// Per-file values attached to the volume after assembly.
struct Finish<'a> {
    header: &'a Header,
    mapping: AxisMapping,
    space: CoordinateSpace,
    source: &'a str,
}

impl MrcDecoder {
    /// Creates a decoder with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a decoder with the given configuration.
    #[must_use]
    pub fn with_config(config: DecodeConfig) -> Self {
        Self { config }
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &DecodeConfig {
        &self.config
    }

    /// Reads the header and the sample data from `reader`.
    ///
    /// `source` is recorded on the volume as its origin.
    ///
    /// # Errors
    /// Returns the first header, format, or data error encountered. No
    /// partially filled volume is ever returned.
    pub fn decode<R: Read>(&self, reader: &mut R, source: &str) -> Result<DecodedVolume> {
        let header = Header::read_from(reader)?;
        self.decode_data(&header, reader, source)
    }

    /// Decodes an in-memory file such as a memory map.
    ///
    /// The data region length is known up front, so a header whose extents
    /// exceed the bytes present fails before the volume is allocated.
    ///
    /// # Errors
    /// See [`decode`](Self::decode).
    pub fn decode_slice(&self, bytes: &[u8], source: &str) -> Result<DecodedVolume> {
        let mut cursor = bytes;
        let header = Header::read_from(&mut cursor)?;
        let available = cursor.len();
        self.decode_region(&header, &mut cursor, source, Some(available))
    }

    /// Decodes the data region for an already-read header.
    ///
    /// `reader` must be positioned at the first data byte.
    ///
    /// # Errors
    /// See [`decode`](Self::decode).
    pub fn decode_data<R: Read>(
        &self,
        header: &Header,
        reader: &mut R,
        source: &str,
    ) -> Result<DecodedVolume> {
        self.decode_region(header, reader, source, None)
    }

    fn decode_region<R: Read>(
        &self,
        header: &Header,
        reader: &mut R,
        source: &str,
        available: Option<usize>,
    ) -> Result<DecodedVolume> {
        let fields = &header.fields;
        let format = PixelFormat::for_header(fields)?;
        let mapping = if self.config.strict_axis_order {
            AxisMapping::from_fields_strict(fields)?
        } else {
            AxisMapping::from_fields(fields)
        };
        let extents = fields.extents()?;
        let codec = SampleCodec::new(fields.little_endian, self.config.int16_byte_order);

        debug!(
            "{source}: mode {} ({:?}), extents {extents:?}, axis order {:?}, {}-endian",
            fields.mode,
            format,
            fields.axis_order,
            if fields.little_endian { "little" } else { "big" },
        );

        let assembler = Assembler::new(format, mapping, extents)
            .with_row_alignment(self.config.row_alignment)
            .with_available_bytes(available);
        let finish = Finish {
            header,
            mapping,
            space: coords::build(fields, &mapping),
            source,
        };

        match format {
            PixelFormat::UInt4Pair => run(&assembler, reader, codec, mode::decode_uint4, &finish),
            PixelFormat::UInt8 => run(&assembler, reader, codec, mode::decode_uint8, &finish),
            PixelFormat::Int8 => run(&assembler, reader, codec, mode::decode_int8, &finish),
            PixelFormat::Int16 => run(&assembler, reader, codec, mode::decode_int16, &finish),
            PixelFormat::UInt16 => run(&assembler, reader, codec, mode::decode_uint16, &finish),
            PixelFormat::Float16 => run(&assembler, reader, codec, mode::decode_float16, &finish),
            PixelFormat::Float32 => run(&assembler, reader, codec, mode::decode_float32, &finish),
            PixelFormat::GaussianInt16 => run(
                &assembler,
                reader,
                codec,
                mode::decode_gaussian_int16,
                &finish,
            ),
            PixelFormat::ComplexFloat32 => run(
                &assembler,
                reader,
                codec,
                mode::decode_complex_float32,
                &finish,
            ),
            PixelFormat::Rgb => run(&assembler, reader, codec, mode::decode_rgb, &finish),
        }
    }
}

fn run<T, R>(
    assembler: &Assembler,
    reader: &mut R,
    codec: SampleCodec,
    decode: DecodeFn<T>,
    finish: &Finish<'_>,
) -> Result<DecodedVolume>
where
    T: Sample,
    R: Read,
    DecodedVolume: From<Volume<T>>,
{
    let Assembled {
        mut volume,
        dropped_writes,
    } = assembler.assemble(reader, codec, decode)?;

    if dropped_writes > 0 {
        warn!(
            "{}: axis order {:?} is not a permutation; {dropped_writes} samples fell outside {:?}",
            finish.source,
            finish.header.fields.axis_order,
            volume.dims(),
        );
    }

    volume.set_coordinate_space(finish.space);
    labels::attach_metadata(&mut volume, &finish.header.fields, &finish.mapping, finish.source)?;
    Ok(volume.into())
}
