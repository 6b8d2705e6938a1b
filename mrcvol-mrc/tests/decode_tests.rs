#![allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
//! End-to-end decoding of synthetic MRC streams.

use approx::assert_relative_eq;
use mrcvol_core::{Complex32, DecodedVolume, GaussianInt16, Rgb, SampleKind, UInt4};
use mrcvol_mrc::header::{offsets, FLAG_INVERTED_ORIGIN, FLAG_SIGNED_BYTES, IMOD_STAMP};
use mrcvol_mrc::labels::LABEL_LEN;
use mrcvol_mrc::{DecodeConfig, Error, Int16ByteOrder, MrcDecoder, HEADER_SIZE};

/// Writes header fields at their offsets, then appends sample bytes.
struct MrcBuilder {
    header: Vec<u8>,
    little_endian: bool,
    extended: Vec<u8>,
    data: Vec<u8>,
}

impl MrcBuilder {
    fn new(mode: i32, dims: [i32; 3]) -> Self {
        let mut b = Self {
            header: vec![0u8; HEADER_SIZE],
            little_endian: true,
            extended: Vec::new(),
            data: Vec::new(),
        };
        b.header[offsets::MACHST] = 0x44;
        b.header[offsets::MACHST + 1] = 0x44;
        b.i32(offsets::NX, dims[0])
            .i32(offsets::NY, dims[1])
            .i32(offsets::NZ, dims[2])
            .i32(offsets::MODE, mode)
            .axis_order(1, 2, 3)
    }

    fn big_endian(mut self) -> Self {
        // Re-encode the fields written so far
        for offset in [
            offsets::NX,
            offsets::NY,
            offsets::NZ,
            offsets::MODE,
            offsets::MAPC,
            offsets::MAPR,
            offsets::MAPS,
        ] {
            self.header[offset..offset + 4].reverse();
        }
        self.little_endian = false;
        self.header[offsets::MACHST] = 0x11;
        self.header[offsets::MACHST + 1] = 0x11;
        self
    }

    fn i32(mut self, offset: usize, v: i32) -> Self {
        let bytes = if self.little_endian {
            v.to_le_bytes()
        } else {
            v.to_be_bytes()
        };
        self.header[offset..offset + 4].copy_from_slice(&bytes);
        self
    }

    fn f32(mut self, offset: usize, v: f32) -> Self {
        let bytes = if self.little_endian {
            v.to_le_bytes()
        } else {
            v.to_be_bytes()
        };
        self.header[offset..offset + 4].copy_from_slice(&bytes);
        self
    }

    fn axis_order(self, mapc: i32, mapr: i32, maps: i32) -> Self {
        self.i32(offsets::MAPC, mapc)
            .i32(offsets::MAPR, mapr)
            .i32(offsets::MAPS, maps)
    }

    fn imod_flags(self, flags: i32) -> Self {
        self.i32(offsets::IMOD_STAMP, IMOD_STAMP)
            .i32(offsets::IMOD_FLAGS, flags)
    }

    fn map_marker(mut self) -> Self {
        self.header[offsets::MAP..offsets::MAP + 4].copy_from_slice(b"MAP ");
        self
    }

    fn labels(mut self, count: i32, texts: &[&str]) -> Self {
        for (i, text) in texts.iter().enumerate() {
            let start = offsets::LABELS + i * LABEL_LEN;
            let slot = &mut self.header[start..start + LABEL_LEN];
            slot.fill(b' ');
            slot[..text.len()].copy_from_slice(text.as_bytes());
        }
        self.i32(offsets::NLABL, count)
    }

    fn extended(mut self, len: usize) -> Self {
        self.extended = vec![0xEE; len];
        self.i32(offsets::NSYMBT, len as i32)
    }

    fn data(mut self, data: &[u8]) -> Self {
        self.data.extend_from_slice(data);
        self
    }

    fn build(self) -> Vec<u8> {
        let mut out = self.header;
        out.extend_from_slice(&self.extended);
        out.extend_from_slice(&self.data);
        out
    }
}

fn decode(bytes: &[u8]) -> Result<DecodedVolume, Error> {
    MrcDecoder::new().decode(&mut &bytes[..], "file:/data/test.mrc")
}

fn decode_with(bytes: &[u8], config: DecodeConfig) -> Result<DecodedVolume, Error> {
    MrcDecoder::with_config(config).decode(&mut &bytes[..], "file:/data/test.mrc")
}

#[test]
fn test_round_trip_uint8() {
    let data: Vec<u8> = (0..24).map(|i| i * 10).collect();
    let bytes = MrcBuilder::new(0, [4, 3, 2]).data(&data).build();
    let decoded = decode(&bytes).unwrap();
    let v = decoded.as_uint8().unwrap();
    for (i, expected) in data.iter().enumerate() {
        assert_eq!(v.get([i % 4, (i / 4) % 3, i / 12]), Some(*expected));
    }
}

#[test]
fn test_round_trip_int8_when_flagged() {
    let bytes = MrcBuilder::new(0, [3, 1, 1])
        .imod_flags(FLAG_SIGNED_BYTES)
        .data(&[0xFF, 0x80, 0x7F])
        .build();
    let decoded = decode(&bytes).unwrap();
    assert_eq!(decoded.kind(), SampleKind::Int8);
    let v = decoded.as_int8().unwrap();
    assert_eq!(v.get([0, 0, 0]), Some(-1));
    assert_eq!(v.get([1, 0, 0]), Some(-128));
    assert_eq!(v.get([2, 0, 0]), Some(127));
}

#[test]
fn test_round_trip_int16_big_endian_samples() {
    let values: [i16; 4] = [-2, 0, 300, i16::MAX];
    let data: Vec<u8> = values.iter().flat_map(|v| v.to_be_bytes()).collect();
    let bytes = MrcBuilder::new(1, [4, 1, 1]).data(&data).build();
    let decoded = decode(&bytes).unwrap();
    let v = decoded.as_int16().unwrap();
    for (x, expected) in values.iter().enumerate() {
        assert_eq!(v.get([x, 0, 0]), Some(*expected));
    }
}

#[test]
fn test_int16_follow_header_order() {
    let data: Vec<u8> = [1000i16, -7].iter().flat_map(|v| v.to_le_bytes()).collect();
    let bytes = MrcBuilder::new(1, [2, 1, 1]).data(&data).build();
    let config = DecodeConfig::default().with_int16_byte_order(Int16ByteOrder::FollowHeader);
    let decoded = decode_with(&bytes, config).unwrap();
    let v = decoded.as_int16().unwrap();
    assert_eq!(v.get([0, 0, 0]), Some(1000));
    assert_eq!(v.get([1, 0, 0]), Some(-7));
}

#[test]
fn test_round_trip_uint16() {
    let values: [u16; 3] = [0, 513, u16::MAX];
    let data: Vec<u8> = values.iter().flat_map(|v| v.to_be_bytes()).collect();
    let bytes = MrcBuilder::new(6, [3, 1, 1]).data(&data).build();
    let decoded = decode(&bytes).unwrap();
    let v = decoded.as_uint16().unwrap();
    assert_eq!(v.get([1, 0, 0]), Some(513));
    assert_eq!(v.get([2, 0, 0]), Some(u16::MAX));
}

#[test]
fn test_round_trip_float32_little_endian() {
    let values = [1.5f32, -0.25, 1.0e6, 0.0];
    let data: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
    let bytes = MrcBuilder::new(2, [2, 2, 1]).data(&data).build();
    let decoded = decode(&bytes).unwrap();
    let v = decoded.as_float32().unwrap();
    assert_relative_eq!(v.get([0, 0, 0]).unwrap(), 1.5);
    assert_relative_eq!(v.get([1, 0, 0]).unwrap(), -0.25);
    assert_relative_eq!(v.get([0, 1, 0]).unwrap(), 1.0e6);
}

#[test]
fn test_round_trip_float32_big_endian() {
    let values = [3.0f32, -8.5];
    let data: Vec<u8> = values.iter().flat_map(|v| v.to_be_bytes()).collect();
    let bytes = MrcBuilder::new(2, [2, 1, 1]).big_endian().data(&data).build();
    let decoded = decode(&bytes).unwrap();
    assert_eq!(decoded.dims(), [2, 1, 1]);
    let v = decoded.as_float32().unwrap();
    assert_relative_eq!(v.get([0, 0, 0]).unwrap(), 3.0);
    assert_relative_eq!(v.get([1, 0, 0]).unwrap(), -8.5);
}

#[test]
fn test_round_trip_gaussian_int16() {
    let mut data = Vec::new();
    for (re, im) in [(1i16, -1i16), (-300, 42)] {
        data.extend_from_slice(&re.to_be_bytes());
        data.extend_from_slice(&im.to_be_bytes());
    }
    let bytes = MrcBuilder::new(3, [2, 1, 1]).data(&data).build();
    let decoded = decode(&bytes).unwrap();
    let v = decoded.as_gaussian_int16().unwrap();
    assert_eq!(v.get([0, 0, 0]), Some(GaussianInt16::new(1, -1)));
    assert_eq!(v.get([1, 0, 0]), Some(GaussianInt16::new(-300, 42)));
}

#[test]
fn test_round_trip_complex_float32() {
    let mut data = Vec::new();
    for (re, im) in [(0.5f32, 2.0f32), (-1.0, 0.0)] {
        data.extend_from_slice(&re.to_le_bytes());
        data.extend_from_slice(&im.to_le_bytes());
    }
    let bytes = MrcBuilder::new(4, [1, 2, 1]).data(&data).build();
    let decoded = decode(&bytes).unwrap();
    let v = decoded.as_complex_float32().unwrap();
    assert_eq!(v.get([0, 0, 0]), Some(Complex32::new(0.5, 2.0)));
    assert_eq!(v.get([0, 1, 0]), Some(Complex32::new(-1.0, 0.0)));
}

#[test]
fn test_round_trip_float16() {
    // 1.0 and -2.0 in binary16
    let data = [0x3C, 0x00, 0xC0, 0x00];
    let bytes = MrcBuilder::new(12, [2, 1, 1]).data(&data).build();
    let decoded = decode(&bytes).unwrap();
    let v = decoded.as_float16().unwrap();
    assert_eq!(v.get([0, 0, 0]).unwrap().to_bits(), 0x3C00);
    assert_relative_eq!(v.get([1, 0, 0]).unwrap().to_f32(), -2.0);
}

#[test]
fn test_round_trip_rgb() {
    let data = [255, 0, 0, 0, 128, 255];
    let bytes = MrcBuilder::new(16, [1, 1, 2]).data(&data).build();
    let decoded = decode(&bytes).unwrap();
    let v = decoded.as_rgb().unwrap();
    assert_eq!(v.get([0, 0, 0]), Some(Rgb::new(255, 0, 0)));
    assert_eq!(v.get([0, 0, 1]), Some(Rgb::new(0, 128, 255)));
}

#[test]
fn test_nibble_pair_order() {
    let bytes = MrcBuilder::new(101, [2, 1, 1]).data(&[0xAB]).build();
    let decoded = decode(&bytes).unwrap();
    assert_eq!(decoded.kind(), SampleKind::UInt4);
    let v = decoded.as_uint4().unwrap();
    assert_eq!(v.get([0, 0, 0]), Some(UInt4::new(0xB)));
    assert_eq!(v.get([1, 0, 0]), Some(UInt4::new(0xA)));
}

#[test]
fn test_identity_axis_order() {
    let data: Vec<u8> = (0..27).collect();
    let bytes = MrcBuilder::new(0, [3, 3, 3]).data(&data).build();
    let decoded = decode(&bytes).unwrap();
    let v = decoded.as_uint8().unwrap();
    for z in 0..3 {
        for y in 0..3 {
            for x in 0..3 {
                assert_eq!(v.get([x, y, z]), Some((z * 9 + y * 3 + x) as u8));
            }
        }
    }
    let names: Vec<_> = (0..3).map(|i| decoded.axis(i).unwrap().name.clone()).collect();
    assert_eq!(names, vec!["X", "Y", "Z"]);
}

#[test]
fn test_permuted_axis_order() {
    let data: Vec<u8> = (0..18).collect();
    let bytes = MrcBuilder::new(0, [6, 3, 1])
        .axis_order(2, 1, 3)
        .data(&data)
        .build();
    let decoded = decode(&bytes).unwrap();
    assert_eq!(decoded.dims(), [3, 6, 1]);
    let v = decoded.as_uint8().unwrap();
    // File sample (col=5, row=2, sec=0)
    assert_eq!(v.get([2, 5, 0]), Some(2 * 6 + 5));
    // Columns feed canonical Y
    assert_eq!(decoded.axis(1).unwrap().name, "X");
    assert_eq!(decoded.axis(0).unwrap().name, "Y");
}

#[test]
fn test_spacing_from_cell_and_grid() {
    let bytes = MrcBuilder::new(0, [1, 1, 1])
        .i32(offsets::MX, 50)
        .f32(offsets::XLEN, 100.0)
        .i32(offsets::MY, 0)
        .f32(offsets::YLEN, 100.0)
        .i32(offsets::MZ, 4)
        .f32(offsets::ZLEN, 1.0)
        .data(&[0])
        .build();
    let decoded = decode(&bytes).unwrap();
    let space = decoded.coordinate_space();
    assert_relative_eq!(space.spacing[0], 2.0);
    assert_relative_eq!(space.spacing[1], 1.0);
    assert_relative_eq!(space.spacing[2], 0.25);
}

#[test]
fn test_new_style_origin_selected_by_marker() {
    let bytes = MrcBuilder::new(0, [1, 1, 1])
        .map_marker()
        .f32(offsets::ORIGIN_X, 10.0)
        .f32(offsets::ORIGIN_Y, 20.0)
        .f32(offsets::ORIGIN_Z, 30.0)
        .data(&[0])
        .build();
    let space = *decode(&bytes).unwrap().coordinate_space();
    assert_relative_eq!(space.origin[0], 10.0);
    assert_relative_eq!(space.origin[1], 20.0);
    assert_relative_eq!(space.origin[2], 30.0);
}

#[test]
fn test_old_style_origin_without_marker() {
    // Old-style X shares bytes with the machine stamp; zero keeps the
    // little-endian default
    let bytes = MrcBuilder::new(0, [1, 1, 1])
        .f32(offsets::OLD_ORIGIN_Z, 7.0)
        .f32(offsets::OLD_ORIGIN_X, 0.0)
        .f32(offsets::OLD_ORIGIN_Y, 5.0)
        .f32(offsets::ORIGIN_X, 99.0)
        .data(&[0])
        .build();
    let space = *decode(&bytes).unwrap().coordinate_space();
    assert_relative_eq!(space.origin[0], 0.0);
    assert_relative_eq!(space.origin[1], 5.0);
    assert_relative_eq!(space.origin[2], 7.0);
}

#[test]
fn test_origin_sign_inversion_requires_stamp() {
    let base = || {
        MrcBuilder::new(0, [1, 1, 1])
            .map_marker()
            .f32(offsets::ORIGIN_X, 1.0)
            .f32(offsets::ORIGIN_Y, -2.0)
            .f32(offsets::ORIGIN_Z, 3.0)
            .data(&[0])
    };

    let stamped = base().imod_flags(FLAG_INVERTED_ORIGIN).build();
    let space = *decode(&stamped).unwrap().coordinate_space();
    assert_relative_eq!(space.origin[0], -1.0);
    assert_relative_eq!(space.origin[1], 2.0);
    assert_relative_eq!(space.origin[2], -3.0);

    let unstamped = base()
        .i32(offsets::IMOD_FLAGS, FLAG_INVERTED_ORIGIN)
        .build();
    let space = *decode(&unstamped).unwrap().coordinate_space();
    assert_relative_eq!(space.origin[0], 1.0);
    assert_relative_eq!(space.origin[1], -2.0);
}

#[test]
fn test_unsupported_mode() {
    let bytes = MrcBuilder::new(99, [2, 2, 2]).data(&[0; 64]).build();
    let result = decode(&bytes);
    assert!(matches!(result, Err(Error::UnsupportedPixelFormat(99))));
}

#[test]
fn test_truncated_sample_data() {
    let bytes = MrcBuilder::new(0, [10, 10, 10]).data(&[1; 50]).build();
    let result = decode(&bytes);
    assert!(
        matches!(
            result,
            Err(Error::TruncatedSampleData {
                decoded: 50,
                expected: 1000
            })
        ),
        "unexpected result: {result:?}"
    );
}

#[test]
fn test_truncated_header() {
    let bytes = vec![0u8; 512];
    assert!(matches!(
        decode(&bytes),
        Err(Error::TruncatedHeader { got: 512, .. })
    ));
}

#[test]
fn test_extended_header_skipped() {
    let bytes = MrcBuilder::new(0, [2, 1, 1])
        .extended(100)
        .data(&[4, 9])
        .build();
    let decoded = decode(&bytes).unwrap();
    let v = decoded.as_uint8().unwrap();
    assert_eq!(v.get([0, 0, 0]), Some(4));
    assert_eq!(v.get([1, 0, 0]), Some(9));
}

#[test]
fn test_truncated_extended_header() {
    let mut bytes = MrcBuilder::new(0, [1, 1, 1]).build();
    bytes[offsets::NSYMBT..offsets::NSYMBT + 4].copy_from_slice(&64i32.to_le_bytes());
    bytes.extend_from_slice(&[0; 10]);
    assert!(matches!(
        decode(&bytes),
        Err(Error::TruncatedExtendedHeader { .. })
    ));
}

#[test]
fn test_two_labels_extracted() {
    let bytes = MrcBuilder::new(0, [1, 1, 1])
        .labels(2, &["first label", "second label", "ignored"])
        .data(&[0])
        .build();
    let decoded = decode(&bytes).unwrap();
    let meta = decoded.metadata();
    assert_eq!(meta.len(), 2);
    assert!(meta["Label 0"].starts_with("first label"));
    assert!(meta["Label 1"].starts_with("second label"));
    assert_eq!(meta["Label 0"].chars().count(), LABEL_LEN);
    assert!(!meta.contains_key("Label 2"));
}

#[test]
fn test_label_count_clamped() {
    let bytes = MrcBuilder::new(0, [1, 1, 1])
        .labels(15, &[])
        .data(&[0])
        .build();
    let decoded = decode(&bytes).unwrap();
    assert_eq!(decoded.metadata().len(), 10);
    assert!(decoded.metadata().contains_key("Label 9"));
}

#[test]
fn test_descriptive_tags() {
    let bytes = MrcBuilder::new(2, [1, 1, 1]).data(&[0; 4]).build();
    let decoded = decode(&bytes).unwrap();
    assert_eq!(decoded.name(), "MRC format file");
    assert_eq!(decoded.source(), "file:/data/test.mrc");
    let axis = decoded.axis(0).unwrap();
    assert_eq!(axis.unit, "dist");
    assert_eq!(decoded.as_float32().unwrap().value_type(), "intensity");
}

#[test]
fn test_row_alignment_option() {
    // 3 nibbles per row occupy 2 bytes, padded to 4
    let data = [0x21, 0x03, 0xEE, 0xEE, 0x54, 0x06, 0xEE, 0xEE];
    let bytes = MrcBuilder::new(101, [3, 2, 1]).data(&data).build();
    let config = DecodeConfig::default().with_row_alignment(Some(4));
    let decoded = decode_with(&bytes, config).unwrap();
    let v = decoded.as_uint4().unwrap();
    assert_eq!(v.get([2, 0, 0]), Some(UInt4::new(3)));
    assert_eq!(v.get([0, 1, 0]), Some(UInt4::new(4)));
    assert_eq!(v.get([2, 1, 0]), Some(UInt4::new(6)));
}

#[test]
fn test_negative_extent_rejected() {
    let bytes = MrcBuilder::new(0, [2, -1, 1]).build();
    assert!(matches!(decode(&bytes), Err(Error::InvalidDimensions(_))));
}
