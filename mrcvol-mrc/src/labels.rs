//! Header text labels and descriptive volume metadata.

use crate::axis::AxisMapping;
use crate::header::HeaderFields;
use mrcvol_core::{AxisInfo, Result, Sample, Volume};

/// Number of label slots in the header.
pub const LABEL_COUNT: usize = 10;

/// Width of each label in bytes.
pub const LABEL_LEN: usize = 80;

/// Name given to every decoded volume.
pub const VOLUME_NAME: &str = "MRC format file";

/// Value type tag for decoded samples.
pub const VALUE_TYPE: &str = "intensity";

/// Unit attached to every spatial axis.
pub const AXIS_UNIT: &str = "dist";

const AXIS_NAMES: [&str; 3] = ["X", "Y", "Z"];

/// Clamps a header label count to `0..=10`.
#[must_use]
pub fn clamp_label_count(raw: i32) -> usize {
    usize::try_from(raw).map_or(0, |n| n.min(LABEL_COUNT))
}

/// Decodes one label, mapping each byte to the char with that code point.
///
/// Padding is kept, so the result always has [`LABEL_LEN`] chars.
#[must_use]
pub fn decode_label(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Decodes all label slots from the label block.
#[must_use]
pub fn decode_labels(block: &[u8]) -> Vec<String> {
    block
        .chunks_exact(LABEL_LEN)
        .take(LABEL_COUNT)
        .map(decode_label)
        .collect()
}

/// Metadata key for label `index`.
#[must_use]
pub fn label_key(index: usize) -> String {
    format!("Label {index}")
}

/// Stamps names, axis tags, source, and labels onto a decoded volume.
///
/// Axis names follow the file axes: the canonical slot fed by columns is
/// named `X`, by rows `Y`, by sections `Z`.
///
/// # Errors
/// Propagates axis errors from the volume; unreachable for mapped axes.
pub fn attach_metadata<T: Sample>(
    volume: &mut Volume<T>,
    fields: &HeaderFields,
    mapping: &AxisMapping,
    source: &str,
) -> Result<()> {
    volume.set_value_type(VALUE_TYPE, "");

    for (file_axis, name) in AXIS_NAMES.iter().enumerate() {
        volume.set_axis(
            mapping.canonical_axis(file_axis),
            AxisInfo::new(*name, AXIS_UNIT),
        )?;
    }

    volume.set_name(VOLUME_NAME);
    volume.set_source(source);

    for (index, label) in fields.active_labels().iter().enumerate() {
        volume.insert_metadata(label_key(index), label.clone());
    }

    Ok(())
}
