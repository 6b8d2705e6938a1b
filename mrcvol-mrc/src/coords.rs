//! Physical origin and spacing.

use crate::axis::AxisMapping;
use crate::header::HeaderFields;
use mrcvol_core::CoordinateSpace;

/// Sample spacing for one file axis: `cell_length / grid`.
///
/// Zero grid sizes and zero ratios both fall back to 1.
#[must_use]
pub fn spacing(cell_length: f32, grid: i32) -> f64 {
    if grid == 0 {
        return 1.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let ratio = cell_length / grid as f32;
    if ratio == 0.0 {
        1.0
    } else {
        f64::from(ratio)
    }
}

/// Origin in file-axis order, honoring the `MAP ` marker and the IMOD
/// inverted-origin flag.
#[must_use]
pub fn select_origin(fields: &HeaderFields) -> [f32; 3] {
    let origin = if fields.has_map_marker {
        fields.origin
    } else {
        fields.old_origin
    };
    if fields.inverted_origin() {
        origin.map(|v| -v)
    } else {
        origin
    }
}

/// Builds the canonical coordinate space for a header.
#[must_use]
pub fn build(fields: &HeaderFields, mapping: &AxisMapping) -> CoordinateSpace {
    let origin = select_origin(fields).map(f64::from);
    let spacings = [0, 1, 2].map(|i| spacing(fields.cell_length[i], fields.grid[i]));
    CoordinateSpace::new(mapping.place(origin, 0.0), mapping.place(spacings, 1.0))
}
