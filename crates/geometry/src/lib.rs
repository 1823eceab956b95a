//! Planar geometry: oriented bounding boxes and separating-axis overlap tests.
//!
//! # Invariants
//! - Bounding-box corner order (bl, br, fr, fl) survives every transform.
//! - Unchecked operations are total: non-finite input propagates, it never panics.
//! - Touching polygons count as intersecting.

mod bbox;
mod rotate;
mod sat;

pub use bbox::{BoundingBox, GeometryError};
pub use rotate::{Quad, rotate_point, rotated_rectangle};
pub use sat::{polygons_intersect, project};

pub fn crate_info() -> &'static str {
    "groundplane-geometry v0.1.0"
}
