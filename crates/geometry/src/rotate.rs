use groundplane_common::Point2;

use crate::BoundingBox;

/// A world-space box outline, corners in bl, br, fr, fl order.
pub type Quad = [Point2; 4];

/// Rotate `(x, z)` about `(center_x, center_z)` by `angle` radians,
/// counter-clockwise positive.
pub fn rotate_point(angle: f64, center_x: f64, center_z: f64, x: f64, z: f64) -> Point2 {
    let (sin, cos) = angle.sin_cos();
    let dx = x - center_x;
    let dz = z - center_z;
    Point2 {
        x: dx * cos - dz * sin + center_x,
        z: dx * sin + dz * cos + center_z,
    }
}

/// Place `bbox` at `center` and rotate it by `angle` about that centre.
///
/// Each local corner is offset from `center` as if unrotated, then swung
/// round `center`. The returned corners keep the box's bl, br, fr, fl order,
/// which the overlap test relies on to walk the outline.
pub fn rotated_rectangle(angle: f64, center: Point2, bbox: &BoundingBox) -> Quad {
    bbox.corners().map(|corner| {
        let p = center + corner;
        rotate_point(angle, center.x, center.z, p.x, p.z)
    })
}
