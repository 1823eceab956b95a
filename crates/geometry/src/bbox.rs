use groundplane_common::Point2;
use serde::{Deserialize, Serialize};

/// Errors from bounding-box validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeometryError {
    #[error("corner {corner} is not finite: ({x}, {z})")]
    NonFinite { corner: &'static str, x: f64, z: f64 },
    #[error("bounding box has {edges} non-degenerate edges, at least 3 required")]
    Degenerate { edges: usize },
    #[error("bounding box is not convex or its winding is inconsistent")]
    NotConvex,
}

/// Local-space corners of an object's footprint, relative to its centre.
///
/// Corner order is bl, br, fr, fl. Edges are generated by walking that order
/// and wrapping from `fl` back to `bl`, so the order must describe the
/// outline of the box rather than an arbitrary set of points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub bl: Point2,
    pub br: Point2,
    pub fr: Point2,
    pub fl: Point2,
}

const CORNER_NAMES: [&str; 4] = ["bl", "br", "fr", "fl"];

impl BoundingBox {
    pub const fn new(bl: Point2, br: Point2, fr: Point2, fl: Point2) -> Self {
        Self { bl, br, fr, fl }
    }

    /// Axis-aligned box centred on the origin. Forward is -Z, so the front
    /// corners sit at `z = -half_depth`.
    pub const fn from_half_extents(half_width: f64, half_depth: f64) -> Self {
        Self {
            bl: Point2::new(-half_width, half_depth),
            br: Point2::new(half_width, half_depth),
            fr: Point2::new(half_width, -half_depth),
            fl: Point2::new(-half_width, -half_depth),
        }
    }

    /// Corners in bl, br, fr, fl order.
    pub fn corners(&self) -> [Point2; 4] {
        [self.bl, self.br, self.fr, self.fl]
    }

    /// Check that the corners describe a usable convex outline.
    ///
    /// Requires finite corners, at least three non-zero-length edges, and a
    /// single turning direction all the way round.
    pub fn validate(&self) -> Result<(), GeometryError> {
        let corners = self.corners();
        for (corner, p) in CORNER_NAMES.into_iter().zip(corners) {
            if !p.is_finite() {
                return Err(GeometryError::NonFinite {
                    corner,
                    x: p.x,
                    z: p.z,
                });
            }
        }

        let edges: Vec<Point2> = (0..corners.len())
            .map(|i| corners[(i + 1) % corners.len()] - corners[i])
            .filter(|e| *e != Point2::ZERO)
            .collect();
        if edges.len() < 3 {
            return Err(GeometryError::Degenerate { edges: edges.len() });
        }

        let mut sign = 0.0_f64;
        for (i, e) in edges.iter().enumerate() {
            let next = edges[(i + 1) % edges.len()];
            let cross = e.x * next.z - e.z * next.x;
            if cross == 0.0 {
                // A zero turn is a straight continuation or a fold back.
                if e.dot(next) < 0.0 {
                    return Err(GeometryError::NotConvex);
                }
                continue;
            }
            if sign == 0.0 {
                sign = cross.signum();
            } else if cross.signum() != sign {
                return Err(GeometryError::NotConvex);
            }
        }
        Ok(())
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::from_half_extents(0.5, 0.5)
    }
}
