use groundplane_common::Point2;

/// Project every vertex of `polygon` onto `axis` and return `(min, max)`.
///
/// An empty polygon projects to `(INFINITY, NEG_INFINITY)`.
pub fn project(polygon: &[Point2], axis: Point2) -> (f64, f64) {
    polygon
        .iter()
        .map(|p| axis.dot(*p))
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), d| {
            (if d < lo { d } else { lo }, if d > hi { d } else { hi })
        })
}

/// Separating Axis Theorem test for two convex polygons.
///
/// Vertices are walked in order with the last joined back to the first.
/// Every edge of `a`, then every edge of `b`, supplies a candidate axis
/// `(edge.z, -edge.x)`; the first axis on which the projections are strictly
/// disjoint proves the polygons apart. Touching intervals count as overlap.
///
/// A zero-length edge gives a zero axis, on which everything projects to 0,
/// so it never separates.
pub fn polygons_intersect(a: &[Point2], b: &[Point2]) -> bool {
    for polygon in [a, b] {
        for (i, current) in polygon.iter().enumerate() {
            let next = polygon[(i + 1) % polygon.len()];
            let axis = (next - *current).edge_normal();

            let (min_a, max_a) = project(a, axis);
            let (min_b, max_b) = project(b, axis);
            if max_a < min_b || max_b < min_a {
                return false;
            }
        }
    }
    true
}
