//! Shared types for the groundplane workspace.
//!
//! # Invariants
//! - Coordinates live on the X/Z ground plane; Y is never stored.
//! - Headings are radians in the `atan2(z, x)` convention.

mod types;

pub use types::{ObstacleId, Point2, Pose};
