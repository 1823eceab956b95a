//! Narrow-phase collision queries against the world's obstacle list.
//!
//! Every obstacle is tested on every call. There is no broad phase and no
//! cached state: each query reads whatever obstacle list it is handed.

use groundplane_common::Pose;
use groundplane_geometry::{BoundingBox, polygons_intersect, rotated_rectangle};

use crate::world::{World, WorldObject};

/// Return the first obstacle, in world order, that the player's box would
/// overlap at `candidate`.
pub fn first_collision<'w>(
    candidate: &Pose,
    world: &'w World,
    player_bbox: &BoundingBox,
) -> Option<&'w WorldObject> {
    let player = rotated_rectangle(candidate.rotation, candidate.position, player_bbox);
    world
        .collidable_objects()
        .iter()
        .find(|object| polygons_intersect(&player, &object.footprint()))
}

/// True if the player's box at `candidate` overlaps any obstacle.
pub fn run_collision_detection(candidate: &Pose, world: &World, player_bbox: &BoundingBox) -> bool {
    first_collision(candidate, world, player_bbox).is_some()
}
