//! World Kernel: obstacle set, collision oracle, per-tick movement planning.
//!
//! # Invariants
//! - A tick either commits the whole candidate pose or none of it.
//! - Collision queries read the obstacle list they are given and cache nothing.
//! - Every mutation to the world is recorded in its event log.

pub mod collision;
pub mod movement;
pub mod world;

pub use collision::{first_collision, run_collision_detection};
pub use movement::{
    IdleHeading, MoveOutcome, MovementError, MovementPlanner, MovementPolicy, OpposingInput,
    updated_player_pose, updated_position,
};
pub use world::{Extents, MovementEvent, Player, PlayerConfig, World, WorldObject};
