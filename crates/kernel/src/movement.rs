//! Movement planning: turn held controls into a candidate pose, then commit
//! it only if the player's box is clear of every obstacle.
//!
//! A blocked move is all-or-nothing: the player keeps both its old position
//! and its old heading, even when the heading change alone would have been
//! harmless.

use groundplane_common::{ObstacleId, Point2, Pose};
use groundplane_geometry::{BoundingBox, GeometryError};
use groundplane_input::Controls;
use serde::{Deserialize, Serialize};

use crate::collision::first_collision;
use crate::world::{Extents, World};

/// How a pair of opposing held keys resolves on its axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpposingInput {
    /// Keys are applied left, right, forward, backward, each adding its step
    /// to the running position. An opposing pair subtracts then adds the same
    /// step, so the axis nets to no movement.
    #[default]
    Sequential,
    /// The later key of an opposing pair replaces the earlier one's
    /// displacement: right beats left, backward beats forward.
    LastWins,
}

/// What happens to the heading when the held keys give no direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdleHeading {
    /// Use `atan2(0, 0) = 0`, so an idle player turns to face +X.
    #[default]
    Reset,
    /// Keep the current heading.
    Hold,
}

/// Tie-break rules for the planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MovementPolicy {
    pub opposing: OpposingInput,
    pub idle_heading: IdleHeading,
}

/// Result of planning one tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MoveOutcome {
    /// The candidate pose was clear and is the new pose.
    Committed(Pose),
    /// The candidate pose overlapped `obstacle`; `kept` is the unchanged
    /// starting pose.
    Blocked {
        kept: Pose,
        candidate: Pose,
        obstacle: ObstacleId,
    },
}

impl MoveOutcome {
    /// The pose the player ends the tick with.
    pub fn pose(&self) -> Pose {
        match *self {
            MoveOutcome::Committed(pose) => pose,
            MoveOutcome::Blocked { kept, .. } => kept,
        }
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self, MoveOutcome::Blocked { .. })
    }
}

/// Errors from checked planning.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MovementError {
    #[error("player pose is not finite: ({x}, {z}) heading {rotation}")]
    NonFinitePose { x: f64, z: f64, rotation: f64 },
    #[error("speed must be finite and non-negative, got {0}")]
    InvalidSpeed(f64),
    #[error("delta time must be finite and non-negative, got {0}")]
    InvalidDelta(f64),
    #[error("world half-extents must be finite and positive, got {width} x {depth}")]
    InvalidExtents { width: f64, depth: f64 },
    #[error("obstacle {id} has a non-finite pose")]
    NonFiniteObstacle { id: ObstacleId },
    #[error("obstacle {id} has an invalid bounding box")]
    InvalidObstacle {
        id: ObstacleId,
        #[source]
        source: GeometryError,
    },
    #[error("player bounding box is invalid")]
    InvalidPlayerBox(#[source] GeometryError),
}

/// Plans one tick of player movement under a [`MovementPolicy`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MovementPlanner {
    policy: MovementPolicy,
}

impl MovementPlanner {
    pub fn new(policy: MovementPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> MovementPolicy {
        self.policy
    }

    /// Displace `position` by `speed * delta` along each held key's axis,
    /// then wrap it into `extents`.
    pub fn candidate_position(
        &self,
        position: Point2,
        controls: &Controls,
        speed: f64,
        delta: f64,
        extents: Extents,
    ) -> Point2 {
        let step = speed * delta;
        let moved = match self.policy.opposing {
            OpposingInput::Sequential => {
                let mut p = position;
                if controls.left {
                    p.x -= step;
                }
                if controls.right {
                    p.x += step;
                }
                if controls.forward {
                    p.z -= step;
                }
                if controls.backward {
                    p.z += step;
                }
                p
            }
            OpposingInput::LastWins => {
                let mut p = position;
                if controls.left {
                    p.x = position.x - step;
                }
                if controls.right {
                    p.x = position.x + step;
                }
                if controls.forward {
                    p.z = position.z - step;
                }
                if controls.backward {
                    p.z = position.z + step;
                }
                p
            }
        };
        extents.wrap(moved)
    }

    /// Heading implied by the held keys, `atan2` of their net direction.
    pub fn candidate_heading(&self, current: f64, controls: &Controls) -> f64 {
        let direction = controls.direction();
        if direction == Point2::ZERO && self.policy.idle_heading == IdleHeading::Hold {
            return current;
        }
        direction.heading()
    }

    /// Build the candidate pose and commit it unless it collides.
    ///
    /// Total over numeric input: non-finite values propagate into the
    /// candidate rather than failing. Use [`MovementPlanner::try_plan`] to
    /// reject them instead.
    pub fn plan(
        &self,
        pose: &Pose,
        controls: &Controls,
        speed: f64,
        delta: f64,
        world: &World,
        player_bbox: &BoundingBox,
    ) -> MoveOutcome {
        let candidate = Pose::new(
            self.candidate_position(pose.position, controls, speed, delta, world.extents()),
            self.candidate_heading(pose.rotation, controls),
        );

        match first_collision(&candidate, world, player_bbox) {
            None => {
                tracing::trace!(
                    x = candidate.position.x,
                    z = candidate.position.z,
                    rotation = candidate.rotation,
                    "move committed"
                );
                MoveOutcome::Committed(candidate)
            }
            Some(obstacle) => {
                tracing::debug!(
                    obstacle = %obstacle.id.short(),
                    x = candidate.position.x,
                    z = candidate.position.z,
                    "move blocked"
                );
                MoveOutcome::Blocked {
                    kept: *pose,
                    candidate,
                    obstacle: obstacle.id,
                }
            }
        }
    }

    /// [`MovementPlanner::plan`] with every input validated first.
    pub fn try_plan(
        &self,
        pose: &Pose,
        controls: &Controls,
        speed: f64,
        delta: f64,
        world: &World,
        player_bbox: &BoundingBox,
    ) -> Result<MoveOutcome, MovementError> {
        if !pose.is_finite() {
            return Err(MovementError::NonFinitePose {
                x: pose.position.x,
                z: pose.position.z,
                rotation: pose.rotation,
            });
        }
        if !(speed.is_finite() && speed >= 0.0) {
            return Err(MovementError::InvalidSpeed(speed));
        }
        if !(delta.is_finite() && delta >= 0.0) {
            return Err(MovementError::InvalidDelta(delta));
        }
        player_bbox
            .validate()
            .map_err(MovementError::InvalidPlayerBox)?;
        world.validate()?;
        Ok(self.plan(pose, controls, speed, delta, world, player_bbox))
    }
}

/// Candidate position for one tick under the default policy.
pub fn updated_position(
    position: Point2,
    controls: &Controls,
    speed: f64,
    delta: f64,
    world: &World,
) -> Point2 {
    MovementPlanner::default().candidate_position(position, controls, speed, delta, world.extents())
}

/// One tick of player movement under the default policy: the candidate pose
/// if it is clear, otherwise `pose` unchanged.
pub fn updated_player_pose(
    pose: &Pose,
    controls: &Controls,
    speed: f64,
    delta: f64,
    world: &World,
    player_bbox: &BoundingBox,
) -> Pose {
    MovementPlanner::default()
        .plan(pose, controls, speed, delta, world, player_bbox)
        .pose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::WorldObject;
    use approx::assert_relative_eq;
    use groundplane_input::ControlKey;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    fn keys(s: &str) -> Controls {
        s.parse().unwrap()
    }

    fn unit_box() -> BoundingBox {
        BoundingBox::from_half_extents(0.5, 0.5)
    }

    #[test]
    fn idle_controls_leave_position_unchanged() {
        let world = World::new(10.0, 10.0);
        let p = Point2::new(3.25, -7.5);
        assert_eq!(updated_position(p, &Controls::new(), 5.0, 0.016, &world), p);
    }

    #[test]
    fn each_key_moves_along_its_axis() {
        let world = World::new(10.0, 10.0);
        let p = Point2::ZERO;
        assert_eq!(updated_position(p, &keys("a"), 2.0, 0.5, &world), Point2::new(-1.0, 0.0));
        assert_eq!(updated_position(p, &keys("d"), 2.0, 0.5, &world), Point2::new(1.0, 0.0));
        assert_eq!(updated_position(p, &keys("w"), 2.0, 0.5, &world), Point2::new(0.0, -1.0));
        assert_eq!(updated_position(p, &keys("s"), 2.0, 0.5, &world), Point2::new(0.0, 1.0));
        assert_eq!(updated_position(p, &keys("wd"), 2.0, 0.5, &world), Point2::new(1.0, -1.0));
    }

    #[test]
    fn wrap_discards_overshoot() {
        let world = World::new(10.0, 10.0);
        let p = updated_position(Point2::new(9.9, 0.0), &keys("d"), 5.0, 1.0, &world);
        assert_eq!(p.x, -10.0);
        let p = updated_position(Point2::new(-9.9, 0.0), &keys("a"), 5.0, 1.0, &world);
        assert_eq!(p.x, 10.0);
        let p = updated_position(Point2::new(0.0, -9.0), &keys("w"), 5.0, 1.0, &world);
        assert_eq!(p.z, 10.0);
        let p = updated_position(Point2::new(0.0, 9.0), &keys("s"), 5.0, 1.0, &world);
        assert_eq!(p.z, -10.0);
    }

    #[test]
    fn opposing_keys_net_to_zero_by_default() {
        let world = World::new(10.0, 10.0);
        assert_eq!(updated_position(Point2::ZERO, &keys("ad"), 1.0, 1.0, &world), Point2::ZERO);
        assert_eq!(updated_position(Point2::ZERO, &keys("ws"), 1.0, 1.0, &world), Point2::ZERO);

        let start = Point2::new(9.5, -3.25);
        assert_eq!(
            updated_position(start, &keys("adw"), 5.0, 1.0, &world),
            Point2::new(9.5, -8.25)
        );
        assert_eq!(updated_position(start, &keys("wasd"), 5.0, 1.0, &world), start);
    }

    #[test]
    fn opposing_keys_stand_still_facing_x() {
        let world = World::new(10.0, 10.0);
        let start = Pose::new(Point2::ZERO, 0.5);
        let next = updated_player_pose(&start, &keys("ws"), 1.0, 1.0, &world, &unit_box());
        assert_eq!(next, Pose::new(Point2::ZERO, 0.0));
        let next = updated_player_pose(&start, &keys("ad"), 1.0, 1.0, &world, &unit_box());
        assert_eq!(next, Pose::new(Point2::ZERO, 0.0));
    }

    #[test]
    fn last_wins_policy_takes_later_key() {
        let world = World::new(10.0, 10.0);
        let planner = MovementPlanner::new(MovementPolicy {
            opposing: OpposingInput::LastWins,
            ..MovementPolicy::default()
        });
        let start = Point2::new(9.5, -3.25);
        let p = planner.candidate_position(start, &keys("ad"), 5.0, 1.0, world.extents());
        assert_eq!(p.x, -10.0);
        let p = planner.candidate_position(start, &keys("ws"), 5.0, 1.0, world.extents());
        assert_eq!(p, Point2::new(9.5, 1.75));
    }

    #[test]
    fn heading_per_direction() {
        let planner = MovementPlanner::default();
        assert_relative_eq!(planner.candidate_heading(1.0, &keys("w")), -FRAC_PI_2);
        assert_relative_eq!(planner.candidate_heading(1.0, &keys("s")), FRAC_PI_2);
        assert_relative_eq!(planner.candidate_heading(1.0, &keys("d")), 0.0);
        assert_relative_eq!(planner.candidate_heading(1.0, &keys("a")), PI);
        assert_relative_eq!(planner.candidate_heading(1.0, &keys("wd")), -FRAC_PI_4);
        assert_relative_eq!(planner.candidate_heading(1.0, &keys("sa")), 3.0 * FRAC_PI_4);
    }

    #[test]
    fn idle_heading_resets_by_default() {
        let planner = MovementPlanner::default();
        assert_eq!(planner.candidate_heading(2.5, &Controls::new()), 0.0);
        // all four held nets to zero as well
        assert_eq!(planner.candidate_heading(2.5, &keys("wasd")), 0.0);
    }

    #[test]
    fn idle_heading_can_hold() {
        let planner = MovementPlanner::new(MovementPolicy {
            idle_heading: IdleHeading::Hold,
            ..MovementPolicy::default()
        });
        assert_eq!(planner.candidate_heading(2.5, &Controls::new()), 2.5);
        assert_relative_eq!(planner.candidate_heading(2.5, &keys("w")), -FRAC_PI_2);
    }

    #[test]
    fn forward_in_empty_world() {
        let world = World::new(10.0, 10.0);
        let start = Pose::new(Point2::new(1.0, 2.0), 0.7);
        let next = updated_player_pose(&start, &keys("w"), 5.0, 0.2, &world, &unit_box());
        assert_relative_eq!(next.position.x, 1.0);
        assert_relative_eq!(next.position.z, 1.0);
        assert_relative_eq!(next.rotation, -FRAC_PI_2);
    }

    #[test]
    fn idle_step_resets_heading_in_place() {
        let world = World::new(10.0, 10.0);
        let start = Pose::new(Point2::new(1.0, 2.0), 0.7);
        let next = updated_player_pose(&start, &Controls::new(), 5.0, 0.2, &world, &unit_box());
        assert_eq!(next, Pose::new(start.position, 0.0));
    }

    #[test]
    fn blocked_move_keeps_position_and_heading() {
        let mut world = World::new(10.0, 10.0);
        world.add_object(WorldObject::new(0.0, -1.0, 0.0, unit_box()));
        let start = Pose::new(Point2::ZERO, 0.3);
        let next = updated_player_pose(&start, &keys("w"), 5.0, 0.2, &world, &unit_box());
        assert_eq!(next, start);
    }

    #[test]
    fn blocked_outcome_carries_candidate_and_obstacle() {
        let mut world = World::new(10.0, 10.0);
        let id = world.add_object(WorldObject::new(2.0, 0.0, 0.0, unit_box()));
        let start = Pose::new(Point2::ZERO, 0.3);
        let outcome = MovementPlanner::default().plan(&start, &keys("d"), 2.0, 1.0, &world, &unit_box());
        match outcome {
            MoveOutcome::Blocked {
                kept,
                candidate,
                obstacle,
            } => {
                assert_eq!(kept, start);
                assert_eq!(candidate.position, Point2::new(2.0, 0.0));
                assert_eq!(candidate.rotation, 0.0);
                assert_eq!(obstacle, id);
            }
            MoveOutcome::Committed(_) => panic!("expected a blocked move"),
        }
        assert_eq!(outcome.pose(), start);
    }

    #[test]
    fn heading_change_alone_can_be_blocked() {
        // A long thin player standing clear of a wall. At zero speed only the
        // heading changes, and turning to face -Z lays the box along X and
        // into the wall, so the turn is rejected.
        let player = BoundingBox::from_half_extents(0.1, 2.0);
        let mut world = World::new(10.0, 10.0);
        world.add_object(WorldObject::new(1.5, 0.0, 0.0, unit_box()));
        let start = Pose::new(Point2::ZERO, 0.0);
        let outcome = MovementPlanner::default().plan(&start, &keys("w"), 0.0, 0.1, &world, &player);
        assert!(outcome.is_blocked());
        assert_eq!(outcome.pose(), start);
    }

    #[test]
    fn touching_obstacle_blocks() {
        let mut world = World::new(10.0, 10.0);
        world.add_object(WorldObject::new(2.0, 0.0, 0.0, unit_box()));
        let start = Pose::new(Point2::ZERO, 0.0);
        // candidate x = 1.0, box edge at 1.5 touches the obstacle's edge at 1.5
        let next = updated_player_pose(&start, &keys("d"), 1.0, 1.0, &world, &unit_box());
        assert_eq!(next, start);
    }

    #[test]
    fn wrap_can_land_inside_obstacle() {
        let mut world = World::new(10.0, 10.0);
        world.add_object(WorldObject::new(-10.0, 0.0, 0.0, unit_box()));
        let start = Pose::new(Point2::new(9.9, 0.0), 0.0);
        let next = updated_player_pose(&start, &keys("d"), 5.0, 1.0, &world, &unit_box());
        assert_eq!(next, start);
    }

    #[test]
    fn try_plan_rejects_invalid_input() {
        let world = World::new(10.0, 10.0);
        let planner = MovementPlanner::default();
        let good = Pose::default();
        let controls = Controls::new().with(ControlKey::Forward);

        let bad_pose = Pose::new(Point2::new(f64::NAN, 0.0), 0.0);
        assert!(matches!(
            planner.try_plan(&bad_pose, &controls, 1.0, 0.1, &world, &unit_box()),
            Err(MovementError::NonFinitePose { .. })
        ));
        assert_eq!(
            planner.try_plan(&good, &controls, f64::INFINITY, 0.1, &world, &unit_box()),
            Err(MovementError::InvalidSpeed(f64::INFINITY))
        );
        assert_eq!(
            planner.try_plan(&good, &controls, 1.0, -0.1, &world, &unit_box()),
            Err(MovementError::InvalidDelta(-0.1))
        );

        let p = Point2::new(0.5, 0.5);
        let flat = BoundingBox::new(p, p, p, p);
        assert!(matches!(
            planner.try_plan(&good, &controls, 1.0, 0.1, &world, &flat),
            Err(MovementError::InvalidPlayerBox(GeometryError::Degenerate { edges: 0 }))
        ));

        let bad_world = World::new(-1.0, 10.0);
        assert!(matches!(
            planner.try_plan(&good, &controls, 1.0, 0.1, &bad_world, &unit_box()),
            Err(MovementError::InvalidExtents { .. })
        ));
    }

    #[test]
    fn try_plan_matches_plan_on_valid_input() {
        let mut world = World::new(10.0, 10.0);
        world.add_object(WorldObject::new(4.0, 4.0, 0.2, unit_box()));
        let planner = MovementPlanner::default();
        let start = Pose::new(Point2::new(1.0, 1.0), 0.0);
        for input in ["", "w", "s", "ad", "wd", "sa"] {
            let controls = keys(input);
            assert_eq!(
                planner.try_plan(&start, &controls, 3.0, 0.5, &world, &unit_box()),
                Ok(planner.plan(&start, &controls, 3.0, 0.5, &world, &unit_box()))
            );
        }
    }

    #[test]
    fn unchecked_plan_propagates_non_finite() {
        let world = World::new(10.0, 10.0);
        let start = Pose::new(Point2::new(f64::NAN, 0.0), 0.0);
        let next = updated_player_pose(&start, &keys("d"), 1.0, 1.0, &world, &unit_box());
        assert!(next.position.x.is_nan());
    }
}
