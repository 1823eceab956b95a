use groundplane_common::{ObstacleId, Point2, Pose};
use groundplane_geometry::{BoundingBox, Quad, rotated_rectangle};
use groundplane_input::Controls;
use serde::{Deserialize, Serialize};

use crate::movement::{MoveOutcome, MovementError, MovementPlanner};

/// A record produced by every mutation the world sees.
///
/// The log is append-only and grows by one entry per tick; callers that
/// step for a long time drain it with [`World::drain_events`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MovementEvent {
    /// An obstacle was added to the collidable set.
    ObstacleAdded { id: ObstacleId },
    /// An obstacle was removed, with its last known placement.
    ObstacleRemoved { object: WorldObject },
    /// The player's candidate pose was free and has been committed.
    Moved { tick: u64, from: Pose, to: Pose },
    /// The candidate pose hit `obstacle`; the player kept `at`.
    Blocked {
        tick: u64,
        at: Pose,
        candidate: Pose,
        obstacle: ObstacleId,
    },
}

/// A static obstacle on the ground plane.
///
/// The kernel only ever reads obstacles while planning; the owner may move
/// or reshape them between ticks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldObject {
    pub id: ObstacleId,
    pub x: f64,
    pub z: f64,
    pub rotation: f64,
    pub bbox: BoundingBox,
}

impl WorldObject {
    pub fn new(x: f64, z: f64, rotation: f64, bbox: BoundingBox) -> Self {
        Self {
            id: ObstacleId::new(),
            x,
            z,
            rotation,
            bbox,
        }
    }

    pub fn center(&self) -> Point2 {
        Point2::new(self.x, self.z)
    }

    pub fn pose(&self) -> Pose {
        Pose::new(self.center(), self.rotation)
    }

    /// World-space outline of this obstacle.
    pub fn footprint(&self) -> Quad {
        rotated_rectangle(self.rotation, self.center(), &self.bbox)
    }
}

/// Half-extents of the playable area. Positions range over
/// `[-width, width] x [-depth, depth]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extents {
    pub width: f64,
    pub depth: f64,
}

impl Extents {
    pub const fn new(width: f64, depth: f64) -> Self {
        Self { width, depth }
    }

    /// Toroidal wrap: a coordinate past one edge teleports to exactly the
    /// opposite edge. Overshoot is discarded, not carried across.
    pub fn wrap(&self, p: Point2) -> Point2 {
        Point2::new(wrap_axis(p.x, self.width), wrap_axis(p.z, self.depth))
    }

    pub fn contains(&self, p: Point2) -> bool {
        p.x.abs() <= self.width && p.z.abs() <= self.depth
    }
}

fn wrap_axis(v: f64, extent: f64) -> f64 {
    if v < -extent {
        extent
    } else if v > extent {
        -extent
    } else {
        v
    }
}

/// Fixed per-player settings, chosen when the player is created.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Units per second.
    pub speed: f64,
    pub bounding_box: BoundingBox,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            speed: 5.0,
            bounding_box: BoundingBox::default(),
        }
    }
}

/// The moving agent: its current pose and fixed config.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Player {
    pub pose: Pose,
    pub config: PlayerConfig,
}

impl Player {
    pub fn new(pose: Pose, config: PlayerConfig) -> Self {
        Self { pose, config }
    }

    /// World-space outline of the player at its current pose.
    pub fn footprint(&self) -> Quad {
        rotated_rectangle(
            self.pose.rotation,
            self.pose.position,
            &self.config.bounding_box,
        )
    }
}

/// The bounded ground plane and the obstacles on it.
///
/// Obstacles keep insertion order; collision queries walk them in that order
/// and stop at the first hit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    width: f64,
    depth: f64,
    collidable_objects: Vec<WorldObject>,
    tick: u64,
    #[serde(skip)]
    event_log: Vec<MovementEvent>,
}

impl World {
    /// Create an empty world with the given half-extents at tick 0.
    pub fn new(width: f64, depth: f64) -> Self {
        Self {
            width,
            depth,
            collidable_objects: Vec::new(),
            tick: 0,
            event_log: Vec::new(),
        }
    }

    /// Create a world pre-populated with obstacles. No events are logged for
    /// the initial set.
    pub fn with_objects(width: f64, depth: f64, objects: Vec<WorldObject>) -> Self {
        Self {
            collidable_objects: objects,
            ..Self::new(width, depth)
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn depth(&self) -> f64 {
        self.depth
    }

    pub fn extents(&self) -> Extents {
        Extents::new(self.width, self.depth)
    }

    /// Number of completed player steps.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn collidable_objects(&self) -> &[WorldObject] {
        &self.collidable_objects
    }

    pub fn object_count(&self) -> usize {
        self.collidable_objects.len()
    }

    /// Add an obstacle at the end of the collision order. Returns its id.
    pub fn add_object(&mut self, object: WorldObject) -> ObstacleId {
        let id = object.id;
        self.collidable_objects.push(object);
        self.event_log.push(MovementEvent::ObstacleAdded { id });
        id
    }

    /// Remove an obstacle, keeping the order of the rest.
    pub fn remove_object(&mut self, id: ObstacleId) -> Option<WorldObject> {
        let index = self.collidable_objects.iter().position(|o| o.id == id)?;
        let object = self.collidable_objects.remove(index);
        self.event_log.push(MovementEvent::ObstacleRemoved { object });
        Some(object)
    }

    pub fn get(&self, id: ObstacleId) -> Option<&WorldObject> {
        self.collidable_objects.iter().find(|o| o.id == id)
    }

    /// Mutable access for the owner to move an obstacle between ticks.
    pub fn get_mut(&mut self, id: ObstacleId) -> Option<&mut WorldObject> {
        self.collidable_objects.iter_mut().find(|o| o.id == id)
    }

    /// Read-only access to the event log.
    pub fn events(&self) -> &[MovementEvent] {
        &self.event_log
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<MovementEvent> {
        std::mem::take(&mut self.event_log)
    }

    /// Check extents and every obstacle for values the planner can use.
    pub fn validate(&self) -> Result<(), MovementError> {
        if !(self.width.is_finite() && self.width > 0.0 && self.depth.is_finite() && self.depth > 0.0)
        {
            return Err(MovementError::InvalidExtents {
                width: self.width,
                depth: self.depth,
            });
        }
        for object in &self.collidable_objects {
            if !object.pose().is_finite() {
                return Err(MovementError::NonFiniteObstacle { id: object.id });
            }
            object
                .bbox
                .validate()
                .map_err(|source| MovementError::InvalidObstacle {
                    id: object.id,
                    source,
                })?;
        }
        Ok(())
    }

    /// Advance one tick: plan the player's move, commit the resulting pose
    /// into `player`, and append the outcome to the event log.
    pub fn step_player(
        &mut self,
        player: &mut Player,
        controls: &Controls,
        delta: f64,
        planner: &MovementPlanner,
    ) -> MoveOutcome {
        let _span = tracing::info_span!("step_player", tick = self.tick + 1).entered();
        let outcome = planner.plan(
            &player.pose,
            controls,
            player.config.speed,
            delta,
            self,
            &player.config.bounding_box,
        );
        self.commit(player, outcome);
        outcome
    }

    /// Like [`World::step_player`], but rejects invalid input instead of
    /// producing a corrupted pose. The tick does not advance on error.
    pub fn try_step_player(
        &mut self,
        player: &mut Player,
        controls: &Controls,
        delta: f64,
        planner: &MovementPlanner,
    ) -> Result<MoveOutcome, MovementError> {
        let _span = tracing::info_span!("step_player", tick = self.tick + 1).entered();
        let outcome = planner.try_plan(
            &player.pose,
            controls,
            player.config.speed,
            delta,
            self,
            &player.config.bounding_box,
        )?;
        self.commit(player, outcome);
        Ok(outcome)
    }

    fn commit(&mut self, player: &mut Player, outcome: MoveOutcome) {
        self.tick += 1;
        let event = match outcome {
            MoveOutcome::Committed(to) => MovementEvent::Moved {
                tick: self.tick,
                from: player.pose,
                to,
            },
            MoveOutcome::Blocked {
                kept,
                candidate,
                obstacle,
            } => MovementEvent::Blocked {
                tick: self.tick,
                at: kept,
                candidate,
                obstacle,
            },
        };
        player.pose = outcome.pose();
        self.event_log.push(event);
    }
}
