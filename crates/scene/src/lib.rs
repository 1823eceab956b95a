//! Scene files: the world extents, obstacles and player setup a simulation
//! starts from.
//!
//! Scenes are YAML (`.yaml`, `.yml`) or JSON (`.json`). A bounding box is
//! written either as its four corners or as half extents:
//!
//! ```yaml
//! world: { width: 20, depth: 20 }
//! player:
//!   speed: 5
//!   bounding_box: { half_width: 0.5, half_depth: 0.5 }
//!   start: { position: { x: 0, z: 0 }, rotation: 0 }
//! obstacles:
//!   - { x: 3, z: -2, rotation: 0.4, bbox: { half_width: 1, half_depth: 0.25 } }
//! ```

use std::path::{Path, PathBuf};

use groundplane_common::Pose;
use groundplane_geometry::BoundingBox;
use groundplane_kernel::{MovementError, Player, PlayerConfig, World, WorldObject, first_collision};
use serde::{Deserialize, Serialize};

/// Errors from loading or saving a scene.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported scene format: {}", .0.display())]
    UnsupportedFormat(PathBuf),
    #[error("invalid scene: {0}")]
    Invalid(#[from] MovementError),
}

/// On-disk encodings a scene can use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneFormat {
    Yaml,
    Json,
}

impl SceneFormat {
    /// Pick the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self, SceneError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => Ok(Self::Yaml),
            Some("json") => Ok(Self::Json),
            _ => Err(SceneError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// A bounding box as written in a scene file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BoxSpec {
    Corners(BoundingBox),
    HalfExtents { half_width: f64, half_depth: f64 },
}

impl BoxSpec {
    pub fn to_bounding_box(self) -> BoundingBox {
        match self {
            BoxSpec::Corners(bbox) => bbox,
            BoxSpec::HalfExtents {
                half_width,
                half_depth,
            } => BoundingBox::from_half_extents(half_width, half_depth),
        }
    }
}

impl Default for BoxSpec {
    fn default() -> Self {
        BoxSpec::Corners(BoundingBox::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldSpec {
    pub width: f64,
    pub depth: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerSpec {
    #[serde(default = "default_speed")]
    pub speed: f64,
    #[serde(default)]
    pub bounding_box: BoxSpec,
    #[serde(default)]
    pub start: Pose,
}

fn default_speed() -> f64 {
    PlayerConfig::default().speed
}

impl Default for PlayerSpec {
    fn default() -> Self {
        Self {
            speed: default_speed(),
            bounding_box: BoxSpec::default(),
            start: Pose::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleSpec {
    pub x: f64,
    pub z: f64,
    #[serde(default)]
    pub rotation: f64,
    pub bbox: BoxSpec,
}

/// The serialized form of a scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneFile {
    pub world: WorldSpec,
    #[serde(default)]
    pub player: PlayerSpec,
    #[serde(default)]
    pub obstacles: Vec<ObstacleSpec>,
}

impl SceneFile {
    pub fn parse(text: &str, format: SceneFormat) -> Result<Self, SceneError> {
        Ok(match format {
            SceneFormat::Yaml => serde_yaml::from_str(text)?,
            SceneFormat::Json => serde_json::from_str(text)?,
        })
    }

    pub fn to_text(&self, format: SceneFormat) -> Result<String, SceneError> {
        Ok(match format {
            SceneFormat::Yaml => serde_yaml::to_string(self)?,
            SceneFormat::Json => serde_json::to_string_pretty(self)?,
        })
    }

    /// Build and validate the runtime world and player.
    ///
    /// Obstacles keep file order, which is also collision-test order.
    pub fn into_scene(self) -> Result<Scene, SceneError> {
        let objects = self
            .obstacles
            .iter()
            .map(|o| WorldObject::new(o.x, o.z, o.rotation, o.bbox.to_bounding_box()))
            .collect();
        let world = World::with_objects(self.world.width, self.world.depth, objects);
        world.validate()?;

        let config = PlayerConfig {
            speed: self.player.speed,
            bounding_box: self.player.bounding_box.to_bounding_box(),
        };
        if !(config.speed.is_finite() && config.speed >= 0.0) {
            return Err(MovementError::InvalidSpeed(config.speed).into());
        }
        config
            .bounding_box
            .validate()
            .map_err(MovementError::InvalidPlayerBox)?;
        let start = self.player.start;
        if !start.is_finite() {
            return Err(MovementError::NonFinitePose {
                x: start.position.x,
                z: start.position.z,
                rotation: start.rotation,
            }
            .into());
        }

        if let Some(obstacle) = first_collision(&start, &world, &config.bounding_box) {
            tracing::warn!(
                obstacle = %obstacle.id.short(),
                x = start.position.x,
                z = start.position.z,
                "player starts inside an obstacle and cannot move until it is cleared"
            );
        }

        tracing::debug!(
            obstacles = world.object_count(),
            width = world.width(),
            depth = world.depth(),
            "scene built"
        );
        Ok(Scene {
            world,
            player: Player::new(start, config),
        })
    }
}

/// A ready-to-run world and player.
#[derive(Debug, Clone)]
pub struct Scene {
    pub world: World,
    pub player: Player,
}

impl Scene {
    /// Load a scene file, picking the format from its extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let path = path.as_ref();
        let format = SceneFormat::from_path(path)?;
        let text = std::fs::read_to_string(path)?;
        SceneFile::parse(&text, format)?.into_scene()
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, SceneError> {
        SceneFile::parse(text, SceneFormat::Yaml)?.into_scene()
    }

    pub fn from_json_str(text: &str) -> Result<Self, SceneError> {
        SceneFile::parse(text, SceneFormat::Json)?.into_scene()
    }

    /// Serialize back to the file form. Obstacle boxes are written as corners.
    pub fn to_file(&self) -> SceneFile {
        SceneFile {
            world: WorldSpec {
                width: self.world.width(),
                depth: self.world.depth(),
            },
            player: PlayerSpec {
                speed: self.player.config.speed,
                bounding_box: BoxSpec::Corners(self.player.config.bounding_box),
                start: self.player.pose,
            },
            obstacles: self
                .world
                .collidable_objects()
                .iter()
                .map(|o| ObstacleSpec {
                    x: o.x,
                    z: o.z,
                    rotation: o.rotation,
                    bbox: BoxSpec::Corners(o.bbox),
                })
                .collect(),
        }
    }

    /// Save to a file, picking the format from its extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SceneError> {
        let path = path.as_ref();
        let format = SceneFormat::from_path(path)?;
        std::fs::write(path, self.to_file().to_text(format)?)?;
        Ok(())
    }
}

pub fn crate_info() -> &'static str {
    "groundplane-scene v0.1.0"
}
