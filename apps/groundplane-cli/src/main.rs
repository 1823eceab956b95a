use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use groundplane_common::{Point2, Pose};
use groundplane_geometry::BoundingBox;
use groundplane_input::Controls;
use groundplane_kernel::{
    IdleHeading, MovementPlanner, MovementPolicy, OpposingInput, Player, PlayerConfig, World,
    WorldObject,
};
use groundplane_scene::Scene;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "groundplane-cli", about = "CLI tool for groundplane scenes")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Load a scene file and report whether it is usable
    Validate {
        /// Scene file (.yaml, .yml or .json)
        scene: PathBuf,
    },
    /// Run a headless simulation with the same keys held every tick
    Simulate {
        /// Scene file; a small built-in arena is used when omitted
        scene: Option<PathBuf>,
        /// Number of ticks to simulate
        #[arg(short, long, default_value = "60")]
        ticks: u64,
        /// Seconds per tick
        #[arg(short, long, default_value = "0.016666666666666666")]
        delta: f64,
        /// Held keys as WASD letters, e.g. "wd"
        #[arg(short, long, default_value = "w")]
        input: String,
        /// Keep the current heading when no direction is held
        #[arg(long)]
        hold_heading: bool,
        /// The later key of an opposing pair wins instead of the pair netting to zero
        #[arg(long)]
        last_wins: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("groundplane-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("geometry: {}", groundplane_geometry::crate_info());
            println!("scene: {}", groundplane_scene::crate_info());
        }
        Commands::Validate { scene } => {
            let loaded = Scene::load(&scene)
                .with_context(|| format!("failed to load scene {}", scene.display()))?;
            println!(
                "{}: ok, world {}x{}, {} obstacles, player at ({:.2}, {:.2})",
                scene.display(),
                loaded.world.width() * 2.0,
                loaded.world.depth() * 2.0,
                loaded.world.object_count(),
                loaded.player.pose.position.x,
                loaded.player.pose.position.z,
            );
        }
        Commands::Simulate {
            scene,
            ticks,
            delta,
            input,
            hold_heading,
            last_wins,
        } => {
            let controls: Controls = input
                .parse()
                .with_context(|| format!("invalid --input {input:?}"))?;
            let Scene {
                mut world,
                mut player,
            } = match scene {
                Some(path) => Scene::load(&path)
                    .with_context(|| format!("failed to load scene {}", path.display()))?,
                None => demo_scene(),
            };
            let planner = MovementPlanner::new(MovementPolicy {
                opposing: if last_wins {
                    OpposingInput::LastWins
                } else {
                    OpposingInput::Sequential
                },
                idle_heading: if hold_heading {
                    IdleHeading::Hold
                } else {
                    IdleHeading::Reset
                },
            });

            println!("Simulating {ticks} ticks at dt={delta} holding {input:?}");
            let start = player.pose;
            let (blocked, events) =
                run_simulation(&mut world, &mut player, &controls, delta, &planner, ticks)?;

            tracing::info!(ticks, blocked, "simulation finished");
            println!(
                "Start: ({:.3}, {:.3}) heading {:.3}",
                start.position.x, start.position.z, start.rotation
            );
            println!(
                "End:   ({:.3}, {:.3}) heading {:.3}",
                player.pose.position.x, player.pose.position.z, player.pose.rotation
            );
            println!("Ticks: {}, blocked: {blocked}, events: {events}", world.tick());
        }
    }

    Ok(())
}

/// Step `ticks` times, draining the event log as it goes so long runs stay
/// bounded. Returns the blocked-tick and event counts.
fn run_simulation(
    world: &mut World,
    player: &mut Player,
    controls: &Controls,
    delta: f64,
    planner: &MovementPlanner,
    ticks: u64,
) -> anyhow::Result<(u64, u64)> {
    let mut blocked = 0u64;
    let mut events = world.drain_events().len() as u64;
    for _ in 0..ticks {
        let outcome = world
            .try_step_player(player, controls, delta, planner)
            .context("simulation step rejected")?;
        if outcome.is_blocked() {
            blocked += 1;
        }
        events += world.drain_events().len() as u64;
    }
    Ok((blocked, events))
}

/// A 20x20 arena with a wall ahead of the player and a rotated crate to
/// the right.
fn demo_scene() -> Scene {
    let world = World::with_objects(
        10.0,
        10.0,
        vec![
            WorldObject::new(0.0, -4.0, 0.0, BoundingBox::from_half_extents(3.0, 0.5)),
            WorldObject::new(4.0, 1.0, 0.6, BoundingBox::from_half_extents(1.0, 1.0)),
        ],
    );
    let player = Player::new(Pose::new(Point2::ZERO, 0.0), PlayerConfig::default());
    Scene { world, player }
}
