//! Headless fixed-timestep driver for the Roadloop track system
//!
//! Seeds a track from a built-in catalog (or a TOML config), advances an
//! agent at constant forward speed once per tick, and logs track statistics
//! every simulated second. Useful for eyeballing steady-state behavior and
//! pool churn without a renderer.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use roadloop_core::{
    AttachPoint, PropCatalog, PropTemplate, TileCatalog, TileTemplate, TrackConfig, TrackManager,
};

#[derive(Parser, Debug)]
#[command(name = "roadloop-sim", about = "Headless endless-track drive")]
struct Args {
    /// Simulated duration in seconds
    #[arg(long, default_value_t = 60.0)]
    seconds: f32,

    /// Fixed ticks per simulated second
    #[arg(long, default_value_t = 60)]
    tick_rate: u32,

    /// Agent forward speed in units per second
    #[arg(long, default_value_t = 20.0)]
    speed: f32,

    /// RNG seed for variant choice and prop placement
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Optional TOML file overriding the default track configuration
    #[arg(long)]
    config: Option<PathBuf>,
}

fn load_config(args: &Args) -> Result<TrackConfig> {
    let Some(path) = &args.config else {
        return Ok(TrackConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
}

/// Built-in stand-in for the external catalogs: a few tile variants with
/// four attachment points per side, and a handful of prop types.
fn built_in_catalogs(tile_length: f32) -> (TileCatalog, PropCatalog) {
    let template = |name: &str| {
        let point = |i: usize, z: f32| {
            AttachPoint::at(glam::Vec3::new(
                tile_length * (0.15 + 0.2 * i as f32),
                0.0,
                z,
            ))
        };
        TileTemplate {
            name: name.to_string(),
            length: tile_length,
            left_points: (0..4).map(|i| point(i, -12.0)).collect(),
            right_points: (0..4).map(|i| point(i, 12.0)).collect(),
        }
    };

    let tiles = TileCatalog::new(vec![
        template("straight"),
        template("overpass"),
        template("waterfront"),
    ]);
    let props = PropCatalog::new(vec![
        PropTemplate::new("tower"),
        PropTemplate::new("block"),
        PropTemplate::new("shop"),
        PropTemplate::new("billboard"),
    ]);
    (tiles, props)
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;
    let (tiles, props) = built_in_catalogs(config.tile_length);

    let mut track = TrackManager::new(config, tiles, props, args.seed)
        .context("track refused to start")?;
    track.seed();

    let dt = 1.0 / args.tick_rate as f32;
    let total_ticks = (args.seconds * args.tick_rate as f32) as u64;
    let mut agent_x = 0.0f32;

    tracing::info!(
        "driving for {:.0}s at {} units/s, {} ticks/s, seed {}",
        args.seconds,
        args.speed,
        args.tick_rate,
        args.seed
    );

    for tick in 1..=total_ticks {
        agent_x += args.speed * dt;
        track.tick(agent_x);

        if tick % args.tick_rate as u64 == 0 {
            let stats = track.stats();
            tracing::info!(
                "t={:>4}s x={:>8.1} active={} pooled(tiles={}, props={}) spawned={} recycled={}",
                tick / args.tick_rate as u64,
                agent_x,
                stats.active_tiles,
                stats.pooled_tiles,
                stats.pooled_props,
                stats.tiles_spawned,
                stats.tiles_recycled
            );
        }
    }

    let stats = track.stats();
    tracing::info!(
        "done: {:.1} units driven, {} tiles spawned, {} recycled, {} still active",
        agent_x,
        stats.tiles_spawned,
        stats.tiles_recycled,
        stats.active_tiles
    );
    Ok(())
}
