//! Track manager: spawn-ahead and recycle-behind
//!
//! Owns everything mutable in the system: both stores, both pool layers, the
//! ordered active-tile list and the tile -> props mapping. Advanced once per
//! simulation tick with the tracked agent's forward coordinate. Within a
//! tick the order is fixed and load-bearing: trigger scan, then spawns, then
//! the recycle sweep, so the track never transiently shrinks ahead of the
//! agent.

use hashbrown::HashMap;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::catalog::{PropCatalog, Side, TileCatalog};
use crate::config::TrackConfig;
use crate::error::TrackError;
use crate::placer::{Prop, PropHandle, PropPlacer};
use crate::pool::{InstancePool, TemplatePools};
use crate::store::Store;
use crate::tile::{RequestNextTile, Tile, TileHandle};

/// Per-tick queue of spawn requests raised by tile triggers
#[derive(Default)]
struct SpawnRequests {
    pending: u32,
}

impl RequestNextTile for SpawnRequests {
    fn request_next_tile(&mut self) {
        self.pending += 1;
    }
}

/// Counters and gauges exposed for logging and debug overlays
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackStats {
    pub active_tiles: usize,
    pub pooled_tiles: usize,
    pub active_props: usize,
    pub pooled_props: usize,
    pub spawn_cursor: f32,
    pub tiles_spawned: u64,
    pub tiles_recycled: u64,
}

/// The endless-track generation and recycling system
pub struct TrackManager {
    config: TrackConfig,
    tile_catalog: TileCatalog,
    prop_catalog: PropCatalog,

    tiles: Store<Tile>,
    props: Store<Prop>,
    tile_pool: InstancePool<Tile>,
    prop_pools: TemplatePools<Prop>,
    placer: PropPlacer,
    rng: Pcg32,

    spawn_cursor: f32,
    active_tiles: Vec<TileHandle>,
    tile_props: HashMap<TileHandle, Vec<PropHandle>>,

    tiles_spawned: u64,
    tiles_recycled: u64,
}

impl TrackManager {
    /// Validate configuration and catalogs, refusing to start on fatal ones
    ///
    /// An empty tile catalog or a template whose declared length disagrees
    /// with the configured tile length is fatal. An empty prop catalog only
    /// costs scenery and is reported as a warning.
    pub fn new(
        config: TrackConfig,
        tile_catalog: TileCatalog,
        prop_catalog: PropCatalog,
        seed: u64,
    ) -> Result<Self, TrackError> {
        config.validate()?;

        if tile_catalog.is_empty() {
            return Err(TrackError::EmptyTileCatalog);
        }
        for template in tile_catalog.iter() {
            if (template.length - config.tile_length).abs() > f32::EPSILON {
                return Err(TrackError::TileLengthMismatch {
                    template: template.name.clone(),
                    declared: template.length,
                    expected: config.tile_length,
                });
            }
        }
        if prop_catalog.is_empty() {
            log::warn!("prop catalog is empty; tiles will spawn without props");
        }

        let prop_pools = TemplatePools::new(prop_catalog.len(), config.max_prop_pool_size);
        let tile_pool = InstancePool::new(config.max_tile_pool_size);

        Ok(Self {
            tile_catalog,
            prop_catalog,
            tiles: Store::new(),
            props: Store::new(),
            tile_pool,
            prop_pools,
            placer: PropPlacer::new(seed),
            rng: Pcg32::seed_from_u64(seed.wrapping_add(1)),
            spawn_cursor: 0.0,
            active_tiles: Vec::new(),
            tile_props: HashMap::new(),
            tiles_spawned: 0,
            tiles_recycled: 0,
            config,
        })
    }

    /// Warm the pools and spawn the initial run of tiles starting at 0
    pub fn seed(&mut self) {
        debug_assert!(self.active_tiles.is_empty(), "track seeded twice");

        self.warm_pools();
        for _ in 0..self.config.initial_tile_count {
            self.spawn_next();
        }
        log::info!(
            "track seeded: {} tiles, cursor at {:.1}",
            self.active_tiles.len(),
            self.spawn_cursor
        );
    }

    /// Pre-instantiate a few cold instances so early spawns reuse instead of
    /// allocating
    fn warm_pools(&mut self) {
        for _ in 0..self.config.warm_tile_count.min(self.config.max_tile_pool_size) {
            let template = self.rng.random_range(0..self.tile_catalog.len());
            let mut tile = Tile::new(template, 0.0);
            tile.deactivate();
            let handle = self.tiles.insert(tile);
            if !self.tile_pool.release(handle) {
                self.tiles.remove(handle);
                break;
            }
        }

        let warm = self
            .config
            .warm_props_per_template
            .min(self.config.max_prop_pool_size);
        for template in 0..self.prop_catalog.len() {
            for _ in 0..warm {
                let handle = self.props.insert(Prop::inactive(template));
                if !self.prop_pools.release(template, handle) {
                    self.props.remove(handle);
                    break;
                }
            }
        }

        log::debug!(
            "pools warmed: {} tiles, {} props",
            self.tile_pool.len(),
            self.prop_pools.total_len()
        );
    }

    /// Advance the system by one simulation tick
    ///
    /// Order within the tick is an invariant: spawn requests raised by
    /// triggers are applied before the recycle sweep runs, so the active
    /// count never transiently drops ahead of the agent.
    pub fn tick(&mut self, agent_x: f32) {
        if agent_x > self.spawn_cursor {
            // Seed count too small for the agent's speed; the track is gone
            // from under it.
            log::error!(
                "agent at x={:.1} has outrun the track (spawn cursor {:.1})",
                agent_x,
                self.spawn_cursor
            );
        }

        let mut requests = SpawnRequests::default();
        for index in 0..self.active_tiles.len() {
            let handle = self.active_tiles[index];
            // Stale handles are left for the recycle sweep to drop
            let Some(tile) = self.tiles.get_mut(handle) else {
                continue;
            };
            tile.check_trigger(agent_x, &mut requests);
        }

        for _ in 0..requests.pending {
            self.spawn_next();
        }

        self.recycle_behind(agent_x);
    }

    /// Spawn exactly one tile at the cursor and advance it one tile length
    ///
    /// Reuses a pooled tile when one is available, resets its trigger state,
    /// places props on both sides and records them against the tile.
    pub fn spawn_next(&mut self) {
        let origin = self.spawn_cursor;
        let handle = self.acquire_tile(origin);
        self.active_tiles.push(handle);

        let mut placed = Vec::new();
        let template_index = self.tiles.get(handle).map(Tile::template).unwrap_or(0);
        if let Some(template) = self.tile_catalog.get(template_index) {
            for side in Side::BOTH {
                placed.extend(self.placer.place_side(
                    &self.config,
                    &self.prop_catalog,
                    template,
                    side,
                    handle,
                    origin,
                    &mut self.props,
                    &mut self.prop_pools,
                ));
            }
        }

        log::debug!(
            "spawned tile at x={:.1} with {} props",
            origin,
            placed.len()
        );
        self.tile_props.insert(handle, placed);
        self.spawn_cursor += self.config.tile_length;
        self.tiles_spawned += 1;
    }

    /// Reuse a pooled tile or instantiate a fresh one from a random variant
    fn acquire_tile(&mut self, origin: f32) -> TileHandle {
        while let Some(handle) = self.tile_pool.acquire() {
            match self.tiles.get_mut(handle) {
                Some(tile) => {
                    tile.reset(origin);
                    return handle;
                }
                // Destroyed externally while pooled; drop and keep looking
                None => continue,
            }
        }

        let template = self.rng.random_range(0..self.tile_catalog.len());
        log::debug!("tile pool empty, instantiating variant {}", template);
        self.tiles.insert(Tile::new(template, origin))
    }

    /// Recycle every tile that has fallen far enough behind the agent
    ///
    /// Oldest-first, which is also forward-position order. A tile that was
    /// destroyed externally is dropped from tracking without further side
    /// effects beyond releasing its surviving props.
    pub fn recycle_behind(&mut self, agent_x: f32) {
        let mut index = 0;
        while index < self.active_tiles.len() {
            let handle = self.active_tiles[index];

            let Some(tile) = self.tiles.get(handle) else {
                log::warn!("active tile {:?} was destroyed externally", handle);
                self.active_tiles.remove(index);
                self.release_props_of(handle);
                continue;
            };

            let behind = agent_x - tile.origin();
            if behind <= self.config.recycle_distance {
                index += 1;
                continue;
            }

            self.active_tiles.remove(index);
            self.release_props_of(handle);
            self.recycle_tile(handle, behind);
        }
    }

    /// Deactivate and pool (or destroy) every prop mapped to a tile
    fn release_props_of(&mut self, handle: TileHandle) {
        let Some(mapped) = self.tile_props.remove(&handle) else {
            return;
        };
        for prop_handle in mapped {
            let Some(prop) = self.props.get_mut(prop_handle) else {
                continue;
            };
            prop.deactivate();
            let template = prop.template();
            if !self.prop_pools.release(template, prop_handle) {
                // Pool at capacity, destroy for good
                self.props.remove(prop_handle);
            }
        }
    }

    fn recycle_tile(&mut self, handle: TileHandle, behind: f32) {
        if let Some(tile) = self.tiles.get_mut(handle) {
            tile.deactivate();
            if !self.tile_pool.release(handle) {
                self.tiles.remove(handle);
            }
        }
        self.tiles_recycled += 1;
        log::debug!("recycled tile {:.1} behind the agent", behind);
    }

    // ------------------------------------------------------------------
    // External destruction (severed ownership)
    // ------------------------------------------------------------------

    /// Destroy a tile out from under the manager, as an external actor might
    ///
    /// The next tick drops it from tracking defensively.
    pub fn destroy_tile(&mut self, handle: TileHandle) -> bool {
        self.tiles.remove(handle).is_some()
    }

    /// Destroy a prop out from under the manager
    pub fn destroy_prop(&mut self, handle: PropHandle) -> bool {
        self.props.remove(handle).is_some()
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Active tiles in spawn order (= forward-axis order)
    pub fn active_tiles(&self) -> &[TileHandle] {
        &self.active_tiles
    }

    pub fn active_tile_count(&self) -> usize {
        self.active_tiles.len()
    }

    /// Forward-axis coordinate where the next tile will be placed
    pub fn next_spawn_position(&self) -> f32 {
        self.spawn_cursor
    }

    pub fn tile(&self, handle: TileHandle) -> Option<&Tile> {
        self.tiles.get(handle)
    }

    pub fn prop(&self, handle: PropHandle) -> Option<&Prop> {
        self.props.get(handle)
    }

    /// Props currently mapped to a tile
    pub fn props_of(&self, handle: TileHandle) -> Option<&[PropHandle]> {
        self.tile_props.get(&handle).map(Vec::as_slice)
    }

    pub fn config(&self) -> &TrackConfig {
        &self.config
    }

    /// Snapshot of the counters and gauges
    ///
    /// Gauges count live instances only. Pools and the tracking structures
    /// may hold stale handles between an external destruction and the sweep
    /// that drops them, so the pooled gauges are derived from store liveness
    /// rather than from the parked-handle counts.
    pub fn stats(&self) -> TrackStats {
        let active_tiles = self
            .active_tiles
            .iter()
            .filter(|&&handle| self.tiles.contains(handle))
            .count();
        let active_props = self
            .tile_props
            .values()
            .flatten()
            .filter(|&&handle| self.props.contains(handle))
            .count();
        TrackStats {
            active_tiles,
            pooled_tiles: self.tiles.len() - active_tiles,
            active_props,
            pooled_props: self.props.len() - active_props,
            spawn_cursor: self.spawn_cursor,
            tiles_spawned: self.tiles_spawned,
            tiles_recycled: self.tiles_recycled,
        }
    }
}
