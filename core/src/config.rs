//! Track configuration
//!
//! All tuning knobs for the track system, supplied externally and validated
//! once at startup. Defaults match the reference tuning of the driving sim:
//! five 50-unit tiles seeded ahead, one to three props per side with a 30%
//! skip chance, recycling 60 units behind the agent.

use serde::Deserialize;

use crate::error::TrackError;

/// Configuration surface for [`TrackManager`](crate::track::TrackManager)
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrackConfig {
    /// Tiles spawned at seed time; also the steady-state lead distance
    pub initial_tile_count: u32,
    /// Forward-axis length of every tile
    pub tile_length: f32,
    /// Minimum props rolled per tile side
    pub min_props_per_side: u32,
    /// Maximum props rolled per tile side
    pub max_props_per_side: u32,
    /// Probability in [0, 1] of leaving a chosen attachment point empty
    pub prop_skip_chance: f32,
    /// Distance behind the agent beyond which a tile is recycled
    pub recycle_distance: f32,
    /// Tile handles kept for reuse; overflow is destroyed
    pub max_tile_pool_size: usize,
    /// Prop handles kept for reuse, per prop template
    pub max_prop_pool_size: usize,
    /// Tiles pre-instantiated into the pool at seed time
    pub warm_tile_count: usize,
    /// Props pre-instantiated per template at seed time
    pub warm_props_per_template: usize,
}

impl Default for TrackConfig {
    fn default() -> Self {
        Self {
            initial_tile_count: 5,
            tile_length: 50.0,
            min_props_per_side: 1,
            max_props_per_side: 3,
            prop_skip_chance: 0.3,
            recycle_distance: 60.0,
            max_tile_pool_size: 10,
            max_prop_pool_size: 8,
            warm_tile_count: 3,
            warm_props_per_template: 2,
        }
    }
}

impl TrackConfig {
    /// Validate all fields, returning the first fatal problem found
    pub fn validate(&self) -> Result<(), TrackError> {
        if self.initial_tile_count == 0 {
            return Err(invalid("initial_tile_count must be at least 1"));
        }
        if !(self.tile_length > 0.0) {
            return Err(invalid("tile_length must be positive"));
        }
        if self.min_props_per_side > self.max_props_per_side {
            return Err(invalid(
                "min_props_per_side must not exceed max_props_per_side",
            ));
        }
        if !(0.0..=1.0).contains(&self.prop_skip_chance) {
            return Err(invalid("prop_skip_chance must be within [0, 1]"));
        }
        if !(self.recycle_distance > 0.0) {
            return Err(invalid("recycle_distance must be positive"));
        }
        Ok(())
    }
}

fn invalid(reason: &str) -> TrackError {
    TrackError::InvalidConfig {
        reason: reason.to_string(),
    }
}
