//! Roadloop core - endless-track generation and recycling
//!
//! Keeps an infinite-looking road populated with a finite set of tile and
//! prop instances as a single forward-moving agent advances along one axis.
//!
//! # Architecture
//!
//! - [`TrackManager`] - owns all mutable state and drives spawn-ahead /
//!   recycle-behind once per simulation tick
//! - [`Tile`] - fixed-length road piece with a one-shot leading-edge trigger
//!   that chains the next spawn
//! - [`PropPlacer`] - fills a tile's declared attachment points with pooled
//!   props, randomized per spawn
//! - [`InstancePool`] / [`TemplatePools`] - bounded free lists so steady
//!   state reuses instances instead of allocating
//! - [`Store`] - generational slot storage; stale handles resolve to `None`
//!   instead of touching destroyed instances
//!
//! Geometry comes from externally supplied [`TileCatalog`] / [`PropCatalog`]
//! templates; the system never generates geometry itself.

pub mod catalog;
pub mod config;
pub mod error;
pub mod placer;
pub mod pool;
pub mod store;
pub mod tile;
pub mod track;

#[cfg(test)]
mod integration;

pub use catalog::{AttachPoint, PropCatalog, PropTemplate, Side, TileCatalog, TileTemplate};
pub use config::TrackConfig;
pub use error::TrackError;
pub use placer::{Prop, PropHandle, PropPlacer};
pub use pool::{InstancePool, TemplatePools};
pub use store::{Handle, Store};
pub use tile::{RequestNextTile, Tile, TileHandle};
pub use track::{TrackManager, TrackStats};
