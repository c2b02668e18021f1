//! Track tile instances and the one-shot advance trigger
//!
//! A tile is a fixed-length piece of road whose leading edge doubles as the
//! trigger that keeps the track growing: the first time the tracked agent
//! reaches it, the tile asks for the next tile to be spawned. The request
//! goes through the [`RequestNextTile`] sink the manager injects each tick,
//! so tiles never reach for the manager through globals and tests can swap
//! in a fake spawner.

use crate::store::Handle;

/// Handle to a tile instance in the tile store
pub type TileHandle = Handle<Tile>;

/// Sink for "spawn the next tile" requests raised by leading-edge triggers
///
/// Implemented by the track manager's per-tick request queue, and by fakes
/// in tests.
pub trait RequestNextTile {
    fn request_next_tile(&mut self);
}

/// One active or pooled piece of road
///
/// The trigger state machine is Armed -> Triggered, returned to Armed only
/// by [`Tile::reset`] when the tile is reused. While armed, the first tick
/// that sees the agent at or past the leading edge fires exactly once;
/// oscillating back and forth across the edge afterwards does nothing.
pub struct Tile {
    template: usize,
    origin: f32,
    armed: bool,
    active: bool,
}

impl Tile {
    /// Fresh tile placed with its leading edge at `origin`
    pub fn new(template: usize, origin: f32) -> Self {
        Self {
            template,
            origin,
            armed: true,
            active: true,
        }
    }

    /// Index of the catalog template this tile was instantiated from
    pub fn template(&self) -> usize {
        self.template
    }

    /// Forward-axis coordinate of the leading edge
    pub fn origin(&self) -> f32 {
        self.origin
    }

    /// Whether the trigger has not fired since the last reset
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Fire the advance trigger if the agent has reached the leading edge
    ///
    /// Crossing semantics: the trigger fires once the agent coordinate is at
    /// or past the origin, so a fast agent cannot step over the zone between
    /// ticks. The armed check and the disarm happen in this single call;
    /// only the tracked agent's coordinate may be fed in here.
    pub fn check_trigger(&mut self, agent_x: f32, spawner: &mut dyn RequestNextTile) {
        if !self.armed || agent_x < self.origin {
            return;
        }
        self.armed = false;
        spawner.request_next_tile();
    }

    /// Return a recycled tile to service at a new position
    pub fn reset(&mut self, origin: f32) {
        self.origin = origin;
        self.armed = true;
        self.active = true;
    }

    /// Take the tile out of service (recycled or about to be destroyed)
    pub fn deactivate(&mut self) {
        self.active = false;
    }
}
