//! Error taxonomy for the track system
//!
//! Only fatal configuration problems surface as errors: the track manager
//! refuses to start without them fixed. Missing optional assets (no prop
//! catalog, a template side without attachment points) degrade gracefully
//! with a warning. Stale references are absorbed by generational handles,
//! and double triggers are prevented by the armed flag.

use thiserror::Error;

/// Fatal configuration errors raised before the track starts
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrackError {
    /// No tile templates to build a track from
    #[error("tile catalog is empty - no track can be generated")]
    EmptyTileCatalog,

    /// A config field fails validation
    #[error("invalid track configuration: {reason}")]
    InvalidConfig { reason: String },

    /// A tile template's declared length disagrees with the track's
    #[error("tile template '{template}' declares length {declared} but the track expects {expected}")]
    TileLengthMismatch {
        template: String,
        declared: f32,
        expected: f32,
    },
}
