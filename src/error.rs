//! Load-time errors
//!
//! Everything that can go wrong happens before the first frame: bad JSON,
//! out-of-range spawn data, malformed hazards or barriers. The simulation
//! itself never fails.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("level data is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("level {level} does not exist (catalog has {available})")]
    UnknownLevel { level: u32, available: usize },

    #[error("level {level} has no balls")]
    NoBalls { level: u32 },

    #[error("level {level}, ball {ball}: {axis} range [{lo}, {hi}] is invalid")]
    InvalidRange {
        level: u32,
        ball: usize,
        axis: &'static str,
        lo: f32,
        hi: f32,
    },

    #[error("level {level}, ball {ball}: {axis} range is pinned at zero")]
    ZeroRange {
        level: u32,
        ball: usize,
        axis: &'static str,
    },

    #[error("level {level}, hazard {hazard}: wormhole has no teleport target")]
    MissingWormholeTarget { level: u32, hazard: usize },

    #[error("level {level}, hazard {hazard}: only wormholes take a teleport target")]
    UnexpectedTarget { level: u32, hazard: usize },

    #[error("level {level}, hazard {hazard}: radius {radius} must be positive")]
    InvalidHazardRadius { level: u32, hazard: usize, radius: f32 },

    #[error("level {level}, barrier {barrier}: endpoints coincide")]
    DegenerateBarrier { level: u32, barrier: usize },

    #[error("level {level}: home zone {width}x{height} must have a positive size")]
    InvalidHome { level: u32, width: f32, height: f32 },

    #[error("invalid tuning: {0}")]
    InvalidTuning(&'static str),
}
