//! Lead Me Home - a cursor-driven bouncing-ball puzzle
//!
//! Core modules:
//! - `sim`: Deterministic simulation (vector math, collisions, capture, hazards, sessions)
//! - `level`: Level definitions and load-time validation
//! - `tuning`: Level-independent physics constants
//! - `progress`: Per-level star records and unlocking
//! - `platform`: Cursor input, frame scheduling and the browser adapter

pub mod error;
pub mod level;
pub mod platform;
pub mod progress;
pub mod sim;
pub mod tuning;

pub use error::LoadError;
pub use level::{Level, LevelCatalog, LevelDef};
pub use progress::LevelRecords;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Play area dimensions (canvas pixels)
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 600.0;

    /// Cursor radius within which a ball gets captured
    pub const CAPTURE_DISTANCE: f32 = 80.0;
    /// Distance a captured ball is pulled to and then kept at
    pub const CONTROL_DISTANCE: f32 = 60.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 8.0;
    /// Nominal ball speed (pixels per frame)
    pub const BALL_SPEED: f32 = 4.0;
    /// Accelerating barriers never push the dominant axis past this
    pub const ACCELERATE_MAX_SPEED: f32 = BALL_SPEED + 2.0;
    /// Decelerating barriers never slow the dominant axis below this
    pub const DECELERATE_MIN_SPEED: f32 = 0.4;
    /// Speed change per bounce on accelerating/decelerating barriers
    pub const SPEED_STEP: f32 = 1.0;

    /// Smallest determinant magnitude the segment solver divides by
    pub const MIN_DETERMINANT: f32 = 0.001;

    /// Stars for a perfect clear
    pub const MAX_STARS: u8 = 3;
    /// Stars needed on a level to unlock the next one
    pub const UNLOCK_STARS: u8 = 2;
}
