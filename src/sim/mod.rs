//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per frame, velocities are displacement per frame
//! - Seeded RNG only, and only when a session spawns its balls
//! - Stable iteration order (by ball ID)
//! - No rendering or platform dependencies

pub mod capture;
pub mod collision;
pub mod entity;
pub mod outcome;
pub mod state;
pub mod tick;
pub mod vector;

pub use capture::check_capture;
pub use collision::{advance, bounce_off_bounds, hit_barrier, rebound, reflect_across};
pub use entity::{Ball, BallStatus, Barrier, BarrierKind, Drawable, Hazard, HazardKind, HomeZone, Shape};
pub use outcome::{LevelResult, OutcomeTier};
pub use state::{LevelSession, SessionPhase};
pub use tick::{GameEvent, HazardEffect, TickInput, all_home, check_hazards, tick};
pub use vector::{Turn, VecExt};
