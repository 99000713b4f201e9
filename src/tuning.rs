//! Data-driven physics constants
//!
//! Defaults come from [`crate::consts`]. A JSON override only needs the
//! fields it changes.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::LoadError;

/// Level-independent simulation constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub arena_width: f32,
    pub arena_height: f32,
    pub capture_distance: f32,
    pub control_distance: f32,
    pub ball_radius: f32,
    pub accelerate_max_speed: f32,
    pub decelerate_min_speed: f32,
    pub speed_step: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
            capture_distance: CAPTURE_DISTANCE,
            control_distance: CONTROL_DISTANCE,
            ball_radius: BALL_RADIUS,
            accelerate_max_speed: ACCELERATE_MAX_SPEED,
            decelerate_min_speed: DECELERATE_MIN_SPEED,
            speed_step: SPEED_STEP,
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON override
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn validate(&self) -> Result<(), LoadError> {
        if !(self.arena_width > 0.0 && self.arena_height > 0.0) {
            return Err(LoadError::InvalidTuning("arena must have a positive size"));
        }
        if !(self.ball_radius > 0.0) {
            return Err(LoadError::InvalidTuning("ball radius must be positive"));
        }
        if !(self.control_distance > 0.0) {
            return Err(LoadError::InvalidTuning("control distance must be positive"));
        }
        if !(self.control_distance < self.capture_distance) {
            return Err(LoadError::InvalidTuning(
                "control distance must be smaller than capture distance",
            ));
        }
        if !(self.speed_step > 0.0) {
            return Err(LoadError::InvalidTuning("speed step must be positive"));
        }
        if !(self.decelerate_min_speed >= 0.0
            && self.decelerate_min_speed < self.accelerate_max_speed)
        {
            return Err(LoadError::InvalidTuning(
                "decelerate minimum must be below accelerate maximum",
            ));
        }
        Ok(())
    }

    /// Play area size; walls sit at x = 0, x = width, y = 0, y = height
    #[inline]
    pub fn bounds(&self) -> Vec2 {
        Vec2::new(self.arena_width, self.arena_height)
    }

    /// Where the cursor is parked when the pointer leaves the play area
    #[inline]
    pub fn parked_cursor(&self) -> Vec2 {
        Vec2::splat(-self.capture_distance * 10.0)
    }
}
