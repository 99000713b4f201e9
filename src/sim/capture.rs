//! Cursor capture and pull
//!
//! A ball that comes within capture distance of the cursor is grabbed and
//! reeled in to control distance. The pull is swept against the barriers like
//! a normal move so a dragged ball stops at a wall instead of passing through.

use glam::Vec2;

use super::collision::hit_barrier;
use super::entity::{Ball, BallStatus, Barrier};
use super::vector::VecExt;
use crate::tuning::Tuning;

/// Update a ball's capture status and apply the pull, if any
///
/// Returns true if the ball is captured after the check.
pub fn check_capture(ball: &mut Ball, cursor: Vec2, barriers: &[Barrier], tuning: &Tuning) -> bool {
    debug_assert!(!ball.is_destroyed(), "destroyed balls cannot be captured");

    let to_cursor = cursor - ball.pos;
    let dist = to_cursor.length();

    if dist >= tuning.capture_distance {
        ball.status = BallStatus::Active;
        return false;
    }

    ball.status = BallStatus::Captured;

    if dist > tuning.control_distance {
        let pull = to_cursor.scale_to_length(dist - tuning.control_distance);
        let target = barriers
            .iter()
            .find_map(|barrier| hit_barrier(ball, barrier, pull))
            .unwrap_or(ball.pos + pull);
        ball.pos = target;
    }

    true
}
