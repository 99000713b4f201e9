//! Collision detection and response for line-segment barriers
//!
//! The tricky part of the game: a ball moving by a whole velocity step per
//! frame must never tunnel through a thin wall, whether it moves on its own or
//! is being dragged by the cursor. Detection is done ahead of the move: the
//! point of the ball nearest the barrier is swept along the motion vector and
//! intersected with the segment.

use glam::Vec2;

use super::entity::{Ball, Barrier, BarrierKind};
use super::vector::{Turn, VecExt};
use crate::consts::MIN_DETERMINANT;
use crate::tuning::Tuning;

/// How far behind the contact point (as a fraction of the motion) a touching
/// ball still counts as hitting; absorbs rounding after a clamp
const CONTACT_SLACK: f32 = 1e-4;

/// Check whether `ball`, moving by `motion`, runs into `barrier` within this step
///
/// Returns the ball centre at the moment its rim touches the barrier, or
/// `None` if the path stays clear (including when the ball moves away from
/// the barrier or does not move at all).
pub fn hit_barrier(ball: &Ball, barrier: &Barrier, motion: Vec2) -> Option<Vec2> {
    let bar = barrier.direction();
    if motion == Vec2::ZERO || bar == Vec2::ZERO {
        return None;
    }

    // Which side of the barrier the ball is on decides which way the contact
    // offset (centre -> nearest point of the rim) has to point
    let to_start = barrier.start - ball.pos;
    let to_end = barrier.end - ball.pos;
    let turn = if to_start.perp_dot(to_end) > 0.0 {
        Turn::Right
    } else {
        Turn::Left
    };
    let offset = bar.perpendicular(turn).scale_to_length(ball.radius);

    // Moving away from the barrier
    if bar.perp_dot(motion) * turn.sign() < 0.0 {
        return None;
    }

    // contact + s * motion == start + t * bar
    let contact = ball.pos + offset;
    let n = barrier.start - contact;
    let mut d = bar.perp_dot(motion);
    if d.abs() < MIN_DETERMINANT {
        d = if d > 0.0 {
            MIN_DETERMINANT
        } else {
            -MIN_DETERMINANT
        };
    }
    let s = bar.perp_dot(n) / d;
    let t = motion.perp_dot(n) / d;

    if (-CONTACT_SLACK..=1.0).contains(&s) && (0.0..=1.0).contains(&t) {
        Some(barrier.start + bar * t - offset)
    } else {
        None
    }
}

/// Reflect `vel` across the line through `axis` (a unit vector)
///
/// v' = 2(v·â)â - v: the component along the axis is kept, the component
/// across it is flipped.
#[inline]
pub fn reflect_across(vel: Vec2, axis: Vec2) -> Vec2 {
    2.0 * vel.dot(axis) * axis - vel
}

/// Largest of |vx| and |vy|
#[inline]
pub fn dominant_speed(vel: Vec2) -> f32 {
    vel.x.abs().max(vel.y.abs())
}

/// Velocity after bouncing off `barrier`
///
/// Accelerating barriers add up to one speed step on the dominant axis,
/// never past the configured maximum; decelerating ones take up to one step
/// off, never below the minimum. Direction is preserved in both cases.
pub fn rebound(vel: Vec2, barrier: &Barrier, tuning: &Tuning) -> Vec2 {
    let reflected = reflect_across(vel, barrier.direction().normalize_or_zero());
    let speed = dominant_speed(reflected);
    if speed <= 0.0 {
        return reflected;
    }

    match barrier.kind {
        BarrierKind::Normal => reflected,
        BarrierKind::Accelerate => {
            let step = tuning
                .speed_step
                .min(tuning.accelerate_max_speed - speed)
                .max(0.0);
            reflected * (1.0 + step / speed)
        }
        BarrierKind::Decelerate => {
            let step = tuning
                .speed_step
                .min(speed - tuning.decelerate_min_speed)
                .max(0.0);
            reflected * (1.0 - step / speed)
        }
    }
}

/// Bounce off the outer walls of the play area
///
/// An axis flips only while the ball is past the wall and still heading
/// outward, so a ball resting exactly at `radius` from a wall is left alone
/// and a ball that is already on its way back is never flipped again.
/// Returns true if either axis flipped.
pub fn bounce_off_bounds(ball: &mut Ball, bounds: Vec2) -> bool {
    let r = ball.radius;
    let mut bounced = false;

    if (ball.pos.x < r && ball.vel.x < 0.0) || (ball.pos.x > bounds.x - r && ball.vel.x > 0.0) {
        ball.vel.x = -ball.vel.x;
        bounced = true;
    }
    if (ball.pos.y < r && ball.vel.y < 0.0) || (ball.pos.y > bounds.y - r && ball.vel.y > 0.0) {
        ball.vel.y = -ball.vel.y;
        bounced = true;
    }

    bounced
}

/// Index of the first barrier `ball` runs into when moving by its velocity
fn first_hit(ball: &Ball, barriers: &[Barrier]) -> Option<usize> {
    barriers
        .iter()
        .position(|barrier| hit_barrier(ball, barrier, ball.vel).is_some())
}

/// Move a ball one frame: barriers, outer walls, integration, barriers again
///
/// A ball already touching a barrier (for instance after being dragged
/// against it) rebounds before it moves, so it never integrates into the
/// wall. Otherwise the step after the move is tested, so the ball turns
/// around before its rim can cross. In both passes the first barrier hit
/// rebounds the ball and the rest are skipped. Returns the index of that
/// barrier.
pub fn advance(ball: &mut Ball, barriers: &[Barrier], bounds: Vec2, tuning: &Tuning) -> Option<usize> {
    if let Some(hit) = first_hit(ball, barriers) {
        ball.vel = rebound(ball.vel, &barriers[hit], tuning);
        bounce_off_bounds(ball, bounds);
        ball.pos += ball.vel;
        return Some(hit);
    }

    bounce_off_bounds(ball, bounds);
    ball.pos += ball.vel;

    let hit = first_hit(ball, barriers)?;
    ball.vel = rebound(ball.vel, &barriers[hit], tuning);
    Some(hit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn floor() -> Barrier {
        Barrier::new(Vec2::new(0.0, 0.0), Vec2::new(100.0, 0.0), BarrierKind::Normal)
    }

    fn ball_at(x: f32, y: f32) -> Ball {
        Ball::new(1, Vec2::new(x, y), Vec2::ZERO, 8.0)
    }

    #[test]
    fn test_hit_barrier_from_above() {
        let hit = hit_barrier(&ball_at(50.0, 10.0), &floor(), Vec2::new(0.0, -5.0));
        let pos = hit.expect("ball should reach the barrier");
        assert!((pos - Vec2::new(50.0, 8.0)).length() < 1e-4);
    }

    #[test]
    fn test_hit_barrier_from_below() {
        let hit = hit_barrier(&ball_at(50.0, -10.0), &floor(), Vec2::new(0.0, 5.0));
        let pos = hit.expect("ball should reach the barrier");
        assert!((pos - Vec2::new(50.0, -8.0)).length() < 1e-4);
    }

    #[test]
    fn test_hit_barrier_ignores_balls_moving_away() {
        assert!(hit_barrier(&ball_at(50.0, 10.0), &floor(), Vec2::new(0.0, 5.0)).is_none());
        assert!(hit_barrier(&ball_at(50.0, -10.0), &floor(), Vec2::new(0.0, -5.0)).is_none());
    }

    #[test]
    fn test_hit_barrier_out_of_reach() {
        // Too far away for this step
        assert!(hit_barrier(&ball_at(50.0, 20.0), &floor(), Vec2::new(0.0, -5.0)).is_none());
        // Past the end of the segment
        assert!(hit_barrier(&ball_at(150.0, 10.0), &floor(), Vec2::new(0.0, -5.0)).is_none());
        // Not moving
        assert!(hit_barrier(&ball_at(50.0, 8.0), &floor(), Vec2::ZERO).is_none());
    }

    #[test]
    fn test_hit_barrier_diagonal_wall() {
        let wall = Barrier::new(Vec2::new(0.0, 0.0), Vec2::new(100.0, 100.0), BarrierKind::Normal);
        // Ball below the diagonal heading straight up into it
        let ball = ball_at(60.0, 40.0);
        let pos = hit_barrier(&ball, &wall, Vec2::new(0.0, 20.0)).expect("should hit");
        // Rim touches the line: centre is exactly one radius from it
        let dist = (pos.y - pos.x).abs() / 2f32.sqrt();
        assert!((dist - 8.0).abs() < 1e-3);
        assert!(pos.y < pos.x);
    }

    #[test]
    fn test_parallel_motion_does_not_blow_up() {
        let hit = hit_barrier(&ball_at(50.0, 20.0), &floor(), Vec2::new(5.0, 0.0));
        assert!(hit.is_none());
    }

    #[test]
    fn test_rebound_normal() {
        let v = rebound(Vec2::new(3.0, -4.0), &floor(), &Tuning::default());
        assert!((v - Vec2::new(3.0, 4.0)).length() < 1e-5);
    }

    #[test]
    fn test_rebound_accelerate_steps_toward_max() {
        let tuning = Tuning::default();
        let mut bar = floor();
        bar.kind = BarrierKind::Accelerate;

        let v = rebound(Vec2::new(3.0, -4.0), &bar, &tuning);
        assert!((v - Vec2::new(3.75, 5.0)).length() < 1e-5);

        // Only half a step left before the cap
        let v = rebound(Vec2::new(0.0, -5.5), &bar, &tuning);
        assert!((v.y - 6.0).abs() < 1e-5);

        // Already at the cap
        let v = rebound(Vec2::new(0.0, -6.0), &bar, &tuning);
        assert!((v.y - 6.0).abs() < 1e-5);
    }

    #[test]
    fn test_rebound_decelerate_steps_toward_min() {
        let tuning = Tuning::default();
        let mut bar = floor();
        bar.kind = BarrierKind::Decelerate;

        let v = rebound(Vec2::new(0.0, -4.0), &bar, &tuning);
        assert!((v.y - 3.0).abs() < 1e-5);

        let v = rebound(Vec2::new(0.0, -1.0), &bar, &tuning);
        assert!((v.y - 0.4).abs() < 1e-5);
    }

    #[test]
    fn test_ball_at_radius_does_not_flip() {
        let bounds = Vec2::new(800.0, 600.0);
        let mut ball = ball_at(8.0, 300.0);
        ball.vel = Vec2::new(3.0, 0.0);
        assert!(!bounce_off_bounds(&mut ball, bounds));
        assert_eq!(ball.vel.x, 3.0);

        ball.vel = Vec2::new(-3.0, 0.0);
        assert!(!bounce_off_bounds(&mut ball, bounds));
        assert_eq!(ball.vel.x, -3.0);
    }

    #[test]
    fn test_no_double_flip_across_frames() {
        let bounds = Vec2::new(800.0, 600.0);
        let mut ball = ball_at(8.0, 300.0);
        ball.vel = Vec2::new(-3.0, 0.0);

        let mut flips = 0;
        for _ in 0..6 {
            let before = ball.vel.x;
            advance(&mut ball, &[], bounds, &Tuning::default());
            if ball.vel.x != before {
                flips += 1;
            }
        }
        assert_eq!(flips, 1);
        assert!(ball.vel.x > 0.0);
    }

    #[test]
    fn test_advance_rebounds_before_crossing() {
        let tuning = Tuning::default();
        let bars = [floor()];
        let mut ball = ball_at(50.0, 30.0);
        ball.vel = Vec2::new(0.0, -4.0);

        let mut hits = 0;
        for _ in 0..20 {
            if advance(&mut ball, &bars, tuning.bounds(), &tuning).is_some() {
                hits += 1;
            }
            // The rim never crosses the wall
            assert!(ball.pos.y - ball.radius >= -1e-3);
        }
        assert_eq!(hits, 1);
        assert!(ball.vel.y > 0.0);
    }

    #[test]
    fn test_touching_ball_rebounds_before_moving() {
        let tuning = Tuning::default();
        let bars = [floor()];
        // Rim resting on the floor, heading into it
        let mut ball = ball_at(50.0, 8.0);
        ball.vel = Vec2::new(1.0, -4.0);

        assert_eq!(advance(&mut ball, &bars, tuning.bounds(), &tuning), Some(0));
        assert_eq!(ball.vel, Vec2::new(1.0, 4.0));
        assert!((ball.pos - Vec2::new(51.0, 12.0)).length() < 1e-4);
    }

    #[test]
    fn test_advance_first_barrier_wins() {
        let tuning = Tuning::default();
        let mut accel = floor();
        accel.kind = BarrierKind::Accelerate;
        let bars = [accel, floor()];
        let mut ball = ball_at(50.0, 14.0);
        ball.vel = Vec2::new(0.0, -4.0);

        assert_eq!(advance(&mut ball, &bars, tuning.bounds(), &tuning), Some(0));
        assert!((ball.vel.y - 5.0).abs() < 1e-5);
    }

    fn unit(angle: f32) -> Vec2 {
        Vec2::new(angle.cos(), angle.sin())
    }

    proptest! {
        #[test]
        fn normal_rebound_flips_normal_and_keeps_energy(
            bar_angle in 0.0f32..std::f32::consts::TAU,
            vel_angle in 0.0f32..std::f32::consts::TAU,
            speed in 0.5f32..10.0,
        ) {
            let dir = unit(bar_angle);
            let bar = Barrier::new(Vec2::ZERO, dir * 100.0, BarrierKind::Normal);
            let v = unit(vel_angle) * speed;
            let out = rebound(v, &bar, &Tuning::default());
            let normal = dir.perpendicular(Turn::Left);

            prop_assert!((out.dot(dir) - v.dot(dir)).abs() < 1e-3);
            prop_assert!((out.dot(normal) + v.dot(normal)).abs() < 1e-3);
            prop_assert!((out.length() - v.length()).abs() < 1e-3);
        }

        #[test]
        fn accelerate_is_bounded_and_increasing(
            bar_angle in 0.0f32..std::f32::consts::TAU,
            vel_angle in 0.0f32..std::f32::consts::TAU,
            speed in 0.5f32..5.5,
        ) {
            let tuning = Tuning::default();
            let bar = Barrier::new(Vec2::ZERO, unit(bar_angle) * 100.0, BarrierKind::Accelerate);
            let v = unit(vel_angle) * speed;
            let before = dominant_speed(reflect_across(v, unit(bar_angle)));
            let after = dominant_speed(rebound(v, &bar, &tuning));

            prop_assert!(after > before);
            prop_assert!(after <= tuning.accelerate_max_speed + 1e-4);
        }

        #[test]
        fn decelerate_is_bounded_and_decreasing(
            bar_angle in 0.0f32..std::f32::consts::TAU,
            vel_angle in 0.0f32..std::f32::consts::TAU,
            speed in 1.0f32..10.0,
        ) {
            let tuning = Tuning::default();
            let bar = Barrier::new(Vec2::ZERO, unit(bar_angle) * 100.0, BarrierKind::Decelerate);
            let v = unit(vel_angle) * speed;
            let before = dominant_speed(reflect_across(v, unit(bar_angle)));
            let after = dominant_speed(rebound(v, &bar, &tuning));

            prop_assert!(after < before);
            prop_assert!(after >= tuning.decelerate_min_speed - 1e-4);
        }
    }
}
