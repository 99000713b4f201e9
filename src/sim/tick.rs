//! Per-frame simulation tick
//!
//! Advances a session by one frame. For every ball still in play, in id
//! order: capture check, move (barriers, outer walls, integration), then
//! hazards. The win check runs once all balls have moved.

use glam::Vec2;

use super::capture::check_capture;
use super::collision::advance;
use super::entity::{Ball, BallStatus, Hazard, HazardKind, HomeZone};
use super::outcome::LevelResult;
use super::state::{LevelSession, SessionPhase};
use crate::tuning::Tuning;

/// Input for a single frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickInput {
    /// Cursor position in arena coordinates; parked far outside when absent
    pub cursor: Vec2,
}

/// What a hazard did to a ball
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HazardEffect {
    Consumed,
    Teleported,
}

/// Something observable that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Captured { ball: u32 },
    Released { ball: u32 },
    BarrierHit { ball: u32, barrier: usize },
    Consumed { ball: u32 },
    Teleported { ball: u32 },
    Accomplished,
}

/// Apply the first hazard that fully contains `ball`
///
/// Black holes destroy the ball; wormholes move it to their target and leave
/// the velocity alone. Destroyed balls are ignored.
pub fn check_hazards(ball: &mut Ball, hazards: &[Hazard]) -> Option<HazardEffect> {
    if ball.is_destroyed() {
        return None;
    }

    let hazard = hazards.iter().find(|h| h.contains(ball))?;
    match hazard.kind {
        HazardKind::BlackHole => {
            ball.status = BallStatus::Destroyed;
            Some(HazardEffect::Consumed)
        }
        HazardKind::Wormhole { target } => {
            ball.pos = target;
            Some(HazardEffect::Teleported)
        }
    }
}

/// True when every surviving ball is inside the home zone
///
/// Vacuously true once every ball has been destroyed.
pub fn all_home(balls: &[Ball], home: &HomeZone) -> bool {
    balls
        .iter()
        .filter(|b| !b.is_destroyed())
        .all(|b| home.contains(b))
}

/// Advance the session by one frame
///
/// Returns the level result on the frame the session becomes accomplished.
/// Accomplished sessions are frozen; further ticks do nothing.
pub fn tick(session: &mut LevelSession, input: &TickInput, tuning: &Tuning) -> Option<LevelResult> {
    session.events.clear();
    if session.is_accomplished() {
        return None;
    }
    session.frame += 1;

    let LevelSession {
        balls,
        barriers,
        hazards,
        bounds,
        events,
        lost_count,
        frame,
        ..
    } = session;

    for ball in balls.iter_mut().filter(|b| !b.is_destroyed()) {
        let was_captured = ball.status == BallStatus::Captured;
        match (was_captured, check_capture(ball, input.cursor, barriers, tuning)) {
            (false, true) => events.push(GameEvent::Captured { ball: ball.id }),
            (true, false) => events.push(GameEvent::Released { ball: ball.id }),
            _ => {}
        }

        if let Some(barrier) = advance(ball, barriers, *bounds, tuning) {
            events.push(GameEvent::BarrierHit { ball: ball.id, barrier });
        }

        // Captured balls are shielded from hazards while dragged
        if ball.status != BallStatus::Active {
            continue;
        }
        match check_hazards(ball, hazards) {
            Some(HazardEffect::Consumed) => {
                *lost_count += 1;
                log::debug!("Ball {} consumed on frame {}", ball.id, frame);
                events.push(GameEvent::Consumed { ball: ball.id });
            }
            Some(HazardEffect::Teleported) => {
                events.push(GameEvent::Teleported { ball: ball.id });
            }
            None => {}
        }
    }

    if !all_home(&session.balls, &session.home) {
        return None;
    }

    session.phase = SessionPhase::Accomplished;
    session.events.push(GameEvent::Accomplished);
    let result = LevelResult::new(session.level, session.lost_count, session.total_balls);
    log::info!(
        "Level {} accomplished on frame {}: {} ({} stars)",
        result.level,
        session.frame,
        result.summary(),
        result.stars_earned
    );
    Some(result)
}
