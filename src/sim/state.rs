//! Level session state
//!
//! Everything needed to resume or replay a session lives here. A session is
//! created from a validated [`Level`] and a seed; after spawning, the only
//! input that affects it is the per-frame cursor.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{Ball, BallStatus, Barrier, Drawable, Hazard, HomeZone, Shape};
use super::tick::GameEvent;
use crate::level::Level;
use crate::tuning::Tuning;

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Balls are moving
    Playing,
    /// Every surviving ball is home; the session is frozen
    Accomplished,
}

/// One play-through of a level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelSession {
    /// 1-based level number
    pub level: u32,
    /// Seed the balls were spawned from
    pub seed: u64,
    /// Arena size; balls bounce inside `[0, bounds]`
    pub bounds: Vec2,
    /// Balls in spawn order, ids 0..n
    pub balls: Vec<Ball>,
    pub barriers: Vec<Barrier>,
    pub hazards: Vec<Hazard>,
    pub home: HomeZone,
    /// Balls swallowed by black holes so far
    pub lost_count: u32,
    pub total_balls: u32,
    pub phase: SessionPhase,
    /// Frames simulated
    pub frame: u64,
    /// Events from the most recent tick (not persisted)
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl LevelSession {
    /// Spawn a fresh session for `level`
    pub fn new(level: &Level, seed: u64, tuning: &Tuning) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);

        let balls: Vec<Ball> = level
            .spawns
            .iter()
            .zip(0u32..)
            .map(|(spawn, id)| {
                let (pos, vel) = spawn.sample(&mut rng);
                Ball::new(id, pos, vel, tuning.ball_radius)
            })
            .collect();

        log::info!(
            "Level {} started with {} balls (seed {})",
            level.number,
            balls.len(),
            seed
        );

        Self {
            level: level.number,
            seed,
            bounds: tuning.bounds(),
            total_balls: balls.len() as u32,
            balls,
            barriers: level.barriers.clone(),
            hazards: level.hazards.clone(),
            home: level.home.clone(),
            lost_count: 0,
            phase: SessionPhase::Playing,
            frame: 0,
            events: Vec::new(),
        }
    }

    #[inline]
    pub fn is_accomplished(&self) -> bool {
        self.phase == SessionPhase::Accomplished
    }

    /// Balls not yet destroyed
    pub fn surviving(&self) -> impl Iterator<Item = &Ball> {
        self.balls.iter().filter(|b| !b.is_destroyed())
    }

    /// Draw list, back to front
    ///
    /// Captured balls get a tether back to `cursor`.
    pub fn scene(&self, cursor: Vec2) -> Vec<Shape> {
        let mut shapes: Vec<Shape> = std::iter::once(&self.home as &dyn Drawable)
            .chain(self.hazards.iter().map(|h| h as &dyn Drawable))
            .chain(self.barriers.iter().map(|b| b as &dyn Drawable))
            .filter_map(|entity| entity.shape())
            .collect();

        for ball in &self.balls {
            if ball.status == BallStatus::Captured {
                shapes.push(Shape::Tether {
                    from: cursor,
                    to: ball.pos,
                });
            }
            shapes.extend(ball.shape());
        }

        shapes
    }
}
