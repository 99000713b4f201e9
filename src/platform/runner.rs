//! Frame scheduling and the session run loop
//!
//! The loop is an ordinary `while`: ask the scheduler for a frame, snapshot
//! the cursor, tick, report. It stops when the level is accomplished or the
//! scheduler runs dry, whichever comes first.

use glam::Vec2;

use super::input::Cursor;
use crate::sim::outcome::LevelResult;
use crate::sim::state::LevelSession;
use crate::sim::tick::{TickInput, tick};
use crate::tuning::Tuning;

/// Decides whether another frame runs
pub trait FrameScheduler {
    fn next_frame(&mut self) -> bool;
}

/// Runs a fixed number of frames, then stops
#[derive(Debug, Clone)]
pub struct FixedFrames {
    remaining: u64,
}

impl FixedFrames {
    pub fn new(frames: u64) -> Self {
        Self { remaining: frames }
    }

    pub fn remaining(&self) -> u64 {
        self.remaining
    }
}

impl FrameScheduler for FixedFrames {
    fn next_frame(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        true
    }
}

/// Supplies the cursor position for each frame
pub trait CursorSource {
    fn snapshot(&mut self) -> TickInput;
}

impl CursorSource for Cursor {
    fn snapshot(&mut self) -> TickInput {
        self.tick_input()
    }
}

/// Replays a list of positions, then holds the last one
#[derive(Debug, Clone)]
pub struct ScriptedCursor {
    path: Vec<Vec2>,
    next: usize,
    fallback: Vec2,
}

impl ScriptedCursor {
    /// `fallback` is used when the path is empty
    pub fn new(path: Vec<Vec2>, fallback: Vec2) -> Self {
        Self {
            path,
            next: 0,
            fallback,
        }
    }

    /// The same position every frame
    pub fn fixed(position: Vec2) -> Self {
        Self::new(Vec::new(), position)
    }
}

impl CursorSource for ScriptedCursor {
    fn snapshot(&mut self) -> TickInput {
        let cursor = self
            .path
            .get(self.next)
            .or(self.path.last())
            .copied()
            .unwrap_or(self.fallback);
        self.next = self.next.saturating_add(1);
        TickInput { cursor }
    }
}

/// Hooks for things that watch a session: painters, sound, score keeping
pub trait SessionObserver {
    /// Called after every simulated frame
    fn frame(&mut self, _session: &LevelSession) {}

    /// Called once, when the level is accomplished
    fn level_completed(&mut self, _result: &LevelResult) {}
}

/// Drive `session` until it is accomplished or `scheduler` stops
pub fn run_session<S, C, O>(
    session: &mut LevelSession,
    tuning: &Tuning,
    scheduler: &mut S,
    cursor: &mut C,
    observer: &mut O,
) -> Option<LevelResult>
where
    S: FrameScheduler + ?Sized,
    C: CursorSource + ?Sized,
    O: SessionObserver + ?Sized,
{
    while scheduler.next_frame() {
        let input = cursor.snapshot();
        let result = tick(session, &input, tuning);

        for event in &session.events {
            log::debug!("Frame {}: {:?}", session.frame, event);
        }
        observer.frame(session);

        if let Some(result) = result {
            observer.level_completed(&result);
            return Some(result);
        }
    }

    log::info!(
        "Level {} stopped after {} frames ({} of {} balls lost)",
        session.level,
        session.frame,
        session.lost_count,
        session.total_balls
    );
    None
}
