//! Pointer and touch input folded into a single cursor
//!
//! The browser delivers events whenever it likes; the simulation reads the
//! cursor once per frame. [`Cursor`] sits in between and holds the latest
//! position, or a parked position far outside the arena when no pointer is
//! over it.

use glam::Vec2;

use crate::sim::tick::TickInput;
use crate::tuning::Tuning;

/// Input events in arena coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Move(Vec2),
    Leave,
    TouchStart(Vec2),
    TouchMove(Vec2),
    TouchEnd,
}

/// Latest cursor state for one session
#[derive(Debug, Clone, PartialEq)]
pub struct Cursor {
    position: Vec2,
    parked: Vec2,
}

impl Cursor {
    /// Starts parked
    pub fn new(tuning: &Tuning) -> Self {
        let parked = tuning.parked_cursor();
        Self {
            position: parked,
            parked,
        }
    }

    pub fn apply(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Move(pos) | PointerEvent::TouchStart(pos) | PointerEvent::TouchMove(pos) => {
                self.position = pos;
            }
            PointerEvent::Leave | PointerEvent::TouchEnd => self.park(),
        }
    }

    pub fn park(&mut self) {
        self.position = self.parked;
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    #[inline]
    pub fn is_parked(&self) -> bool {
        self.position == self.parked
    }

    /// Snapshot for the next tick
    pub fn tick_input(&self) -> TickInput {
        TickInput {
            cursor: self.position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_parked_out_of_reach() {
        let tuning = Tuning::default();
        let cursor = Cursor::new(&tuning);
        assert!(cursor.is_parked());
        // Far enough that no ball in the arena can be captured
        assert!(cursor.position().length() > tuning.capture_distance * 5.0);
    }

    #[test]
    fn test_mouse_and_touch_fold_together() {
        let mut cursor = Cursor::new(&Tuning::default());
        cursor.apply(PointerEvent::Move(Vec2::new(10.0, 20.0)));
        assert_eq!(cursor.tick_input().cursor, Vec2::new(10.0, 20.0));

        cursor.apply(PointerEvent::Leave);
        assert!(cursor.is_parked());

        cursor.apply(PointerEvent::TouchStart(Vec2::new(300.0, 200.0)));
        cursor.apply(PointerEvent::TouchMove(Vec2::new(310.0, 205.0)));
        assert_eq!(cursor.position(), Vec2::new(310.0, 205.0));

        cursor.apply(PointerEvent::TouchEnd);
        assert!(cursor.is_parked());
    }
}
