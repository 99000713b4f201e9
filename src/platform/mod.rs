//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input events (mouse and touch folded into a cursor)
//! - Frame scheduling and the run loop
//! - Canvas drawing and listener lifetimes (wasm32 only)

pub mod input;
pub mod runner;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use input::{Cursor, PointerEvent};
pub use runner::{CursorSource, FixedFrames, FrameScheduler, ScriptedCursor, SessionObserver, run_session};
