//! Level entities: balls, barriers, hazards and the home zone
//!
//! Plain value types holding only what the physics needs. Presentation goes
//! through [`Shape`] descriptors so the platform layer can draw them without
//! the simulation knowing about canvases.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Ball status - exactly one holds at any time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallStatus {
    /// Bouncing freely
    Active,
    /// Within capture distance of the cursor, being dragged
    Captured,
    /// Swallowed by a black hole; skipped by all further physics
    Destroyed,
}

/// A ball entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub id: u32,
    pub pos: Vec2,
    /// Displacement per frame
    pub vel: Vec2,
    pub radius: f32,
    pub status: BallStatus,
}

impl Ball {
    pub fn new(id: u32, pos: Vec2, vel: Vec2, radius: f32) -> Self {
        Self {
            id,
            pos,
            vel,
            radius,
            status: BallStatus::Active,
        }
    }

    #[inline]
    pub fn is_destroyed(&self) -> bool {
        self.status == BallStatus::Destroyed
    }
}

/// How a barrier changes a ball's speed on rebound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BarrierKind {
    #[default]
    Normal,
    Accelerate,
    Decelerate,
}

/// An inner wall: a line segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Barrier {
    pub start: Vec2,
    pub end: Vec2,
    pub kind: BarrierKind,
}

impl Barrier {
    pub fn new(start: Vec2, end: Vec2, kind: BarrierKind) -> Self {
        Self { start, end, kind }
    }

    /// Vector from start to end
    #[inline]
    pub fn direction(&self) -> Vec2 {
        self.end - self.start
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum HazardKind {
    BlackHole,
    Wormhole { target: Vec2 },
}

/// A circular hazard zone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hazard {
    pub center: Vec2,
    pub radius: f32,
    pub kind: HazardKind,
}

impl Hazard {
    /// True when the whole ball is inside the hazard circle
    #[inline]
    pub fn contains(&self, ball: &Ball) -> bool {
        ball.pos.distance(self.center) < self.radius - ball.radius
    }
}

/// Axis-aligned target rectangle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HomeZone {
    /// Top-left corner
    pub origin: Vec2,
    pub size: Vec2,
}

impl HomeZone {
    pub fn new(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }

    /// True when the whole ball is strictly inside the rectangle
    pub fn contains(&self, ball: &Ball) -> bool {
        let min = self.origin + Vec2::splat(ball.radius);
        let max = self.origin + self.size - Vec2::splat(ball.radius);
        ball.pos.x > min.x && ball.pos.x < max.x && ball.pos.y > min.y && ball.pos.y < max.y
    }
}

/// Drawable state handed to the platform layer
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Home { origin: Vec2, size: Vec2 },
    Hazard { center: Vec2, radius: f32, kind: HazardKind },
    Barrier { from: Vec2, to: Vec2, kind: BarrierKind },
    Ball { center: Vec2, radius: f32, captured: bool },
    /// Line from the cursor to a captured ball
    Tether { from: Vec2, to: Vec2 },
}

/// Entities that can describe how they look
pub trait Drawable {
    /// `None` when the entity is no longer visible
    fn shape(&self) -> Option<Shape>;
}

impl Drawable for Ball {
    fn shape(&self) -> Option<Shape> {
        match self.status {
            BallStatus::Destroyed => None,
            status => Some(Shape::Ball {
                center: self.pos,
                radius: self.radius,
                captured: status == BallStatus::Captured,
            }),
        }
    }
}

impl Drawable for Barrier {
    fn shape(&self) -> Option<Shape> {
        Some(Shape::Barrier {
            from: self.start,
            to: self.end,
            kind: self.kind,
        })
    }
}

impl Drawable for Hazard {
    fn shape(&self) -> Option<Shape> {
        Some(Shape::Hazard {
            center: self.center,
            radius: self.radius,
            kind: self.kind,
        })
    }
}

impl Drawable for HomeZone {
    fn shape(&self) -> Option<Shape> {
        Some(Shape::Home {
            origin: self.origin,
            size: self.size,
        })
    }
}
