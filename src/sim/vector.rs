//! 2D vector helpers on top of `glam::Vec2`
//!
//! glam already covers add/sub/scale/dot, and `perp_dot` is the 2D scalar
//! cross product (`x1 * y2 - y1 * x2`). The collision code additionally needs
//! an oriented perpendicular and "same direction, new length".

use glam::Vec2;

/// Which way to rotate when taking a perpendicular
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    /// Counter-clockwise in y-up axes: (x, y) -> (-y, x)
    Left,
    /// Clockwise in y-up axes: (x, y) -> (y, -x)
    Right,
}

impl Turn {
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Turn::Left => 1.0,
            Turn::Right => -1.0,
        }
    }
}

pub trait VecExt {
    /// The vector rotated by 90 degrees
    fn perpendicular(self, turn: Turn) -> Vec2;

    /// Same direction, given length. The zero vector stays zero.
    fn scale_to_length(self, length: f32) -> Vec2;
}

impl VecExt for Vec2 {
    #[inline]
    fn perpendicular(self, turn: Turn) -> Vec2 {
        Vec2::new(-self.y, self.x) * turn.sign()
    }

    #[inline]
    fn scale_to_length(self, length: f32) -> Vec2 {
        self.normalize_or_zero() * length
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perpendicular_orientation() {
        let v = Vec2::new(10.0, 0.0);
        assert_eq!(v.perpendicular(Turn::Left), Vec2::new(0.0, 10.0));
        assert_eq!(v.perpendicular(Turn::Right), Vec2::new(0.0, -10.0));
        assert_eq!(v.perpendicular(Turn::Left).dot(v), 0.0);
    }

    #[test]
    fn test_scale_to_length() {
        let v = Vec2::new(3.0, 4.0).scale_to_length(10.0);
        assert!((v - Vec2::new(6.0, 8.0)).length() < 1e-5);
        assert_eq!(Vec2::ZERO.scale_to_length(10.0), Vec2::ZERO);
    }

    #[test]
    fn test_perp_dot_is_scalar_cross() {
        let a = Vec2::new(1.0, 2.0);
        let b = Vec2::new(3.0, 5.0);
        assert_eq!(a.perp_dot(b), 1.0 * 5.0 - 2.0 * 3.0);
        assert_eq!(a.perp_dot(b), -b.perp_dot(a));
    }
}
