//! Vector and point helpers on top of `glam::Vec2`
//!
//! Angles follow screen coordinates (y grows downward), so "anticlockwise"
//! here means increasing angle in that frame.
//!
//! Angles are recovered with a plain arctangent, which only spans a
//! half-circle. Callers that need the absolute direction must add π when the
//! x component is negative; `absolute_angle` and `rotated_by` do exactly that.

use glam::Vec2;
use std::f32::consts::PI;

/// Angle-related operations on 2D vectors
pub trait VectorExt {
    /// Half-plane angle `atan(dy / dx)`, in `[-π/2, π/2]`. Zero for the zero vector.
    fn angle_in_rads(self) -> f32;

    /// Full-circle angle: `angle_in_rads` corrected by π when x is negative
    fn absolute_angle(self) -> f32;

    /// Same magnitude, pointing along `angle`
    fn with_angle(self, angle: f32) -> Vec2;

    /// Rotate anticlockwise by `angle`, preserving magnitude
    fn rotated_by(self, angle: f32) -> Vec2;

    fn is_perpendicular_to(self, other: Vec2) -> bool;
}

impl VectorExt for Vec2 {
    fn angle_in_rads(self) -> f32 {
        if self.length() == 0.0 {
            return 0.0;
        }
        (self.y / self.x).atan()
    }

    fn absolute_angle(self) -> f32 {
        let angle = self.angle_in_rads();
        if self.x.is_sign_negative() && self.length() != 0.0 {
            angle + PI
        } else {
            angle
        }
    }

    fn with_angle(self, angle: f32) -> Vec2 {
        let magnitude = self.length();
        Vec2::new(magnitude * angle.cos(), magnitude * angle.sin())
    }

    fn rotated_by(self, angle: f32) -> Vec2 {
        self.with_angle(self.absolute_angle() + angle)
    }

    fn is_perpendicular_to(self, other: Vec2) -> bool {
        self.dot(other) == 0.0
    }
}

/// Unit vector pointing from `from` to `to`; zero when the points coincide
pub fn unit_normal_to(from: Vec2, to: Vec2) -> Vec2 {
    let delta = to - from;
    let magnitude = delta.length();
    if magnitude <= 0.0 {
        return Vec2::ZERO;
    }
    delta / magnitude
}

/// `unit_normal_to` rotated by a quarter turn
pub fn unit_tangent_to(from: Vec2, to: Vec2) -> Vec2 {
    let normal = unit_normal_to(from, to);
    Vec2::new(-normal.y, normal.x)
}

/// Unit vector along `angle`
#[inline]
pub fn direction(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Rotate `point` about `pivot` by `angle`
#[inline]
pub fn rotate_about(point: Vec2, pivot: Vec2, angle: f32) -> Vec2 {
    let (sin, cos) = angle.sin_cos();
    let d = point - pivot;
    Vec2::new(
        pivot.x + d.x * cos - d.y * sin,
        pivot.y + d.x * sin + d.y * cos,
    )
}
