//! Oriented bounding box geometry for rotated rectangular blocks
//!
//! A box is defined by:
//! - center: world position of the box center
//! - width, height: full extents along the box's local axes
//! - angle: anticlockwise rotation in radians
//!
//! Corners are always derived from these four values, never cached.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::vector::rotate_about;
use crate::error::PhysicsError;

/// Relative slack for the triangle-area containment test
const AREA_TOLERANCE: f32 = 1e-4;

/// A rotated rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrientedBoundingBox {
    pub center: Vec2,
    pub width: f32,
    pub height: f32,
    pub angle: f32,
}

impl OrientedBoundingBox {
    pub fn new(center: Vec2, width: f32, height: f32, angle: f32) -> Result<Self, PhysicsError> {
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if !valid(width) || !valid(height) {
            return Err(PhysicsError::InvalidBlockSize { width, height });
        }
        Ok(Self {
            center,
            width,
            height,
            angle,
        })
    }

    #[inline]
    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// The four corners in anticlockwise order:
    /// top-left, bottom-left, bottom-right, top-right.
    pub fn corners(&self) -> [Vec2; 4] {
        let (sin, cos) = self.angle.sin_cos();
        let hw = self.width / 2.0;
        let hh = self.height / 2.0;
        let c = self.center;

        let top_left = Vec2::new(c.x - (hw * cos + hh * sin), c.y - (hw * sin - hh * cos));
        let bottom_left = Vec2::new(c.x - (hw * cos - hh * sin), c.y - (hw * sin + hh * cos));
        let bottom_right = Vec2::new(c.x + (hw * cos + hh * sin), c.y + (hw * sin - hh * cos));
        let top_right = Vec2::new(c.x + (hw * cos - hh * sin), c.y + (hw * sin + hh * cos));

        [top_left, bottom_left, bottom_right, top_right]
    }

    /// Axis-aligned extents of the rotated box as (min, max)
    pub fn bounds(&self) -> (Vec2, Vec2) {
        let corners = self.corners();
        let min = corners.iter().copied().fold(Vec2::splat(f32::MAX), Vec2::min);
        let max = corners.iter().copied().fold(Vec2::splat(f32::MIN), Vec2::max);
        (min, max)
    }

    /// Express a world point in the box's unrotated frame (same origin, box axis-aligned)
    #[inline]
    pub fn to_local(&self, point: Vec2) -> Vec2 {
        rotate_about(point, self.center, -self.angle)
    }

    /// Nearest point of the axis-aligned footprint to a point already in local coordinates
    pub fn closest_local_point(&self, local: Vec2) -> Vec2 {
        let half = Vec2::new(self.width / 2.0, self.height / 2.0);
        let min = self.center - half;
        let max = self.center + half;
        Vec2::new(local.x.clamp(min.x, max.x), local.y.clamp(min.y, max.y))
    }

    /// Circle overlap via the closest point on the footprint (strictly inside)
    pub fn overlaps_ball(&self, ball_center: Vec2, ball_radius: f32) -> bool {
        let local = self.to_local(ball_center);
        let nearest = self.closest_local_point(local);
        local.distance_squared(nearest) < ball_radius * ball_radius
    }

    /// Separating Axis Theorem test against another box.
    ///
    /// Every edge normal of both boxes is a candidate axis. Touching boxes
    /// count as overlapping.
    pub fn overlaps_block(&self, other: &OrientedBoundingBox) -> bool {
        for test in [self, other] {
            let points = test.corners();
            for i in 0..points.len() {
                let j = (i + 1) % points.len();
                let (p1, p2) = (points[i], points[j]);
                let normal = Vec2::new(p2.y - p1.y, p1.x - p2.x);

                let (min_a, max_a) = self.projection_range(normal);
                let (min_b, max_b) = other.projection_range(normal);
                if max_a < min_b || max_b < min_a {
                    return false;
                }
            }
        }
        true
    }

    fn projection_range(&self, axis: Vec2) -> (f32, f32) {
        self.corners()
            .iter()
            .map(|p| axis.dot(*p))
            .fold((f32::MAX, f32::MIN), |(lo, hi), d| (lo.min(d), hi.max(d)))
    }

    /// Point containment by triangle areas: the four triangles formed by the
    /// point and each edge sum to the box area exactly when the point is inside.
    pub fn contains_point(&self, point: Vec2) -> bool {
        let [a, b, c, d] = self.corners();
        let triangle = |p: Vec2, q: Vec2| {
            0.5 * (p.x * (q.y - point.y) + q.x * (point.y - p.y) + point.x * (p.y - q.y)).abs()
        };
        let sum = triangle(a, b) + triangle(b, c) + triangle(c, d) + triangle(d, a);
        let area = self.area();
        sum <= area + area * AREA_TOLERANCE
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.center += delta;
    }
}
