//! Collision detection and response
//!
//! Narrow-phase tests for ball-ball and ball-block pairs, velocity reflection
//! and the positional correction that pushes a ball out of penetration.
//! There is no broad phase: the world tests every pair each tick.

use glam::Vec2;

use super::obb::OrientedBoundingBox;
use super::vector::{VectorExt, unit_normal_to};
use super::world::{Border, Borders, Frame};
use crate::consts::POSITION_CORRECTION;

/// Below this depth a correction overshoots by the same amount so that
/// repeated responses always end with the bodies apart.
pub const SEPARATION_SLOP: f32 = 0.01;

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Unit normal pointing from the obstacle toward the ball center
    pub normal: Vec2,
    /// Penetration depth (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Circles touch when the center distance is at most the sum of radii
#[inline]
pub fn balls_touch(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let reach = ra + rb;
    a.distance_squared(b) <= reach * reach
}

/// Check collision of ball `a` against ball `b`, reporting the normal toward `a`
pub fn ball_ball_collision(a: Vec2, ra: f32, b: Vec2, rb: f32) -> CollisionResult {
    if !balls_touch(a, ra, b, rb) {
        return CollisionResult::miss();
    }
    let mut toward_b = unit_normal_to(a, b);
    if toward_b == Vec2::ZERO {
        // Coincident centers: any direction separates them
        toward_b = Vec2::NEG_Y;
    }
    CollisionResult {
        hit: true,
        normal: -toward_b,
        penetration: ra + rb - a.distance(b),
    }
}

/// Check collision of a ball against a rotated block.
///
/// The ball center is moved into the block's unrotated frame, clamped onto
/// the footprint to find the nearest point, and the resulting normal is
/// rotated back by the block's angle.
pub fn ball_block_collision(
    center: Vec2,
    radius: f32,
    block: &OrientedBoundingBox,
) -> CollisionResult {
    if !block.overlaps_ball(center, radius) {
        return CollisionResult::miss();
    }

    let local = block.to_local(center);
    let nearest = block.closest_local_point(local);

    if nearest != local {
        let toward_block = unit_normal_to(local, nearest).rotated_by(block.angle);
        return CollisionResult {
            hit: true,
            normal: -toward_block,
            penetration: radius - local.distance(nearest),
        };
    }

    // Center is inside the footprint: leave through the closest face
    let offset = local - block.center;
    let half = Vec2::new(block.width / 2.0, block.height / 2.0);
    let gap_x = half.x - offset.x.abs();
    let gap_y = half.y - offset.y.abs();
    let (local_normal, gap) = if gap_x <= gap_y {
        (Vec2::new(sign(offset.x), 0.0), gap_x)
    } else {
        (Vec2::new(0.0, sign(offset.y)), gap_y)
    };

    CollisionResult {
        hit: true,
        normal: local_normal.rotated_by(block.angle),
        penetration: radius + gap,
    }
}

#[inline]
fn sign(v: f32) -> f32 {
    if v < 0.0 { -1.0 } else { 1.0 }
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Distance to move a penetrating body along the collision normal
#[inline]
pub fn correction_distance(penetration: f32) -> f32 {
    if penetration < SEPARATION_SLOP {
        penetration + SEPARATION_SLOP
    } else {
        penetration * POSITION_CORRECTION
    }
}

/// Which velocity components a wall contact inverts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BorderHit {
    pub flip_x: bool,
    pub flip_y: bool,
}

impl BorderHit {
    #[inline]
    pub fn any(&self) -> bool {
        self.flip_x || self.flip_y
    }
}

/// Wall contact for an axis-aligned extent `[min, max]` moving with `velocity`.
///
/// A wall counts only when it is enabled, the body touches or crosses it,
/// and the body is still heading into it.
pub fn border_collision(
    min: Vec2,
    max: Vec2,
    velocity: Vec2,
    frame: &Frame,
    borders: &Borders,
) -> BorderHit {
    let left = borders.contains(Border::Left) && min.x <= 0.0 && velocity.x < 0.0;
    let right = borders.contains(Border::Right) && max.x >= frame.width && velocity.x > 0.0;
    let top = borders.contains(Border::Top) && min.y <= 0.0 && velocity.y < 0.0;
    let bottom = borders.contains(Border::Bottom) && max.y >= frame.height && velocity.y > 0.0;

    BorderHit {
        flip_x: left || right,
        flip_y: top || bottom,
    }
}

/// Wall contact for a ball
#[inline]
pub fn ball_border_collision(
    center: Vec2,
    radius: f32,
    velocity: Vec2,
    frame: &Frame,
    borders: &Borders,
) -> BorderHit {
    let r = Vec2::splat(radius);
    border_collision(center - r, center + r, velocity, frame, borders)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_4;

    const EPS: f32 = 1e-4;

    fn frame() -> Frame {
        Frame::new(300.0, 300.0)
    }

    #[test]
    fn test_reflect_velocity() {
        // Ball moving right, hits vertical wall (normal pointing left)
        let reflected = reflect_velocity(Vec2::new(100.0, 0.0), Vec2::new(-1.0, 0.0));
        assert!((reflected.x + 100.0).abs() < 0.001);
        assert!(reflected.y.abs() < 0.001);

        // Normal sign does not matter
        let a = reflect_velocity(Vec2::new(3.0, -4.0), Vec2::new(0.6, 0.8));
        let b = reflect_velocity(Vec2::new(3.0, -4.0), Vec2::new(-0.6, -0.8));
        assert!((a - b).length() < EPS);
        assert!((a.length() - 5.0).abs() < EPS);
    }

    #[test]
    fn test_ball_ball_touching_counts() {
        let result = ball_ball_collision(Vec2::ZERO, 1.0, Vec2::new(2.0, 0.0), 1.0);
        assert!(result.hit);
        assert!(result.penetration.abs() < EPS);

        let result = ball_ball_collision(Vec2::ZERO, 1.0, Vec2::new(2.1, 0.0), 1.0);
        assert!(!result.hit);
    }

    #[test]
    fn test_ball_ball_normal_points_at_first_ball() {
        let result = ball_ball_collision(Vec2::ZERO, 2.0, Vec2::new(3.0, 0.0), 2.0);
        assert!(result.hit);
        assert!((result.normal - Vec2::new(-1.0, 0.0)).length() < EPS);
        assert!((result.penetration - 1.0).abs() < EPS);
    }

    #[test]
    fn test_ball_block_face_normal() {
        let block = OrientedBoundingBox::new(Vec2::ZERO, 4.0, 2.0, 0.0).unwrap();
        // Ball above the top face (y grows downward, so "above" is negative y)
        let result = ball_block_collision(Vec2::new(0.0, -1.5), 1.0, &block);
        assert!(result.hit);
        assert!((result.normal - Vec2::new(0.0, -1.0)).length() < EPS);
        assert!((result.penetration - 0.5).abs() < EPS);
    }

    #[test]
    fn test_ball_block_rotated_normal() {
        let block = OrientedBoundingBox::new(Vec2::ZERO, 2.0, 2.0, FRAC_PI_4).unwrap();
        // Straight to the right of a diamond, the nearest feature is the corner at (√2, 0)
        let result = ball_block_collision(Vec2::new(1.8, 0.0), 0.5, &block);
        assert!(result.hit);
        assert!((result.normal - Vec2::new(1.0, 0.0)).length() < 1e-3);
        assert!((result.penetration - (0.5 - (1.8 - 2f32.sqrt()))).abs() < 1e-3);
    }

    #[test]
    fn test_ball_block_center_inside_exits_nearest_face() {
        let block = OrientedBoundingBox::new(Vec2::ZERO, 10.0, 2.0, 0.0).unwrap();
        let result = ball_block_collision(Vec2::new(3.0, 0.5), 1.0, &block);
        assert!(result.hit);
        assert!((result.normal - Vec2::new(0.0, 1.0)).length() < EPS);
        assert!((result.penetration - 1.5).abs() < EPS);
    }

    #[test]
    fn test_correction_distance() {
        assert!((correction_distance(10.0) - 9.5).abs() < EPS);
        assert!((correction_distance(0.0) - SEPARATION_SLOP).abs() < EPS);
        assert!(correction_distance(0.005) > 0.005);
    }

    #[test]
    fn test_ball_border_requires_heading_into_wall() {
        let borders = Borders::all();
        let hit = ball_border_collision(
            Vec2::new(10.0, 10.0),
            10.0,
            Vec2::new(-1.0, -1.0),
            &frame(),
            &borders,
        );
        assert_eq!(hit, BorderHit { flip_x: true, flip_y: true });

        let hit = ball_border_collision(
            Vec2::new(10.0, 10.0),
            10.0,
            Vec2::new(1.0, 1.0),
            &frame(),
            &borders,
        );
        assert!(!hit.any());
    }

    #[test]
    fn test_ball_border_disabled_wall() {
        let borders = Borders::all().without(Border::Bottom);
        let hit = ball_border_collision(
            Vec2::new(290.0, 290.0),
            10.0,
            Vec2::new(1.0, 1.0),
            &frame(),
            &borders,
        );
        assert_eq!(hit, BorderHit { flip_x: true, flip_y: false });
    }

    #[test]
    fn test_border_uses_frame_height_for_bottom() {
        let wide = Frame::new(600.0, 300.0);
        let hit = ball_border_collision(
            Vec2::new(100.0, 295.0),
            10.0,
            Vec2::new(0.0, 1.0),
            &wide,
            &Borders::all(),
        );
        assert!(hit.flip_y);
    }
}
