//! Projectile bookkeeping
//!
//! The projectile's body lives in the physics world; this tracks the game
//! state attached to it: how long it has been stuck and whether it may
//! respawn once at the top.

use glam::Vec2;

use crate::sim::body::BodyId;
use crate::sim::world::Frame;

#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub id: BodyId,
    pub radius: f32,
    frames_stuck: u32,
    extra_life: bool,
}

impl Projectile {
    pub fn new(id: BodyId, radius: f32) -> Self {
        Self {
            id,
            radius,
            frames_stuck: 0,
            extra_life: false,
        }
    }

    /// Record one tick's displacement. Movement at or above `min_displacement`
    /// resets the counter.
    pub fn track_displacement(&mut self, displacement: Vec2, min_displacement: f32) {
        if displacement.length_squared() < min_displacement * min_displacement {
            self.frames_stuck = self.frames_stuck.saturating_add(1);
        } else {
            self.frames_stuck = 0;
        }
    }

    #[inline]
    pub fn frames_stuck(&self) -> u32 {
        self.frames_stuck
    }

    /// Stuck once the counter exceeds `frame_limit`
    #[inline]
    pub fn is_stuck(&self, frame_limit: u32) -> bool {
        self.frames_stuck > frame_limit
    }

    /// Fully outside the frame on any side
    pub fn out_of_bounds(&self, center: Vec2, frame: &Frame) -> bool {
        center.x + self.radius <= 0.0
            || center.x - self.radius >= frame.width
            || center.y + self.radius <= 0.0
            || center.y - self.radius >= frame.height
    }

    pub fn grant_extra_life(&mut self) {
        self.extra_life = true;
    }

    #[inline]
    pub fn has_extra_life(&self) -> bool {
        self.extra_life
    }

    /// Spend the extra life. Returns the y to move the center to, or `None`
    /// when there was no life to spend.
    pub fn use_extra_life(&mut self) -> Option<f32> {
        if !self.extra_life {
            return None;
        }
        self.extra_life = false;
        self.frames_stuck = 0;
        Some(self.radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> Frame {
        Frame::new(300.0, 300.0)
    }

    #[test]
    fn test_stuck_after_limit() {
        let mut p = Projectile::new(BodyId(1), 25.0);
        for _ in 0..600 {
            p.track_displacement(Vec2::new(0.1, 0.1), 0.5);
        }
        assert!(!p.is_stuck(600));
        p.track_displacement(Vec2::ZERO, 0.5);
        assert!(p.is_stuck(600));

        p.track_displacement(Vec2::new(0.0, 0.5), 0.5);
        assert_eq!(p.frames_stuck(), 0);
    }

    #[test]
    fn test_out_of_bounds_requires_full_exit() {
        let p = Projectile::new(BodyId(1), 25.0);
        assert!(!p.out_of_bounds(Vec2::new(150.0, 310.0), &frame()));
        assert!(p.out_of_bounds(Vec2::new(150.0, 325.0), &frame()));
        assert!(p.out_of_bounds(Vec2::new(-25.0, 150.0), &frame()));
        assert!(p.out_of_bounds(Vec2::new(325.0, 150.0), &frame()));
        assert!(p.out_of_bounds(Vec2::new(150.0, -30.0), &frame()));
        assert!(!p.out_of_bounds(Vec2::new(150.0, 150.0), &frame()));
    }

    #[test]
    fn test_extra_life_used_once() {
        let mut p = Projectile::new(BodyId(1), 20.0);
        assert_eq!(p.use_extra_life(), None);
        p.grant_extra_life();
        assert!(p.has_extra_life());
        assert_eq!(p.use_extra_life(), Some(20.0));
        assert_eq!(p.use_extra_life(), None);
    }
}
