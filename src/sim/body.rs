//! Rigid body model
//!
//! A body is one of a closed set of shapes (ball or block) plus the kinematic
//! state every shape shares. Shape-specific behavior is dispatched by
//! matching on [`Shape`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{
    BorderHit, CollisionResult, ball_ball_collision, ball_block_collision, ball_border_collision,
    balls_touch, border_collision, correction_distance, reflect_velocity,
};
use super::obb::OrientedBoundingBox;
use super::world::{Borders, Frame};
use crate::error::PhysicsError;

/// Stable body identity, unique within a world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyId(pub u32);

/// Shape tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Ball,
    Block,
}

/// Body geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Ball { center: Vec2, radius: f32 },
    Block(OrientedBoundingBox),
}

impl Shape {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Ball { .. } => ShapeKind::Ball,
            Shape::Block(_) => ShapeKind::Block,
        }
    }
}

/// Whether collision response and integration may move the body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Mobility {
    #[default]
    Dynamic,
    /// Never moves; still detected by others
    Static,
}

/// A physics body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RigidBody {
    id: BodyId,
    shape: Shape,
    /// Fraction of velocity kept after an impact (0..=1)
    pub restitution: f32,
    pub velocity: Vec2,
    pub acceleration: Vec2,
    pub mobility: Mobility,
}

impl RigidBody {
    /// Create a dynamic ball. Fails when the radius is not positive.
    pub fn ball(
        id: BodyId,
        center: Vec2,
        radius: f32,
        restitution: f32,
        velocity: Vec2,
        acceleration: Vec2,
    ) -> Result<Self, PhysicsError> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(PhysicsError::InvalidGeometry { radius });
        }
        Ok(Self {
            id,
            shape: Shape::Ball { center, radius },
            restitution,
            velocity,
            acceleration,
            mobility: Mobility::Dynamic,
        })
    }

    /// Create a dynamic block
    pub fn block(
        id: BodyId,
        bounds: OrientedBoundingBox,
        restitution: f32,
        velocity: Vec2,
        acceleration: Vec2,
    ) -> Self {
        Self {
            id,
            shape: Shape::Block(bounds),
            restitution,
            velocity,
            acceleration,
            mobility: Mobility::Dynamic,
        }
    }

    /// Immovable ball with no restitution or motion
    pub fn fixed_ball(id: BodyId, center: Vec2, radius: f32) -> Result<Self, PhysicsError> {
        let mut body = Self::ball(id, center, radius, 0.0, Vec2::ZERO, Vec2::ZERO)?;
        body.mobility = Mobility::Static;
        Ok(body)
    }

    /// Immovable block with no restitution or motion
    pub fn fixed_block(id: BodyId, bounds: OrientedBoundingBox) -> Self {
        let mut body = Self::block(id, bounds, 0.0, Vec2::ZERO, Vec2::ZERO);
        body.mobility = Mobility::Static;
        body
    }

    #[inline]
    pub fn id(&self) -> BodyId {
        self.id
    }

    #[inline]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    #[inline]
    pub fn kind(&self) -> ShapeKind {
        self.shape.kind()
    }

    #[inline]
    pub fn is_static(&self) -> bool {
        self.mobility == Mobility::Static
    }

    /// Ball center or block center
    pub fn center(&self) -> Vec2 {
        match &self.shape {
            Shape::Ball { center, .. } => *center,
            Shape::Block(bounds) => bounds.center,
        }
    }

    /// Ball radius; `None` for blocks
    pub fn radius(&self) -> Option<f32> {
        match self.shape {
            Shape::Ball { radius, .. } => Some(radius),
            Shape::Block(_) => None,
        }
    }

    pub fn bounding_box(&self) -> Option<&OrientedBoundingBox> {
        match &self.shape {
            Shape::Ball { .. } => None,
            Shape::Block(bounds) => Some(bounds),
        }
    }

    /// Shift the body without touching its velocity
    pub fn translate(&mut self, delta: Vec2) {
        match &mut self.shape {
            Shape::Ball { center, .. } => *center += delta,
            Shape::Block(bounds) => bounds.translate(delta),
        }
    }

    /// Whether the two bodies overlap. A body never collides with itself.
    pub fn collides(&self, other: &RigidBody) -> bool {
        if self.id == other.id {
            return false;
        }
        match (&self.shape, &other.shape) {
            (
                Shape::Ball { center, radius },
                Shape::Ball {
                    center: other_center,
                    radius: other_radius,
                },
            ) => balls_touch(*center, *radius, *other_center, *other_radius),
            (Shape::Ball { center, radius }, Shape::Block(bounds))
            | (Shape::Block(bounds), Shape::Ball { center, radius }) => {
                bounds.overlaps_ball(*center, *radius)
            }
            (Shape::Block(a), Shape::Block(b)) => a.overlaps_block(b),
        }
    }

    /// Integrate motion over `dt` seconds.
    ///
    /// Position moves by `v·t + ½·a·t²` and velocity by `a·t`, with `t = |dt|`
    /// so a negative delta never runs time backwards.
    pub fn advance(&mut self, dt: f32) {
        if self.is_static() {
            return;
        }
        let t = dt.abs();
        let displacement = self.velocity * t + 0.5 * self.acceleration * t * t;
        self.translate(displacement);
        self.velocity += self.acceleration * t;
    }

    /// Respond to an overlap with `other`: reflect velocity about the contact
    /// normal, scale it by restitution and push out of penetration.
    ///
    /// Does nothing unless the bodies currently overlap, so repeated calls
    /// after separation are no-ops. Blocks and static bodies never respond.
    /// Returns whether a response was applied.
    pub fn resolve_collision(&mut self, other: &RigidBody) -> bool {
        if self.is_static() || !self.collides(other) {
            return false;
        }
        let Shape::Ball { center, radius } = self.shape else {
            return false;
        };
        let result = match &other.shape {
            Shape::Ball {
                center: other_center,
                radius: other_radius,
            } => ball_ball_collision(center, radius, *other_center, *other_radius),
            Shape::Block(bounds) => ball_block_collision(center, radius, bounds),
        };
        self.apply_response(&result)
    }

    fn apply_response(&mut self, result: &CollisionResult) -> bool {
        if !result.hit {
            return false;
        }
        self.velocity = reflect_velocity(self.velocity, result.normal) * self.restitution;
        self.translate(result.normal * correction_distance(result.penetration));
        true
    }

    /// Bounce off enabled frame borders.
    ///
    /// Left/right walls invert dx, top/bottom invert dy, and any bounce scales
    /// the velocity by restitution. Returns whether a wall was hit.
    pub fn resolve_border_collision(&mut self, frame: &Frame, borders: &Borders) -> bool {
        if self.is_static() {
            return false;
        }
        let hit = match &self.shape {
            Shape::Ball { center, radius } => {
                ball_border_collision(*center, *radius, self.velocity, frame, borders)
            }
            Shape::Block(bounds) => {
                let (min, max) = bounds.bounds();
                border_collision(min, max, self.velocity, frame, borders)
            }
        };
        self.apply_border_hit(hit)
    }

    fn apply_border_hit(&mut self, hit: BorderHit) -> bool {
        if hit.flip_x {
            self.velocity.x = -self.velocity.x;
        }
        if hit.flip_y {
            self.velocity.y = -self.velocity.y;
        }
        if hit.any() {
            self.velocity *= self.restitution;
        }
        hit.any()
    }
}
