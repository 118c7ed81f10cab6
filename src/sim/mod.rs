//! Physics simulation module
//!
//! Everything here is pure and deterministic:
//! - Caller-supplied time deltas only
//! - Stable iteration order (insertion order)
//! - No rendering or platform dependencies

pub mod body;
pub mod collision;
pub mod obb;
pub mod vector;
pub mod world;

pub use body::{BodyId, Mobility, RigidBody, Shape, ShapeKind};
pub use collision::{BorderHit, CollisionResult, reflect_velocity};
pub use obb::OrientedBoundingBox;
pub use vector::{VectorExt, unit_normal_to, unit_tangent_to};
pub use world::{Border, Borders, Contact, Frame, PhysicsWorld, WorldEvent};
