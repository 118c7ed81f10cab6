//! Game layer
//!
//! Pegs, blocks and the projectile as the game sees them, power-ups and the
//! turn state machine that drives a [`crate::sim::PhysicsWorld`].

pub mod engine;
pub mod peg;
pub mod power_up;
pub mod projectile;
pub mod state;

pub use engine::GameEngine;
pub use peg::{GameBlock, GamePeg, HitEffect, PegColor};
pub use power_up::{PowerUp, PowerUpEffect, PowerUpKind, PowerUpRotation, SpaceBlast, SpookyBall};
pub use projectile::Projectile;
pub use state::{
    BlockDescriptor, GameEvent, GameOutcome, GamePhase, PegDescriptor, TurnEndReason,
};
