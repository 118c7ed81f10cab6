//! Turn state, outcomes and the event stream
//!
//! The engine reports every visible change as a [`GameEvent`]; the
//! presentation layer drains them after each command or tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::peg::PegColor;
use super::power_up::PowerUpKind;
use crate::sim::body::BodyId;
use crate::sim::obb::OrientedBoundingBox;

/// How a finished game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOutcome {
    Won,
    Lost,
    /// The level had nothing to score
    NoPegsToStart,
}

impl GameOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            GameOutcome::Won => "You won!",
            GameOutcome::Lost => "You lost!",
            GameOutcome::NoPegsToStart => "No pegs to start with!",
        }
    }
}

/// Current phase of the turn state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// No projectile, waiting for a launch
    Idle,
    /// One projectile is live
    ProjectileInFlight,
    /// Projectile gone, hit pegs being swept (only observable mid-tick)
    TurnResolving,
    /// Terminal
    GameOver(GameOutcome),
}

impl GamePhase {
    #[inline]
    pub fn is_over(&self) -> bool {
        matches!(self, GamePhase::GameOver(_))
    }
}

/// Why the projectile's turn ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnEndReason {
    ExitedBounds,
    Stuck,
}

/// Notification for the presentation layer, in the order things happened
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    BodyAdded(BodyId),
    BodyRemoved(BodyId),
    PegHit { id: BodyId, color: PegColor },
    ScoreChanged { score: u32, required: u32 },
    PowerUpActivated(PowerUpKind),
    /// The projectile left through the top again instead of being removed
    ProjectileRespawned,
    TurnEnded(TurnEndReason),
    /// Whether `launch` would currently do something
    LaunchAvailabilityChanged(bool),
    GameOver(GameOutcome),
}

/// A peg as supplied by the level-data layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PegDescriptor {
    pub center: Vec2,
    pub color: PegColor,
    /// Falls back to the configured default radius
    #[serde(default)]
    pub radius: Option<f32>,
}

impl PegDescriptor {
    pub fn new(center: Vec2, color: PegColor) -> Self {
        Self {
            center,
            color,
            radius: None,
        }
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = Some(radius);
        self
    }
}

/// A block as supplied by the level-data layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlockDescriptor {
    pub center: Vec2,
    pub width: f32,
    pub height: f32,
    /// Radians
    #[serde(default)]
    pub angle: f32,
}

impl BlockDescriptor {
    pub fn new(center: Vec2, width: f32, height: f32, angle: f32) -> Self {
        Self {
            center,
            width,
            height,
            angle,
        }
    }
}

impl From<OrientedBoundingBox> for BlockDescriptor {
    fn from(bounds: OrientedBoundingBox) -> Self {
        Self::new(bounds.center, bounds.width, bounds.height, bounds.angle)
    }
}
