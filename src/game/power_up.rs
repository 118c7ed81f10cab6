//! Power-ups fired by green pegs
//!
//! Each power-up is a strategy object. The engine owns a [`PowerUpRotation`]
//! and asks it for the next one every time a green peg is hit.

use serde::{Deserialize, Serialize};

use super::peg::{GamePeg, pegs_within};
use crate::settings::EngineConfig;
use crate::sim::body::BodyId;

/// Power-up identifiers, usable in configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    SpaceBlast,
    SpookyBall,
}

impl PowerUpKind {
    pub fn build(&self, config: &EngineConfig) -> Box<dyn PowerUp> {
        match self {
            PowerUpKind::SpaceBlast => Box::new(SpaceBlast {
                radius: config.space_blast_radius,
            }),
            PowerUpKind::SpookyBall => Box::new(SpookyBall),
        }
    }
}

/// What the engine must do after a power-up fires
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PowerUpEffect {
    /// Mark these pegs as hit, running their own effects
    HitPegs(Vec<BodyId>),
    /// Let the current projectile respawn at the top once
    GrantExtraLife,
}

/// A side effect triggered by hitting a green peg
pub trait PowerUp: std::fmt::Debug {
    fn kind(&self) -> PowerUpKind;

    /// Decide the effect for a hit on `trigger`, given every live peg
    fn activate(&self, trigger: &GamePeg, pegs: &[GamePeg]) -> PowerUpEffect;
}

/// Hits every unhit peg near the trigger peg
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpaceBlast {
    /// Reach beyond the trigger peg's own radius
    pub radius: f32,
}

impl PowerUp for SpaceBlast {
    fn kind(&self) -> PowerUpKind {
        PowerUpKind::SpaceBlast
    }

    fn activate(&self, trigger: &GamePeg, pegs: &[GamePeg]) -> PowerUpEffect {
        let reach = self.radius + trigger.radius;
        let targets = pegs_within(pegs, trigger.center, reach)
            .filter(|peg| peg.id != trigger.id && !peg.is_hit())
            .map(|peg| peg.id)
            .collect();
        PowerUpEffect::HitPegs(targets)
    }
}

/// Gives the projectile one more pass from the top
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpookyBall;

impl PowerUp for SpookyBall {
    fn kind(&self) -> PowerUpKind {
        PowerUpKind::SpookyBall
    }

    fn activate(&self, _trigger: &GamePeg, _pegs: &[GamePeg]) -> PowerUpEffect {
        PowerUpEffect::GrantExtraLife
    }
}

/// Ordered power-ups handed out round-robin
#[derive(Debug, Default)]
pub struct PowerUpRotation {
    power_ups: Vec<Box<dyn PowerUp>>,
    cursor: usize,
}

impl PowerUpRotation {
    pub fn new(power_ups: Vec<Box<dyn PowerUp>>) -> Self {
        Self {
            power_ups,
            cursor: 0,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.power_ups.iter().map(|kind| kind.build(config)).collect())
    }

    pub fn len(&self) -> usize {
        self.power_ups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.power_ups.is_empty()
    }

    /// The power-up the next green hit will fire
    pub fn peek(&self) -> Option<PowerUpKind> {
        self.power_ups.get(self.cursor).map(|p| p.kind())
    }

    /// Take the current power-up and move the cursor on, wrapping around
    pub fn take_next(&mut self) -> Option<&dyn PowerUp> {
        if self.power_ups.is_empty() {
            return None;
        }
        let index = self.cursor;
        self.cursor = (self.cursor + 1) % self.power_ups.len();
        self.power_ups.get(index).map(|p| p.as_ref())
    }

    pub fn reset(&mut self) {
        self.cursor = 0;
    }
}
