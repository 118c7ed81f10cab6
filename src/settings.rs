//! Engine configuration
//!
//! Every gameplay tunable the engine reads, with the stock game values as
//! defaults. Serialized as JSON so levels or a host app can ship
//! overrides.

use std::fmt;
use std::str::FromStr;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::game::power_up::PowerUpKind;
use crate::sim::world::Borders;

/// How the win threshold is derived from the loaded pegs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RequiredScorePolicy {
    /// Only blue pegs count toward the threshold
    #[default]
    BlueOnly,
    /// Every peg's score counts
    AllPegs,
}

impl RequiredScorePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequiredScorePolicy::BlueOnly => "BlueOnly",
            RequiredScorePolicy::AllPegs => "AllPegs",
        }
    }

}

impl fmt::Display for RequiredScorePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequiredScorePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "blueonly" | "blue" => Ok(RequiredScorePolicy::BlueOnly),
            "allpegs" | "all" => Ok(RequiredScorePolicy::AllPegs),
            _ => Err(ConfigError::Invalid(format!("unknown score policy '{}'", s))),
        }
    }
}

/// Engine tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // === Projectile ===
    /// Constant acceleration applied to the projectile (y grows downward)
    pub gravity: Vec2,
    /// Launch speed in units per second
    pub launch_speed: f32,
    pub projectile_radius: f32,
    pub projectile_restitution: f32,

    // === Pegs ===
    /// Radius for pegs that do not specify one
    pub default_peg_radius: f32,
    /// Cap on the shot budget (budget = min(peg count, max_shots))
    pub max_shots: u32,
    pub required_score: RequiredScorePolicy,

    // === Turn end ===
    /// Per-tick displacement under which the projectile counts as not moving
    pub stuck_min_displacement: f32,
    /// Ticks without movement before the projectile is declared stuck
    pub stuck_frame_limit: u32,

    // === Power-ups ===
    /// Space Blast reach beyond the trigger peg's radius
    pub space_blast_radius: f32,
    /// Round-robin order of power-ups fired by green pegs
    pub power_ups: Vec<PowerUpKind>,

    // === World ===
    /// Walls the projectile bounces off
    pub borders: Borders,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            gravity: Vec2::new(0.0, GRAVITY),
            launch_speed: LAUNCH_SPEED,
            projectile_radius: PEG_RADIUS,
            projectile_restitution: PROJECTILE_RESTITUTION,

            default_peg_radius: PEG_RADIUS,
            max_shots: MAX_SHOTS,
            required_score: RequiredScorePolicy::BlueOnly,

            stuck_min_displacement: STUCK_MIN_DISPLACEMENT,
            stuck_frame_limit: STUCK_FRAME_LIMIT,

            space_blast_radius: SPACE_BLAST_RADIUS,
            power_ups: vec![PowerUpKind::SpaceBlast, PowerUpKind::SpookyBall],

            borders: Borders::default(),
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON config. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        log::info!("Loaded engine config ({} power-ups)", config.power_ups.len());
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the engine cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = |v: f32| v.is_finite() && v > 0.0;

        if !positive(self.launch_speed) {
            return Err(ConfigError::Invalid(format!(
                "launch_speed must be positive, got {}",
                self.launch_speed
            )));
        }
        if !positive(self.projectile_radius) {
            return Err(ConfigError::Invalid(format!(
                "projectile_radius must be positive, got {}",
                self.projectile_radius
            )));
        }
        if !positive(self.default_peg_radius) {
            return Err(ConfigError::Invalid(format!(
                "default_peg_radius must be positive, got {}",
                self.default_peg_radius
            )));
        }
        if !(0.0..=1.0).contains(&self.projectile_restitution) {
            return Err(ConfigError::Invalid(format!(
                "projectile_restitution must be within [0, 1], got {}",
                self.projectile_restitution
            )));
        }
        if !self.gravity.is_finite() {
            return Err(ConfigError::Invalid("gravity must be finite".to_string()));
        }
        if self.stuck_min_displacement < 0.0 || self.space_blast_radius < 0.0 {
            return Err(ConfigError::Invalid(
                "distances must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}
