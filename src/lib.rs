//! Pegfall - physics core for a Peggle-style game
//!
//! Core modules:
//! - `sim`: Rigid bodies, oriented boxes, collision response and the physics world
//! - `game`: Turn state machine (launching, peg hits, power-ups, win/loss)
//! - `level`: Level container used by the level-data layer
//! - `settings`: Data-driven engine configuration

pub mod error;
pub mod game;
pub mod level;
pub mod settings;
pub mod sim;

pub use error::{ConfigError, LevelError, PhysicsError};
pub use game::{GameEngine, GameEvent, GameOutcome, GamePhase};
pub use level::Level;
pub use settings::{EngineConfig, RequiredScorePolicy};

/// Game configuration constants
pub mod consts {
    /// Nominal display tick (60 Hz), used by the demo loop and tests
    pub const FRAME_DT: f32 = 1.0 / 60.0;

    /// Fraction of the penetration depth removed per collision response.
    /// Slightly below 1 so bodies never land exactly on the boundary.
    pub const POSITION_CORRECTION: f32 = 0.95;

    /// Peg defaults
    pub const PEG_RADIUS: f32 = 25.0;
    pub const BLUE_PEG_SCORE: u32 = 100;
    pub const ORANGE_PEG_SCORE: u32 = 200;
    pub const GREEN_PEG_SCORE: u32 = 100;

    /// Projectile defaults
    pub const LAUNCH_SPEED: f32 = 1_000.0;
    pub const PROJECTILE_RESTITUTION: f32 = 0.9;
    pub const GRAVITY: f32 = 300.0;

    /// Stuck detection: displacement below this for more than the frame limit
    pub const STUCK_MIN_DISPLACEMENT: f32 = 0.5;
    pub const STUCK_FRAME_LIMIT: u32 = 600;

    /// Shot budget cap
    pub const MAX_SHOTS: u32 = 10;

    /// Space Blast search distance (added to the trigger peg's radius)
    pub const SPACE_BLAST_RADIUS: f32 = 100.0;

    /// Level block defaults (2:1 width to height)
    pub const BLOCK_HEIGHT: f32 = 30.0;
}
