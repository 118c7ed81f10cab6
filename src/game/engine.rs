//! Game engine
//!
//! Turn state machine over a [`PhysicsWorld`]: aiming and launching, peg hit
//! bookkeeping, power-ups, stuck detection and win/loss evaluation.
//!
//! Driven by one owner: player commands (`aim`, `launch`) and ticks
//! (`advance`). Every change is queued as a [`GameEvent`] and handed out
//! by `drain_events`.

use std::collections::VecDeque;

use glam::Vec2;

use super::peg::{GameBlock, GamePeg, HitEffect, PegColor, pegs_within};
use super::power_up::{PowerUpEffect, PowerUpRotation};
use super::projectile::Projectile;
use super::state::{
    BlockDescriptor, GameEvent, GameOutcome, GamePhase, PegDescriptor, TurnEndReason,
};
use crate::error::PhysicsError;
use crate::level::Level;
use crate::settings::{EngineConfig, RequiredScorePolicy};
use crate::sim::body::{BodyId, RigidBody};
use crate::sim::obb::OrientedBoundingBox;
use crate::sim::vector::{VectorExt, direction};
use crate::sim::world::{Frame, PhysicsWorld, WorldEvent};

/// The turn-based game on top of the physics world
#[derive(Debug)]
pub struct GameEngine {
    world: PhysicsWorld,
    config: EngineConfig,
    pegs: Vec<GamePeg>,
    blocks: Vec<GameBlock>,
    projectile: Option<Projectile>,
    power_ups: PowerUpRotation,

    launch_point: Vec2,
    launch_angle: f32,
    shots_remaining: u32,
    score: u32,
    required_score: u32,
    phase: GamePhase,

    /// Last launch availability reported to the presentation layer
    launch_available: bool,
    events: Vec<GameEvent>,

    /// Level as last loaded, for `reset`
    loaded_pegs: Vec<PegDescriptor>,
    loaded_blocks: Vec<BlockDescriptor>,
}

impl GameEngine {
    /// Empty engine. Load a level before launching.
    pub fn new(frame: Frame, config: EngineConfig) -> Self {
        let world = PhysicsWorld::with_borders(frame, config.borders);
        let power_ups = PowerUpRotation::from_config(&config);
        let launch_point = Vec2::new(frame.width / 2.0, config.projectile_radius);

        Self {
            world,
            config,
            pegs: Vec::new(),
            blocks: Vec::new(),
            projectile: None,
            power_ups,
            launch_point,
            launch_angle: std::f32::consts::FRAC_PI_2,
            shots_remaining: 0,
            score: 0,
            required_score: 0,
            phase: GamePhase::Idle,
            launch_available: false,
            events: Vec::new(),
            loaded_pegs: Vec::new(),
            loaded_blocks: Vec::new(),
        }
    }

    /// Engine sized to the level with its pegs and blocks loaded
    pub fn from_level(level: &Level, config: EngineConfig) -> Result<Self, PhysicsError> {
        let mut engine = Self::new(level.frame(), config);
        // Pegs take the radius the level placed them with
        let pegs: Vec<PegDescriptor> = level
            .pegs()
            .iter()
            .map(|peg| peg.with_radius(level.radius_of(peg)))
            .collect();
        let blocks: Vec<BlockDescriptor> =
            level.blocks().iter().copied().map(BlockDescriptor::from).collect();
        engine.load_level(&pegs, &blocks)?;
        log::info!("Loaded level '{}'", level.name);
        Ok(engine)
    }

    /// Replace the board with the given pegs and blocks and start a new game.
    ///
    /// Fails without touching the current board if any descriptor has invalid
    /// geometry. Placement legality (overlaps, bounds) is not checked here.
    pub fn load_level(
        &mut self,
        pegs: &[PegDescriptor],
        blocks: &[BlockDescriptor],
    ) -> Result<(), PhysicsError> {
        let mut peg_bodies = Vec::with_capacity(pegs.len());
        for desc in pegs {
            let radius = desc.radius.unwrap_or(self.config.default_peg_radius);
            let id = self.world.next_body_id();
            let body = RigidBody::fixed_ball(id, desc.center, radius)?;
            peg_bodies.push((body, GamePeg::new(id, desc.center, radius, desc.color)));
        }

        let mut block_bodies = Vec::with_capacity(blocks.len());
        for desc in blocks {
            let bounds =
                OrientedBoundingBox::new(desc.center, desc.width, desc.height, desc.angle)?;
            let id = self.world.next_body_id();
            block_bodies.push((RigidBody::fixed_block(id, bounds), GameBlock::new(id, bounds)));
        }

        self.world.remove_all();
        self.pegs.clear();
        self.blocks.clear();
        self.projectile = None;

        for (body, peg) in peg_bodies {
            self.world.insert(body);
            self.pegs.push(peg);
        }
        for (body, block) in block_bodies {
            self.world.insert(body);
            self.blocks.push(block);
        }
        self.sync_world_events();

        self.loaded_pegs = pegs.to_vec();
        self.loaded_blocks = blocks.to_vec();
        self.power_ups.reset();
        self.score = 0;
        self.required_score = required_score(&self.pegs, self.config.required_score);
        self.shots_remaining = (self.pegs.len() as u32).min(self.config.max_shots);
        self.phase = GamePhase::Idle;

        log::info!(
            "Level loaded: {} pegs, {} blocks, {} shots, {} points to win",
            self.pegs.len(),
            self.blocks.len(),
            self.shots_remaining,
            self.required_score
        );
        self.push_score();
        self.end_game_if_possible();
        self.refresh_launch_availability();
        Ok(())
    }

    /// Restart the last loaded level
    pub fn reset(&mut self) -> Result<(), PhysicsError> {
        let pegs = self.loaded_pegs.clone();
        let blocks = self.loaded_blocks.clone();
        self.load_level(&pegs, &blocks)
    }

    /// Point the launcher at `target`
    pub fn aim(&mut self, target: Vec2) {
        self.launch_angle = (target - self.launch_point).absolute_angle();
    }

    /// Fire a projectile along the current launch angle.
    ///
    /// Only works while idle with shots left; otherwise nothing happens and
    /// false is returned.
    pub fn launch(&mut self) -> bool {
        if self.phase != GamePhase::Idle {
            log::warn!("Launch ignored: {:?}", self.phase);
            return false;
        }
        if self.shots_remaining == 0 {
            log::warn!("Launch ignored: no shots remaining");
            return false;
        }

        let id = self.world.next_body_id();
        let velocity = direction(self.launch_angle) * self.config.launch_speed;
        let body = match RigidBody::ball(
            id,
            self.launch_point,
            self.config.projectile_radius,
            self.config.projectile_restitution,
            velocity,
            self.config.gravity,
        ) {
            Ok(body) => body,
            Err(e) => {
                log::error!("Cannot create projectile: {}", e);
                return false;
            }
        };

        if !self.world.insert(body) {
            log::error!("Projectile id {:?} already in use", id);
            return false;
        }
        self.projectile = Some(Projectile::new(id, self.config.projectile_radius));
        self.shots_remaining -= 1;
        self.phase = GamePhase::ProjectileInFlight;
        self.sync_world_events();
        self.refresh_launch_availability();

        log::info!(
            "Launched at {:.3} rad, {} shots remaining",
            self.launch_angle,
            self.shots_remaining
        );
        true
    }

    /// Advance the simulation by `dt` seconds
    pub fn advance(&mut self, dt: f32) {
        if self.phase.is_over() {
            return;
        }

        let before = self.projectile_body().map(|b| b.center());
        let contacts = self.world.step(dt);

        let Some(projectile_id) = self.projectile.as_ref().map(|p| p.id) else {
            return;
        };

        for contact in &contacts {
            if let Some(other) = contact.other(projectile_id) {
                self.hit_peg(other);
            }
        }

        let Some(center) = self.projectile_body().map(|b| b.center()) else {
            return;
        };
        let frame = *self.world.frame();
        let (min_displacement, frame_limit) = (
            self.config.stuck_min_displacement,
            self.config.stuck_frame_limit,
        );

        let Some(projectile) = self.projectile.as_mut() else {
            return;
        };
        if let Some(before) = before {
            projectile.track_displacement(center - before, min_displacement);
        }

        if projectile.out_of_bounds(center, &frame) {
            match projectile.use_extra_life() {
                Some(top_y) => self.respawn_projectile(top_y),
                None => self.end_turn(TurnEndReason::ExitedBounds),
            }
        } else if projectile.is_stuck(frame_limit) {
            self.end_turn(TurnEndReason::Stuck);
        }
    }

    /// Take queued events, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Live pegs whose centers lie within `distance` of `center`
    pub fn pegs_within(&self, center: Vec2, distance: f32) -> Vec<&GamePeg> {
        pegs_within(&self.pegs, center, distance).collect()
    }

    /// Decide whether the game is over. Runs after every projectile removal
    /// and once after loading a level.
    pub fn end_game_if_possible(&mut self) -> Option<GameOutcome> {
        if let GamePhase::GameOver(outcome) = self.phase {
            return Some(outcome);
        }

        let outcome = if self.required_score == 0 {
            GameOutcome::NoPegsToStart
        } else if self.score >= self.required_score {
            GameOutcome::Won
        } else if self.shots_remaining < 1 {
            GameOutcome::Lost
        } else {
            return None;
        };

        self.phase = GamePhase::GameOver(outcome);
        log::info!(
            "Game over: {} ({} / {})",
            outcome.message(),
            self.score,
            self.required_score
        );
        self.events.push(GameEvent::GameOver(outcome));
        self.refresh_launch_availability();
        Some(outcome)
    }

    // === Queries ===

    /// Body of the live projectile, if any
    pub fn projectile(&self) -> Option<&RigidBody> {
        self.projectile_body()
    }

    pub fn pegs(&self) -> &[GamePeg] {
        &self.pegs
    }

    pub fn blocks(&self) -> &[GameBlock] {
        &self.blocks
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn required_score(&self) -> u32 {
        self.required_score
    }

    pub fn shots_remaining(&self) -> u32 {
        self.shots_remaining
    }

    pub fn launch_point(&self) -> Vec2 {
        self.launch_point
    }

    pub fn launch_angle(&self) -> f32 {
        self.launch_angle
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn can_launch(&self) -> bool {
        self.phase == GamePhase::Idle && self.shots_remaining > 0
    }

    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // === Internals ===

    fn projectile_body(&self) -> Option<&RigidBody> {
        self.projectile.as_ref().and_then(|p| self.world.get(p.id))
    }

    /// Mark a peg hit and run its effects, including any cascade of pegs hit
    /// by power-ups. Ids that are not pegs are ignored.
    fn hit_peg(&mut self, id: BodyId) {
        let mut queue = VecDeque::from([id]);

        while let Some(id) = queue.pop_front() {
            let Some(index) = self.pegs.iter().position(|p| p.id == id) else {
                continue;
            };
            if !self.pegs[index].mark_hit() {
                continue;
            }

            let peg = self.pegs[index].clone();
            self.score += peg.score();
            log::debug!("Peg {:?} ({:?}) hit, score {}", peg.id, peg.color, self.score);
            self.events.push(GameEvent::PegHit {
                id: peg.id,
                color: peg.color,
            });
            self.push_score();

            if peg.color.on_hit() != HitEffect::TriggerPowerUp {
                continue;
            }
            let Some(power_up) = self.power_ups.take_next() else {
                continue;
            };
            let kind = power_up.kind();
            let effect = power_up.activate(&peg, &self.pegs);
            log::debug!("Power-up {:?} fired by peg {:?}", kind, peg.id);
            self.events.push(GameEvent::PowerUpActivated(kind));

            match effect {
                PowerUpEffect::HitPegs(ids) => queue.extend(ids),
                PowerUpEffect::GrantExtraLife => {
                    if let Some(projectile) = self.projectile.as_mut() {
                        projectile.grant_extra_life();
                    }
                }
            }
        }
    }

    /// Put the projectile back at the top edge, keeping its x and velocity
    fn respawn_projectile(&mut self, top_y: f32) {
        let Some(id) = self.projectile.as_ref().map(|p| p.id) else {
            return;
        };
        if let Some(body) = self.world.get_mut(id) {
            let shift = Vec2::new(0.0, top_y - body.center().y);
            body.translate(shift);
            log::debug!("Projectile respawned at the top");
            self.events.push(GameEvent::ProjectileRespawned);
        }
    }

    /// Remove the projectile and every hit peg, then settle the turn
    fn end_turn(&mut self, reason: TurnEndReason) {
        self.phase = GamePhase::TurnResolving;

        if let Some(projectile) = self.projectile.take() {
            self.world.remove(projectile.id);
        }

        let (hit, live): (Vec<GamePeg>, Vec<GamePeg>) =
            std::mem::take(&mut self.pegs).into_iter().partition(|p| p.is_hit());
        for peg in &hit {
            self.world.remove(peg.id);
        }
        self.pegs = live;
        self.sync_world_events();

        log::info!(
            "Turn ended ({:?}): {} pegs cleared, score {}",
            reason,
            hit.len(),
            self.score
        );
        self.events.push(GameEvent::TurnEnded(reason));

        if self.end_game_if_possible().is_none() {
            self.phase = GamePhase::Idle;
        }
        self.refresh_launch_availability();
    }

    fn push_score(&mut self) {
        self.events.push(GameEvent::ScoreChanged {
            score: self.score,
            required: self.required_score,
        });
    }

    fn refresh_launch_availability(&mut self) {
        let available = self.can_launch();
        if available != self.launch_available {
            self.launch_available = available;
            self.events.push(GameEvent::LaunchAvailabilityChanged(available));
        }
    }

    /// Forward body set changes from the world, in order
    fn sync_world_events(&mut self) {
        for event in self.world.drain_events() {
            self.events.push(match event {
                WorldEvent::BodyAdded(id) => GameEvent::BodyAdded(id),
                WorldEvent::BodyRemoved(id) => GameEvent::BodyRemoved(id),
            });
        }
    }
}

/// Points needed to win under `policy`
fn required_score(pegs: &[GamePeg], policy: RequiredScorePolicy) -> u32 {
    pegs.iter()
        .filter(|peg| match policy {
            RequiredScorePolicy::BlueOnly => peg.color == PegColor::Blue,
            RequiredScorePolicy::AllPegs => true,
        })
        .map(|peg| peg.score())
        .sum()
}
