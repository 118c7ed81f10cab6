//! Pegfall headless demo
//!
//! Plays one game on a built-in level, aiming each shot at random and
//! stepping the engine at 60 Hz. Run with
//! `RUST_LOG=info pegfall [seed] [blue|all]`; the second argument picks
//! which pegs count toward the win threshold.

use std::error::Error;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use pegfall::consts::FRAME_DT;
use pegfall::game::{GameEvent, PegColor, PegDescriptor};
use pegfall::{EngineConfig, GameEngine, Level, RequiredScorePolicy};

/// Cap on frames per shot (two minutes at 60 Hz)
const MAX_FRAMES_PER_SHOT: u32 = 7_200;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|arg| arg.parse::<u64>().ok())
        .unwrap_or(42);
    let policy = match args.next() {
        Some(arg) => arg.parse::<RequiredScorePolicy>()?,
        None => RequiredScorePolicy::default(),
    };
    log::info!("Pegfall demo starting with seed {}, policy {}", seed, policy);

    let level = demo_level()?;
    let config = EngineConfig {
        required_score: policy,
        ..EngineConfig::default()
    };
    let mut engine = GameEngine::from_level(&level, config)?;
    let mut rng = Pcg32::seed_from_u64(seed);

    while !engine.phase().is_over() {
        let target = Vec2::new(rng.random_range(0.0..level.width()), level.height());
        engine.aim(target);
        if !engine.launch() {
            break;
        }

        for _ in 0..MAX_FRAMES_PER_SHOT {
            engine.advance(FRAME_DT);
            for event in engine.drain_events() {
                report(&event);
            }
            if engine.projectile().is_none() {
                break;
            }
        }
    }

    println!(
        "{:?}: score {} / {}, {} shots left",
        engine.phase(),
        engine.score(),
        engine.required_score(),
        engine.shots_remaining()
    );
    Ok(())
}

/// Staggered rows of pegs with a pair of tilted blocks underneath
fn demo_level() -> Result<Level, Box<dyn Error>> {
    let mut level = Level::new("Demo", 800.0, 600.0)?;

    let colors = [PegColor::Blue, PegColor::Blue, PegColor::Orange, PegColor::Green];
    for row in 0..4 {
        let y = 180.0 + row as f32 * 80.0;
        let offset = if row % 2 == 0 { 100.0 } else { 140.0 };
        for col in 0..7 {
            let x = offset + col as f32 * 90.0;
            let color = colors[(row + col) % colors.len()];
            level.insert_peg(PegDescriptor::new(Vec2::new(x, y), color));
        }
    }

    level.insert_block(Level::default_block(Vec2::new(220.0, 520.0), 0.3)?);
    level.insert_block(Level::default_block(Vec2::new(580.0, 520.0), -0.3)?);

    log::info!(
        "Demo level: {} pegs, {} blocks",
        level.pegs().len(),
        level.blocks().len()
    );
    Ok(level)
}

fn report(event: &GameEvent) {
    match event {
        GameEvent::PegHit { id, color } => log::debug!("Hit {:?} peg {:?}", color, id),
        GameEvent::ScoreChanged { score, required } => {
            log::debug!("Score {} / {}", score, required)
        }
        GameEvent::PowerUpActivated(kind) => log::info!("Power-up: {:?}", kind),
        GameEvent::ProjectileRespawned => log::info!("Spooky ball came back"),
        GameEvent::TurnEnded(reason) => log::info!("Turn ended: {:?}", reason),
        GameEvent::GameOver(outcome) => log::info!("{}", outcome.message()),
        GameEvent::BodyAdded(_)
        | GameEvent::BodyRemoved(_)
        | GameEvent::LaunchAvailabilityChanged(_) => {}
    }
}
