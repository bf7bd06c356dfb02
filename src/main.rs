//! Headless demo driver
//!
//! Runs each canonical game under a policy-driven autopilot and logs the
//! outcomes. `RUST_LOG=debug` shows per-point and per-wave detail.

use glam::Vec2;

use arcade_core::HighScores;
use arcade_core::consts::TICKS_PER_SECOND;
use arcade_core::games::{Breakout, Defense, Flappy, Pong};
use arcade_core::policy::reactive::{Axis, Difficulty, PaddleAction, ReactivePolicy};
use arcade_core::sim::{ConfigError, GamePhase, TickInput};

const DEMO_SEED: u64 = 0xA11CE;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("demo failed: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), ConfigError> {
    let mut scores = HighScores::new();

    let (pong_score, pong_ticks) = run_pong()?;
    scores.add_score(pong_score, pong_ticks);

    let (breakout_score, breakout_ticks) = run_breakout()?;
    scores.add_score(breakout_score, breakout_ticks);

    let (flappy_score, flappy_ticks) = run_flappy()?;
    scores.add_score(flappy_score, flappy_ticks);

    let (defense_score, defense_ticks) = run_defense()?;
    scores.add_score(defense_score, defense_ticks);

    log::info!("leaderboard:");
    for (rank, entry) in scores.entries.iter().enumerate() {
        log::info!(
            "  #{} {:>6} points  ({:>4}s)",
            rank + 1,
            entry.score,
            entry.ticks / u64::from(TICKS_PER_SECOND)
        );
    }
    Ok(())
}

/// Pong: the player side runs the Hard tracking policy against the
/// built-in Normal opponent.
fn run_pong() -> Result<(u64, u64), ConfigError> {
    let mut game = Pong::with_difficulty(DEMO_SEED, Difficulty::Normal)?;
    let pilot = ReactivePolicy::for_difficulty(Difficulty::Hard);
    game.start();

    let mut ticks = 0u64;
    while game.session.phase == GamePhase::Playing && ticks < 120_000 {
        let action = match (game.world.get(game.player()), game.world.get(game.ball())) {
            (Some(own), Some(ball)) => {
                // Decorrelate the pilot's jitter from the opponent's.
                pilot.decide(own, ball, Axis::Vertical, game.world.tick, game.world.seed ^ 1)
            }
            _ => PaddleAction::Hold,
        };
        game.tick(&TickInput {
            axis: Vec2::new(0.0, action.signum()),
            ..TickInput::default()
        });
        ticks += 1;
    }
    log::info!(
        "pong: {:?} {}-{} in {} ticks",
        game.session.phase,
        game.session.score,
        game.opponent_score,
        ticks
    );
    Ok((game.session.score, ticks))
}

/// Breakout: chase the ball's x position.
fn run_breakout() -> Result<(u64, u64), ConfigError> {
    let mut game = Breakout::new(DEMO_SEED)?;
    game.start()?;

    let mut ticks = 0u64;
    while game.session.phase == GamePhase::Playing && ticks < 120_000 {
        let ball_x = game.world.get(game.ball()).map_or(0.0, |b| b.pos.x);
        let paddle_x = game.world.get(game.paddle()).map_or(0.0, |p| p.pos.x);
        let dir = if (ball_x - paddle_x).abs() < 4.0 { 0.0 } else { (ball_x - paddle_x).signum() };
        game.tick(&TickInput { axis: Vec2::new(dir, 0.0), ..TickInput::default() });
        ticks += 1;
    }
    log::info!(
        "breakout: {:?} score {} with {} bricks left in {} ticks",
        game.session.phase,
        game.session.score,
        game.bricks_left(),
        ticks
    );
    Ok((game.session.score, ticks))
}

/// Flappy: flap on a fixed cadence; the run ends at the first pipe the
/// cadence can't clear.
fn run_flappy() -> Result<(u64, u64), ConfigError> {
    let mut game = Flappy::new(DEMO_SEED)?;
    game.start()?;

    let mut ticks = 0u64;
    while game.session.phase == GamePhase::Playing && ticks < 20_000 {
        let flap = ticks % 18 == 0;
        game.tick(&TickInput { action: flap, ..TickInput::default() });
        ticks += 1;
    }
    log::info!("flappy: score {} in {} ticks", game.session.score, ticks);
    Ok((game.session.score, ticks))
}

/// Tower defense: a ring of three towers, run until wave 5 or the base
/// falls. Also exercises the snapshot round trip.
fn run_defense() -> Result<(u64, u64), ConfigError> {
    let mut game = Defense::new(DEMO_SEED)?;
    let mid = Vec2::new(450.0, 350.0);
    for angle in [0.0f32, 2.094, 4.189] {
        game.place_tower(mid + Vec2::new(angle.cos(), angle.sin()) * 150.0)?;
    }
    game.start()?;

    let mut ticks = 0u64;
    while game.session.phase == GamePhase::Playing && game.wave <= 5 && ticks < 120_000 {
        game.tick(&TickInput::default());
        ticks += 1;
    }

    // Snapshot round trip: the serialized world restores tick-for-tick.
    match serde_json::to_string(&game.world) {
        Ok(snapshot) => {
            log::info!("defense: snapshot is {} bytes", snapshot.len());
            match serde_json::from_str::<arcade_core::World>(&snapshot) {
                Ok(restored) => debug_assert_eq!(restored.tick, game.world.tick),
                Err(err) => log::warn!("defense: snapshot restore failed: {err}"),
            }
        }
        Err(err) => log::warn!("defense: snapshot failed: {err}"),
    }

    log::info!(
        "defense: {:?} reached wave {} with base hp {} and score {} in {} ticks",
        game.session.phase,
        game.wave,
        game.base_hp(),
        game.session.score,
        ticks
    );
    Ok((game.session.score, ticks))
}
