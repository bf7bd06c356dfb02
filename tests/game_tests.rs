//! End-to-end runs of the canonical games.
//!
//! These drive full games through the public API only: scripted or
//! policy-driven input in, world/session state out.

use glam::Vec2;

use arcade_core::World;
use arcade_core::games::{Breakout, Defense, Pong, breakout, pong};
use arcade_core::sim::{GamePhase, TickInput};

/// Deterministic input script: swing the paddle up and down.
fn scripted_input(tick: u64) -> TickInput {
    let axis_y = if tick % 120 < 60 { 1.0 } else { -1.0 };
    TickInput { axis: Vec2::new(0.0, axis_y), ..TickInput::default() }
}

#[test]
fn pong_is_deterministic_for_a_seed() {
    let mut a = Pong::new(42).unwrap();
    let mut b = Pong::new(42).unwrap();
    a.start();
    b.start();

    for tick in 0..3000 {
        let input = scripted_input(tick);
        a.tick(&input);
        b.tick(&input);
    }

    let snap_a = serde_json::to_string(&a.world).unwrap();
    let snap_b = serde_json::to_string(&b.world).unwrap();
    assert_eq!(snap_a, snap_b);
    assert_eq!(a.session.score, b.session.score);
    assert_eq!(a.opponent_score, b.opponent_score);
}

#[test]
fn pong_ball_respects_court_walls() {
    let mut game = Pong::new(7).unwrap();
    game.start();
    for tick in 0..5000 {
        game.tick(&scripted_input(tick));
        if game.session.phase != GamePhase::Playing {
            break;
        }
        let ball = game.world.get(game.ball()).unwrap();
        assert!(
            ball.pos.y >= pong::BALL_RADIUS - 1e-3
                && ball.pos.y <= pong::HEIGHT - pong::BALL_RADIUS + 1e-3,
            "ball escaped vertically at tick {tick}: {}",
            ball.pos.y
        );
    }
}

#[test]
fn pong_points_accumulate_toward_a_terminal_phase() {
    // A stationary player paddle leaks points; the opponent must reach
    // five and end the run well within the tick budget.
    let mut game = Pong::new(11).unwrap();
    game.start();
    let mut ticks = 0u64;
    while game.session.phase == GamePhase::Playing && ticks < 60_000 {
        game.tick(&TickInput::default());
        ticks += 1;
    }
    assert_ne!(game.session.phase, GamePhase::Playing, "no terminal phase reached");
    let total = game.session.score + game.opponent_score;
    assert!(total >= 5, "a side must reach five, saw {total}");
}

#[test]
fn breakout_autoplay_scores_monotonically() {
    let mut game = Breakout::new(9).unwrap();
    game.start().unwrap();

    let mut last_score = 0;
    for _ in 0..6000 {
        if game.session.phase != GamePhase::Playing {
            break;
        }
        let ball_x = game.world.get(game.ball()).map_or(400.0, |b| b.pos.x);
        let paddle_x = game.world.get(game.paddle()).map_or(400.0, |p| p.pos.x);
        let dir = if (ball_x - paddle_x).abs() < 4.0 { 0.0 } else { (ball_x - paddle_x).signum() };
        game.tick(&TickInput { axis: Vec2::new(dir, 0.0), ..TickInput::default() });

        assert!(game.session.score >= last_score, "score must never decrease");
        last_score = game.session.score;
    }

    assert!(game.session.score > 0, "the serve must reach the brick wall");
    assert_eq!(
        game.session.score,
        u64::from(breakout::BRICK_SCORE)
            * ((breakout::BRICK_ROWS * breakout::BRICK_COLS) as u64
                - game.bricks_left() as u64)
    );
}

#[test]
fn defense_towers_defend_across_waves() {
    let mut game = Defense::new(5).unwrap();
    let mid = Vec2::new(450.0, 350.0);
    for angle in [0.0f32, 2.094, 4.189] {
        game.place_tower(mid + Vec2::new(angle.cos(), angle.sin()) * 150.0).unwrap();
    }
    game.start().unwrap();

    let mut ticks = 0u64;
    while game.session.phase == GamePhase::Playing && game.wave <= 3 && ticks < 60_000 {
        game.tick(&TickInput::default());
        ticks += 1;
    }

    assert!(game.session.score > 0, "towers must kill at least one creep");
    assert!(game.base_hp() <= 100);
    if game.session.phase == GamePhase::GameOver {
        assert_eq!(game.base_hp(), 0);
    }
}

#[test]
fn snapshots_round_trip() {
    let mut game = Pong::new(3).unwrap();
    game.start();
    for tick in 0..500 {
        game.tick(&scripted_input(tick));
    }

    let snapshot = serde_json::to_string(&game.world).unwrap();
    let restored: World = serde_json::from_str(&snapshot).unwrap();
    let again = serde_json::to_string(&restored).unwrap();
    assert_eq!(snapshot, again);
    assert_eq!(restored.tick, game.world.tick);
    assert_eq!(restored.entities.len(), game.world.entities.len());
}

#[test]
fn restart_resets_scores_but_not_determinism() {
    let mut game = Pong::new(21).unwrap();
    game.start();
    for tick in 0..2000 {
        game.tick(&scripted_input(tick));
    }
    game.session.phase = GamePhase::GameOver;
    game.tick(&TickInput { start: true, ..TickInput::default() });

    assert_eq!(game.session.phase, GamePhase::Playing);
    assert_eq!(game.session.score, 0);
    assert_eq!(game.opponent_score, 0);
    // The ball is back on serve from center.
    let ball = game.world.get(game.ball()).unwrap();
    assert_eq!(ball.pos, Vec2::new(pong::WIDTH / 2.0, pong::HEIGHT / 2.0));
}
