//! Canonical Pong
//!
//! 800x600 court, wall-mounted paddles, first to five points. The right
//! paddle is driven by the reactive tracking policy; the left by host
//! input. The ball is a single long-lived entity: a point is scored once
//! it is fully past a court edge, then it re-serves from center.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::TICK_DT;
use crate::policy::reactive::{Axis, Difficulty, PaddleAction, ReactivePolicy};
use crate::sim::session::{GamePhase, Session, WinCondition};
use crate::sim::tick::{TickInput, advance};
use crate::sim::world::{
    Boundary, ConfigError, EdgePolicy, EntityId, EntityKind, Shape, World, WorldConfig,
};
use crate::sim::RuleTable;
use crate::sim::rules::Response;

pub const WIDTH: f32 = 800.0;
pub const HEIGHT: f32 = 600.0;
pub const PADDLE_WIDTH: f32 = 15.0;
pub const PADDLE_HEIGHT: f32 = 100.0;
pub const BALL_RADIUS: f32 = 10.0;
pub const PADDLE_SPEED: f32 = 6.0;
pub const BALL_SPEED: f32 = 4.5;
/// First to this many points wins.
pub const WIN_SCORE: u64 = 5;

pub const PADDLE: EntityKind = EntityKind(1);
pub const BALL: EntityKind = EntityKind(2);

const PADDLE_SHAPE: Shape = Shape::Rect { w: PADDLE_WIDTH, h: PADDLE_HEIGHT };

/// A Pong run: generic world plus the canonical rule table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pong {
    pub world: World,
    pub session: Session,
    rules: RuleTable,
    policy: ReactivePolicy,
    player: EntityId,
    opponent: EntityId,
    ball: EntityId,
    /// Opponent points; the player's live in `session.score`.
    pub opponent_score: u64,
}

impl Pong {
    pub fn new(seed: u64) -> Result<Self, ConfigError> {
        Self::with_difficulty(seed, Difficulty::default())
    }

    pub fn with_difficulty(seed: u64, difficulty: Difficulty) -> Result<Self, ConfigError> {
        let mut world = World::new(WorldConfig { width: WIDTH, height: HEIGHT, seed })?;

        let mid = Vec2::new(WIDTH / 2.0, HEIGHT / 2.0);
        let player = {
            let e = world.spawn(PADDLE, Vec2::new(PADDLE_WIDTH / 2.0, mid.y), PADDLE_SHAPE)?;
            e.boundary = Boundary::all(EdgePolicy::Clamp);
            e.id
        };
        let opponent = {
            let e =
                world.spawn(PADDLE, Vec2::new(WIDTH - PADDLE_WIDTH / 2.0, mid.y), PADDLE_SHAPE)?;
            e.boundary = Boundary::all(EdgePolicy::Clamp);
            e.id
        };
        let ball = {
            let e = world.spawn(BALL, mid, Shape::Circle { radius: BALL_RADIUS })?;
            // Top and bottom walls bounce; the court is open left and right
            // (scoring is checked against the ball position each tick).
            e.boundary = Boundary {
                top: EdgePolicy::Bounce,
                bottom: EdgePolicy::Bounce,
                ..Boundary::default()
            };
            e.id
        };

        let rules =
            RuleTable::new().with(BALL, PADDLE, Response::Reflect { deflect: Some(BALL_SPEED) });

        let mut game = Self {
            world,
            session: Session::new(1, WinCondition::ScoreAtLeast(WIN_SCORE)),
            rules,
            policy: ReactivePolicy::for_difficulty(difficulty),
            player,
            opponent,
            ball,
            opponent_score: 0,
        };
        game.serve(true);
        Ok(game)
    }

    /// Reset scores and begin a run.
    pub fn start(&mut self) {
        self.session = Session::new(1, WinCondition::ScoreAtLeast(WIN_SCORE));
        self.session.start();
        self.opponent_score = 0;
        let mid_y = HEIGHT / 2.0;
        for id in [self.player, self.opponent] {
            if let Some(paddle) = self.world.get_mut(id) {
                paddle.pos.y = mid_y;
                paddle.vel = Vec2::ZERO;
            }
        }
        self.serve(true);
        log::debug!("pong: run started (seed {})", self.world.seed);
    }

    /// Re-center the ball heading toward one side, vertical sign random.
    fn serve(&mut self, toward_opponent: bool) {
        let down = self.world.rng.random_bool(0.5);
        if let Some(ball) = self.world.get_mut(self.ball) {
            ball.pos = Vec2::new(WIDTH / 2.0, HEIGHT / 2.0);
            ball.vel = Vec2::new(
                if toward_opponent { BALL_SPEED } else { -BALL_SPEED },
                if down { BALL_SPEED } else { -BALL_SPEED },
            );
        }
    }

    /// Advance one tick: input, physics/collisions, opponent policy,
    /// scoring, terminal check.
    pub fn tick(&mut self, input: &TickInput) {
        if input.start
            && matches!(self.session.phase, GamePhase::Menu | GamePhase::GameOver | GamePhase::Won)
        {
            self.start();
            return;
        }
        if input.pause {
            self.session.toggle_pause();
        }
        if !self.session.running() {
            return;
        }

        if let Some(paddle) = self.world.get_mut(self.player) {
            paddle.vel.y = input.axis.y.clamp(-1.0, 1.0) * PADDLE_SPEED;
        }

        let _events = advance(&mut self.world, &self.rules, TICK_DT);

        // Opponent policy runs on the post-collision state; its move takes
        // effect on the next physics step.
        let action = match (self.world.get(self.opponent), self.world.get(self.ball)) {
            (Some(own), Some(ball)) => {
                self.policy.decide(own, ball, Axis::Vertical, self.world.tick, self.world.seed)
            }
            _ => PaddleAction::Hold,
        };
        if let Some(paddle) = self.world.get_mut(self.opponent) {
            paddle.vel.y = action.signum() * PADDLE_SPEED * self.policy.speed_factor;
        }

        self.score_exits();

        self.session.check_win(&self.world);
        if self.opponent_score >= WIN_SCORE {
            self.session.phase = GamePhase::GameOver;
        }
    }

    /// A point lands once the ball is fully past a court edge.
    fn score_exits(&mut self) {
        let Some(ball) = self.world.get(self.ball) else { return };
        if ball.pos.x - BALL_RADIUS > WIDTH {
            self.session.score += 1;
            log::debug!("pong: player point ({} - {})", self.session.score, self.opponent_score);
            self.serve(false);
        } else if ball.pos.x + BALL_RADIUS < 0.0 {
            self.opponent_score += 1;
            log::debug!("pong: opponent point ({} - {})", self.session.score, self.opponent_score);
            self.serve(true);
        }
    }

    pub fn ball(&self) -> EntityId {
        self.ball
    }

    pub fn player(&self) -> EntityId {
        self.player
    }

    pub fn opponent(&self) -> EntityId {
        self.opponent
    }
}
