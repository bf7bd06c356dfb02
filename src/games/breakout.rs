//! Canonical Breakout
//!
//! 800x600, an 8x10 brick grid worth 10 points each, three lives. The
//! ball bounces off three walls; dropping past the bottom costs a life.
//! Clearing every brick wins the run.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::TICK_DT;
use crate::sim::rules::{GameEvent, Response, RuleTable};
use crate::sim::session::{GamePhase, Session, WinCondition};
use crate::sim::tick::{TickInput, advance};
use crate::sim::world::{
    Boundary, ConfigError, EdgePolicy, EntityId, EntityKind, Shape, World, WorldConfig,
};

pub const WIDTH: f32 = 800.0;
pub const HEIGHT: f32 = 600.0;
pub const PADDLE_WIDTH: f32 = 100.0;
pub const PADDLE_HEIGHT: f32 = 15.0;
pub const BALL_RADIUS: f32 = 8.0;
pub const PADDLE_SPEED: f32 = 8.0;
pub const BRICK_WIDTH: f32 = 75.0;
pub const BRICK_HEIGHT: f32 = 20.0;
pub const BRICK_ROWS: u32 = 8;
pub const BRICK_COLS: u32 = 10;
pub const BRICK_PADDING: f32 = 5.0;
pub const BRICK_SCORE: u32 = 10;
pub const LIVES: u8 = 3;
/// Serve velocity per component; the ball launches at (+-4, -4).
pub const SERVE_SPEED: f32 = 4.0;
/// Tangential speed at a full-edge paddle hit.
pub const DEFLECT_STRENGTH: f32 = 4.0;

pub const PADDLE: EntityKind = EntityKind(1);
pub const BALL: EntityKind = EntityKind(2);
pub const BRICK: EntityKind = EntityKind(3);

/// A Breakout run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Breakout {
    pub world: World,
    pub session: Session,
    rules: RuleTable,
    player: EntityId,
    ball: EntityId,
}

impl Breakout {
    pub fn new(seed: u64) -> Result<Self, ConfigError> {
        let mut world = World::new(WorldConfig { width: WIDTH, height: HEIGHT, seed })?;

        let player = {
            let e = world.spawn(
                PADDLE,
                Vec2::new(WIDTH / 2.0, HEIGHT - 40.0 + PADDLE_HEIGHT / 2.0),
                Shape::Rect { w: PADDLE_WIDTH, h: PADDLE_HEIGHT },
            )?;
            e.boundary = Boundary::all(EdgePolicy::Clamp);
            e.id
        };
        let ball = {
            let e = world.spawn(
                BALL,
                Vec2::new(WIDTH / 2.0, HEIGHT - 60.0),
                Shape::Circle { radius: BALL_RADIUS },
            )?;
            // Side and top walls bounce; the bottom is open and costs a
            // life once the ball is fully past it.
            e.boundary = Boundary {
                left: EdgePolicy::Bounce,
                right: EdgePolicy::Bounce,
                top: EdgePolicy::Bounce,
                bottom: EdgePolicy::Ignore,
            };
            e.id
        };

        spawn_bricks(&mut world)?;

        let rules = RuleTable::new()
            .with(BALL, PADDLE, Response::Reflect { deflect: Some(DEFLECT_STRENGTH) })
            .with(BALL, BRICK, Response::Break);

        let mut game = Self {
            world,
            session: Session::new(LIVES, WinCondition::KindCleared(BRICK)),
            rules,
            player,
            ball,
        };
        game.serve();
        Ok(game)
    }

    /// Rebuild the brick wall and begin a run.
    pub fn start(&mut self) -> Result<(), ConfigError> {
        self.session = Session::new(LIVES, WinCondition::KindCleared(BRICK));
        self.session.start();
        for entity in &mut self.world.entities {
            if entity.kind == BRICK {
                entity.alive = false;
            }
        }
        self.world.sweep();
        spawn_bricks(&mut self.world)?;
        if let Some(paddle) = self.world.get_mut(self.player) {
            paddle.pos.x = WIDTH / 2.0;
            paddle.vel = Vec2::ZERO;
        }
        self.serve();
        log::debug!("breakout: run started (seed {})", self.world.seed);
        Ok(())
    }

    /// Put the ball back on serve, horizontal sign random.
    fn serve(&mut self) {
        let right = self.world.rng.random_bool(0.5);
        if let Some(ball) = self.world.get_mut(self.ball) {
            ball.pos = Vec2::new(WIDTH / 2.0, HEIGHT - 60.0);
            ball.vel = Vec2::new(if right { SERVE_SPEED } else { -SERVE_SPEED }, -SERVE_SPEED);
        }
    }

    /// Advance one tick.
    pub fn tick(&mut self, input: &TickInput) {
        if input.start
            && matches!(self.session.phase, GamePhase::Menu | GamePhase::GameOver | GamePhase::Won)
        {
            // A failed restart leaves the session in the menu.
            if self.start().is_err() {
                self.session.phase = GamePhase::Menu;
            }
            return;
        }
        if input.pause {
            self.session.toggle_pause();
        }
        if !self.session.running() {
            return;
        }

        if let Some(paddle) = self.world.get_mut(self.player) {
            paddle.vel.x = input.axis.x.clamp(-1.0, 1.0) * PADDLE_SPEED;
        }

        let events = advance(&mut self.world, &self.rules, TICK_DT);
        self.session.apply_events(&events);
        for event in &events {
            if let GameEvent::Destroyed { id, .. } = event {
                log::trace!("breakout: brick {id} destroyed, score {}", self.session.score);
            }
        }

        self.check_ball_lost();
        self.session.check_win(&self.world);
    }

    /// Dropping fully past the bottom edge costs a life.
    fn check_ball_lost(&mut self) {
        let lost = match self.world.get(self.ball) {
            Some(ball) => ball.pos.y - BALL_RADIUS > HEIGHT,
            None => false,
        };
        if lost {
            self.session.lose_life();
            log::debug!("breakout: ball lost, {} lives left", self.session.lives);
            if self.session.phase == GamePhase::Playing {
                self.serve();
            }
        }
    }

    pub fn ball(&self) -> EntityId {
        self.ball
    }

    pub fn paddle(&self) -> EntityId {
        self.player
    }

    pub fn bricks_left(&self) -> usize {
        self.world.count_of_kind(BRICK)
    }
}

/// Lay out the canonical 8x10 grid, row-major from the top-left.
fn spawn_bricks(world: &mut World) -> Result<(), ConfigError> {
    for row in 0..BRICK_ROWS {
        for col in 0..BRICK_COLS {
            let top_left = Vec2::new(
                col as f32 * (BRICK_WIDTH + BRICK_PADDING) + BRICK_PADDING + 25.0,
                row as f32 * (BRICK_HEIGHT + BRICK_PADDING) + BRICK_PADDING + 60.0,
            );
            let center = top_left + Vec2::new(BRICK_WIDTH / 2.0, BRICK_HEIGHT / 2.0);
            let brick = world.spawn(BRICK, center, Shape::Rect { w: BRICK_WIDTH, h: BRICK_HEIGHT })?;
            brick.bounty = BRICK_SCORE;
        }
    }
    Ok(())
}
