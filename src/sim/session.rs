//! Score and session bookkeeping
//!
//! The phase machine every mini-game shares: menu -> playing ->
//! {gameOver | won} -> menu. Pause is an orthogonal flag that suspends
//! ticking without touching the world.

use serde::{Deserialize, Serialize};

use super::rules::GameEvent;
use super::world::{EntityKind, World};

/// Current phase of gameplay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    Menu,
    Playing,
    GameOver,
    Won,
}

/// When a session counts as won.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum WinCondition {
    /// Reach a score target (Pong: first to 5).
    ScoreAtLeast(u64),
    /// Clear every entity of a kind (Breakout: all bricks).
    KindCleared(EntityKind),
    /// No win state; play until lost (tower defense).
    Endless,
}

/// Per-run score and lifecycle state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub phase: GamePhase,
    /// Orthogonal to `phase`; suspends ticks without resetting the world.
    pub paused: bool,
    pub score: u64,
    pub lives: u8,
    /// Optional countdown in ticks; the session ends when it hits zero.
    pub timer: Option<u32>,
    pub win: WinCondition,
}

impl Session {
    #[must_use]
    pub fn new(lives: u8, win: WinCondition) -> Self {
        Self { phase: GamePhase::Menu, paused: false, score: 0, lives, timer: None, win }
    }

    #[must_use]
    pub fn with_timer(mut self, ticks: u32) -> Self {
        self.timer = Some(ticks);
        self
    }

    pub fn start(&mut self) {
        self.phase = GamePhase::Playing;
        self.paused = false;
    }

    pub fn toggle_pause(&mut self) {
        if self.phase == GamePhase::Playing {
            self.paused = !self.paused;
        }
    }

    /// True while the simulation should advance.
    pub fn running(&self) -> bool {
        self.phase == GamePhase::Playing && !self.paused
    }

    /// Fold tick events into the score. Only destruction bounties score,
    /// so the score is monotonic within a session.
    pub fn apply_events(&mut self, events: &[GameEvent]) {
        for event in events {
            if let GameEvent::Destroyed { score, .. } = event {
                self.score += u64::from(*score);
            }
        }
    }

    /// Lose a life; at zero the run is over.
    pub fn lose_life(&mut self) {
        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            self.phase = GamePhase::GameOver;
        }
    }

    /// Advance the countdown timer, if any.
    pub fn tick_timer(&mut self) {
        if let Some(remaining) = self.timer {
            let remaining = remaining.saturating_sub(1);
            self.timer = Some(remaining);
            if remaining == 0 {
                self.phase = GamePhase::GameOver;
            }
        }
    }

    /// Check the configured win condition against the world.
    pub fn check_win(&mut self, world: &World) {
        if self.phase != GamePhase::Playing {
            return;
        }
        let won = match self.win {
            WinCondition::ScoreAtLeast(target) => self.score >= target,
            WinCondition::KindCleared(kind) => world.count_of_kind(kind) == 0,
            WinCondition::Endless => false,
        };
        if won {
            self.phase = GamePhase::Won;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::world::{EntityId, Shape, WorldConfig};
    use glam::Vec2;

    #[test]
    fn pause_is_orthogonal_to_phase() {
        let mut session = Session::new(3, WinCondition::Endless);
        session.start();
        assert!(session.running());

        session.toggle_pause();
        assert_eq!(session.phase, GamePhase::Playing);
        assert!(!session.running());

        session.toggle_pause();
        assert!(session.running());
    }

    #[test]
    fn pause_has_no_effect_outside_playing() {
        let mut session = Session::new(3, WinCondition::Endless);
        session.toggle_pause();
        assert!(!session.paused);
    }

    #[test]
    fn losing_all_lives_ends_the_run() {
        let mut session = Session::new(2, WinCondition::Endless);
        session.start();
        session.lose_life();
        assert_eq!(session.phase, GamePhase::Playing);
        session.lose_life();
        assert_eq!(session.phase, GamePhase::GameOver);
    }

    #[test]
    fn timer_expiry_ends_the_run() {
        let mut session = Session::new(3, WinCondition::Endless).with_timer(3);
        session.start();
        session.tick_timer();
        session.tick_timer();
        assert_eq!(session.phase, GamePhase::Playing);
        session.tick_timer();
        assert_eq!(session.phase, GamePhase::GameOver);
    }

    #[test]
    fn score_folds_only_destruction_bounties() {
        let mut session = Session::new(3, WinCondition::Endless);
        session.start();
        let brick = EntityKind(2);
        session.apply_events(&[
            GameEvent::Reflected { id: EntityId(1), off: EntityId(2) },
            GameEvent::Destroyed { id: EntityId(3), kind: brick, score: 10 },
            GameEvent::Damaged { id: EntityId(4), hp: 20 },
        ]);
        assert_eq!(session.score, 10);
    }

    #[test]
    fn clearing_a_kind_wins() {
        let brick = EntityKind(2);
        let mut world = World::new(WorldConfig { width: 100.0, height: 100.0, seed: 0 }).unwrap();
        let id = world.spawn(brick, Vec2::new(50.0, 50.0), Shape::Rect { w: 10.0, h: 4.0 }).unwrap().id;

        let mut session = Session::new(3, WinCondition::KindCleared(brick));
        session.start();
        session.check_win(&world);
        assert_eq!(session.phase, GamePhase::Playing);

        world.get_mut(id).unwrap().alive = false;
        world.sweep();
        session.check_win(&world);
        assert_eq!(session.phase, GamePhase::Won);
    }
}
