//! Reactive opponent policies
//!
//! Paddle tracking with a dead zone and bounded perception noise, chase
//! steering, and nearest-target selection for towers. Decision functions
//! are stateless: reaction delay and jitter come from hashing the run
//! seed with the tick counter, so replays are exact.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::world::{Entity, EntityId, EntityKind, World};

/// Discrete paddle action along its travel axis.
///
/// `MoveUp` decreases the coordinate (up, or left for horizontal
/// paddles); `MoveDown` increases it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaddleAction {
    MoveUp,
    MoveDown,
    Hold,
}

impl PaddleAction {
    /// Sign of the movement along the travel axis.
    pub fn signum(self) -> f32 {
        match self {
            PaddleAction::MoveUp => -1.0,
            PaddleAction::MoveDown => 1.0,
            PaddleAction::Hold => 0.0,
        }
    }
}

/// Tower decision: fire at a target or hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireAction {
    Fire(EntityId),
    Hold,
}

/// The axis a paddle travels on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    fn pick(self, v: Vec2) -> f32 {
        match self {
            Axis::Horizontal => v.x,
            Axis::Vertical => v.y,
        }
    }
}

/// Opponent difficulty preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" | "med" | "medium" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

/// Parameters for the tracking policy.
///
/// Canonical values follow the classic Pong opponent: a 10 px dead zone,
/// 0.75 speed factor, and a jittered reaction window of 50-150 ms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReactivePolicy {
    /// No reaction while the target is within this distance of center.
    pub dead_zone: f32,
    /// Fraction of full paddle speed the opponent moves at.
    pub speed_factor: f32,
    /// Bounded perception-noise amplitude in world units.
    pub jitter: f32,
    /// Ticks a perception error persists before being redrawn.
    pub reaction_ticks: u64,
    /// Lookahead in ticks applied to the target's velocity.
    pub lookahead: f32,
}

impl ReactivePolicy {
    #[must_use]
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Easy => Self {
                dead_zone: 24.0,
                speed_factor: 0.55,
                jitter: 40.0,
                reaction_ticks: 12,
                lookahead: 0.0,
            },
            Difficulty::Normal => Self {
                dead_zone: 10.0,
                speed_factor: 0.75,
                jitter: 18.0,
                reaction_ticks: 6,
                lookahead: 0.0,
            },
            Difficulty::Hard => Self {
                dead_zone: 4.0,
                speed_factor: 0.95,
                jitter: 4.0,
                reaction_ticks: 2,
                lookahead: 8.0,
            },
        }
    }

    /// Decide a paddle move toward the perceived target position.
    ///
    /// The opponent only reacts while the target closes in. Perception
    /// noise is redrawn every `reaction_ticks`, modeling delayed,
    /// imperfect tracking without any hidden state.
    pub fn decide(
        &self,
        own: &Entity,
        target: &Entity,
        axis: Axis,
        tick: u64,
        seed: u64,
    ) -> PaddleAction {
        let closing = (own.pos - target.pos).dot(target.vel) > 0.0;
        if !closing {
            return PaddleAction::Hold;
        }

        let epoch = tick / self.reaction_ticks.max(1);
        let noise = hash_unit(seed, epoch) * self.jitter;
        let predicted = axis.pick(target.pos) + axis.pick(target.vel) * self.lookahead;
        let diff = predicted + noise - axis.pick(own.pos);

        if diff.abs() <= self.dead_zone {
            PaddleAction::Hold
        } else if diff < 0.0 {
            PaddleAction::MoveUp
        } else {
            PaddleAction::MoveDown
        }
    }
}

/// Deterministic hash roll in [-1, 1).
fn hash_unit(seed: u64, n: u64) -> f32 {
    let hash = seed
        .wrapping_mul(2654435761)
        .wrapping_add(n.wrapping_mul(0x9E3779B97F4A7C15));
    let unit = (hash >> 11) as f32 / (1u64 << 53) as f32;
    unit * 2.0 - 1.0
}

/// Velocity that moves `pos` toward `target` at `speed`.
pub fn chase_velocity(pos: Vec2, target: Vec2, speed: f32) -> Vec2 {
    let delta = target - pos;
    let dist = delta.length().max(0.001);
    (delta / dist) * speed
}

/// Nearest live entity of `kind` within `range` of `from`.
///
/// Squared-distance comparison; ties resolve to the lowest id because
/// entities iterate in creation order and only a strictly closer
/// candidate replaces the current one.
pub fn nearest_target<'w>(
    world: &'w World,
    from: Vec2,
    kind: EntityKind,
    range: f32,
) -> Option<&'w Entity> {
    let mut min_dist = range * range;
    let mut nearest = None;
    for entity in world.alive_of_kind(kind) {
        let dist = from.distance_squared(entity.pos);
        if dist < min_dist {
            min_dist = dist;
            nearest = Some(entity);
        }
    }
    nearest
}

/// Tower decision: fire at the nearest creep in range, else hold.
pub fn select_target(world: &World, from: Vec2, kind: EntityKind, range: f32) -> FireAction {
    match nearest_target(world, from, kind, range) {
        Some(target) => FireAction::Fire(target.id),
        None => FireAction::Hold,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::world::{Shape, WorldConfig};

    const PADDLE: EntityKind = EntityKind(0);
    const BALL: EntityKind = EntityKind(1);
    const CREEP: EntityKind = EntityKind(4);

    fn world() -> World {
        World::new(WorldConfig { width: 800.0, height: 600.0, seed: 5 }).unwrap()
    }

    fn exact_policy() -> ReactivePolicy {
        ReactivePolicy { jitter: 0.0, ..ReactivePolicy::for_difficulty(Difficulty::Normal) }
    }

    fn paddle_and_ball(w: &mut World, paddle_y: f32, ball_y: f32, ball_vel: Vec2) -> (EntityId, EntityId) {
        let paddle = {
            let e = w
                .spawn(PADDLE, Vec2::new(792.5, paddle_y), Shape::Rect { w: 15.0, h: 100.0 })
                .unwrap();
            e.id
        };
        let ball = {
            let e = w.spawn(BALL, Vec2::new(400.0, ball_y), Shape::Circle { radius: 10.0 }).unwrap();
            e.vel = ball_vel;
            e.id
        };
        (paddle, ball)
    }

    #[test]
    fn tracks_an_approaching_ball() {
        let mut w = world();
        let (paddle, ball) = paddle_and_ball(&mut w, 300.0, 450.0, Vec2::new(4.5, 2.0));
        let action = exact_policy().decide(
            w.get(paddle).unwrap(),
            w.get(ball).unwrap(),
            Axis::Vertical,
            0,
            w.seed,
        );
        assert_eq!(action, PaddleAction::MoveDown);
    }

    #[test]
    fn ignores_a_receding_ball() {
        let mut w = world();
        let (paddle, ball) = paddle_and_ball(&mut w, 300.0, 450.0, Vec2::new(-4.5, 2.0));
        let action = exact_policy().decide(
            w.get(paddle).unwrap(),
            w.get(ball).unwrap(),
            Axis::Vertical,
            0,
            w.seed,
        );
        assert_eq!(action, PaddleAction::Hold);
    }

    #[test]
    fn holds_inside_the_dead_zone() {
        let mut w = world();
        let (paddle, ball) = paddle_and_ball(&mut w, 300.0, 306.0, Vec2::new(4.5, 0.0));
        let action = exact_policy().decide(
            w.get(paddle).unwrap(),
            w.get(ball).unwrap(),
            Axis::Vertical,
            0,
            w.seed,
        );
        assert_eq!(action, PaddleAction::Hold);
    }

    #[test]
    fn jitter_is_bounded_by_amplitude() {
        for epoch in 0..512 {
            let noise = hash_unit(42, epoch);
            assert!((-1.0..1.0).contains(&noise), "noise {noise} out of range");
        }
    }

    #[test]
    fn jitter_is_deterministic_per_epoch() {
        assert_eq!(hash_unit(7, 3), hash_unit(7, 3));
        assert_ne!(hash_unit(7, 3), hash_unit(7, 4));
    }

    #[test]
    fn chase_moves_toward_target_at_speed() {
        let vel = chase_velocity(Vec2::ZERO, Vec2::new(100.0, 0.0), 1.2);
        assert!(vel.x > 0.0);
        assert!((vel.length() - 1.2).abs() < 1e-4);
    }

    #[test]
    fn nearest_target_prefers_closest_then_lowest_id() {
        let mut w = world();
        let near = w.spawn(CREEP, Vec2::new(10.0, 0.0), Shape::Circle { radius: 8.0 }).unwrap().id;
        w.spawn(CREEP, Vec2::new(50.0, 0.0), Shape::Circle { radius: 8.0 }).unwrap();
        // Equidistant twin of `near`; later id loses the tie.
        w.spawn(CREEP, Vec2::new(-10.0, 0.0), Shape::Circle { radius: 8.0 }).unwrap();

        let found = nearest_target(&w, Vec2::ZERO, CREEP, 200.0).unwrap();
        assert_eq!(found.id, near);
    }

    #[test]
    fn nearest_target_respects_range_and_liveness() {
        let mut w = world();
        let id = w.spawn(CREEP, Vec2::new(300.0, 0.0), Shape::Circle { radius: 8.0 }).unwrap().id;
        assert_eq!(select_target(&w, Vec2::ZERO, CREEP, 120.0), FireAction::Hold);
        assert_eq!(select_target(&w, Vec2::ZERO, CREEP, 400.0), FireAction::Fire(id));

        w.get_mut(id).unwrap().alive = false;
        assert_eq!(select_target(&w, Vec2::ZERO, CREEP, 400.0), FireAction::Hold);
    }
}
