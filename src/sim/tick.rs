//! Fixed timestep simulation tick
//!
//! `advance` is the engine half of the game loop: physics, then collision
//! resolution, then the dead-entity sweep. The game layer wraps it with
//! input handling, opponent policy, and session bookkeeping.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::physics::physics_step;
use super::rules::{GameEvent, RuleTable, resolve_collisions};
use super::world::World;

/// Discrete input commands for a single tick.
///
/// The host maps whatever raw events it has (keys, mouse, touch) onto
/// this before calling the game's tick.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TickInput {
    /// Player movement direction; components in [-1, 1].
    pub axis: Vec2,
    /// Launch / fire / flap.
    pub action: bool,
    /// Toggle pause.
    pub pause: bool,
    /// Start or restart a run from the menu or a terminal phase.
    pub start: bool,
}

/// Advance the world by one fixed timestep and return everything that
/// happened, in deterministic order (physics events first, then
/// collision events, each in entity-creation order).
pub fn advance(world: &mut World, rules: &RuleTable, dt: f32) -> Vec<GameEvent> {
    log::trace!("tick {}: {} entities", world.tick, world.entities.len());
    world.tick += 1;

    let mut events = Vec::new();
    physics_step(world, dt, &mut events);
    resolve_collisions(world, rules, &mut events);
    world.sweep();
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rules::Response;
    use crate::sim::world::{EntityKind, Shape, WorldConfig};

    const BALL: EntityKind = EntityKind(1);
    const BRICK: EntityKind = EntityKind(2);

    #[test]
    fn advance_integrates_resolves_and_sweeps() {
        let mut world = World::new(WorldConfig { width: 800.0, height: 600.0, seed: 3 }).unwrap();
        {
            let e = world.spawn(BALL, Vec2::new(50.0, 120.0), Shape::Circle { radius: 8.0 }).unwrap();
            e.vel = Vec2::new(0.0, -8.0);
        }
        {
            let e = world.spawn(BRICK, Vec2::new(50.0, 90.0), Shape::Rect { w: 75.0, h: 20.0 }).unwrap();
            e.bounty = 10;
        }
        let rules = RuleTable::new().with(BALL, BRICK, Response::Break);

        // Tick 1: ball moves to y=112, no contact yet (brick bottom is 100).
        let events = advance(&mut world, &rules, 1.0);
        assert!(events.is_empty());
        assert_eq!(world.tick, 1);

        // Tick 2: ball reaches y=104, overlaps, brick breaks and is swept.
        let events = advance(&mut world, &rules, 1.0);
        assert!(matches!(events[0], GameEvent::Destroyed { score: 10, .. }));
        assert_eq!(world.entities.len(), 1);
        assert!(world.entities[0].vel.y > 0.0);
    }
}
