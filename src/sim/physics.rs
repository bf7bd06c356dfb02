//! Physics integration and boundary handling
//!
//! Pure function over the world given a fixed dt: integrate velocity into
//! position, apply per-entity gravity and speed ramp, then settle each
//! entity against the world edges per its boundary policy.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rules::GameEvent;
use super::world::{EdgePolicy, Entity, World};

/// A world edge, in canvas orientation (top is y = 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

/// Integrate all live entities by `dt` and resolve world-edge crossings.
///
/// With `dt == 0` this is an exact no-op. Iteration runs in creation
/// order; events are pushed in that order.
pub fn physics_step(world: &mut World, dt: f32, events: &mut Vec<GameEvent>) {
    if dt == 0.0 {
        return;
    }

    let width = world.width;
    let height = world.height;

    for entity in world.entities.iter_mut().filter(|e| e.alive) {
        entity.vel.y += entity.gravity * dt;
        if entity.accel != 0.0 {
            let speed = entity.vel.length();
            if speed > 1e-4 {
                entity.vel *= (speed + entity.accel * dt).max(0.0) / speed;
            }
        }
        entity.pos += entity.vel * dt;

        settle_boundary(entity, width, height, events);
    }
}

/// Apply the entity's per-edge policy after integration.
fn settle_boundary(entity: &mut Entity, width: f32, height: f32, events: &mut Vec<GameEvent>) {
    let half = entity.shape.half_extents();

    // X axis.
    if entity.pos.x - half.x < 0.0 {
        apply_edge(entity, Edge::Left, width, height, events);
    } else if entity.pos.x + half.x > width {
        apply_edge(entity, Edge::Right, width, height, events);
    }
    if !entity.alive {
        return;
    }

    // Y axis.
    if entity.pos.y - half.y < 0.0 {
        apply_edge(entity, Edge::Top, width, height, events);
    } else if entity.pos.y + half.y > height {
        apply_edge(entity, Edge::Bottom, width, height, events);
    }
}

fn apply_edge(
    entity: &mut Entity,
    edge: Edge,
    width: f32,
    height: f32,
    events: &mut Vec<GameEvent>,
) {
    let half = entity.shape.half_extents();
    let policy = match edge {
        Edge::Left => entity.boundary.left,
        Edge::Right => entity.boundary.right,
        Edge::Top => entity.boundary.top,
        Edge::Bottom => entity.boundary.bottom,
    };

    match policy {
        EdgePolicy::Ignore => {}
        EdgePolicy::Clamp => {
            clamp_to_edge(entity, edge, width, height, half);
        }
        EdgePolicy::Bounce => {
            // Invert the normal component, preserve speed, settle inside.
            match edge {
                Edge::Left | Edge::Right => entity.vel.x = -entity.vel.x,
                Edge::Top | Edge::Bottom => entity.vel.y = -entity.vel.y,
            }
            clamp_to_edge(entity, edge, width, height, half);
            events.push(GameEvent::WallBounce { id: entity.id, edge });
        }
        EdgePolicy::Wrap => match edge {
            Edge::Left => entity.pos.x += width,
            Edge::Right => entity.pos.x -= width,
            Edge::Top => entity.pos.y += height,
            Edge::Bottom => entity.pos.y -= height,
        },
        EdgePolicy::Remove => {
            // Removed only once fully past the edge (a Pong ball scores
            // when it has left the court entirely).
            let gone = match edge {
                Edge::Left => entity.pos.x + half.x < 0.0,
                Edge::Right => entity.pos.x - half.x > width,
                Edge::Top => entity.pos.y + half.y < 0.0,
                Edge::Bottom => entity.pos.y - half.y > height,
            };
            if gone {
                entity.alive = false;
                events.push(GameEvent::OffWorld { id: entity.id, kind: entity.kind, edge });
            }
        }
    }
}

fn clamp_to_edge(entity: &mut Entity, edge: Edge, width: f32, height: f32, half: Vec2) {
    match edge {
        Edge::Left => entity.pos.x = half.x,
        Edge::Right => entity.pos.x = width - half.x,
        Edge::Top => entity.pos.y = half.y,
        Edge::Bottom => entity.pos.y = height - half.y,
    }
}
