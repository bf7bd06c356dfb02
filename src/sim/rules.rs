//! Collision response rules and game events
//!
//! Games configure a rule table keyed by entity-kind pairs; the resolver
//! walks live entity pairs in creation order and applies the matching
//! response. Everything observable comes out as `GameEvent`s for the game
//! layer to fold into scoring and phase transitions.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{aabb_overlap, deflect_velocity, entity_contact, reflect_velocity, Contact};
use super::physics::Edge;
use super::world::{Entity, EntityId, EntityKind, World};

/// Something that happened during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// An entity bounced off a world edge.
    WallBounce { id: EntityId, edge: Edge },
    /// An entity left the world through a `Remove` edge.
    OffWorld { id: EntityId, kind: EntityKind, edge: Edge },
    /// A mover reflected off another entity.
    Reflected { id: EntityId, off: EntityId },
    /// An entity took damage and survived.
    Damaged { id: EntityId, hp: i32 },
    /// An entity was destroyed; `score` is its bounty.
    Destroyed { id: EntityId, kind: EntityKind, score: u32 },
}

/// Collision response applied to a (mover, target) kind pair.
///
/// The mover is the dynamic participant (ball, projectile, creep); its
/// velocity and lifetime respond. The target is what it ran into.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Response {
    /// Reflect the mover. With `deflect: Some(strength)`, the tangential
    /// speed is set from the impact offset (paddle english) instead of
    /// mirrored.
    Reflect { deflect: Option<f32> },
    /// Reflect the mover and destroy the target, awarding its bounty
    /// (ball vs brick).
    Break,
    /// Consume the mover and damage the target (projectile vs enemy,
    /// creep vs base).
    Damage { amount: i32 },
    /// Damage the target, mover unaffected (enemy contact damage).
    Hurt { amount: i32 },
    /// Separate the mover and kill its approach velocity.
    Stop,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct Rule {
    mover: EntityKind,
    target: EntityKind,
    response: Response,
}

/// Response policy per entity-kind pair.
///
/// Kept as a small ordered list: lookups are tiny and iteration order
/// never depends on hashing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleTable {
    rules: Vec<Rule>,
}

impl RuleTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule; `mover` is the kind whose velocity/lifetime responds.
    #[must_use]
    pub fn with(mut self, mover: EntityKind, target: EntityKind, response: Response) -> Self {
        self.rules.push(Rule { mover, target, response });
        self
    }

    /// Find the response for a kind pair. Returns the response and whether
    /// the pair arrived swapped (i.e. `b` is the mover).
    fn lookup(&self, a: EntityKind, b: EntityKind) -> Option<(Response, bool)> {
        for rule in &self.rules {
            if rule.mover == a && rule.target == b {
                return Some((rule.response, false));
            }
            if rule.mover == b && rule.target == a {
                return Some((rule.response, true));
            }
        }
        None
    }
}

/// Detect and resolve all ruled collisions, in creation order.
pub fn resolve_collisions(world: &mut World, rules: &RuleTable, events: &mut Vec<GameEvent>) {
    let n = world.entities.len();
    for i in 0..n {
        for j in (i + 1)..n {
            if !world.entities[i].alive || !world.entities[j].alive {
                continue;
            }
            let Some((response, swapped)) =
                rules.lookup(world.entities[i].kind, world.entities[j].kind)
            else {
                continue;
            };
            let (mover_idx, target_idx) = if swapped { (j, i) } else { (i, j) };

            // Broad phase on bounding boxes, then the shape-exact test.
            let mover_box = world.entities[mover_idx].aabb();
            let target_box = world.entities[target_idx].aabb();
            if !aabb_overlap(&mover_box, &target_box) {
                continue;
            }

            let (mover, target) = index_pair(&mut world.entities, mover_idx, target_idx);
            let Some(contact) = entity_contact(mover, target) else {
                continue;
            };
            apply_response(mover, target, response, &contact, events);
        }
    }
}

/// Mutable access to two distinct entities.
fn index_pair(entities: &mut [Entity], a: usize, b: usize) -> (&mut Entity, &mut Entity) {
    debug_assert_ne!(a, b);
    if a < b {
        let (left, right) = entities.split_at_mut(b);
        (&mut left[a], &mut right[0])
    } else {
        let (left, right) = entities.split_at_mut(a);
        (&mut right[0], &mut left[b])
    }
}

fn apply_response(
    mover: &mut Entity,
    target: &mut Entity,
    response: Response,
    contact: &Contact,
    events: &mut Vec<GameEvent>,
) {
    // Reflections only trigger while closing in, so a ball already heading
    // away can't double-bounce off the same surface.
    let approaching = mover.vel.dot(contact.normal) < 0.0;

    match response {
        Response::Reflect { deflect } => {
            if !approaching {
                return;
            }
            mover.pos += contact.normal * contact.penetration;
            mover.vel = match deflect {
                Some(strength) => {
                    let offset = impact_offset(mover, target, contact.normal);
                    deflect_velocity(mover.vel, contact.normal, offset, strength)
                }
                None => reflect_velocity(mover.vel, contact.normal),
            };
            events.push(GameEvent::Reflected { id: mover.id, off: target.id });
        }
        Response::Break => {
            if approaching {
                mover.pos += contact.normal * contact.penetration;
                mover.vel = reflect_velocity(mover.vel, contact.normal);
            }
            target.alive = false;
            events.push(GameEvent::Destroyed {
                id: target.id,
                kind: target.kind,
                score: target.bounty,
            });
        }
        Response::Damage { amount } => {
            mover.alive = false;
            damage(target, amount, events);
        }
        Response::Hurt { amount } => {
            damage(target, amount, events);
        }
        Response::Stop => {
            if approaching {
                mover.pos += contact.normal * contact.penetration;
                mover.vel -= contact.normal * mover.vel.dot(contact.normal);
            }
        }
    }
}

/// Signed impact position along the target's surface, in [-1, 1].
fn impact_offset(mover: &Entity, target: &Entity, normal: Vec2) -> f32 {
    let tangent = Vec2::new(-normal.y, normal.x);
    let half = target.shape.half_extents();
    let span = half.x * tangent.x.abs() + half.y * tangent.y.abs();
    if span > 1e-4 {
        (((mover.pos - target.pos).dot(tangent)) / span).clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

fn damage(target: &mut Entity, amount: i32, events: &mut Vec<GameEvent>) {
    target.hp -= amount;
    if target.hp <= 0 {
        target.alive = false;
        events.push(GameEvent::Destroyed {
            id: target.id,
            kind: target.kind,
            score: target.bounty,
        });
    } else {
        events.push(GameEvent::Damaged { id: target.id, hp: target.hp });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::world::{Shape, WorldConfig};

    const BALL: EntityKind = EntityKind(1);
    const BRICK: EntityKind = EntityKind(2);
    const SHOT: EntityKind = EntityKind(3);
    const CREEP: EntityKind = EntityKind(4);

    fn world() -> World {
        World::new(WorldConfig { width: 800.0, height: 600.0, seed: 1 }).unwrap()
    }

    #[test]
    fn break_destroys_target_and_awards_bounty() {
        let mut w = world();
        let ball = {
            let e = w.spawn(BALL, Vec2::new(50.0, 106.0), Shape::Circle { radius: 8.0 }).unwrap();
            e.vel = Vec2::new(0.0, -4.0);
            e.id
        };
        {
            let e = w.spawn(BRICK, Vec2::new(50.0, 90.0), Shape::Rect { w: 75.0, h: 20.0 }).unwrap();
            e.bounty = 10;
        }

        let rules = RuleTable::new().with(BALL, BRICK, Response::Break);
        let mut events = Vec::new();
        resolve_collisions(&mut w, &rules, &mut events);

        assert!(matches!(events[0], GameEvent::Destroyed { score: 10, .. }));
        assert!(!w.entities[1].alive);
        // Ball reflected downward, away from the brick row.
        assert!(w.get(ball).unwrap().vel.y > 0.0);
    }

    #[test]
    fn damage_consumes_shot_and_kills_at_zero_hp() {
        let rules = RuleTable::new().with(SHOT, CREEP, Response::Damage { amount: 20 });
        let mut w = world();
        let shot = {
            let e = w.spawn(SHOT, Vec2::new(100.0, 100.0), Shape::Circle { radius: 3.0 }).unwrap();
            e.vel = Vec2::new(6.0, 0.0);
            e.id
        };
        let creep = {
            let e = w.spawn(CREEP, Vec2::new(104.0, 100.0), Shape::Circle { radius: 8.0 }).unwrap();
            e.hp = 40;
            e.bounty = 15;
            e.id
        };

        let mut events = Vec::new();
        resolve_collisions(&mut w, &rules, &mut events);
        assert!(!w.get(shot).unwrap().alive);
        assert_eq!(w.get(creep).unwrap().hp, 20);
        assert!(matches!(events[0], GameEvent::Damaged { hp: 20, .. }));

        // Second shot finishes it.
        w.sweep();
        let e = w.spawn(SHOT, Vec2::new(104.0, 100.0), Shape::Circle { radius: 3.0 }).unwrap();
        e.vel = Vec2::new(6.0, 0.0);
        events.clear();
        resolve_collisions(&mut w, &rules, &mut events);
        assert!(matches!(events[0], GameEvent::Destroyed { score: 15, .. }));
    }

    #[test]
    fn lookup_matches_swapped_pair_order() {
        let rules = RuleTable::new().with(BALL, BRICK, Response::Break);
        assert_eq!(rules.lookup(BRICK, BALL), Some((Response::Break, true)));
        assert_eq!(rules.lookup(BALL, BRICK), Some((Response::Break, false)));
        assert_eq!(rules.lookup(BALL, SHOT), None);
    }

    #[test]
    fn resolution_runs_in_creation_order() {
        // Contact damage leaves the mover in place, so both overlapping
        // targets are hit within one tick, in id order.
        let rules = RuleTable::new().with(BALL, BRICK, Response::Hurt { amount: 1 });
        let mut w = world();
        {
            let e = w.spawn(BALL, Vec2::new(50.0, 100.0), Shape::Circle { radius: 8.0 }).unwrap();
            e.vel = Vec2::new(0.0, -4.0);
        }
        let b1 = w.spawn(BRICK, Vec2::new(50.0, 92.0), Shape::Rect { w: 75.0, h: 20.0 }).unwrap().id;
        let b2 = w.spawn(BRICK, Vec2::new(52.0, 92.0), Shape::Rect { w: 75.0, h: 20.0 }).unwrap().id;

        let mut events = Vec::new();
        resolve_collisions(&mut w, &rules, &mut events);
        let ids: Vec<EntityId> = events
            .iter()
            .filter_map(|e| match e {
                GameEvent::Destroyed { id, .. } => Some(*id),
                _ => None,
            })
            .collect();
        assert_eq!(ids, vec![b1, b2]);
    }

    #[test]
    fn stop_zeroes_approach_velocity() {
        let rules = RuleTable::new().with(BALL, BRICK, Response::Stop);
        let mut w = world();
        {
            let e = w.spawn(BALL, Vec2::new(50.0, 106.0), Shape::Circle { radius: 8.0 }).unwrap();
            e.vel = Vec2::new(2.0, -4.0);
        }
        w.spawn(BRICK, Vec2::new(50.0, 90.0), Shape::Rect { w: 75.0, h: 20.0 }).unwrap();

        let mut events = Vec::new();
        resolve_collisions(&mut w, &rules, &mut events);
        let ball = &w.entities[0];
        assert_eq!(ball.vel.y, 0.0);
        assert_eq!(ball.vel.x, 2.0);
        assert!(events.is_empty());
    }
}
