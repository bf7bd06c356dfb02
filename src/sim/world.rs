//! World and entity types
//!
//! The world is the single owner of all entities. Coordinates follow the
//! canvas convention: origin at the top-left, +y down, positions are
//! entity centers. Entities are stored sorted by id so every pass over
//! them runs in creation order.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;

/// Unique identifier for a world entity.
///
/// Allocated monotonically by the world; a removed entity's id is never
/// reused within a session.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct EntityId(pub u32);

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

/// Entity kind identifier. Games define what kinds exist.
///
/// The engine doesn't interpret kind ids - they're opaque identifiers.
/// Games assign meaning via the collision rule table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityKind(pub u16);

impl EntityKind {
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }
}

/// Collision footprint of an entity, centered on its position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Rect { w: f32, h: f32 },
    Circle { radius: f32 },
}

impl Shape {
    /// Half extents of the bounding box.
    pub fn half_extents(&self) -> Vec2 {
        match *self {
            Shape::Rect { w, h } => Vec2::new(w / 2.0, h / 2.0),
            Shape::Circle { radius } => Vec2::splat(radius),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let ok = match *self {
            Shape::Rect { w, h } => w > 0.0 && h > 0.0,
            Shape::Circle { radius } => radius > 0.0,
        };
        if ok { Ok(()) } else { Err(ConfigError::InvalidShape(*self)) }
    }
}

/// What happens when an entity's bounding box crosses a world edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EdgePolicy {
    /// Edge is permeable; nothing happens.
    #[default]
    Ignore,
    /// Position is clamped so the entity stays inside (paddles).
    Clamp,
    /// Normal velocity component is inverted, speed preserved (balls).
    Bounce,
    /// Entity reappears at the opposite edge.
    Wrap,
    /// Entity is removed and an `OffWorld` event is emitted.
    Remove,
}

/// Per-edge boundary policy. Games mix policies on one entity (a
/// Breakout ball bounces off three walls and is lost past the fourth).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Boundary {
    pub left: EdgePolicy,
    pub right: EdgePolicy,
    pub top: EdgePolicy,
    pub bottom: EdgePolicy,
}

impl Boundary {
    /// Same policy on all four edges.
    #[must_use]
    pub const fn all(policy: EdgePolicy) -> Self {
        Self { left: policy, right: policy, top: policy, bottom: policy }
    }
}

/// A world entity: anything that moves or can be hit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub shape: Shape,
    /// Hit points; entities die at 0. Defaults to 1.
    pub hp: i32,
    /// Score awarded when this entity is destroyed.
    pub bounty: u32,
    /// Constant downward acceleration (+y), units per tick squared.
    pub gravity: f32,
    /// Speed increase along the current heading, units per tick squared.
    pub accel: f32,
    pub boundary: Boundary,
    /// Cleared by collision responses; swept at end of tick.
    pub alive: bool,
}

impl Entity {
    fn new(id: EntityId, kind: EntityKind, pos: Vec2, shape: Shape) -> Self {
        Self {
            id,
            kind,
            pos,
            vel: Vec2::ZERO,
            shape,
            hp: 1,
            bounty: 0,
            gravity: 0.0,
            accel: 0.0,
            boundary: Boundary::default(),
            alive: true,
        }
    }

    /// Bounding box at the current position.
    pub fn aabb(&self) -> Aabb {
        Aabb::from_center(self.pos, self.shape.half_extents())
    }

    pub fn speed(&self) -> f32 {
        self.vel.length()
    }
}

/// Invalid construction-time configuration.
///
/// The only error class in the crate: gameplay conditions (illegal move,
/// full board, lost ball) are state transitions, never errors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    InvalidWorldSize { width: f32, height: f32 },
    InvalidShape(Shape),
    InvalidBoard { cols: usize, rows: usize },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            ConfigError::InvalidWorldSize { width, height } => {
                write!(f, "world dimensions must be positive, got {width}x{height}")
            }
            ConfigError::InvalidShape(shape) => {
                write!(f, "entity shape must have positive extent, got {shape:?}")
            }
            ConfigError::InvalidBoard { cols, rows } => {
                write!(f, "board dimensions must be non-zero, got {cols}x{rows}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// World construction parameters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WorldConfig {
    pub width: f32,
    pub height: f32,
    /// Run seed; all in-world randomness derives from it.
    pub seed: u64,
}

impl WorldConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.width > 0.0 && self.height > 0.0 {
            Ok(())
        } else {
            Err(ConfigError::InvalidWorldSize { width: self.width, height: self.height })
        }
    }
}

/// Fixed-size 2D coordinate space holding all entities.
///
/// Mutated only inside a tick; the host reads it as a snapshot between
/// ticks (serializable for save/replay).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub width: f32,
    pub height: f32,
    /// Run seed for reproducibility.
    pub seed: u64,
    /// Advancing RNG state; serialized so restores replay identically.
    pub rng: Pcg32,
    /// Simulation tick counter.
    pub tick: u64,
    /// All entities, sorted by id for deterministic iteration.
    pub entities: Vec<Entity>,
    next_id: u32,
}

impl World {
    pub fn new(config: WorldConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            width: config.width,
            height: config.height,
            seed: config.seed,
            rng: Pcg32::seed_from_u64(config.seed),
            tick: 0,
            entities: Vec::new(),
            next_id: 1,
        })
    }

    /// Spawn an entity and return it for in-place configuration.
    ///
    /// Rejects non-positive shapes; spawning outside the bounds is a normal
    /// condition handled by the entity's boundary policy on the next tick.
    pub fn spawn(
        &mut self,
        kind: EntityKind,
        pos: Vec2,
        shape: Shape,
    ) -> Result<&mut Entity, ConfigError> {
        shape.validate()?;
        let id = EntityId(self.next_id);
        self.next_id += 1;
        let idx = self.entities.len();
        self.entities.push(Entity::new(id, kind, pos, shape));
        Ok(&mut self.entities[idx])
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    /// Live entities of one kind, in creation order.
    pub fn alive_of_kind(&self, kind: EntityKind) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(move |e| e.alive && e.kind == kind)
    }

    pub fn count_of_kind(&self, kind: EntityKind) -> usize {
        self.alive_of_kind(kind).count()
    }

    /// Drop dead entities. Creation order of survivors is preserved and
    /// their ids stay retired forever.
    pub(crate) fn sweep(&mut self) {
        self.entities.retain(|e| e.alive);
    }
}
