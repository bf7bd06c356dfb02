//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies
//!
//! A tick runs physics, then collision resolution, then entity sweep; the
//! game layer applies opponent policy and folds events into the session.

pub mod collision;
pub mod physics;
pub mod rules;
pub mod session;
pub mod tick;
pub mod world;

pub use collision::{Aabb, Contact, aabb_overlap, reflect_velocity};
pub use physics::Edge;
pub use rules::{GameEvent, Response, RuleTable};
pub use session::{GamePhase, Session, WinCondition};
pub use tick::{TickInput, advance};
pub use world::{
    Boundary, ConfigError, EdgePolicy, Entity, EntityId, EntityKind, Shape, World, WorldConfig,
};
