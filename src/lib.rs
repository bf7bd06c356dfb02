//! arcade-core - a deterministic 2D arcade game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (world, physics, collisions, game loop)
//! - `policy`: Opponent decision functions (reactive paddles, chase, minimax)
//! - `games`: Canonical per-game configuration tables built on the core
//! - `scores`: Session-local leaderboard
//!
//! The core never self-schedules: the host calls `tick` once per frame,
//! feeds discrete input, and reads back world/session state for rendering.

pub mod games;
pub mod policy;
pub mod scores;
pub mod sim;

pub use scores::HighScores;
pub use sim::{
    ConfigError, Entity, EntityId, EntityKind, GameEvent, GamePhase, RuleTable, Session, TickInput,
    World, WorldConfig,
};

/// Shared timing constants
pub mod consts {
    /// Nominal simulation rate. The canonical rulesets express speeds in
    /// pixels per tick, assuming a 60 Hz host frame callback.
    pub const TICKS_PER_SECOND: u32 = 60;

    /// Fixed timestep in tick units. Canonical game constants assume this;
    /// the physics step itself is parametric over dt.
    pub const TICK_DT: f32 = 1.0;
}
