//! Canonical tower defense
//!
//! A base at the center of a 900x700 field, player-placed towers, and
//! creeps spawning on the rim in scaling waves. Towers fire at the
//! nearest creep in range; creeps chase the base and trade themselves
//! for base hit points on contact. Endless: the run lasts until the
//! base falls.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use crate::consts::TICK_DT;
use crate::policy::reactive::{FireAction, chase_velocity, select_target};
use crate::sim::rules::{GameEvent, Response, RuleTable};
use crate::sim::session::{GamePhase, Session, WinCondition};
use crate::sim::tick::{TickInput, advance};
use crate::sim::world::{
    Boundary, ConfigError, EdgePolicy, EntityId, EntityKind, Shape, World, WorldConfig,
};

pub const WIDTH: f32 = 900.0;
pub const HEIGHT: f32 = 700.0;
pub const BASE_RADIUS: f32 = 50.0;
pub const BASE_HP: i32 = 100;
pub const TOWER_RADIUS: f32 = 12.0;
pub const TOWER_RANGE: f32 = 120.0;
/// Ticks between tower shots (800 ms at 60 Hz).
pub const TOWER_PERIOD: u64 = 48;
pub const TOWER_DAMAGE: i32 = 20;
pub const SHOT_RADIUS: f32 = 3.0;
pub const SHOT_SPEED: f32 = 6.0;
pub const CREEP_RADIUS: f32 = 8.0;
/// Base hit points a creep trades itself for.
pub const CREEP_CONTACT_DAMAGE: i32 = 10;
/// Ticks between creep spawns within a wave.
pub const SPAWN_INTERVAL: u32 = 45;
/// Creeps spawn on this rim around the base, outside the visible field.
pub const SPAWN_RADIUS: f32 = 480.0;

pub const BASE: EntityKind = EntityKind(1);
pub const TOWER: EntityKind = EntityKind(2);
pub const CREEP: EntityKind = EntityKind(3);
pub const SHOT: EntityKind = EntityKind(4);

/// Per-wave creep scaling.
fn creep_hp(wave: u32) -> i32 {
    40 + 8 * wave as i32
}

fn creep_speed(wave: u32) -> f32 {
    1.2 + 0.05 * wave as f32
}

fn creep_bounty(wave: u32) -> u32 {
    15 + 3 * wave
}

fn wave_size(wave: u32) -> u32 {
    wave * 5 + 5
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct Tower {
    id: EntityId,
    next_fire: u64,
}

/// A tower-defense run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Defense {
    pub world: World,
    pub session: Session,
    rules: RuleTable,
    base: EntityId,
    towers: Vec<Tower>,
    pub wave: u32,
    to_spawn: u32,
    spawn_cooldown: u32,
}

impl Defense {
    pub fn new(seed: u64) -> Result<Self, ConfigError> {
        let mut world = World::new(WorldConfig { width: WIDTH, height: HEIGHT, seed })?;

        let base = {
            let e = world.spawn(BASE, center(), Shape::Circle { radius: BASE_RADIUS })?;
            e.hp = BASE_HP;
            e.id
        };

        let rules = RuleTable::new()
            .with(SHOT, CREEP, Response::Damage { amount: TOWER_DAMAGE })
            .with(CREEP, BASE, Response::Damage { amount: CREEP_CONTACT_DAMAGE });

        Ok(Self {
            world,
            session: Session::new(1, WinCondition::Endless),
            rules,
            base,
            towers: Vec::new(),
            wave: 0,
            to_spawn: 0,
            spawn_cooldown: 0,
        })
    }

    /// Place a tower. Allowed at any phase; placement range checks are the
    /// host's concern.
    pub fn place_tower(&mut self, pos: Vec2) -> Result<EntityId, ConfigError> {
        let id = self.world.spawn(TOWER, pos, Shape::Circle { radius: TOWER_RADIUS })?.id;
        self.towers.push(Tower { id, next_fire: 0 });
        Ok(id)
    }

    /// Reset the field (towers stay) and begin at wave 1.
    pub fn start(&mut self) -> Result<(), ConfigError> {
        self.session = Session::new(1, WinCondition::Endless);
        self.session.start();
        for entity in &mut self.world.entities {
            if entity.kind == CREEP || entity.kind == SHOT {
                entity.alive = false;
            }
        }
        self.world.sweep();
        match self.world.get_mut(self.base) {
            Some(base) => base.hp = BASE_HP,
            // The previous base fell and was swept; its id is retired.
            None => {
                let e = self.world.spawn(BASE, center(), Shape::Circle { radius: BASE_RADIUS })?;
                e.hp = BASE_HP;
                self.base = e.id;
            }
        }
        self.wave = 1;
        self.to_spawn = wave_size(self.wave);
        self.spawn_cooldown = 0;
        log::info!("defense: wave {} incoming, {} creeps", self.wave, self.to_spawn);
        Ok(())
    }

    /// Advance one tick.
    pub fn tick(&mut self, input: &TickInput) {
        if input.start
            && matches!(self.session.phase, GamePhase::Menu | GamePhase::GameOver | GamePhase::Won)
        {
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

        let events = advance(&mut self.world, &self.rules, TICK_DT);

        self.steer_creeps();
        self.fire_towers();
        self.spawn_creeps();

        self.session.apply_events(&events);
        for event in &events {
            if let GameEvent::Destroyed { kind, .. } = event {
                if *kind == BASE {
                    self.session.phase = GamePhase::GameOver;
                    log::info!(
                        "defense: base destroyed on wave {} with score {}",
                        self.wave,
                        self.session.score
                    );
                    return;
                }
            }
        }

        self.advance_wave();
    }

    /// Chase policy: every creep re-aims at the base, keeping its speed.
    fn steer_creeps(&mut self) {
        let target = center();
        for creep in self.world.entities.iter_mut().filter(|e| e.alive && e.kind == CREEP) {
            creep.vel = chase_velocity(creep.pos, target, creep.vel.length());
        }
    }

    /// Each ready tower fires at the nearest creep in range.
    fn fire_towers(&mut self) {
        let now = self.world.tick;
        for tower in &mut self.towers {
            if now < tower.next_fire {
                continue;
            }
            let Some(tower_pos) = self.world.get(tower.id).map(|e| e.pos) else { continue };
            let FireAction::Fire(target) = select_target(&self.world, tower_pos, CREEP, TOWER_RANGE)
            else {
                continue;
            };
            let Some(target_pos) = self.world.get(target).map(|e| e.pos) else { continue };
            if let Ok(shot) = self.world.spawn(SHOT, tower_pos, Shape::Circle { radius: SHOT_RADIUS })
            {
                shot.vel = chase_velocity(tower_pos, target_pos, SHOT_SPEED);
                shot.boundary = Boundary::all(EdgePolicy::Remove);
                tower.next_fire = now + TOWER_PERIOD;
            }
        }
    }

    /// Wave spawning on a fixed cadence, rim position from the run RNG.
    fn spawn_creeps(&mut self) {
        if self.to_spawn == 0 {
            return;
        }
        if self.spawn_cooldown > 0 {
            self.spawn_cooldown -= 1;
            return;
        }
        let angle = self.world.rng.random_range(0.0..TAU);
        let pos = center() + Vec2::new(angle.cos(), angle.sin()) * SPAWN_RADIUS;
        if let Ok(creep) = self.world.spawn(CREEP, pos, Shape::Circle { radius: CREEP_RADIUS }) {
            creep.hp = creep_hp(self.wave);
            creep.bounty = creep_bounty(self.wave);
            creep.vel = chase_velocity(pos, center(), creep_speed(self.wave));
            self.to_spawn -= 1;
            self.spawn_cooldown = SPAWN_INTERVAL;
        }
    }

    /// Next wave once the field is clear.
    fn advance_wave(&mut self) {
        if self.to_spawn == 0 && self.world.count_of_kind(CREEP) == 0 {
            self.wave += 1;
            self.to_spawn = wave_size(self.wave);
            self.spawn_cooldown = 0;
            log::info!("defense: wave {} incoming, {} creeps", self.wave, self.to_spawn);
        }
    }

    pub fn base_hp(&self) -> i32 {
        self.world.get(self.base).map(|e| e.hp).unwrap_or(0)
    }

    pub fn creeps_left(&self) -> u32 {
        self.to_spawn + self.world.count_of_kind(CREEP) as u32
    }
}

fn center() -> Vec2 {
    Vec2::new(WIDTH / 2.0, HEIGHT / 2.0)
}
