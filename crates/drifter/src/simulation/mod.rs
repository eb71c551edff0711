//! # Simulation Context
//!
//! Everything the tick mutates lives in one [`SimulationContext`] owned by
//! the loop driver. There are no globals.
//!
//! ## Tick Order
//!
//! ```text
//! input -> velocity      (flight::steer)
//! camera                 (player pos - viewport / 2)
//! streaming              (WorldManager::update_chunks)
//! integration            (flight::integrate)
//! magnetism & pickup     (cargo::collect)
//! mining laser           (laser::find_target + effects)
//! particles              (Particle::advance)
//! cleanup                (retain live entities and particles)
//! ```
//!
//! Movement is in per-tick units. Only particle life uses `dt`.

pub mod cargo;
pub mod effects;
pub mod flight;
pub mod laser;

use drifter_core::{Entity, EntityId, EntityKind, Particle, ResourceKind, Vec2};
use drifter_economy::{market, GameState};
use drifter_procedural::{WorldManager, WorldManagerConfig, WorldSeed, WorldStats};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::input::TickInput;

/// Largest `dt` a single tick accepts.
pub const MAX_TICK_DT: f32 = 0.1;

/// Physics, laser and effect tuning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Velocity multiplier applied every tick.
    pub friction: f32,
    /// Reverse thrust as a fraction of engine speed.
    pub reverse_thrust: f32,
    /// Asteroid spin per tick, in radians.
    pub asteroid_spin: f32,
    /// Distance at which drops start drifting toward the ship.
    pub magnet_radius: f32,
    /// Velocity added to an attracted drop per tick.
    pub magnet_pull: f32,
    /// Minimum `dot(heading, direction)` for a laser hit.
    pub laser_cone: f32,
    /// Sparks per laser hit.
    pub spark_count: u32,
    /// Particles per destroyed asteroid.
    pub explosion_count: u32,
    /// Upper bound of drops per destroyed asteroid.
    pub max_drops: u32,
    /// Docking reach beyond the hub radius.
    pub dock_margin: f32,
    /// Where the ship is parked when docked.
    pub dock_offset: Vec2,
    /// Chunks streamed on each side of the player's chunk.
    pub view_radius: i32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            friction: 0.98,
            reverse_thrust: 0.5,
            asteroid_spin: 0.005,
            magnet_radius: 150.0,
            magnet_pull: 1.0,
            laser_cone: 0.9,
            spark_count: 3,
            explosion_count: 10,
            max_drops: 3,
            dock_margin: 50.0,
            dock_offset: Vec2::new(0.0, -80.0),
            view_radius: 1,
        }
    }
}

/// An asteroid the laser finished off this tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DestroyedAsteroid {
    /// Its id.
    pub id: EntityId,
    /// Ore it carried, if any.
    pub resource: Option<ResourceKind>,
    /// Drops spawned.
    pub drops: u32,
    /// Score value.
    pub score: u32,
}

/// What happened during one tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickReport {
    /// Resource units stowed.
    pub collected: u32,
    /// Asteroids destroyed.
    pub destroyed: Vec<DestroyedAsteroid>,
    /// Streaming counters.
    pub world: WorldStats,
    /// The asteroid under the beam, if any.
    pub laser_target: Option<EntityId>,
    /// True if the tick was skipped for lack of a player entity.
    pub player_missing: bool,
}

impl TickReport {
    /// True if the persistent state changed and observers need a snapshot.
    #[inline]
    #[must_use]
    pub fn state_changed(&self) -> bool {
        self.collected > 0
    }
}

/// The mutable world the tick operates on.
pub struct SimulationContext {
    /// Live entities. The player and hub are among them.
    pub entities: Vec<Entity>,
    /// Live particles.
    pub particles: Vec<Particle>,
    /// Persistent game state.
    pub state: GameState,
    /// Top-left corner of the view in world space.
    pub camera: Vec2,
    /// View size in pixels.
    pub viewport: Vec2,
    world: WorldManager,
    config: SimConfig,
    rng: ChaCha8Rng,
    laser_active: bool,
    thrusting: bool,
}

impl SimulationContext {
    /// Builds a context with the player at `state.position` and the hub at
    /// the origin.
    #[must_use]
    pub fn new(state: GameState, config: SimConfig, world_seed: WorldSeed, viewport: Vec2, rng_seed: u64) -> Self {
        let player = Entity::player(state.position);
        let camera = player.pos - viewport * 0.5;
        let world = WorldManager::new(
            world_seed,
            WorldManagerConfig {
                view_radius: config.view_radius,
            },
        );
        info!(x = state.position.x, y = state.position.y, seed = world_seed.value(), "simulation ready");
        Self {
            entities: vec![player, Entity::hub()],
            particles: Vec::new(),
            state,
            camera,
            viewport,
            world,
            config,
            rng: ChaCha8Rng::seed_from_u64(rng_seed),
            laser_active: false,
            thrusting: false,
        }
    }

    /// Active tuning.
    #[must_use]
    pub const fn config(&self) -> &SimConfig {
        &self.config
    }

    /// The streaming manager.
    #[must_use]
    pub const fn world(&self) -> &WorldManager {
        &self.world
    }

    /// Index of the player entity.
    #[must_use]
    pub fn player_index(&self) -> Option<usize> {
        self.entities.iter().position(|e| e.kind == EntityKind::Player)
    }

    /// The player entity.
    #[must_use]
    pub fn player(&self) -> Option<&Entity> {
        self.entities.iter().find(|e| e.kind == EntityKind::Player)
    }

    fn hub(&self) -> Option<&Entity> {
        self.entities.iter().find(|e| e.kind == EntityKind::Hub)
    }

    /// True while the laser fired on the last tick.
    #[inline]
    #[must_use]
    pub const fn laser_active(&self) -> bool {
        self.laser_active
    }

    /// True while forward thrust was held on the last tick.
    #[inline]
    #[must_use]
    pub const fn thrusting(&self) -> bool {
        self.thrusting
    }

    /// Advances the world by one tick.
    ///
    /// `dt` is clamped to `[0, MAX_TICK_DT]`. Without a player entity the
    /// tick does nothing.
    pub fn step(&mut self, input: TickInput, dt: f32) -> TickReport {
        let dt = if dt.is_finite() { dt.clamp(0.0, MAX_TICK_DT) } else { 0.0 };
        let mut report = TickReport::default();

        let Some(index) = self.player_index() else {
            debug!("no player entity, tick skipped");
            report.player_missing = true;
            return report;
        };

        let stats = self.state.player;
        flight::steer(&mut self.entities[index], &input, &stats, &self.config);
        self.thrusting = input.thrust_forward;
        self.laser_active = input.fire_laser;

        let player_pos = self.entities[index].pos;
        self.camera = player_pos - self.viewport * 0.5;

        report.world = self.world.update_chunks(&mut self.entities, player_pos);
        flight::integrate(&mut self.entities, self.config.asteroid_spin);

        // Streaming may have shifted the player's index.
        let Some(index) = self.player_index() else {
            report.player_missing = true;
            return report;
        };
        let ship = &self.entities[index];
        let (ship_pos, ship_radius, heading) = (ship.pos, ship.radius, Vec2::from_angle(ship.angle));

        report.collected = cargo::collect(&mut self.entities, ship_pos, ship_radius, &mut self.state, &self.config);

        if self.laser_active {
            self.fire_laser(ship_pos, heading, &mut report);
        }

        for particle in &mut self.particles {
            particle.advance(dt);
        }

        self.entities.retain(|e| !e.is_removed());
        self.particles.retain(|p| !p.is_expired());

        if report.collected > 0 || !report.destroyed.is_empty() {
            debug!(
                collected = report.collected,
                destroyed = report.destroyed.len(),
                entities = self.entities.len(),
                "tick"
            );
        }
        report
    }

    fn fire_laser(&mut self, origin: Vec2, heading: Vec2, report: &mut TickReport) {
        let stats = self.state.player;
        let Some(target) = laser::find_target(&self.entities, origin, heading, stats.laser_range, self.config.laser_cone)
        else {
            return;
        };

        let asteroid = &mut self.entities[target];
        let destroyed = asteroid.apply_damage(stats.laser_power);
        let (id, at, radius, resource, score) =
            (asteroid.id, asteroid.pos, asteroid.radius, asteroid.resource, asteroid.score_value);
        report.laser_target = Some(id);

        effects::spawn_sparks(&mut self.particles, &mut self.rng, at, radius, self.config.spark_count);

        if !destroyed {
            return;
        }
        let drops = resource.map_or(0, |kind| {
            effects::spawn_drops(&mut self.entities, &mut self.rng, at, kind, self.config.max_drops)
        });
        effects::spawn_explosion(&mut self.particles, &mut self.rng, at, self.config.explosion_count);
        report.destroyed.push(DestroyedAsteroid {
            id,
            resource,
            drops,
            score: score.unwrap_or(Entity::ASTEROID_SCORE),
        });
    }

    /// True if the ship is close enough to the hub to dock.
    #[must_use]
    pub fn in_docking_range(&self) -> bool {
        match (self.player(), self.hub()) {
            (Some(player), Some(hub)) => player.pos.distance(hub.pos) < hub.radius + self.config.dock_margin,
            _ => false,
        }
    }

    /// Docks if the ship is in range of the hub.
    ///
    /// Heals the hull and parks the ship at the docking offset, facing
    /// down, at rest. The persisted position follows. Returns `false` and
    /// changes nothing when out of range.
    pub fn try_dock(&mut self) -> bool {
        if !self.in_docking_range() {
            return false;
        }
        let Some(index) = self.player_index() else {
            return false;
        };

        let offset = self.config.dock_offset;
        let player = &mut self.entities[index];
        player.pos = offset;
        player.vel = Vec2::ZERO;
        player.angle = std::f32::consts::FRAC_PI_2;

        market::dock_repair(&mut self.state);
        self.state.position = offset;
        self.camera = offset - self.viewport * 0.5;
        self.laser_active = false;
        self.thrusting = false;
        info!(hull = self.state.player.current_hull, "docked");
        true
    }

    /// Copies the player's world position into the persistent state.
    pub fn sync_position(&mut self) {
        if let Some(pos) = self.player().map(|p| p.pos) {
            self.state.position = pos;
        }
    }
}
