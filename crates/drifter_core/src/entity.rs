//! # Entity Management
//!
//! Entities are small value types stored in a dense list owned by the
//! simulation. Identity is a 64-bit counter; it is unique per process but
//! deliberately not deterministic, so regenerating a chunk yields fresh ids
//! with identical stats.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::math::Vec2;
use crate::resource::ResourceKind;

/// First id handed out by [`EntityId::fresh`]. Lower values are reserved.
const FIRST_DYNAMIC_ID: u64 = 16;

static NEXT_ID: AtomicU64 = AtomicU64::new(FIRST_DYNAMIC_ID);

/// Unique identifier for an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct EntityId(u64);

impl EntityId {
    /// Reserved id of the player ship.
    pub const PLAYER: Self = Self(1);

    /// Reserved id of the station hub.
    pub const HUB: Self = Self(2);

    /// Allocates a new, never before used id.
    #[inline]
    #[must_use]
    pub fn fresh() -> Self {
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw id value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The type tag of an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// The player-controlled ship.
    Player,
    /// The station at the world origin.
    Hub,
    /// A minable rock.
    Asteroid,
    /// A floating resource drop waiting to be collected.
    Resource,
}

impl EntityKind {
    /// True for kinds that survive any amount of distance from the player.
    #[inline]
    #[must_use]
    pub const fn is_persistent(self) -> bool {
        matches!(self, Self::Player | Self::Hub | Self::Resource)
    }
}

/// A simulated world object.
#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    /// Unique identifier.
    pub id: EntityId,
    /// Type tag.
    pub kind: EntityKind,
    /// World-space position.
    pub pos: Vec2,
    /// Velocity in world units per tick.
    pub vel: Vec2,
    /// Collision radius.
    pub radius: f32,
    /// Orientation in radians.
    pub angle: f32,
    /// Current health (asteroids only).
    pub health: Option<f32>,
    /// Maximum health (asteroids only).
    pub max_health: Option<f32>,
    /// Resource carried (asteroids and resource drops).
    pub resource: Option<ResourceKind>,
    /// Score awarded on destruction.
    pub score_value: Option<u32>,
    removed: bool,
}

impl Entity {
    /// Player radius.
    pub const PLAYER_RADIUS: f32 = 10.0;
    /// Hub radius.
    pub const HUB_RADIUS: f32 = 60.0;
    /// Resource drop radius.
    pub const RESOURCE_RADIUS: f32 = 5.0;
    /// Score value of every asteroid.
    pub const ASTEROID_SCORE: u32 = 10;

    fn base(id: EntityId, kind: EntityKind, pos: Vec2, radius: f32) -> Self {
        Self {
            id,
            kind,
            pos,
            vel: Vec2::ZERO,
            radius,
            angle: 0.0,
            health: None,
            max_health: None,
            resource: None,
            score_value: None,
            removed: false,
        }
    }

    /// The player ship at `pos`, facing up the screen.
    #[must_use]
    pub fn player(pos: Vec2) -> Self {
        let mut player = Self::base(EntityId::PLAYER, EntityKind::Player, pos, Self::PLAYER_RADIUS);
        player.angle = -std::f32::consts::FRAC_PI_2;
        player
    }

    /// The station hub at the world origin.
    #[must_use]
    pub fn hub() -> Self {
        Self::base(EntityId::HUB, EntityKind::Hub, Vec2::ZERO, Self::HUB_RADIUS)
    }

    /// An asteroid at full health.
    #[must_use]
    pub fn asteroid(
        pos: Vec2,
        vel: Vec2,
        radius: f32,
        angle: f32,
        max_health: f32,
        resource: ResourceKind,
    ) -> Self {
        let mut asteroid = Self::base(EntityId::fresh(), EntityKind::Asteroid, pos, radius);
        asteroid.vel = vel;
        asteroid.angle = angle;
        asteroid.health = Some(max_health);
        asteroid.max_health = Some(max_health);
        asteroid.resource = Some(resource);
        asteroid.score_value = Some(Self::ASTEROID_SCORE);
        asteroid
    }

    /// A resource drop of `resource` drifting with `vel`.
    #[must_use]
    pub fn resource_drop(pos: Vec2, vel: Vec2, resource: ResourceKind) -> Self {
        let mut drop = Self::base(EntityId::fresh(), EntityKind::Resource, pos, Self::RESOURCE_RADIUS);
        drop.vel = vel;
        drop.resource = Some(resource);
        drop
    }

    /// Flags the entity for removal on the next cleanup pass.
    #[inline]
    pub fn mark_removed(&mut self) {
        self.removed = true;
    }

    /// True once the entity has been flagged for removal.
    #[inline]
    #[must_use]
    pub const fn is_removed(&self) -> bool {
        self.removed
    }

    /// Subtracts `amount` from health.
    ///
    /// Returns `true` if this hit destroyed the entity, in which case it is
    /// also marked for removal. Entities without health, or already removed,
    /// are unaffected.
    pub fn apply_damage(&mut self, amount: f32) -> bool {
        if self.removed {
            return false;
        }
        let Some(health) = self.health.as_mut() else {
            return false;
        };
        *health -= amount;
        if *health <= 0.0 {
            self.removed = true;
            return true;
        }
        false
    }

    /// Seed for deterministic per-entity shape variation.
    #[inline]
    #[must_use]
    pub fn shape_seed(&self) -> f64 {
        (self.id.raw() & 0xFFFF_FFFF) as f64
    }
}
