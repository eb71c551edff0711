//! # Chunk System
//!
//! World space is cut into fixed-size square chunks. A chunk's asteroids are
//! a pure function of its coordinate (and the world seed), so chunks can be
//! discarded freely and regenerated on demand.
//!
//! ## Chunk Contents
//!
//! - Chunk (0, 0) holds the station and never contains asteroids.
//! - Every other chunk holds 5 to 14 asteroids placed uniformly inside it.
//! - Asteroid tier grows by one every 10 000 units from the origin (max 3);
//!   tier sets health and unlocks rarer ores.

use std::f64::consts::TAU;

use drifter_core::{Entity, ResourceKind, Vec2};
use tracing::trace;

use crate::noise::{noise, WorldSeed};

/// Chunk width/height in world units.
pub const CHUNK_SIZE: f32 = 2000.0;

/// Distance from the origin covered by each tier.
pub const TIER_DISTANCE: f32 = 10_000.0;

/// Highest asteroid tier.
pub const MAX_TIER: u8 = 3;

const SEED_X: i64 = 73_856_093;
const SEED_Y: i64 = 19_349_663;
const ASTEROID_STRIDE: i64 = 1337;

const MIN_ASTEROIDS: usize = 5;
const ASTEROID_SPREAD: f64 = 10.0;
const MIN_RADIUS: f64 = 20.0;
const RADIUS_SPREAD: f64 = 30.0;
const DRIFT_SCALE: f64 = 0.5;
const BASE_HEALTH: f32 = 50.0;
const HEALTH_PER_TIER: f32 = 50.0;

/// Chunk coordinate (identifies a chunk in the world grid).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChunkCoord {
    /// X coordinate (in chunks, not world units).
    pub x: i32,
    /// Y coordinate (in chunks, not world units).
    pub y: i32,
}

impl ChunkCoord {
    /// The chunk reserved for the station hub.
    pub const HUB: Self = Self::new(0, 0);

    /// Creates a new chunk coordinate.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The chunk containing a world position (floor division).
    #[inline]
    #[must_use]
    pub fn from_world_pos(pos: Vec2) -> Self {
        Self {
            x: (pos.x / CHUNK_SIZE).floor() as i32,
            y: (pos.y / CHUNK_SIZE).floor() as i32,
        }
    }

    /// World position of the chunk's top-left corner.
    #[inline]
    #[must_use]
    pub fn origin(self) -> Vec2 {
        Vec2::new(self.x as f32 * CHUNK_SIZE, self.y as f32 * CHUNK_SIZE)
    }

    /// Chebyshev (king-move) distance to another chunk.
    #[inline]
    #[must_use]
    pub fn chebyshev_distance(self, other: Self) -> u32 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }

    /// True for the station chunk.
    #[inline]
    #[must_use]
    pub const fn is_hub(self) -> bool {
        self.x == 0 && self.y == 0
    }

    /// Every chunk within Chebyshev `radius`, row by row.
    pub fn neighborhood(self, radius: i32) -> impl Iterator<Item = Self> {
        let radius = radius.max(0);
        (-radius..=radius).flat_map(move |dy| {
            (-radius..=radius).map(move |dx| Self::new(self.x.wrapping_add(dx), self.y.wrapping_add(dy)))
        })
    }
}

impl std::fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Tier of a position `distance` units from the origin, in `0..=MAX_TIER`.
#[inline]
#[must_use]
pub fn tier_for_distance(distance: f32) -> u8 {
    let tier = (distance / TIER_DISTANCE).floor();
    if tier >= f32::from(MAX_TIER) {
        MAX_TIER
    } else if tier > 0.0 {
        tier as u8
    } else {
        0
    }
}

/// Picks the ore of an asteroid from its tier and a `[0, 1)` roll.
///
/// Checks run from common to rare, so a roll that clears a rarer gate
/// overrides the commoner result.
#[must_use]
pub fn roll_resource(tier: u8, roll: f64) -> ResourceKind {
    let mut kind = ResourceKind::Iron;
    if tier >= 1 && roll > 0.70 {
        kind = ResourceKind::Titanium;
    }
    if tier >= 2 && roll > 0.85 {
        kind = ResourceKind::Gold;
    }
    if tier >= 3 && roll > 0.95 {
        kind = ResourceKind::Aetherium;
    }
    kind
}

/// Generates the asteroids of a chunk.
#[derive(Clone, Copy, Debug, Default)]
pub struct ChunkGenerator {
    seed: WorldSeed,
}

impl ChunkGenerator {
    /// Creates a generator for the given world seed.
    #[must_use]
    pub const fn new(seed: WorldSeed) -> Self {
        Self { seed }
    }

    /// The world seed this generator draws from.
    #[must_use]
    pub const fn seed(&self) -> WorldSeed {
        self.seed
    }

    /// Integer seed of a chunk.
    #[must_use]
    pub fn chunk_seed(&self, coord: ChunkCoord) -> i64 {
        i64::from(coord.x).wrapping_mul(SEED_X) ^ i64::from(coord.y).wrapping_mul(SEED_Y) ^ self.seed.salt()
    }

    /// Number of asteroids the chunk holds (zero for the hub chunk).
    #[must_use]
    pub fn asteroid_count(&self, coord: ChunkCoord) -> usize {
        if coord.is_hub() {
            return 0;
        }
        let draw = noise(self.chunk_seed(coord) as f64);
        MIN_ASTEROIDS + (draw * ASTEROID_SPREAD).floor() as usize
    }

    /// Generates the chunk's asteroids.
    ///
    /// Calling this twice for the same coordinate yields asteroids with
    /// different ids but identical positions, stats and ores.
    #[must_use]
    pub fn generate(&self, coord: ChunkCoord) -> Vec<Entity> {
        let mut out = Vec::with_capacity(MIN_ASTEROIDS + ASTEROID_SPREAD as usize);
        self.generate_into(coord, &mut out);
        out
    }

    /// Appends the chunk's asteroids to `out`, returning how many were added.
    pub fn generate_into(&self, coord: ChunkCoord, out: &mut Vec<Entity>) -> usize {
        let count = self.asteroid_count(coord);
        if count == 0 {
            return 0;
        }

        let chunk_seed = self.chunk_seed(coord);
        let origin = coord.origin();
        out.reserve(count);

        for i in 0..count {
            let asteroid_seed = chunk_seed.wrapping_add(i as i64 * ASTEROID_STRIDE);
            let draw = |offset: i64| noise(asteroid_seed.wrapping_add(offset) as f64);

            let pos = Vec2::new(
                origin.x + (draw(0) * f64::from(CHUNK_SIZE)) as f32,
                origin.y + (draw(1) * f64::from(CHUNK_SIZE)) as f32,
            );
            let tier = tier_for_distance(pos.length());
            let resource = roll_resource(tier, draw(2));
            let vel = Vec2::new(
                ((draw(3) - 0.5) * DRIFT_SCALE) as f32,
                ((draw(4) - 0.5) * DRIFT_SCALE) as f32,
            );
            let radius = (MIN_RADIUS + draw(5) * RADIUS_SPREAD) as f32;
            let angle = (draw(6) * TAU) as f32;
            let max_health = BASE_HEALTH + f32::from(tier) * HEALTH_PER_TIER;

            out.push(Entity::asteroid(pos, vel, radius, angle, max_health, resource));
        }

        trace!(chunk = %coord, count, "generated chunk");
        count
    }
}
