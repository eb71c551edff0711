//! Spawning of sparks, explosions and resource drops.
//!
//! All randomness comes from the context's seeded RNG.

use drifter_core::{Color, Entity, Particle, ResourceKind, Vec2};
use rand::Rng;

/// Spark particle life.
pub const SPARK_LIFE: f32 = 1.0;
/// Spark speed per axis.
pub const SPARK_SPEED: f32 = 2.5;
/// Spark size.
pub const SPARK_SIZE: f32 = 2.0;
/// Spark colour.
pub const SPARK_COLOR: Color = Color::hex(0xFA_CC15);

/// Explosion particle life.
pub const EXPLOSION_LIFE: f32 = 2.0;
/// Explosion speed per axis.
pub const EXPLOSION_SPEED: f32 = 5.0;
/// Explosion particle size.
pub const EXPLOSION_SIZE: f32 = 4.0;
/// Explosion colour.
pub const EXPLOSION_COLOR: Color = Color::hex(0x9C_A3AF);

/// Resource drop scatter speed per axis.
pub const DROP_SCATTER: f32 = 1.0;

/// Uniform vector in `[-half, half)` on each axis.
fn jitter<R: Rng + ?Sized>(rng: &mut R, half: f32) -> Vec2 {
    Vec2::new((rng.gen::<f32>() - 0.5) * 2.0 * half, (rng.gen::<f32>() - 0.5) * 2.0 * half)
}

/// Hit sparks scattered within half the target's radius.
pub fn spawn_sparks<R: Rng + ?Sized>(particles: &mut Vec<Particle>, rng: &mut R, at: Vec2, radius: f32, count: u32) {
    for _ in 0..count {
        let pos = at + jitter(rng, radius / 2.0);
        let vel = jitter(rng, SPARK_SPEED);
        particles.push(Particle::new(pos, vel, SPARK_LIFE, SPARK_COLOR, SPARK_SIZE));
    }
}

/// Debris burst at a destroyed asteroid.
pub fn spawn_explosion<R: Rng + ?Sized>(particles: &mut Vec<Particle>, rng: &mut R, at: Vec2, count: u32) {
    for _ in 0..count {
        let vel = jitter(rng, EXPLOSION_SPEED);
        particles.push(Particle::new(at, vel, EXPLOSION_LIFE, EXPLOSION_COLOR, EXPLOSION_SIZE));
    }
}

/// Between 1 and `max_drops` resource drops at `at`. Returns how many.
pub fn spawn_drops<R: Rng + ?Sized>(
    entities: &mut Vec<Entity>,
    rng: &mut R,
    at: Vec2,
    resource: ResourceKind,
    max_drops: u32,
) -> u32 {
    let count = rng.gen_range(1..=max_drops.max(1));
    for _ in 0..count {
        entities.push(Entity::resource_drop(at, jitter(rng, DROP_SCATTER), resource));
    }
    count
}
