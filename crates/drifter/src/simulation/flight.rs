//! Ship steering and entity integration.
//!
//! Velocities are in world units per tick, so integration is not scaled by
//! elapsed time.

use drifter_core::{Entity, EntityKind, Vec2};
use drifter_economy::PlayerStats;

use crate::input::TickInput;
use crate::simulation::SimConfig;

/// Applies thrust, turning and friction to the player ship.
pub fn steer(player: &mut Entity, input: &TickInput, stats: &PlayerStats, config: &SimConfig) {
    let heading = Vec2::from_angle(player.angle);
    if input.thrust_forward {
        player.vel += heading * stats.engine_speed;
    }
    if input.thrust_back {
        player.vel -= heading * (stats.engine_speed * config.reverse_thrust);
    }
    if input.turn_left {
        player.angle -= stats.turn_speed;
    }
    if input.turn_right {
        player.angle += stats.turn_speed;
    }
    player.vel *= config.friction;
}

/// Moves every entity by its velocity and spins asteroids.
pub fn integrate(entities: &mut [Entity], asteroid_spin: f32) {
    for entity in entities {
        entity.pos += entity.vel;
        if entity.kind == EntityKind::Asteroid {
            entity.angle += asteroid_spin;
        }
    }
}
