//! Resource magnetism and pickup.

use drifter_core::{Entity, EntityKind, Vec2};
use drifter_economy::{market, GameState};

use crate::simulation::SimConfig;

/// Pulls nearby drops toward the ship and stows the ones it touches.
///
/// A touching drop is only collected while the hold has room; otherwise it
/// stays where it is. Returns the number of units collected.
pub fn collect(entities: &mut [Entity], ship_pos: Vec2, ship_radius: f32, state: &mut GameState, config: &SimConfig) -> u32 {
    let mut collected = 0;
    for drop in entities.iter_mut() {
        if drop.kind != EntityKind::Resource || drop.is_removed() {
            continue;
        }

        let offset = ship_pos - drop.pos;
        let distance = offset.length();
        if distance < config.magnet_radius {
            drop.vel += offset.normalize_or_zero() * config.magnet_pull;
        }

        if distance < ship_radius + drop.radius {
            let Some(kind) = drop.resource else {
                drop.mark_removed();
                continue;
            };
            if market::try_stow(state, kind) {
                drop.mark_removed();
                collected += 1;
            }
        }
    }
    collected
}
