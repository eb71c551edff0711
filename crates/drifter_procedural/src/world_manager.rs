//! # World Manager
//!
//! Keeps the window of chunks around the player populated.
//!
//! ## Streaming Rules
//!
//! Every update the manager:
//!
//! 1. Finds the player's chunk and the visible window around it
//!    (Chebyshev radius `view_radius`, 3x3 by default).
//! 2. Evicts asteroids whose current chunk left the window. Player, hub and
//!    resource drops are never evicted, wherever they are.
//! 3. Generates every visible chunk that holds no asteroid.
//!
//! The presence check only looks at asteroids, so a chunk that was mined
//! clean regenerates the next time it is examined. Chunk membership is
//! derived from each entity's current position; there is no per-entity
//! chunk field.

use std::collections::HashSet;

use drifter_core::{Entity, EntityKind, Vec2};
use tracing::debug;

use crate::chunk::{ChunkCoord, ChunkGenerator};
use crate::noise::WorldSeed;

/// Configuration for the world manager.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorldManagerConfig {
    /// Chunks kept on each side of the player's chunk.
    pub view_radius: i32,
}

impl Default for WorldManagerConfig {
    fn default() -> Self {
        Self { view_radius: 1 }
    }
}

impl WorldManagerConfig {
    /// Number of chunks in the visible window.
    #[must_use]
    pub fn window_chunks(&self) -> usize {
        let side = (self.view_radius.max(0) * 2 + 1) as usize;
        side * side
    }
}

/// Counters reported by [`WorldManager::update_chunks`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WorldStats {
    /// Chunks generated.
    pub chunks_generated: usize,
    /// Asteroids appended by generation.
    pub asteroids_spawned: usize,
    /// Asteroids evicted for leaving the window.
    pub asteroids_evicted: usize,
    /// The player's chunk at the time of the update.
    pub player_chunk: ChunkCoord,
}

impl WorldStats {
    fn accumulate(&mut self, update: &Self) {
        self.chunks_generated += update.chunks_generated;
        self.asteroids_spawned += update.asteroids_spawned;
        self.asteroids_evicted += update.asteroids_evicted;
        self.player_chunk = update.player_chunk;
    }
}

/// Streams asteroid chunks around the player.
#[derive(Debug)]
pub struct WorldManager {
    generator: ChunkGenerator,
    config: WorldManagerConfig,
    session: WorldStats,
    last_chunk: Option<ChunkCoord>,
}

impl WorldManager {
    /// Creates a manager for the given world seed.
    #[must_use]
    pub fn new(seed: WorldSeed, config: WorldManagerConfig) -> Self {
        Self {
            generator: ChunkGenerator::new(seed),
            config,
            session: WorldStats::default(),
            last_chunk: None,
        }
    }

    /// The generator used for new chunks.
    #[must_use]
    pub const fn generator(&self) -> &ChunkGenerator {
        &self.generator
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &WorldManagerConfig {
        &self.config
    }

    /// Totals since the manager was created.
    #[must_use]
    pub const fn session_stats(&self) -> &WorldStats {
        &self.session
    }

    /// True if `coord` lies in the window centred on `centre`.
    #[inline]
    #[must_use]
    pub fn is_visible(&self, centre: ChunkCoord, coord: ChunkCoord) -> bool {
        let radius = self.config.view_radius.max(0).unsigned_abs();
        centre.chebyshev_distance(coord) <= radius
    }

    /// Evicts out-of-window asteroids and generates empty visible chunks.
    ///
    /// Works on `entities` in place. Accepts an empty list and any player
    /// position, negative coordinates included.
    pub fn update_chunks(&mut self, entities: &mut Vec<Entity>, player_pos: Vec2) -> WorldStats {
        let centre = ChunkCoord::from_world_pos(player_pos);
        let mut stats = WorldStats {
            player_chunk: centre,
            ..WorldStats::default()
        };

        let before = entities.len();
        entities.retain(|entity| {
            entity.kind.is_persistent() || self.is_visible(centre, ChunkCoord::from_world_pos(entity.pos))
        });
        stats.asteroids_evicted = before - entities.len();

        let occupied: HashSet<ChunkCoord> = entities
            .iter()
            .filter(|entity| entity.kind == EntityKind::Asteroid)
            .map(|entity| ChunkCoord::from_world_pos(entity.pos))
            .collect();

        for coord in centre.neighborhood(self.config.view_radius) {
            if occupied.contains(&coord) || coord.is_hub() {
                continue;
            }
            stats.asteroids_spawned += self.generator.generate_into(coord, entities);
            stats.chunks_generated += 1;
        }

        if self.last_chunk != Some(centre) {
            debug!(
                chunk = %centre,
                generated = stats.chunks_generated,
                evicted = stats.asteroids_evicted,
                entities = entities.len(),
                "player entered chunk"
            );
            self.last_chunk = Some(centre);
        }

        self.session.accumulate(&stats);
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::CHUNK_SIZE;
    use drifter_core::ResourceKind;
    use proptest::prelude::*;

    fn manager() -> WorldManager {
        WorldManager::new(WorldSeed::default(), WorldManagerConfig::default())
    }

    fn chunk_centre(x: i32, y: i32) -> Vec2 {
        ChunkCoord::new(x, y).origin() + Vec2::new(CHUNK_SIZE / 2.0, CHUNK_SIZE / 2.0)
    }

    fn count_kind(entities: &[Entity], kind: EntityKind) -> usize {
        entities.iter().filter(|e| e.kind == kind).count()
    }

    #[test]
    fn test_empty_list_is_populated() {
        let mut entities = Vec::new();
        let stats = manager().update_chunks(&mut entities, chunk_centre(-7, -3));
        assert_eq!(stats.chunks_generated, 9);
        assert_eq!(stats.player_chunk, ChunkCoord::new(-7, -3));
        assert_eq!(entities.len(), stats.asteroids_spawned);
        assert!(entities.len() >= 9 * 5);
    }

    #[test]
    fn test_second_update_is_stable() {
        let mut mgr = manager();
        let mut entities = vec![Entity::player(Vec2::ZERO), Entity::hub()];
        let first = mgr.update_chunks(&mut entities, Vec2::new(10.0, 10.0));
        assert_eq!(first.chunks_generated, 8);

        let len = entities.len();
        let second = mgr.update_chunks(&mut entities, Vec2::new(12.0, 10.0));
        assert_eq!(second.chunks_generated, 0);
        assert_eq!(second.asteroids_evicted, 0);
        assert_eq!(entities.len(), len);
    }

    #[test]
    fn test_moving_one_chunk_swaps_a_column() {
        let mut mgr = manager();
        let mut entities = Vec::new();
        mgr.update_chunks(&mut entities, chunk_centre(10, 10));
        let stats = mgr.update_chunks(&mut entities, chunk_centre(11, 10));

        // Column x = 9 leaves, column x = 12 arrives.
        assert_eq!(stats.chunks_generated, 3);
        assert!(stats.asteroids_evicted >= 3 * 5);
        for e in &entities {
            let coord = ChunkCoord::from_world_pos(e.pos);
            assert!(coord.chebyshev_distance(ChunkCoord::new(11, 10)) <= 1);
        }
        assert_eq!(mgr.session_stats().chunks_generated, 12);
    }

    #[test]
    fn test_persistent_entities_survive_far_travel() {
        let mut mgr = manager();
        let far_drop = Entity::resource_drop(Vec2::new(-50_000.0, 90_000.0), Vec2::ZERO, ResourceKind::Gold);
        let drop_id = far_drop.id;
        let mut entities = vec![
            Entity::player(Vec2::new(1.0e6, 1.0e6)),
            Entity::hub(),
            far_drop,
        ];

        mgr.update_chunks(&mut entities, Vec2::new(1.0e6, 1.0e6));

        assert_eq!(count_kind(&entities, EntityKind::Player), 1);
        assert_eq!(count_kind(&entities, EntityKind::Hub), 1);
        assert!(entities.iter().any(|e| e.id == drop_id));
    }

    #[test]
    fn test_mined_out_chunk_regenerates() {
        let mut mgr = manager();
        let mut entities = Vec::new();
        let pos = chunk_centre(4, 4);
        mgr.update_chunks(&mut entities, pos);

        let target = ChunkCoord::new(5, 4);
        entities.retain(|e| ChunkCoord::from_world_pos(e.pos) != target);

        let stats = mgr.update_chunks(&mut entities, pos);
        assert_eq!(stats.chunks_generated, 1);
        assert_eq!(
            stats.asteroids_spawned,
            mgr.generator().asteroid_count(target)
        );
    }

    #[test]
    fn test_wider_view_radius() {
        let config = WorldManagerConfig { view_radius: 2 };
        assert_eq!(config.window_chunks(), 25);
        let mut mgr = WorldManager::new(WorldSeed::default(), config);
        let mut entities = Vec::new();
        let stats = mgr.update_chunks(&mut entities, chunk_centre(30, 30));
        assert_eq!(stats.chunks_generated, 25);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_asteroids_evicted_exactly_outside_window(
            start_x in -50i32..50,
            start_y in -50i32..50,
            dx in -3i32..=3,
            dy in -3i32..=3,
        ) {
            let mut mgr = manager();
            let mut entities = vec![Entity::player(Vec2::ZERO), Entity::hub()];
            mgr.update_chunks(&mut entities, chunk_centre(start_x, start_y));

            let old_asteroids: Vec<_> = entities
                .iter()
                .filter(|e| e.kind == EntityKind::Asteroid)
                .map(|e| (e.id, ChunkCoord::from_world_pos(e.pos)))
                .collect();

            let centre = ChunkCoord::new(start_x + dx, start_y + dy);
            mgr.update_chunks(&mut entities, chunk_centre(centre.x, centre.y));

            for (id, coord) in old_asteroids {
                let kept = entities.iter().any(|e| e.id == id);
                prop_assert_eq!(kept, coord.chebyshev_distance(centre) <= 1);
            }
            prop_assert_eq!(count_kind(&entities, EntityKind::Player), 1);
            prop_assert_eq!(count_kind(&entities, EntityKind::Hub), 1);
        }
    }
}
