//! # Infinite Flight Integration Test
//!
//! Proves the player can fly forever without leaving the populated field,
//! and that the loaded entity set stays bounded.

use drifter_core::{Entity, EntityKind, ResourceKind, Vec2};
use drifter_procedural::{ChunkCoord, WorldManager, WorldManagerConfig, WorldSeed, CHUNK_SIZE};

fn asteroid_chunks(entities: &[Entity]) -> Vec<ChunkCoord> {
    let mut chunks: Vec<_> = entities
        .iter()
        .filter(|e| e.kind == EntityKind::Asteroid)
        .map(|e| ChunkCoord::from_world_pos(e.pos))
        .collect();
    chunks.sort_unstable();
    chunks.dedup();
    chunks
}

/// Test: Fly 100,000 units east. Every visible non-hub chunk stays populated.
#[test]
fn test_fly_east_100000_units() {
    let mut manager = WorldManager::new(WorldSeed::new(42), WorldManagerConfig::default());
    let mut entities = vec![Entity::player(Vec2::new(0.0, -80.0)), Entity::hub()];

    let mut pos = Vec2::new(0.0, -80.0);
    for step in 0..10_000 {
        pos.x += 10.0;
        manager.update_chunks(&mut entities, pos);

        if step % 200 == 0 {
            let centre = ChunkCoord::from_world_pos(pos);
            let populated = asteroid_chunks(&entities);
            for coord in centre.neighborhood(1).filter(|c| !c.is_hub()) {
                assert!(populated.contains(&coord), "EMPTY CHUNK {coord} at x={}", pos.x);
            }
            // Never more than the 3x3 window of asteroids.
            assert!(populated.len() <= 9);
        }
    }

    let stats = manager.session_stats();
    assert!(stats.chunks_generated >= 50 * 3);
    assert!(stats.asteroids_evicted > 0);
    assert_eq!(stats.player_chunk, ChunkCoord::from_world_pos(pos));
}

/// Test: Spiral outward through negative quadrants without losing the hub.
#[test]
fn test_spiral_flight_keeps_hub_and_player() {
    let mut manager = WorldManager::new(WorldSeed::new(12345), WorldManagerConfig::default());
    let mut entities = vec![Entity::player(Vec2::ZERO), Entity::hub()];

    let directions = [
        Vec2::new(1.0, 0.0),
        Vec2::new(0.0, 1.0),
        Vec2::new(-1.0, 0.0),
        Vec2::new(0.0, -1.0),
    ];
    let mut pos = Vec2::ZERO;
    let mut leg = 1;
    for turn in 0..24 {
        let dir = directions[turn % 4];
        for _ in 0..leg {
            pos += dir * CHUNK_SIZE;
            manager.update_chunks(&mut entities, pos);
        }
        if turn % 2 == 1 {
            leg += 1;
        }
    }

    assert_eq!(entities.iter().filter(|e| e.kind == EntityKind::Hub).count(), 1);
    assert_eq!(entities.iter().filter(|e| e.kind == EntityKind::Player).count(), 1);
}

/// Test: Resource drops left behind are still there on return.
#[test]
fn test_dropped_cargo_waits_for_the_player() {
    let mut manager = WorldManager::new(WorldSeed::default(), WorldManagerConfig::default());
    let drop = Entity::resource_drop(Vec2::new(500.0, 500.0), Vec2::ZERO, ResourceKind::Titanium);
    let drop_id = drop.id;
    let mut entities = vec![drop];

    manager.update_chunks(&mut entities, Vec2::new(50_000.0, 0.0));
    manager.update_chunks(&mut entities, Vec2::new(400.0, 400.0));

    assert!(entities.iter().any(|e| e.id == drop_id));
}

/// Test: Returning to a chunk reproduces its asteroids exactly.
#[test]
fn test_revisited_chunk_is_identical() {
    let mut manager = WorldManager::new(WorldSeed::new(7), WorldManagerConfig::default());
    let mut entities = Vec::new();
    let home = Vec2::new(9_000.0, -9_000.0);
    let target = ChunkCoord::from_world_pos(home);

    let snapshot = |entities: &[Entity]| {
        let mut v: Vec<(f32, f32, f32)> = entities
            .iter()
            .filter(|e| ChunkCoord::from_world_pos(e.pos) == target)
            .map(|e| (e.pos.x, e.pos.y, e.radius))
            .collect();
        v.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        v
    };

    manager.update_chunks(&mut entities, home);
    let before = snapshot(&entities);
    manager.update_chunks(&mut entities, home + Vec2::new(20_000.0, 0.0));
    assert!(snapshot(&entities).is_empty());
    manager.update_chunks(&mut entities, home);

    assert_eq!(snapshot(&entities), before);
}
