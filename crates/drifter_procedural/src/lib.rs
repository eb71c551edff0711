//! # Aether Drifter Procedural Generation
//!
//! Deterministic asteroid fields for an infinite 2D world.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: Same chunk coordinate always produces the same asteroids
//! 2. **Chunked**: World space is cut into 2000x2000 unit squares
//! 3. **Streamable**: Chunks are generated and evicted as the player moves
//! 4. **Progressive**: Distance from the origin raises the tier, and tier gates rare ores
//!
//! ## Core Components
//!
//! - `noise`: seed -> [0, 1) hash used by every reproducible draw
//! - `ChunkGenerator`: produces the asteroids of one chunk
//! - `WorldManager`: keeps the 3x3 window around the player populated
//!
//! ## Example
//!
//! ```rust
//! use drifter_core::{Entity, Vec2};
//! use drifter_procedural::{WorldManager, WorldManagerConfig, WorldSeed};
//!
//! let mut manager = WorldManager::new(WorldSeed::default(), WorldManagerConfig::default());
//! let mut entities = vec![Entity::player(Vec2::new(0.0, -80.0)), Entity::hub()];
//!
//! let stats = manager.update_chunks(&mut entities, Vec2::new(0.0, -80.0));
//!
//! // The hub chunk stays empty, its eight neighbours are populated.
//! assert_eq!(stats.chunks_generated, 8);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod chunk;
pub mod noise;
pub mod world_manager;

pub use chunk::{roll_resource, tier_for_distance, ChunkCoord, ChunkGenerator, CHUNK_SIZE, MAX_TIER, TIER_DISTANCE};
pub use noise::{noise, WorldSeed};
pub use world_manager::{WorldManager, WorldManagerConfig, WorldStats};
