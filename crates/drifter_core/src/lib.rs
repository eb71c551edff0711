//! # Aether Drifter Core
//!
//! The plain-data model shared by the world generator, the economy and the
//! simulation loop.
//!
//! ## Contents
//!
//! - `Vec2`: 2D vector math (positions, velocities, headings)
//! - `Entity`: player, hub, asteroids and resource drops
//! - `Particle`: short-lived visual effects
//! - `ResourceKind`: the minable resource tags
//!
//! ## Removal Model
//!
//! Entities are never deleted in place. Systems call
//! [`Entity::mark_removed`] and the owning collection filters marked
//! entities out on its next cleanup pass. The flag is never reset.
//!
//! ## Example
//!
//! ```rust
//! use drifter_core::{Entity, EntityKind, Vec2};
//!
//! let mut player = Entity::player(Vec2::new(0.0, -80.0));
//! player.vel = Vec2::from_angle(player.angle) * 0.15;
//! assert_eq!(player.kind, EntityKind::Player);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod entity;
pub mod math;
pub mod particle;
pub mod resource;

pub use entity::{Entity, EntityId, EntityKind};
pub use math::{Color, Vec2};
pub use particle::Particle;
pub use resource::ResourceKind;
