//! # Aether Drifter
//!
//! The real-time core of a top-down space-mining game: fly through an
//! endless asteroid field, mine it with a laser, haul the ore back to the
//! station and spend the credits on upgrades.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐  InputEvent   ┌──────────────┐  GameEvent   ┌──────────────┐
//! │ Input        │──────────────>│  GameLoop    │─────────────>│ Presentation │
//! │ handlers     │  (queue)      │              │  (bounded)   │ (HUD, menu)  │
//! └──────────────┘               │ Simulation-  │              └──────────────┘
//!                                │ Context      │  RenderFrame ┌──────────────┐
//!                                │  ├─ World-   │─────────────>│ SceneRenderer│
//!                                │  │  Manager  │              └──────────────┘
//!                                │  └─ GameState│  snapshots   ┌──────────────┐
//!                                │              │─────────────>│ SaveWriter   │
//!                                └──────────────┘  (channel)   │  -> SaveStore│
//!                                                              └──────────────┘
//! ```
//!
//! - [`simulation`]: the per-tick update (flight, cargo, laser, effects)
//! - [`game_loop`]: dt clamping, docking, autosave, frame stats
//! - [`station`]: sell, upgrade and undock while docked
//! - [`render`]: screen-space geometry for any renderer
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use drifter::{Action, GameLoop, GameLoopConfig, SimConfig};
//! use drifter_economy::{EconomyConfig, MemorySaveStore};
//!
//! let store = Arc::new(MemorySaveStore::new());
//! let mut game = GameLoop::new(
//!     GameLoopConfig::default(),
//!     SimConfig::default(),
//!     EconomyConfig::default(),
//!     store,
//! )?;
//!
//! // The ship starts on top of the station.
//! game.input_handle().press(Action::Interact);
//! game.advance(Duration::from_millis(16))?;
//! assert!(game.is_docked());
//!
//! let outcome = game.sell_all()?;
//! assert_eq!(outcome.message, "Cargo empty. Nothing to sell.");
//! game.shutdown();
//! # Ok::<(), drifter::DrifterError>(())
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod error;
pub mod events;
pub mod game_loop;
pub mod input;
pub mod notices;
pub mod render;
pub mod save_writer;
pub mod simulation;
pub mod station;

pub use config::DrifterConfig;
pub use error::{DrifterError, DrifterResult};
pub use events::{EventBus, EventReceiver, EventSender, GameEvent};
pub use game_loop::{FramePacer, FrameStats, FrameStatsAccumulator, GameLoop, GameLoopConfig};
pub use input::{Action, InputEvent, InputHandle, TickInput};
pub use render::{RenderFrame, SceneRenderer};
pub use save_writer::SaveWriter;
pub use simulation::{SimConfig, SimulationContext, TickReport};
pub use station::StationOutcome;
