//! # Presentation Events
//!
//! One-way notifications from the loop to the HUD and menu layer.
//!
//! ```text
//! ┌─────────────┐      ┌─────────────┐      ┌──────────────┐
//! │  GameLoop   │─────>│   Event     │─────>│ Presentation │
//! │ (sim, dock, │      │   Channel   │      │ (HUD, menu)  │
//! │  station)   │      │  (bounded)  │      │              │
//! └─────────────┘      └─────────────┘      └──────────────┘
//! ```
//!
//! The channel is bounded. When the consumer falls behind, new events are
//! dropped and counted; the tick never waits on the presentation layer.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use drifter_core::{EntityId, ResourceKind};
use drifter_economy::GameState;
use tracing::warn;

/// Default channel capacity.
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

/// Events that flow from the loop to the presentation layer.
#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    /// The persistent state changed (pickup, sale, upgrade, dock).
    ///
    /// Carries an immutable snapshot for HUD display.
    StateChanged(Box<GameState>),

    /// The ship entered or left the station.
    DockingChanged {
        /// True when entering the station menu.
        docked: bool,
    },

    /// A transient message for the player.
    Notice(String),

    /// The mining laser destroyed an asteroid.
    AsteroidDestroyed {
        /// The destroyed asteroid.
        id: EntityId,
        /// Ore it dropped. `None` for a barren rock.
        resource: Option<ResourceKind>,
        /// Number of resource drops spawned.
        drops: u32,
    },
}

/// Event bus between the loop and the presentation layer.
///
/// Pre-allocates a bounded channel to prevent memory growth in the hot path.
pub struct EventBus {
    /// Sender end - held by the loop.
    sender: Sender<GameEvent>,
    /// Receiver end - cloned out to consumers.
    receiver: Receiver<GameEvent>,
    /// Events dropped because the channel was full.
    dropped: Arc<AtomicU64>,
}

impl EventBus {
    /// Creates a new event bus.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Maximum events in flight before dropping.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity.max(1));
        Self {
            sender,
            receiver,
            dropped: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Creates a sender handle.
    #[must_use]
    pub fn sender(&self) -> EventSender {
        EventSender {
            sender: self.sender.clone(),
            dropped: Arc::clone(&self.dropped),
        }
    }

    /// Creates a receiver handle.
    #[must_use]
    pub fn receiver(&self) -> EventReceiver {
        EventReceiver {
            receiver: self.receiver.clone(),
        }
    }

    /// Events dropped so far.
    #[must_use]
    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}

/// Handle for sending events.
#[derive(Clone)]
pub struct EventSender {
    sender: Sender<GameEvent>,
    dropped: Arc<AtomicU64>,
}

impl EventSender {
    /// Sends an event without blocking.
    ///
    /// Returns `false` if the event was dropped (channel full).
    #[inline]
    pub fn send(&self, event: GameEvent) -> bool {
        match self.sender.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(event)) => {
                let total = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
                // Log the first drop and every 100th after it.
                if total % 100 == 1 {
                    warn!(dropped = total, ?event, "presentation event channel full");
                }
                false
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }
}

/// Handle for receiving events.
#[derive(Clone)]
pub struct EventReceiver {
    receiver: Receiver<GameEvent>,
}

impl EventReceiver {
    /// Receives all pending events without blocking.
    #[inline]
    pub fn drain(&self) -> Vec<GameEvent> {
        self.receiver.try_iter().collect()
    }

    /// Receives one event, or `None` if nothing is pending.
    #[inline]
    pub fn try_recv(&self) -> Option<GameEvent> {
        self.receiver.try_recv().ok()
    }

    /// Returns the number of pending events.
    #[inline]
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }
}
