//! # Background Save Writer
//!
//! Persistence never runs on the tick. Snapshots are handed to a dedicated
//! writer thread through a channel.
//!
//! ```text
//!   GameLoop ──submit──> [channel] ──> [drifter-save thread] ──> SaveStore
//!                                        (single writer)
//! ```
//!
//! The writer drains everything queued before each write and keeps only the
//! newest snapshot, so a slow store never builds a backlog and two writes
//! never interleave.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{unbounded, Receiver, Sender};
use drifter_economy::{GameState, SaveStore};
use tracing::{debug, warn};

/// Writer counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SaveWriterStats {
    /// Snapshots accepted by [`SaveWriter::submit`].
    pub submitted: u64,
    /// Snapshots written to the store.
    pub written: u64,
    /// Snapshots superseded before they were written.
    pub coalesced: u64,
}

#[derive(Default)]
struct Counters {
    submitted: AtomicU64,
    written: AtomicU64,
    coalesced: AtomicU64,
}

/// Serialised, non-blocking save pipeline.
pub struct SaveWriter {
    sender: Option<Sender<GameState>>,
    writer_handle: Option<JoinHandle<()>>,
    counters: Arc<Counters>,
}

impl SaveWriter {
    /// Starts the writer thread.
    ///
    /// # Errors
    ///
    /// Returns the OS error if the thread cannot be spawned.
    pub fn spawn(store: Arc<dyn SaveStore>) -> std::io::Result<Self> {
        let (sender, receiver) = unbounded();
        let counters = Arc::new(Counters::default());
        let writer_counters = Arc::clone(&counters);

        let writer_handle = thread::Builder::new()
            .name("drifter-save".into())
            .spawn(move || Self::writer_loop(&receiver, store.as_ref(), &writer_counters))?;

        Ok(Self {
            sender: Some(sender),
            writer_handle: Some(writer_handle),
            counters,
        })
    }

    fn writer_loop(receiver: &Receiver<GameState>, store: &dyn SaveStore, counters: &Counters) {
        while let Ok(mut snapshot) = receiver.recv() {
            for newer in receiver.try_iter() {
                snapshot = newer;
                counters.coalesced.fetch_add(1, Ordering::Relaxed);
            }
            store.save(&snapshot);
            counters.written.fetch_add(1, Ordering::Relaxed);
        }
        debug!("save writer stopped");
    }

    /// Queues a snapshot. Never blocks.
    ///
    /// Returns `false` once the writer has been shut down.
    pub fn submit(&self, state: GameState) -> bool {
        let Some(sender) = self.sender.as_ref() else {
            return false;
        };
        if sender.send(state).is_err() {
            warn!("save writer is gone, snapshot dropped");
            return false;
        }
        self.counters.submitted.fetch_add(1, Ordering::Relaxed);
        true
    }

    /// Current counters.
    #[must_use]
    pub fn stats(&self) -> SaveWriterStats {
        SaveWriterStats {
            submitted: self.counters.submitted.load(Ordering::Relaxed),
            written: self.counters.written.load(Ordering::Relaxed),
            coalesced: self.counters.coalesced.load(Ordering::Relaxed),
        }
    }

    /// True once [`shutdown`](Self::shutdown) has run.
    #[must_use]
    pub fn is_shut_down(&self) -> bool {
        self.sender.is_none()
    }

    /// Flushes queued snapshots and joins the writer. Idempotent.
    pub fn shutdown(&mut self) {
        drop(self.sender.take());
        if let Some(handle) = self.writer_handle.take() {
            if handle.join().is_err() {
                warn!("save writer panicked");
            }
        }
    }
}

impl Drop for SaveWriter {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drifter_economy::{EconomyConfig, MemorySaveStore};

    fn state_with_credits(credits: u64) -> GameState {
        let mut state = GameState::new(&EconomyConfig::default());
        state.inventory.credits = credits;
        state
    }

    #[test]
    fn test_shutdown_flushes_latest() {
        let store = Arc::new(MemorySaveStore::new());
        let mut writer = SaveWriter::spawn(store.clone()).expect("spawn");

        for credits in 1..=20 {
            assert!(writer.submit(state_with_credits(credits)));
        }
        writer.shutdown();

        let defaults = GameState::new(&EconomyConfig::default());
        let saved = store.saved_state(&defaults).expect("saved");
        assert_eq!(saved.inventory.credits, 20);

        let stats = writer.stats();
        assert_eq!(stats.submitted, 20);
        assert_eq!(stats.written + stats.coalesced, 20);
        assert_eq!(store.save_count() as u64, stats.written);
    }

    #[test]
    fn test_submit_after_shutdown_is_rejected() {
        let store = Arc::new(MemorySaveStore::new());
        let mut writer = SaveWriter::spawn(store.clone()).expect("spawn");
        writer.shutdown();
        writer.shutdown();

        assert!(writer.is_shut_down());
        assert!(!writer.submit(state_with_credits(1)));
        assert_eq!(store.save_count(), 0);
    }

    #[test]
    fn test_drop_joins_writer() {
        let store = Arc::new(MemorySaveStore::new());
        {
            let writer = SaveWriter::spawn(store.clone()).expect("spawn");
            writer.submit(state_with_credits(7));
        }
        assert!(store.save_count() >= 1);
    }
}
