//! Queue persistence adapter
//!
//! Saves the (queue, cursor) pair to a durable key/value store so playback
//! continuity survives a restart. Strictly best-effort: writes happen on a
//! dedicated thread and are never awaited by playback-affecting code, and a
//! damaged or missing snapshot restores as an empty queue rather than an
//! error.

use crossbeam_channel::{Receiver, Sender};
use namity_core::{StateStore, TrackRef};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, warn};

/// Storage key for the serialized queue
pub const QUEUE_KEY: &str = "namity.player.queue";

/// Storage key for the cursor position
pub const CURSOR_KEY: &str = "namity.player.cursor";

/// Current snapshot schema version
const SNAPSHOT_VERSION: u32 = 1;

/// Versioned on-disk form of the queue
///
/// The stored blob is dynamic data from an earlier run; it is validated on
/// load instead of trusted. Unknown versions restore as empty.
#[derive(Debug, Serialize, Deserialize)]
struct PersistedQueue {
    version: u32,
    tracks: Vec<TrackRef>,
}

/// One queue state to be written
#[derive(Debug)]
struct Snapshot {
    tracks: Vec<TrackRef>,
    cursor: usize,
}

/// Queue state recovered from the store
#[derive(Debug, Default)]
pub struct RestoredQueue {
    /// Persisted queue contents, empty when absent or damaged
    pub tracks: Vec<TrackRef>,

    /// Persisted cursor, reset to 0 when out of `[0, tracks.len())`
    pub cursor: usize,
}

/// Fire-and-forget queue persistence
///
/// Owns a writer thread fed over an unbounded channel; `record` enqueues and
/// returns immediately. When several snapshots pile up the writer keeps only
/// the newest. Dropping the adapter closes the channel, lets the writer
/// drain, and joins it, so the last recorded state always reaches the store.
pub struct QueuePersistence {
    tx: Option<Sender<Snapshot>>,
    worker: Option<JoinHandle<()>>,
}

impl QueuePersistence {
    /// Start the writer thread against `store`
    pub fn spawn(store: Arc<dyn StateStore>) -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        let worker = thread::spawn(move || Self::writer_loop(&rx, store.as_ref()));

        Self {
            tx: Some(tx),
            worker: Some(worker),
        }
    }

    /// Record the current queue state
    ///
    /// Never blocks and never reports failure to the caller; a write that
    /// cannot be completed is logged and dropped.
    pub fn record(&self, tracks: &[TrackRef], cursor: usize) {
        let snapshot = Snapshot {
            tracks: tracks.to_vec(),
            cursor,
        };
        if let Some(tx) = &self.tx {
            let _ = tx.send(snapshot);
        }
    }

    fn writer_loop(rx: &Receiver<Snapshot>, store: &dyn StateStore) {
        while let Ok(mut snapshot) = rx.recv() {
            // Collapse a backlog down to the newest state
            while let Ok(newer) = rx.try_recv() {
                snapshot = newer;
            }

            if let Err(err) = Self::write(store, &snapshot) {
                warn!("queue persistence write failed: {err}");
            }
        }
    }

    fn write(store: &dyn StateStore, snapshot: &Snapshot) -> namity_core::Result<()> {
        let blob = serde_json::to_string(&PersistedQueue {
            version: SNAPSHOT_VERSION,
            tracks: snapshot.tracks.clone(),
        })
        .map_err(|e| namity_core::CoreError::InvalidData(e.to_string()))?;

        store.put(QUEUE_KEY, &blob)?;
        store.put(CURSOR_KEY, &snapshot.cursor.to_string())?;
        Ok(())
    }

    /// Read and validate the persisted queue state
    ///
    /// Every failure mode degrades silently: a missing or unparseable blob,
    /// or a version this build does not know, restores as an empty queue; a
    /// cursor outside the restored queue restores as 0.
    pub fn restore(store: &dyn StateStore) -> RestoredQueue {
        let tracks = match store.get(QUEUE_KEY) {
            Ok(Some(blob)) => match serde_json::from_str::<PersistedQueue>(&blob) {
                Ok(persisted) if persisted.version == SNAPSHOT_VERSION => persisted.tracks,
                Ok(persisted) => {
                    debug!("discarding queue snapshot with version {}", persisted.version);
                    Vec::new()
                }
                Err(err) => {
                    debug!("discarding unparseable queue snapshot: {err}");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!("queue persistence read failed: {err}");
                Vec::new()
            }
        };

        let cursor = match store.get(CURSOR_KEY) {
            Ok(Some(raw)) => raw.parse::<usize>().unwrap_or(0),
            _ => 0,
        };
        let cursor = if cursor < tracks.len() { cursor } else { 0 };

        RestoredQueue { tracks, cursor }
    }
}

impl Drop for QueuePersistence {
    fn drop(&mut self) {
        // Closing the channel ends the writer loop after it drains
        self.tx.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}
