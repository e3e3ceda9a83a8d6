//! Player events
//!
//! Event-based communication for UI synchronization. Events are emitted at
//! key points: state changes, track changes, position/duration updates, and
//! recoverable failures.

use crate::types::PlayerState;
use namity_core::TrackRef;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Events emitted by the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PlayerEvent {
    /// Playback state changed
    StateChanged {
        /// The new state
        state: PlayerState,
    },

    /// The current track changed (or was cleared)
    TrackChanged {
        /// The new current track, if any
        track: Option<TrackRef>,
    },

    /// The current track played to its natural end
    TrackFinished {
        /// The finished track
        track: TrackRef,
    },

    /// Elapsed time in the current stream
    PositionUpdated {
        /// Elapsed time
        elapsed: Duration,
    },

    /// The current stream's duration became known
    DurationResolved {
        /// Stream duration
        duration: Duration,
    },

    /// Volume changed
    VolumeChanged {
        /// New volume (0.0 - 1.0)
        volume: f32,
    },

    /// Queue contents changed (tracks added/removed/replaced)
    QueueChanged {
        /// New queue length
        length: usize,
    },

    /// Loop-current-track flag flipped
    LoopChanged {
        /// New flag value
        loop_current: bool,
    },

    /// A recoverable playback failure
    ///
    /// Playback has already degraded to the paused/stopped state; the user
    /// may retry.
    Error {
        /// Human-readable description
        message: String,
    },
}
