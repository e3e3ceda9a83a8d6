//! Core types for playback management

use namity_core::TrackRef;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Playback state of the controller
///
/// `Ready` and `Active` both mean the queue is non-empty; they differ only
/// in whether the engine is (or intends to be) producing audio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerState {
    /// No queue, nothing loaded
    Empty,

    /// Queue present, engine paused or stopped at the current track
    Ready,

    /// Queue present, engine playing the current track
    Active,
}

impl PlayerState {
    /// Whether this state counts as playing for UI purposes
    pub fn is_playing(self) -> bool {
        self == PlayerState::Active
    }
}

/// Configuration for the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Initial volume (0.0 - 1.0, default: 1.0)
    pub volume: f32,

    /// Initial loop-current-track flag (default: off)
    pub loop_current: bool,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            volume: 1.0,
            loop_current: false,
        }
    }
}

/// Observable player state for UI binding
///
/// Published as one value and replaced atomically on every transition, so a
/// reader never sees a queue update without its matching cursor/current
/// track update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    /// Track at the cursor, if any
    pub current_track: Option<TrackRef>,

    /// Whether the engine is playing (or has been asked to start)
    pub is_playing: bool,

    /// Volume (0.0 - 1.0)
    pub volume: f32,

    /// Elapsed time in the current stream
    pub elapsed: Duration,

    /// Duration of the current stream (zero until the engine resolves it)
    pub duration: Duration,

    /// Read-only view of the queue in play order
    pub queue: Vec<TrackRef>,

    /// Whether the current track loops on completion
    pub loop_current: bool,
}

impl Default for PlayerSnapshot {
    fn default() -> Self {
        Self {
            current_track: None,
            is_playing: false,
            volume: 1.0,
            elapsed: Duration::ZERO,
            duration: Duration::ZERO,
            queue: Vec::new(),
            loop_current: false,
        }
    }
}
