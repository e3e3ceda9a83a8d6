//! Error types for playback management

use namity_core::TrackId;
use thiserror::Error;

/// Playback errors
///
/// Everything here is recoverable: the controller degrades to a stopped
/// state and keeps running. Errors reach the UI as transient notices, never
/// as process failures.
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// Stream locator could not be resolved, or the engine rejected the load
    #[error("Failed to load track {track}: {reason}")]
    LoadFailure {
        /// Track that failed to load
        track: TrackId,
        /// What went wrong
        reason: String,
    },

    /// The runtime declined to start playback (resource/autoplay policy)
    #[error("Playback refused: {0}")]
    PlaybackRefused(String),
}
