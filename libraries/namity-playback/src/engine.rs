//! Playback engine seam
//!
//! Abstracts the single audio output device (HTML audio element, cpal
//! stream, ...) behind a trait so the controller can be tested against a
//! scripted fake. The device is asynchronous: commands return immediately
//! and their outcomes arrive later as [`EngineSignal`]s on the engine's own
//! schedule.
//!
//! Every `load` begins a new *stream generation*, identified by the
//! [`LoadToken`] the controller passes in. Implementations must echo that
//! token on every signal belonging to the stream, which is how the
//! controller discards results of commands that have been superseded
//! ("last writer wins").

use namity_core::StreamUrl;
use std::time::Duration;

/// Identifies one stream generation of the engine
///
/// Monotonically increasing; minted by the controller, echoed by the engine.
pub type LoadToken = u64;

/// Push notifications from the engine
///
/// Delivered on the engine's schedule, each tagged with the generation it
/// belongs to. Signals from a superseded generation are stale and must be
/// ignored by the receiver.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineSignal {
    /// Periodic elapsed-time report for the playing stream
    Progress {
        /// Stream generation
        token: LoadToken,
        /// Elapsed time from the start of the stream
        elapsed: Duration,
    },

    /// The stream's duration became known
    DurationResolved {
        /// Stream generation
        token: LoadToken,
        /// Total stream duration
        duration: Duration,
    },

    /// The stream played to its natural end
    ///
    /// Emitted at most once per completed stream, and never when `pause`
    /// preempted natural completion.
    Ended {
        /// Stream generation
        token: LoadToken,
    },

    /// A `play` request actually started producing audio
    PlayStarted {
        /// Stream generation
        token: LoadToken,
    },

    /// The runtime declined a `play` request (resource/autoplay policy)
    ///
    /// The engine has already cleared its intends-to-play flag when this is
    /// emitted.
    PlayRefused {
        /// Stream generation
        token: LoadToken,
        /// Runtime's stated reason
        reason: String,
    },

    /// The stream bound by `load` could not be opened or decoded
    LoadFailed {
        /// Stream generation
        token: LoadToken,
        /// What went wrong
        reason: String,
    },
}

impl EngineSignal {
    /// The stream generation this signal belongs to
    pub fn token(&self) -> LoadToken {
        match self {
            EngineSignal::Progress { token, .. }
            | EngineSignal::DurationResolved { token, .. }
            | EngineSignal::Ended { token }
            | EngineSignal::PlayStarted { token }
            | EngineSignal::PlayRefused { token, .. }
            | EngineSignal::LoadFailed { token, .. } => *token,
        }
    }
}

/// The single audio output device
///
/// Exclusively owned by the playback controller; nothing else may call these
/// methods. Implementations deliver their [`EngineSignal`]s through the
/// channel they were constructed with.
pub trait AudioEngine: Send {
    /// Bind the output to a new stream, stopping any prior playback
    ///
    /// Resets elapsed time and duration to unresolved; the new duration
    /// arrives later as `DurationResolved`. A stream that cannot be opened
    /// reports `LoadFailed` with this `token`.
    fn load(&mut self, url: &StreamUrl, token: LoadToken);

    /// Request playback to start
    ///
    /// Asynchronous: the outcome arrives as `PlayStarted` or `PlayRefused`
    /// carrying `token`.
    fn play(&mut self, token: LoadToken);

    /// Pause playback
    ///
    /// Synchronous; always succeeds when a stream is loaded.
    fn pause(&mut self);

    /// Seek within the loaded stream
    ///
    /// No-op when nothing is loaded. Callers clamp `position` to the known
    /// duration before issuing the command.
    fn seek(&mut self, position: Duration);

    /// Set output volume
    ///
    /// `volume` is already clamped to `[0, 1]` by the caller. Takes effect
    /// immediately and persists across subsequent `load` calls within the
    /// same engine instance.
    fn set_volume(&mut self, volume: f32);

    /// Stop playback and unbind the stream
    fn stop(&mut self);
}
