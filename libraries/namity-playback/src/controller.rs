//! Playback controller - core orchestration
//!
//! Mediates between the queue store and the audio engine: user commands and
//! engine signals both land here, and every transition reads the live
//! (queue, cursor, state) triple at the moment it is applied.
//!
//! The controller is strictly single-owner. Callers serialize access through
//! the `Player` event loop; engine signals that arrive
//! after the command that superseded them are recognized by their stream
//! generation token and discarded, so a stale `play()` resolution can never
//! overwrite state reached by a later command.

use crate::{
    engine::{AudioEngine, EngineSignal, LoadToken},
    error::PlaybackError,
    events::PlayerEvent,
    persist::QueuePersistence,
    queue::TrackQueue,
    types::{PlaybackConfig, PlayerSnapshot, PlayerState},
};
use namity_core::{StateStore, StreamResolver, TrackId, TrackRef};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Central playback state machine
///
/// Owns the queue store, the engine handle, and the scalar playback state
/// (volume, elapsed, duration, loop flag). All mutation goes through the
/// command methods and [`PlayerController::handle_signal`]; observable state
/// comes out of [`PlayerController::snapshot`] and
/// [`PlayerController::take_events`].
pub struct PlayerController {
    // State
    state: PlayerState,
    volume: f32,
    loop_current: bool,
    elapsed: Duration,
    duration: Duration,

    // Queue and cursor, the single source of truth for what should play
    queue: TrackQueue,

    // Engine and stream generation bookkeeping
    engine: Box<dyn AudioEngine>,
    generation: LoadToken,
    stream_bound: bool,

    // Collaborators
    resolver: Arc<dyn StreamResolver>,
    persistence: QueuePersistence,

    // Event queue for UI synchronization
    pending_events: Vec<PlayerEvent>,
}

impl PlayerController {
    /// Create a controller, restoring persisted queue state
    ///
    /// The engine handle is owned exclusively from here on. A restored
    /// non-empty queue comes up in `Ready` with its current track bound but
    /// not playing.
    pub fn new(
        engine: Box<dyn AudioEngine>,
        resolver: Arc<dyn StreamResolver>,
        store: Arc<dyn StateStore>,
        config: PlaybackConfig,
    ) -> Self {
        let restored = QueuePersistence::restore(store.as_ref());
        let queue = TrackQueue::from_parts(restored.tracks, restored.cursor);

        let mut controller = Self {
            state: PlayerState::Empty,
            volume: config.volume.clamp(0.0, 1.0),
            loop_current: config.loop_current,
            elapsed: Duration::ZERO,
            duration: Duration::ZERO,
            queue,
            engine,
            generation: 0,
            stream_bound: false,
            resolver,
            persistence: QueuePersistence::spawn(store),
            pending_events: Vec::new(),
        };

        controller.engine.set_volume(controller.volume);
        if !controller.queue.is_empty() {
            controller.load_current(false);
        }
        controller
    }

    // ===== Playback Control =====

    /// Play a track, enqueueing it first if absent
    ///
    /// A track already in the queue is not duplicated: the cursor moves to
    /// its first occurrence.
    pub fn play_track(&mut self, track: TrackRef) {
        match self.queue.position_of(&track.id) {
            Some(position) => {
                self.queue.jump_to(position);
            }
            None => {
                self.queue.append(track);
                self.queue.jump_to(self.queue.len() - 1);
                self.emit(PlayerEvent::QueueChanged {
                    length: self.queue.len(),
                });
            }
        }
        self.persist_queue();
        self.load_current(true);
    }

    /// Pause playback
    ///
    /// No engine call and no state change unless currently playing.
    pub fn pause(&mut self) {
        if self.state == PlayerState::Active {
            self.engine.pause();
            self.set_state(PlayerState::Ready);
        }
    }

    /// Resume the current track
    pub fn resume(&mut self) {
        if self.state != PlayerState::Ready || self.queue.current().is_none() {
            return;
        }
        if self.stream_bound {
            self.engine.play(self.generation);
            self.set_state(PlayerState::Active);
        } else {
            // The last load failed; try again from the live cursor
            self.load_current(true);
        }
    }

    /// Skip to the next track
    ///
    /// At the end of the queue playback stops on the last track instead of
    /// wrapping.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) {
        if self.queue.current().is_none() {
            return;
        }
        if self.queue.advance().is_some() {
            self.persist_queue();
            self.load_current(true);
        } else {
            if self.state == PlayerState::Active {
                self.engine.pause();
            }
            self.set_state(PlayerState::Ready);
        }
    }

    /// Go back to the previous track
    ///
    /// Unchanged when already at the first track.
    pub fn previous(&mut self) {
        if self.queue.step_back().is_some() {
            self.persist_queue();
            self.load_current(true);
        }
    }

    /// Seek within the current stream
    ///
    /// Clamped to the known duration; no-op when nothing is loaded.
    pub fn seek(&mut self, position: Duration) {
        if !self.stream_bound {
            return;
        }
        let position = if self.duration > Duration::ZERO {
            position.min(self.duration)
        } else {
            position
        };
        self.engine.seek(position);
        self.elapsed = position;
        self.emit(PlayerEvent::PositionUpdated { elapsed: position });
    }

    /// Set output volume (clamped to `[0, 1]`)
    pub fn set_volume(&mut self, volume: f32) {
        let volume = if volume.is_finite() {
            volume.clamp(0.0, 1.0)
        } else {
            self.volume
        };
        self.volume = volume;
        self.engine.set_volume(volume);
        self.emit(PlayerEvent::VolumeChanged { volume });
    }

    /// Flip the loop-current-track flag
    pub fn toggle_loop(&mut self) {
        self.loop_current = !self.loop_current;
        self.emit(PlayerEvent::LoopChanged {
            loop_current: self.loop_current,
        });
    }

    // ===== Queue Management =====

    /// Append a track to the queue without starting playback
    ///
    /// The first track added to an empty queue becomes current,
    /// loaded but stopped.
    pub fn add_to_queue(&mut self, track: TrackRef) {
        let was_empty = self.queue.is_empty();
        self.queue.append(track);
        self.emit(PlayerEvent::QueueChanged {
            length: self.queue.len(),
        });
        self.persist_queue();
        if was_empty {
            self.load_current(false);
        }
    }

    /// Replace the whole queue
    ///
    /// The first track of the new queue becomes current and playback
    /// continues in the prior Active/Ready mode; an empty replacement stops
    /// the engine.
    pub fn replace_queue(&mut self, tracks: Vec<TrackRef>) {
        let was_active = self.state == PlayerState::Active;
        self.queue.replace_all(tracks);
        self.emit(PlayerEvent::QueueChanged {
            length: self.queue.len(),
        });
        self.persist_queue();

        if self.queue.is_empty() {
            self.unbind_stream();
            self.set_state(PlayerState::Empty);
            self.emit(PlayerEvent::TrackChanged { track: None });
        } else {
            self.load_current(was_active);
        }
    }

    /// Jump to a queue position and play it
    ///
    /// Out-of-range positions are rejected without any state change.
    pub fn jump_to(&mut self, position: usize) {
        if self.queue.jump_to(position) {
            self.persist_queue();
            self.load_current(true);
        } else {
            debug!(position, "rejecting jump to out-of-range queue position");
        }
    }

    /// Remove the first queue entry with the given track id
    ///
    /// Removing the currently loaded track reloads whatever the repaired
    /// cursor now names, keeping the prior Active/Ready mode; removing any
    /// other entry touches no engine state.
    pub fn remove_from_queue(&mut self, id: &TrackId) {
        let Some(position) = self.queue.position_of(id) else {
            return;
        };
        let was_current = self.queue.cursor() == Some(position);
        let was_active = self.state == PlayerState::Active;

        self.queue.remove_at(position);
        self.emit(PlayerEvent::QueueChanged {
            length: self.queue.len(),
        });
        self.persist_queue();

        if self.queue.is_empty() {
            self.unbind_stream();
            self.set_state(PlayerState::Empty);
            self.emit(PlayerEvent::TrackChanged { track: None });
        } else if was_current {
            if self.queue.current().is_some() {
                self.load_current(was_active);
            } else {
                // Removed the current track from the tail: nothing to play
                self.unbind_stream();
                self.set_state(PlayerState::Ready);
                self.emit(PlayerEvent::TrackChanged { track: None });
            }
        }
    }

    /// Empty the queue and stop the engine
    pub fn clear_queue(&mut self) {
        self.queue.clear();
        self.emit(PlayerEvent::QueueChanged { length: 0 });
        self.persist_queue();
        self.unbind_stream();
        self.set_state(PlayerState::Empty);
        self.emit(PlayerEvent::TrackChanged { track: None });
    }

    // ===== Engine Signals =====

    /// Apply an engine signal against the live state
    ///
    /// Signals carrying a stale generation token belong to a superseded
    /// stream and are discarded outright.
    pub fn handle_signal(&mut self, signal: EngineSignal) {
        if signal.token() != self.generation {
            debug!(
                token = signal.token(),
                current = self.generation,
                "discarding stale engine signal"
            );
            return;
        }

        match signal {
            EngineSignal::Progress { elapsed, .. } => {
                self.elapsed = elapsed;
                self.emit(PlayerEvent::PositionUpdated { elapsed });
            }
            EngineSignal::DurationResolved { duration, .. } => {
                self.duration = duration;
                self.emit(PlayerEvent::DurationResolved { duration });
            }
            EngineSignal::PlayStarted { .. } => {
                // Already Active: the state was set when play was issued
            }
            EngineSignal::Ended { .. } => self.handle_ended(),
            EngineSignal::PlayRefused { reason, .. } => {
                if self.state == PlayerState::Active {
                    warn!(%reason, "playback refused by the runtime");
                    self.set_state(PlayerState::Ready);
                    self.emit(PlayerEvent::Error {
                        message: PlaybackError::PlaybackRefused(reason).to_string(),
                    });
                }
            }
            EngineSignal::LoadFailed { reason, .. } => {
                self.stream_bound = false;
                let state = if self.queue.is_empty() {
                    PlayerState::Empty
                } else {
                    PlayerState::Ready
                };
                self.set_state(state);
                if let Some(track) = self.queue.current() {
                    let err = PlaybackError::LoadFailure {
                        track: track.id.clone(),
                        reason,
                    };
                    warn!(%err, "stream load failed");
                    self.emit(PlayerEvent::Error {
                        message: err.to_string(),
                    });
                }
            }
        }
    }

    /// Natural end of the current stream
    fn handle_ended(&mut self) {
        if self.state != PlayerState::Active {
            // A pause command was applied after the stream completed; the
            // later command wins.
            return;
        }

        if let Some(track) = self.queue.current().cloned() {
            self.emit(PlayerEvent::TrackFinished { track });
        }

        if self.loop_current {
            self.engine.seek(Duration::ZERO);
            self.elapsed = Duration::ZERO;
            self.engine.play(self.generation);
            self.emit(PlayerEvent::PositionUpdated {
                elapsed: Duration::ZERO,
            });
        } else if self.queue.advance().is_some() {
            self.persist_queue();
            self.load_current(true);
        } else {
            // Queue exhausted: the last track stays loaded but stopped
            self.set_state(PlayerState::Ready);
        }
    }

    // ===== State Queries =====

    /// Current controller state
    pub fn state(&self) -> PlayerState {
        self.state
    }

    /// Track at the cursor, if any
    pub fn current_track(&self) -> Option<&TrackRef> {
        self.queue.current()
    }

    /// Read-only queue view
    pub fn queue(&self) -> &[TrackRef] {
        self.queue.tracks()
    }

    /// Cursor position, if a current track exists
    pub fn cursor(&self) -> Option<usize> {
        self.queue.cursor()
    }

    /// Current volume (0.0 - 1.0)
    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Whether the current track loops on completion
    pub fn loop_current(&self) -> bool {
        self.loop_current
    }

    /// Full observable state for UI binding
    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            current_track: self.queue.current().cloned(),
            is_playing: self.state.is_playing(),
            volume: self.volume,
            elapsed: self.elapsed,
            duration: self.duration,
            queue: self.queue.tracks().to_vec(),
            loop_current: self.loop_current,
        }
    }

    /// Drain events emitted since the last call
    pub fn take_events(&mut self) -> Vec<PlayerEvent> {
        std::mem::take(&mut self.pending_events)
    }

    // ===== Internal =====

    /// Resolve and load the current track, optionally starting playback
    ///
    /// On resolution failure the engine is silenced and the controller
    /// degrades to `Ready` with the cursor untouched; the failure surfaces
    /// as a recoverable event.
    fn load_current(&mut self, start: bool) {
        let Some(track) = self.queue.current().cloned() else {
            return;
        };

        match self.resolver.stream_url(&track.id) {
            Ok(url) => {
                self.generation += 1;
                self.engine.load(&url, self.generation);
                self.stream_bound = true;
                self.elapsed = Duration::ZERO;
                self.duration = Duration::ZERO;
                if start {
                    self.engine.play(self.generation);
                    self.set_state(PlayerState::Active);
                } else {
                    self.set_state(PlayerState::Ready);
                }
                self.emit(PlayerEvent::TrackChanged { track: Some(track) });
            }
            Err(err) => {
                // Quarantine whatever stream the engine still holds so its
                // late signals read as stale
                self.generation += 1;
                self.engine.pause();
                self.stream_bound = false;
                self.set_state(PlayerState::Ready);

                let err = PlaybackError::LoadFailure {
                    track: track.id.clone(),
                    reason: err.to_string(),
                };
                warn!(%err, "stream resolution failed");
                self.emit(PlayerEvent::Error {
                    message: err.to_string(),
                });
            }
        }
    }

    /// Stop the engine and forget the bound stream
    fn unbind_stream(&mut self) {
        self.engine.stop();
        self.generation += 1;
        self.stream_bound = false;
        self.elapsed = Duration::ZERO;
        self.duration = Duration::ZERO;
    }

    fn set_state(&mut self, state: PlayerState) {
        if self.state != state {
            self.state = state;
            self.emit(PlayerEvent::StateChanged { state });
        }
    }

    fn persist_queue(&mut self) {
        self.persistence
            .record(self.queue.tracks(), self.queue.cursor().unwrap_or(0));
    }

    fn emit(&mut self, event: PlayerEvent) {
        self.pending_events.push(event);
    }
}
