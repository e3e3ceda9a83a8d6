//! Namity Playback
//!
//! Platform-agnostic playback queue controller for the Namity player.
//!
//! This crate provides:
//! - Ordered play queue with a current-track cursor and atomic repair rules
//! - A state machine mediating between the queue and the audio engine
//! - Generation-token handling for asynchronous engine results
//!   ("last writer wins")
//! - Best-effort queue persistence that never blocks playback
//! - A serialized event loop merging user commands and engine signals
//!
//! # Architecture
//!
//! `namity-playback` knows nothing about actual audio output or HTTP. The
//! audio device is injected behind the [`AudioEngine`] trait, stream
//! locators come from a `namity_core::StreamResolver`, and durable state
//! goes through a `namity_core::StateStore`. Tests substitute fakes for all
//! three.
//!
//! # Example
//!
//! ```rust,no_run
//! use namity_core::{StateStore, StreamResolver};
//! use namity_playback::{AudioEngine, PlaybackConfig, Player};
//! use std::sync::Arc;
//!
//! # fn wire(
//! #     engine: Box<dyn AudioEngine>,
//! #     signals: crossbeam_channel::Receiver<namity_playback::EngineSignal>,
//! #     resolver: Arc<dyn StreamResolver>,
//! #     store: Arc<dyn StateStore>,
//! # ) {
//! let player = Player::spawn(engine, signals, resolver, store, PlaybackConfig::default());
//! let handle = player.handle();
//! handle.set_volume(0.8);
//! handle.next();
//! let snapshot = player.snapshot();
//! println!("{} tracks queued", snapshot.queue.len());
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod controller;
mod engine;
mod error;
mod events;
mod persist;
mod player;
mod queue;
pub mod types;

// Public exports
pub use controller::PlayerController;
pub use engine::{AudioEngine, EngineSignal, LoadToken};
pub use error::PlaybackError;
pub use events::PlayerEvent;
pub use persist::{QueuePersistence, RestoredQueue, CURSOR_KEY, QUEUE_KEY};
pub use player::{Player, PlayerCommand, PlayerHandle};
pub use queue::TrackQueue;
pub use types::{PlaybackConfig, PlayerSnapshot, PlayerState};
