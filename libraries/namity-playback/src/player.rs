//! Player facade
//!
//! Runs the [`PlayerController`] on its own thread and funnels user commands
//! and engine signals into one ordered stream, so every transition is
//! applied against the state left by the previous one. Observable state is
//! published through a single atomically-replaced snapshot; UI events drain
//! from a channel.

use crate::{
    controller::PlayerController,
    engine::{AudioEngine, EngineSignal},
    events::PlayerEvent,
    types::{PlaybackConfig, PlayerSnapshot},
};
use crossbeam_channel::{never, select, Receiver, Sender};
use namity_core::{StateStore, StreamResolver, TrackId, TrackRef};
use std::sync::{Arc, RwLock};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Commands sent to the controller thread
#[derive(Debug, Clone)]
pub enum PlayerCommand {
    /// Play a track, enqueueing it first if absent
    PlayTrack(TrackRef),

    /// Pause playback
    Pause,

    /// Resume the current track
    Resume,

    /// Seek within the current stream
    Seek(Duration),

    /// Set volume (0.0 - 1.0)
    SetVolume(f32),

    /// Skip to next track
    Next,

    /// Go to previous track
    Previous,

    /// Append a track to the queue
    AddToQueue(TrackRef),

    /// Replace the whole queue
    ReplaceQueue(Vec<TrackRef>),

    /// Jump to a queue position and play it
    JumpTo(usize),

    /// Remove the first entry with this track id
    RemoveFromQueue(TrackId),

    /// Empty the queue
    ClearQueue,

    /// Flip the loop-current-track flag
    ToggleLoop,

    /// Stop the controller thread after a final persist
    Shutdown,
}

/// Cloneable command sender for UI code
///
/// Commands sent after the player has shut down are dropped.
#[derive(Debug, Clone)]
pub struct PlayerHandle {
    command_tx: Sender<PlayerCommand>,
}

impl PlayerHandle {
    /// Play a track, enqueueing it first if absent
    pub fn play_track(&self, track: TrackRef) {
        self.send(PlayerCommand::PlayTrack(track));
    }

    /// Pause playback
    pub fn pause(&self) {
        self.send(PlayerCommand::Pause);
    }

    /// Resume the current track
    pub fn resume(&self) {
        self.send(PlayerCommand::Resume);
    }

    /// Seek within the current stream
    pub fn seek(&self, position: Duration) {
        self.send(PlayerCommand::Seek(position));
    }

    /// Set volume (0.0 - 1.0)
    pub fn set_volume(&self, volume: f32) {
        self.send(PlayerCommand::SetVolume(volume));
    }

    /// Skip to next track
    pub fn next(&self) {
        self.send(PlayerCommand::Next);
    }

    /// Go to previous track
    pub fn previous(&self) {
        self.send(PlayerCommand::Previous);
    }

    /// Append a track to the queue
    pub fn add_to_queue(&self, track: TrackRef) {
        self.send(PlayerCommand::AddToQueue(track));
    }

    /// Replace the whole queue
    pub fn replace_queue(&self, tracks: Vec<TrackRef>) {
        self.send(PlayerCommand::ReplaceQueue(tracks));
    }

    /// Jump to a queue position and play it
    pub fn jump_to(&self, position: usize) {
        self.send(PlayerCommand::JumpTo(position));
    }

    /// Remove the first entry with this track id
    pub fn remove_from_queue(&self, id: TrackId) {
        self.send(PlayerCommand::RemoveFromQueue(id));
    }

    /// Empty the queue
    pub fn clear_queue(&self) {
        self.send(PlayerCommand::ClearQueue);
    }

    /// Flip the loop-current-track flag
    pub fn toggle_loop(&self) {
        self.send(PlayerCommand::ToggleLoop);
    }

    fn send(&self, command: PlayerCommand) {
        let _ = self.command_tx.send(command);
    }
}

/// Controller thread plus its communication endpoints
///
/// Dropping the player closes the command channel; the controller thread
/// performs a final queue persist on its way out and is joined.
pub struct Player {
    command_tx: Sender<PlayerCommand>,
    event_rx: Receiver<PlayerEvent>,
    snapshot: Arc<RwLock<PlayerSnapshot>>,
    worker: Option<JoinHandle<()>>,
}

impl Player {
    /// Start the controller thread
    ///
    /// `signals` is the receiving end of the channel the engine emits its
    /// [`EngineSignal`]s on; the engine handle itself moves into the
    /// controller.
    pub fn spawn(
        engine: Box<dyn AudioEngine>,
        signals: Receiver<EngineSignal>,
        resolver: Arc<dyn StreamResolver>,
        store: Arc<dyn StateStore>,
        config: PlaybackConfig,
    ) -> Self {
        let (command_tx, command_rx) = crossbeam_channel::unbounded();
        let (event_tx, event_rx) = crossbeam_channel::unbounded();
        let snapshot = Arc::new(RwLock::new(PlayerSnapshot::default()));

        let shared = Arc::clone(&snapshot);
        let worker = thread::spawn(move || {
            Self::event_loop(
                engine, signals, resolver, store, config, &command_rx, &event_tx, &shared,
            );
        });

        Self {
            command_tx,
            event_rx,
            snapshot,
            worker: Some(worker),
        }
    }

    /// Controller event loop
    ///
    /// One iteration = one transition: whichever of the two inbound channels
    /// delivers next is applied against the controller's live state, then
    /// the snapshot is republished and pending events flushed.
    #[allow(clippy::too_many_arguments)]
    fn event_loop(
        engine: Box<dyn AudioEngine>,
        signals: Receiver<EngineSignal>,
        resolver: Arc<dyn StreamResolver>,
        store: Arc<dyn StateStore>,
        config: PlaybackConfig,
        command_rx: &Receiver<PlayerCommand>,
        event_tx: &Sender<PlayerEvent>,
        shared: &RwLock<PlayerSnapshot>,
    ) {
        let mut controller = PlayerController::new(engine, resolver, store, config);
        let mut signals = signals;
        Self::publish(&mut controller, shared, event_tx);

        loop {
            select! {
                recv(command_rx) -> msg => match msg {
                    // Final persist happens when the controller (and its
                    // persistence writer) drop at the end of this scope
                    Ok(PlayerCommand::Shutdown) | Err(_) => break,
                    Ok(command) => Self::apply(&mut controller, command),
                },
                recv(signals) -> msg => match msg {
                    Ok(signal) => controller.handle_signal(signal),
                    Err(_) => {
                        // Engine gone; keep serving commands
                        signals = never();
                        continue;
                    }
                },
            }
            Self::publish(&mut controller, shared, event_tx);
        }
    }

    fn apply(controller: &mut PlayerController, command: PlayerCommand) {
        match command {
            PlayerCommand::PlayTrack(track) => controller.play_track(track),
            PlayerCommand::Pause => controller.pause(),
            PlayerCommand::Resume => controller.resume(),
            PlayerCommand::Seek(position) => controller.seek(position),
            PlayerCommand::SetVolume(volume) => controller.set_volume(volume),
            PlayerCommand::Next => controller.next(),
            PlayerCommand::Previous => controller.previous(),
            PlayerCommand::AddToQueue(track) => controller.add_to_queue(track),
            PlayerCommand::ReplaceQueue(tracks) => controller.replace_queue(tracks),
            PlayerCommand::JumpTo(position) => controller.jump_to(position),
            PlayerCommand::RemoveFromQueue(id) => controller.remove_from_queue(&id),
            PlayerCommand::ClearQueue => controller.clear_queue(),
            PlayerCommand::ToggleLoop => controller.toggle_loop(),
            // Intercepted by the event loop before dispatch
            PlayerCommand::Shutdown => {}
        }
    }

    /// Republish observable state and flush events
    ///
    /// The snapshot is replaced whole under one write lock: readers see
    /// either the state before a transition or after it, never a mix.
    fn publish(
        controller: &mut PlayerController,
        shared: &RwLock<PlayerSnapshot>,
        event_tx: &Sender<PlayerEvent>,
    ) {
        if let Ok(mut slot) = shared.write() {
            *slot = controller.snapshot();
        }
        for event in controller.take_events() {
            let _ = event_tx.send(event);
        }
    }

    /// Command sender for UI code
    pub fn handle(&self) -> PlayerHandle {
        PlayerHandle {
            command_tx: self.command_tx.clone(),
        }
    }

    /// Current observable state
    pub fn snapshot(&self) -> PlayerSnapshot {
        match self.snapshot.read() {
            Ok(snapshot) => snapshot.clone(),
            Err(_) => PlayerSnapshot::default(),
        }
    }

    /// Try to receive the next UI event (non-blocking)
    pub fn try_recv_event(&self) -> Option<PlayerEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Receive the next UI event (blocking)
    pub fn recv_event(&self) -> Option<PlayerEvent> {
        self.event_rx.recv().ok()
    }
}

impl Drop for Player {
    fn drop(&mut self) {
        // Outstanding PlayerHandle clones may keep the channel alive, so an
        // explicit shutdown command is sent rather than relying on
        // disconnect
        let _ = self.command_tx.send(PlayerCommand::Shutdown);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}
