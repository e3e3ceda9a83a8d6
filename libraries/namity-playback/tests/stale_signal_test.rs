//! Stale-signal tests for PlayerController
//!
//! The web player this component replaces had two divergent controller
//! implementations because asynchronous engine callbacks kept computing
//! against queue state captured before the callback fired (commanding `next`
//! while an in-flight `ended` handler held old queue contents produced
//! double advances and dropped tracks). These tests pin down the intended
//! behavior: every signal is checked against the live stream generation and
//! discarded when a later command has superseded it.

use namity_core::{StreamResolver, StreamUrl, TrackId, TrackRef};
use namity_playback::{
    AudioEngine, EngineSignal, LoadToken, PlaybackConfig, PlayerController, PlayerState,
};
use namity_storage::MemoryStateStore;
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ============================================================================
// Test Infrastructure
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum EngineCall {
    Load(String, LoadToken),
    Play(LoadToken),
    Pause,
    Seek(Duration),
    SetVolume(f32),
    Stop,
}

#[derive(Clone, Default)]
struct CallLog(Arc<Mutex<Vec<EngineCall>>>);

impl CallLog {
    fn push(&self, call: EngineCall) {
        self.0.lock().unwrap().push(call);
    }

    fn take(&self) -> Vec<EngineCall> {
        std::mem::take(&mut *self.0.lock().unwrap())
    }

    fn last_load_token(&self) -> Option<LoadToken> {
        self.0
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find_map(|call| match call {
                EngineCall::Load(_, token) => Some(*token),
                _ => None,
            })
    }
}

struct FakeEngine {
    calls: CallLog,
}

impl AudioEngine for FakeEngine {
    fn load(&mut self, url: &StreamUrl, token: LoadToken) {
        self.calls.push(EngineCall::Load(url.to_string(), token));
    }

    fn play(&mut self, token: LoadToken) {
        self.calls.push(EngineCall::Play(token));
    }

    fn pause(&mut self) {
        self.calls.push(EngineCall::Pause);
    }

    fn seek(&mut self, position: Duration) {
        self.calls.push(EngineCall::Seek(position));
    }

    fn set_volume(&mut self, volume: f32) {
        self.calls.push(EngineCall::SetVolume(volume));
    }

    fn stop(&mut self) {
        self.calls.push(EngineCall::Stop);
    }
}

struct OkResolver;

impl StreamResolver for OkResolver {
    fn stream_url(&self, id: &TrackId) -> namity_core::Result<StreamUrl> {
        Ok(StreamUrl::new(format!("/api/tracks/{}/stream", id)))
    }
}

fn track(id: &str) -> TrackRef {
    TrackRef::new(TrackId::new(id), format!("Track {}", id))
}

/// Controller playing the first of `ids`; returns the live stream token
fn playing_controller(ids: &[&str]) -> (PlayerController, CallLog, LoadToken) {
    let calls = CallLog::default();
    let mut controller = PlayerController::new(
        Box::new(FakeEngine {
            calls: calls.clone(),
        }),
        Arc::new(OkResolver),
        Arc::new(MemoryStateStore::new()),
        PlaybackConfig::default(),
    );
    for id in ids {
        controller.add_to_queue(track(id));
    }
    controller.resume();
    assert_eq!(controller.state(), PlayerState::Active);
    let token = calls.last_load_token().expect("a stream must be bound");
    calls.take();
    controller.take_events();
    (controller, calls, token)
}

// ============================================================================
// Superseded `ended`
// ============================================================================

#[test]
fn ended_from_before_a_manual_next_is_discarded() {
    // A is playing; the user presses next while A's `ended` is in flight.
    // The command is observed first, the stale signal second.
    let (mut controller, calls, old_token) = playing_controller(&["a", "b", "c"]);

    controller.next();
    assert_eq!(controller.cursor(), Some(1));
    let new_token = calls.last_load_token().unwrap();
    assert_ne!(new_token, old_token);
    calls.take();

    controller.handle_signal(EngineSignal::Ended { token: old_token });

    // No double advance: the stale `ended` belonged to the superseded stream
    assert_eq!(controller.cursor(), Some(1));
    assert_eq!(controller.current_track().unwrap().id.as_str(), "b");
    assert!(calls.take().is_empty());
}

#[test]
fn ended_from_a_removed_stream_is_discarded() {
    // C (the last track) is playing; the user removes it, then C's `ended`
    // arrives late
    let (mut controller, calls, old_token) = playing_controller(&["c"]);

    controller.remove_from_queue(&TrackId::new("c"));
    assert_eq!(controller.state(), PlayerState::Empty);
    calls.take();

    controller.handle_signal(EngineSignal::Ended { token: old_token });

    assert_eq!(controller.state(), PlayerState::Empty);
    assert!(controller.current_track().is_none());
    assert!(calls.take().is_empty());
}

#[test]
fn ended_after_pause_does_not_advance() {
    // The stream completed and `ended` was queued, but the pause command was
    // observed first: the later command wins
    let (mut controller, calls, token) = playing_controller(&["a", "b"]);

    controller.pause();
    assert_eq!(controller.state(), PlayerState::Ready);
    calls.take();

    controller.handle_signal(EngineSignal::Ended { token });

    assert_eq!(controller.state(), PlayerState::Ready);
    assert_eq!(controller.cursor(), Some(0), "no auto-advance while paused");
    assert!(calls.take().is_empty());
}

// ============================================================================
// Superseded `play()` resolutions
// ============================================================================

#[test]
fn stale_play_refusal_cannot_stop_a_later_track() {
    // A's play() is refused, but the user has already switched to B by the
    // time the refusal arrives
    let (mut controller, calls, old_token) = playing_controller(&["a", "b"]);

    controller.next();
    assert_eq!(controller.current_track().unwrap().id.as_str(), "b");
    calls.take();
    controller.take_events();

    controller.handle_signal(EngineSignal::PlayRefused {
        token: old_token,
        reason: "autoplay policy".into(),
    });

    // The refusal belonged to A's superseded stream: B keeps playing and no
    // error is surfaced
    assert_eq!(controller.state(), PlayerState::Active);
    assert!(controller.take_events().is_empty());
}

#[test]
fn stale_load_failure_is_discarded() {
    let (mut controller, calls, old_token) = playing_controller(&["a", "b"]);

    controller.next();
    calls.take();
    controller.take_events();

    controller.handle_signal(EngineSignal::LoadFailed {
        token: old_token,
        reason: "HTTP 500".into(),
    });

    assert_eq!(controller.state(), PlayerState::Active);
    assert!(controller.take_events().is_empty());

    // The live stream still resumes after a pause, proving the binding
    // survived the stale failure
    controller.pause();
    controller.resume();
    assert_eq!(controller.state(), PlayerState::Active);
}

#[test]
fn stale_progress_does_not_touch_position() {
    let (mut controller, calls, old_token) = playing_controller(&["a", "b"]);

    controller.handle_signal(EngineSignal::Progress {
        token: old_token,
        elapsed: Duration::from_secs(30),
    });
    assert_eq!(controller.snapshot().elapsed, Duration::from_secs(30));

    controller.next();
    calls.take();
    assert_eq!(
        controller.snapshot().elapsed,
        Duration::ZERO,
        "loading a new stream resets elapsed"
    );

    controller.handle_signal(EngineSignal::Progress {
        token: old_token,
        elapsed: Duration::from_secs(31),
    });
    assert_eq!(
        controller.snapshot().elapsed,
        Duration::ZERO,
        "old stream progress is stale"
    );
}

#[test]
fn stale_duration_does_not_touch_snapshot() {
    let (mut controller, calls, old_token) = playing_controller(&["a", "b"]);

    controller.next();
    calls.take();

    controller.handle_signal(EngineSignal::DurationResolved {
        token: old_token,
        duration: Duration::from_secs(999),
    });

    assert_eq!(controller.snapshot().duration, Duration::ZERO);
}

// ============================================================================
// Interleavings across queue mutation
// ============================================================================

#[test]
fn ended_is_applied_against_live_queue_contents() {
    // While A plays, the user appends D; the subsequent `ended` must see the
    // live queue (A,B,C,D), not the one captured at load time
    let (mut controller, calls, token) = playing_controller(&["a"]);

    controller.add_to_queue(track("d"));
    calls.take();

    controller.handle_signal(EngineSignal::Ended { token });

    assert_eq!(controller.state(), PlayerState::Active);
    assert_eq!(controller.current_track().unwrap().id.as_str(), "d");
    assert!(calls
        .take()
        .iter()
        .any(|c| matches!(c, EngineCall::Load(url, _) if url == "/api/tracks/d/stream")));
}

#[test]
fn ended_after_removals_resolves_current_from_live_cursor() {
    // A plays at cursor 0; the user removes B (ahead of the cursor) before
    // A ends. The advance must land on C, the live next track.
    let (mut controller, calls, token) = playing_controller(&["a", "b", "c"]);

    controller.remove_from_queue(&TrackId::new("b"));
    assert_eq!(controller.cursor(), Some(0));
    calls.take();

    controller.handle_signal(EngineSignal::Ended { token });

    assert_eq!(controller.cursor(), Some(1));
    assert_eq!(controller.current_track().unwrap().id.as_str(), "c");
    assert_eq!(controller.state(), PlayerState::Active);
}

#[test]
fn rapid_skips_only_honor_the_latest_stream() {
    // Mash the next button: each skip supersedes the previous stream, and
    // only the last generation's signals count
    let (mut controller, calls, first_token) = playing_controller(&["a", "b", "c", "d"]);

    controller.next();
    let second_token = calls.last_load_token().unwrap();
    controller.next();
    let third_token = calls.last_load_token().unwrap();
    calls.take();

    assert_eq!(controller.current_track().unwrap().id.as_str(), "c");

    // Late arrivals from the dead generations change nothing
    controller.handle_signal(EngineSignal::Ended { token: first_token });
    controller.handle_signal(EngineSignal::PlayRefused {
        token: second_token,
        reason: "late".into(),
    });
    assert_eq!(controller.current_track().unwrap().id.as_str(), "c");
    assert_eq!(controller.state(), PlayerState::Active);
    assert!(calls.take().is_empty());

    // The live generation still works
    controller.handle_signal(EngineSignal::Ended { token: third_token });
    assert_eq!(controller.current_track().unwrap().id.as_str(), "d");
}
