use super::error::PlaybackError;
use super::session::PlaybackSession;
use super::state::{PlaybackState, PlaybackStatus};
use crate::infrastructure::audio::{AudioEngine, DecodedAudio, GraphSettings};
use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Position refresh interval
pub const TICK_INTERVAL: Duration = Duration::from_millis(50);

pub const MIN_SPEED: f32 = 0.5;
pub const MAX_SPEED: f32 = 2.0;

struct Shared {
    audio: Option<DecodedAudio>,
    session: Option<PlaybackSession>,
    ticker: Option<JoinHandle<()>>,
    /// Bumped on every teardown; a ticker only acts for the generation it
    /// was spawned with
    generation: u64,
    state: PlaybackState,
}

impl Shared {
    /// Stop the ticker and release the source node
    fn teardown(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
        self.session = None;
        self.generation += 1;
    }
}

struct Inner {
    engine: Arc<dyn AudioEngine>,
    shared: Mutex<Shared>,
    state_tx: watch::Sender<PlaybackState>,
}

impl Inner {
    fn publish(&self, state: &PlaybackState) {
        self.state_tx.send_replace(state.clone());
    }

    /// One timer tick. Returns false once there is nothing left to track,
    /// or when the ticker belongs to a session that has been replaced.
    fn tick(&self, generation: u64) -> bool {
        let mut shared = self.shared.lock();
        if shared.generation != generation {
            return false;
        }
        let now = self.engine.now();
        let duration = shared.state.duration;

        let Some(session) = shared.session.as_ref() else {
            return false;
        };
        let position = session.position(now, duration);
        let level = session.level();

        if position >= duration {
            // Snap exactly to the end so completion is unambiguous.
            // This is the current ticker, so its handle is just released.
            shared.ticker = None;
            shared.teardown();
            shared.state.current_time = duration;
            shared.state.set_status(PlaybackStatus::Ended);
            tracing::debug!(duration_secs = duration, "Playback reached end of track");
            self.publish(&shared.state);
            return false;
        }

        shared.state.current_time = position;
        shared.state.level = level;
        self.publish(&shared.state);
        true
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        self.shared.get_mut().teardown();
    }
}

/// Plays one decoded track at a time and publishes its state.
///
/// Every `play` builds a fresh source node; position comes from a fixed
/// interval timer reading the engine clock, not from the source itself.
/// Must be driven from within a tokio runtime.
pub struct PlaybackEngine {
    inner: Arc<Inner>,
}

impl PlaybackEngine {
    pub fn new(engine: Arc<dyn AudioEngine>) -> Self {
        let state = PlaybackState::default();
        let (state_tx, _) = watch::channel(state.clone());
        Self {
            inner: Arc::new(Inner {
                engine,
                shared: Mutex::new(Shared {
                    audio: None,
                    session: None,
                    ticker: None,
                    generation: 0,
                    state,
                }),
                state_tx,
            }),
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.inner.shared.lock().state.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<PlaybackState> {
        self.inner.state_tx.subscribe()
    }

    /// Replace the current track. Playback stops.
    pub fn load(&self, audio: DecodedAudio) {
        let mut shared = self.inner.shared.lock();
        shared.teardown();
        shared.state.duration = audio.duration.max(0.0);
        shared.state.current_time = 0.0;
        shared.state.set_status(PlaybackStatus::Stopped);
        shared.audio = Some(audio);
        tracing::debug!(duration_secs = shared.state.duration, "Track loaded");
        self.inner.publish(&shared.state);
    }

    /// Start playing from `from_offset` seconds, replacing any active source
    pub fn play(&self, from_offset: f64) -> Result<(), PlaybackError> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| PlaybackError::Device(format!("no async runtime: {}", e)))?;

        let mut shared = self.inner.shared.lock();
        shared.teardown();

        let Some(audio) = shared.audio.as_ref() else {
            return Err(PlaybackError::NothingLoaded);
        };

        let duration = shared.state.duration;
        let offset = if from_offset.is_finite() {
            from_offset.clamp(0.0, duration)
        } else {
            0.0
        };
        let settings = GraphSettings {
            offset,
            gain: shared.state.effective_gain(),
            playback_rate: shared.state.speed,
        };

        let source = match self.inner.engine.start(audio, settings) {
            Ok(source) => source,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    engine = self.inner.engine.name(),
                    "Could not start playback"
                );
                shared.state.set_status(PlaybackStatus::Failed(e.to_string()));
                self.inner.publish(&shared.state);
                return Err(e);
            }
        };

        let now = self.inner.engine.now();
        shared.session = Some(PlaybackSession::new(source, offset, now, shared.state.speed));
        shared.state.current_time = offset;
        shared.state.set_status(PlaybackStatus::Playing);
        let generation = shared.generation;
        let ticker = run_ticker(Arc::downgrade(&self.inner), generation);
        shared.ticker = Some(runtime.spawn(ticker));

        tracing::debug!(offset_secs = offset, speed = shared.state.speed, "Playback started");
        self.inner.publish(&shared.state);
        Ok(())
    }

    /// Continue from the current position
    pub fn resume(&self) -> Result<(), PlaybackError> {
        let current_time = self.state().current_time;
        self.play(current_time)
    }

    pub fn pause(&self) {
        let mut shared = self.inner.shared.lock();
        if shared.state.status != PlaybackStatus::Playing {
            return;
        }

        let now = self.inner.engine.now();
        let duration = shared.state.duration;
        if let Some(session) = shared.session.as_ref() {
            shared.state.current_time = session.position(now, duration);
        }
        shared.teardown();
        shared.state.set_status(PlaybackStatus::Paused);

        tracing::debug!(position_secs = shared.state.current_time, "Playback paused");
        self.inner.publish(&shared.state);
    }

    /// Reposition and restart: there is no in-place scrub of a live source
    pub fn seek(&self, time: f64) -> Result<(), PlaybackError> {
        self.pause();
        let duration = self.inner.shared.lock().state.duration;
        let target = if time.is_finite() { time.clamp(0.0, duration) } else { 0.0 };
        self.play(target)
    }

    pub fn stop(&self) {
        let mut shared = self.inner.shared.lock();
        shared.teardown();
        shared.state.current_time = 0.0;
        shared.state.set_status(PlaybackStatus::Stopped);
        tracing::debug!("Playback stopped");
        self.inner.publish(&shared.state);
    }

    pub fn set_volume(&self, volume: f32) {
        let mut shared = self.inner.shared.lock();
        shared.state.volume = if volume.is_finite() { volume.clamp(0.0, 1.0) } else { 1.0 };
        self.apply_gain(&mut shared);
    }

    pub fn toggle_mute(&self) -> bool {
        let mut shared = self.inner.shared.lock();
        shared.state.muted = !shared.state.muted;
        self.apply_gain(&mut shared);
        shared.state.muted
    }

    fn apply_gain(&self, shared: &mut Shared) {
        let gain = shared.state.effective_gain();
        if let Some(session) = shared.session.as_mut() {
            session.set_gain(gain);
        }
        self.inner.publish(&shared.state);
    }

    /// Adjusts the active source's playback rate only; timings are untouched
    pub fn set_speed(&self, speed: f32) {
        let speed = if speed.is_finite() {
            speed.clamp(MIN_SPEED, MAX_SPEED)
        } else {
            1.0
        };

        let mut shared = self.inner.shared.lock();
        let now = self.inner.engine.now();
        let duration = shared.state.duration;
        shared.state.speed = speed;
        if let Some(session) = shared.session.as_mut() {
            session.set_speed(speed, now, duration);
        }
        self.inner.publish(&shared.state);
    }
}

async fn run_ticker(inner: Weak<Inner>, generation: u64) {
    let mut interval = tokio::time::interval(TICK_INTERVAL);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // The first tick completes immediately
    interval.tick().await;

    loop {
        interval.tick().await;
        let Some(inner) = inner.upgrade() else {
            break;
        };
        if !inner.tick(generation) {
            break;
        }
    }
}
