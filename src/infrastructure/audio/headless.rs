use super::{decoder, AudioEngine, DecodedAudio, GraphSettings, SourceNode};
use crate::domain::playback::PlaybackError;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::time::Instant;

/// Engine without an output device. Decodes for real, keeps time on the
/// tokio clock and produces silent source nodes.
pub struct HeadlessAudioEngine {
    epoch: Instant,
    active: Arc<AtomicUsize>,
}

impl HeadlessAudioEngine {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
            active: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Source nodes started and not yet stopped
    pub fn active_sources(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }
}

impl Default for HeadlessAudioEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AudioEngine for HeadlessAudioEngine {
    fn name(&self) -> &'static str {
        "headless"
    }

    async fn decode(&self, bytes: Arc<Vec<u8>>) -> Result<DecodedAudio, PlaybackError> {
        let data = bytes.clone();
        let info = tokio::task::spawn_blocking(move || decoder::probe(&data))
            .await
            .map_err(|e| PlaybackError::Decode(format!("decode task failed: {}", e)))??;

        Ok(DecodedAudio {
            data: bytes,
            duration: info.duration,
            sample_rate: info.sample_rate,
            channels: info.channels,
        })
    }

    fn now(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }

    fn start(
        &self,
        _audio: &DecodedAudio,
        settings: GraphSettings,
    ) -> Result<Box<dyn SourceNode>, PlaybackError> {
        self.active.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(
            engine = self.name(),
            offset_secs = settings.offset,
            gain = settings.gain,
            playback_rate = settings.playback_rate,
            "Source node started"
        );
        Ok(Box::new(HeadlessSource {
            gain: settings.gain,
            playback_rate: settings.playback_rate,
            stopped: false,
            active: self.active.clone(),
        }))
    }
}

struct HeadlessSource {
    gain: f32,
    playback_rate: f32,
    stopped: bool,
    active: Arc<AtomicUsize>,
}

impl SourceNode for HeadlessSource {
    fn set_playback_rate(&mut self, rate: f32) {
        self.playback_rate = rate;
    }

    fn set_gain(&mut self, gain: f32) {
        self.gain = gain;
    }

    fn level(&self) -> f32 {
        0.0
    }

    fn stop(&mut self) {
        if !self.stopped {
            self.stopped = true;
            self.active.fetch_sub(1, Ordering::SeqCst);
        }
    }
}

impl Drop for HeadlessSource {
    fn drop(&mut self) {
        self.stop();
    }
}
