pub mod decoder;
pub mod headless;
#[cfg(feature = "device-output")]
pub mod rodio_engine;

pub use decoder::probe;
pub use headless::HeadlessAudioEngine;
#[cfg(feature = "device-output")]
pub use rodio_engine::RodioAudioEngine;

use crate::domain::playback::PlaybackError;
use async_trait::async_trait;
use std::sync::Arc;

/// Encoded audio plus the properties the decoder reported for it
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    pub data: Arc<Vec<u8>>,
    /// Authoritative duration in seconds
    pub duration: f64,
    pub sample_rate: u32,
    pub channels: u16,
}

/// Parameters applied to a freshly built source graph
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphSettings {
    pub offset: f64,
    pub gain: f32,
    pub playback_rate: f32,
}

/// One playing source (source → analysis → gain → output).
///
/// Source nodes are single-use: once stopped they cannot be restarted.
pub trait SourceNode: Send {
    fn set_playback_rate(&mut self, rate: f32);
    fn set_gain(&mut self, gain: f32);
    /// Output level seen by the analysis stage, in [0, 1]
    fn level(&self) -> f32;
    fn stop(&mut self);
}

/// Audio platform capability, chosen once at startup
#[async_trait]
pub trait AudioEngine: Send + Sync {
    fn name(&self) -> &'static str;

    async fn decode(&self, bytes: Arc<Vec<u8>>) -> Result<DecodedAudio, PlaybackError>;

    /// Audio clock in seconds
    fn now(&self) -> f64;

    fn start(
        &self,
        audio: &DecodedAudio,
        settings: GraphSettings,
    ) -> Result<Box<dyn SourceNode>, PlaybackError>;
}

/// Device output when compiled in and available, headless otherwise
pub fn default_engine() -> Arc<dyn AudioEngine> {
    #[cfg(feature = "device-output")]
    {
        match RodioAudioEngine::new() {
            Ok(engine) => return Arc::new(engine),
            Err(e) => {
                tracing::warn!(error = %e, "Audio device unavailable, using headless engine");
            }
        }
    }

    Arc::new(HeadlessAudioEngine::new())
}
