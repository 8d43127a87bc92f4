use super::{decoder, AudioEngine, DecodedAudio, GraphSettings, SourceNode};
use crate::domain::playback::PlaybackError;
use async_trait::async_trait;
use rodio::mixer::Mixer;
use rodio::{Decoder, OutputStreamBuilder, Sink, Source};
use std::io::Cursor;
use std::sync::{mpsc, Arc};
use std::time::{Duration, Instant};

/// Plays through the default output device.
///
/// The output stream is not `Send`, so it lives on its own thread for the
/// lifetime of the engine; only its mixer is shared.
pub struct RodioAudioEngine {
    mixer: Mixer,
    epoch: Instant,
    _shutdown: mpsc::Sender<()>,
}

impl RodioAudioEngine {
    pub fn new() -> Result<Self, PlaybackError> {
        let (mixer_tx, mixer_rx) = mpsc::channel();
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

        std::thread::Builder::new()
            .name("tapecast-audio-output".to_string())
            .spawn(move || {
                let stream = match OutputStreamBuilder::open_default_stream() {
                    Ok(stream) => stream,
                    Err(e) => {
                        let _ = mixer_tx.send(Err(PlaybackError::Device(e.to_string())));
                        return;
                    }
                };
                let _ = mixer_tx.send(Ok(stream.mixer().clone()));
                // Blocks until the engine (and its sender) is dropped
                let _ = shutdown_rx.recv();
                drop(stream);
            })
            .map_err(|e| PlaybackError::Device(e.to_string()))?;

        let mixer = mixer_rx
            .recv()
            .map_err(|_| PlaybackError::Device("audio output thread exited".to_string()))??;

        tracing::info!("Opened default audio output device");

        Ok(Self {
            mixer,
            epoch: Instant::now(),
            _shutdown: shutdown_tx,
        })
    }
}

#[async_trait]
impl AudioEngine for RodioAudioEngine {
    fn name(&self) -> &'static str {
        "rodio"
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
        audio: &DecodedAudio,
        settings: GraphSettings,
    ) -> Result<Box<dyn SourceNode>, PlaybackError> {
        let source = Decoder::new(Cursor::new(audio.data.as_ref().clone()))
            .map_err(|e| PlaybackError::Decode(e.to_string()))?
            .skip_duration(Duration::from_secs_f64(settings.offset.max(0.0)));

        let sink = Sink::connect_new(&self.mixer);
        // Gain and rate go on before the source is appended
        sink.set_volume(settings.gain);
        sink.set_speed(settings.playback_rate);
        sink.append(source);
        sink.play();

        Ok(Box::new(RodioSource { sink }))
    }
}

struct RodioSource {
    sink: Sink,
}

impl SourceNode for RodioSource {
    fn set_playback_rate(&mut self, rate: f32) {
        self.sink.set_speed(rate);
    }

    fn set_gain(&mut self, gain: f32) {
        self.sink.set_volume(gain);
    }

    fn level(&self) -> f32 {
        if self.sink.is_paused() || self.sink.empty() {
            0.0
        } else {
            self.sink.volume()
        }
    }

    fn stop(&mut self) {
        self.sink.stop();
    }
}

impl Drop for RodioSource {
    fn drop(&mut self) {
        self.sink.stop();
    }
}
