use super::error::{MasteringError, TrackError};
use super::model::{Track, TrackRecord, TrackSummary};
use crate::domain::assembly::assembler::estimate_byte_lengths;
use crate::domain::assembly::{rescale, AssemblyError, AudioAssembler, PauseModel};
use crate::domain::normalizer::TextNormalizer;
use crate::domain::script::Script;
use crate::domain::tts::{OutputFormat, SynthesisServiceApi};
use crate::infrastructure::audio::{AudioEngine, DecodedAudio};
use crate::infrastructure::repositories::{FileTrackRepository, MasteringRepository};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MasteringSettings {
    pub target_lufs: f32,
    pub timeout: Duration,
}

impl Default for MasteringSettings {
    fn default() -> Self {
        Self {
            target_lufs: -14.0,
            timeout: Duration::from_secs(30),
        }
    }
}

pub struct TrackService {
    synthesis: Arc<dyn SynthesisServiceApi>,
    engine: Arc<dyn AudioEngine>,
    track_repo: Arc<FileTrackRepository>,
    mastering: Option<(Arc<dyn MasteringRepository>, MasteringSettings)>,
    output_format: OutputFormat,
    pause_model: PauseModel,
}

impl TrackService {
    pub fn new(
        synthesis: Arc<dyn SynthesisServiceApi>,
        engine: Arc<dyn AudioEngine>,
        track_repo: Arc<FileTrackRepository>,
        output_format: OutputFormat,
        pause_model: PauseModel,
    ) -> Self {
        Self {
            synthesis,
            engine,
            track_repo,
            mastering: None,
            output_format,
            pause_model,
        }
    }

    pub fn with_mastering(
        mut self,
        mastering_repo: Arc<dyn MasteringRepository>,
        settings: MasteringSettings,
    ) -> Self {
        self.mastering = Some((mastering_repo, settings));
        self
    }

    fn assembler(&self, output_format: &OutputFormat) -> Result<AudioAssembler, AssemblyError> {
        AudioAssembler::new(output_format.bytes_per_second(), self.pause_model)
    }

    /// Best-effort mastering. `None` means keep the unmastered audio.
    async fn master(&self, audio: &[u8]) -> Option<Vec<u8>> {
        let (repo, settings) = self.mastering.as_ref()?;

        let result = match tokio::time::timeout(
            settings.timeout,
            repo.master(audio, settings.target_lufs),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(MasteringError::Timeout(settings.timeout)),
        };

        match result {
            Ok(mastered) => Some(mastered),
            Err(e) => {
                tracing::warn!(error = %e, "Mastering failed, keeping unmastered audio");
                None
            }
        }
    }

    async fn decode(&self, audio: Vec<u8>) -> Result<DecodedAudio, TrackError> {
        Ok(self.engine.decode(Arc::new(audio)).await?)
    }
}

#[async_trait]
pub trait TrackServiceApi: Send + Sync {
    /// Normalize, synthesize, assemble, master and decode a script into a
    /// playable track, and store its record.
    ///
    /// `seed` fixes interjection choice and pause jitter; a random one is
    /// drawn when absent.
    async fn generate(&self, script: &Script, seed: Option<u64>) -> Result<Track, TrackError>;

    /// Rebuild a playable track from a stored record
    async fn reload(&self, record: TrackRecord) -> Result<Track, TrackError>;

    async fn load(&self, id: Uuid) -> Result<Track, TrackError>;

    async fn list(&self) -> Result<Vec<TrackSummary>, TrackError>;
}

#[async_trait]
impl TrackServiceApi for TrackService {
    async fn generate(&self, script: &Script, seed: Option<u64>) -> Result<Track, TrackError> {
        let start_time = std::time::Instant::now();
        let seed = seed.unwrap_or_else(rand::random);

        tracing::info!(
            title = %script.title,
            line_count = script.lines.len(),
            seed,
            "Generating track"
        );

        let lines = TextNormalizer::with_seed(seed).normalize_script(&script.lines);
        let chunks = self.synthesis.synthesize_script(&lines).await?;

        let assembler = self.assembler(&self.output_format)?;
        let mut timing_rng = ChaCha20Rng::seed_from_u64(seed);
        let assembled = assembler.assemble(chunks, &lines, &mut timing_rng)?;
        if assembled.audio.is_empty() {
            return Err(AssemblyError::NoAudio.into());
        }

        // Timings always come from the unmastered chunk lengths
        let (audio, mastered) = match self.master(&assembled.audio).await {
            Some(mastered_audio) => match self.decode(mastered_audio).await {
                Ok(decoded) => (decoded, true),
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        "Mastered audio did not decode, keeping unmastered audio"
                    );
                    (self.decode(assembled.audio.clone()).await?, false)
                }
            },
            None => (self.decode(assembled.audio.clone()).await?, false),
        };

        let timings = rescale(&assembled.timings, audio.duration);

        let record = TrackRecord {
            id: Uuid::new_v4(),
            title: script.title.clone(),
            created_at: chrono::Utc::now(),
            speaker_names: script.speaker_names.clone(),
            lines,
            audio_base64: STANDARD.encode(audio.data.as_slice()),
            chunk_byte_lengths: Some(assembled.chunk_byte_lengths),
            timing_seed: seed,
            output_format: self.output_format.to_string(),
            mastered,
        };
        self.track_repo.save(&record).await?;

        tracing::info!(
            track_id = %record.id,
            duration_secs = audio.duration,
            estimated_duration_secs = assembled.estimated_duration,
            mastered,
            latency_ms = start_time.elapsed().as_millis() as u64,
            "Track generated"
        );

        Ok(Track {
            record,
            audio,
            timings,
        })
    }

    async fn reload(&self, record: TrackRecord) -> Result<Track, TrackError> {
        let bytes = record.audio_bytes()?;
        let output_format = OutputFormat::parse(&record.output_format).ok_or_else(|| {
            TrackError::InvalidRecord(format!("unknown output format {}", record.output_format))
        })?;

        let byte_lengths = match &record.chunk_byte_lengths {
            Some(lengths) if lengths.len() == record.lines.len() => lengths.clone(),
            other => {
                tracing::warn!(
                    track_id = %record.id,
                    stored_lengths = ?other.as_ref().map(Vec::len),
                    line_count = record.lines.len(),
                    "Track record has no usable chunk lengths, estimating from text"
                );
                estimate_byte_lengths(bytes.len(), &record.lines)
            }
        };

        let mut timing_rng = ChaCha20Rng::seed_from_u64(record.timing_seed);
        let estimated = self.assembler(&output_format)?.compute_timings(
            &byte_lengths,
            &record.lines,
            &mut timing_rng,
        )?;

        let audio = self.decode(bytes).await?;
        let timings = rescale(&estimated, audio.duration);

        tracing::info!(
            track_id = %record.id,
            duration_secs = audio.duration,
            line_count = record.lines.len(),
            "Track reloaded"
        );

        Ok(Track {
            record,
            audio,
            timings,
        })
    }

    async fn load(&self, id: Uuid) -> Result<Track, TrackError> {
        let record = self.track_repo.load(id).await?;
        self.reload(record).await
    }

    async fn list(&self) -> Result<Vec<TrackSummary>, TrackError> {
        Ok(self.track_repo.list().await?)
    }
}
