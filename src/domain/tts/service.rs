use super::error::TtsServiceError;
use crate::domain::script::{NormalizedLine, Speaker};
use crate::domain::voice::{VoiceConfig, VoiceProfile};
use crate::infrastructure::repositories::TtsRepository;
use async_trait::async_trait;
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;

/// Audio bytes returned for exactly one dialogue line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioChunk {
    pub speaker: Speaker,
    pub bytes: Vec<u8>,
    pub byte_length: usize,
}

impl AudioChunk {
    pub fn new(speaker: Speaker, bytes: Vec<u8>) -> Self {
        let byte_length = bytes.len();
        Self {
            speaker,
            bytes,
            byte_length,
        }
    }
}

/// Fixed-delay retry discipline for synthesis calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per line, including the first
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_millis(1000),
        }
    }
}

pub struct SynthesisService {
    tts_repo: Arc<dyn TtsRepository>,
    voices: VoiceConfig,
    retry: RetryPolicy,
    cache: Option<Cache<String, Vec<u8>>>,
}

impl SynthesisService {
    pub fn new(
        tts_repo: Arc<dyn TtsRepository>,
        voices: VoiceConfig,
        retry: RetryPolicy,
        cache_enabled: bool,
    ) -> Self {
        // Initialize cache if enabled
        let cache = if cache_enabled {
            Some(
                Cache::builder()
                    .max_capacity(500)
                    .time_to_idle(Duration::from_secs(30 * 60)) // 30 minutes, refreshes on access
                    .build(),
            )
        } else {
            None
        };

        Self {
            tts_repo,
            voices,
            retry,
            cache,
        }
    }

    pub fn voices(&self) -> &VoiceConfig {
        &self.voices
    }
}

#[async_trait]
pub trait SynthesisServiceApi: Send + Sync {
    /// Synthesize one line, retrying transient failures with a fixed delay
    async fn synthesize_line(
        &self,
        line_index: usize,
        text: &str,
        profile: &VoiceProfile,
    ) -> Result<Vec<u8>, TtsServiceError>;

    /// Synthesize every line of a script, one at a time and in order.
    ///
    /// The first line that cannot be synthesized aborts the whole operation;
    /// chunks already produced are discarded.
    async fn synthesize_script(
        &self,
        lines: &[NormalizedLine],
    ) -> Result<Vec<AudioChunk>, TtsServiceError>;
}

#[async_trait]
impl SynthesisServiceApi for SynthesisService {
    async fn synthesize_line(
        &self,
        line_index: usize,
        text: &str,
        profile: &VoiceProfile,
    ) -> Result<Vec<u8>, TtsServiceError> {
        let cache_key = format!("{}:{}", profile.voice_id, text);
        if let Some(cache) = &self.cache {
            if let Some(cached) = cache.get(&cache_key).await {
                tracing::debug!(
                    line_index,
                    cached_audio_size = cached.len(),
                    "Synthesis cache hit"
                );
                return Ok(cached);
            }
        }

        let mut attempt = 0;
        let audio = loop {
            attempt += 1;
            match self.tts_repo.synthesize(text, profile).await {
                Ok(audio) => break audio,
                Err(e) if e.is_retryable() && attempt < self.retry.max_attempts => {
                    tracing::warn!(
                        line_index,
                        attempt,
                        max_attempts = self.retry.max_attempts,
                        retry_delay_ms = self.retry.delay.as_millis() as u64,
                        error = %e,
                        "Synthesis attempt failed, retrying"
                    );
                    tokio::time::sleep(self.retry.delay).await;
                }
                Err(e) if e.is_retryable() => {
                    tracing::error!(
                        line_index,
                        attempts = attempt,
                        error = %e,
                        "Synthesis retries exhausted"
                    );
                    return Err(TtsServiceError::Exhausted {
                        line_index,
                        attempts: attempt,
                        source: Box::new(e),
                    });
                }
                Err(e) => {
                    tracing::error!(line_index, attempt, error = %e, "Synthesis failed");
                    return Err(e);
                }
            }
        };

        if let Some(cache) = &self.cache {
            cache.insert(cache_key, audio.clone()).await;
        }

        Ok(audio)
    }

    async fn synthesize_script(
        &self,
        lines: &[NormalizedLine],
    ) -> Result<Vec<AudioChunk>, TtsServiceError> {
        let start_time = std::time::Instant::now();
        let mut chunks = Vec::with_capacity(lines.len());

        for (index, line) in lines.iter().enumerate() {
            let profile = self.voices.for_speaker(line.speaker);

            // Nothing to voice (the line was only stage directions)
            if line.cleaned_text.is_empty() {
                tracing::debug!(line_index = index, "Skipping synthesis for empty line");
                chunks.push(AudioChunk::new(line.speaker, Vec::new()));
                continue;
            }

            tracing::info!(
                line_index = index,
                speaker = %line.speaker,
                voice_id = %profile.voice_id,
                text_length = line.cleaned_text.len(),
                "Synthesizing line"
            );

            let audio = self
                .synthesize_line(index, &line.cleaned_text, profile)
                .await?;

            tracing::debug!(
                line_index = index,
                byte_length = audio.len(),
                "Line synthesized"
            );
            chunks.push(AudioChunk::new(line.speaker, audio));
        }

        tracing::info!(
            line_count = chunks.len(),
            total_bytes = chunks.iter().map(|c| c.byte_length).sum::<usize>(),
            latency_ms = start_time.elapsed().as_millis() as u64,
            "Script synthesized"
        );

        Ok(chunks)
    }
}
