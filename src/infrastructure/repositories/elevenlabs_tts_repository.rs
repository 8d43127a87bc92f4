use super::tts_repository::TtsRepository;
use crate::domain::tts::{OutputFormat, SpeechRequest, TtsServiceError};
use crate::domain::voice::VoiceProfile;
use async_trait::async_trait;
use reqwest::StatusCode;

const XI_API_KEY_HEADER: &str = "xi-api-key";

/// ElevenLabs implementation of TTS repository
pub struct ElevenLabsTtsRepository {
    http_client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model_id: String,
    output_format: OutputFormat,
}

impl ElevenLabsTtsRepository {
    pub fn new(
        base_url: String,
        api_key: Option<String>,
        model_id: String,
        output_format: OutputFormat,
    ) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model_id,
            output_format,
        }
    }

    fn endpoint(&self, voice_id: &str) -> String {
        format!(
            "{}/v1/text-to-speech/{}?output_format={}",
            self.base_url, voice_id, self.output_format
        )
    }

    /// Map a non-success status to the error taxonomy
    fn classify(status: StatusCode, body: String) -> TtsServiceError {
        let message = format!("{} {}", status.as_u16(), body);
        if status == StatusCode::TOO_MANY_REQUESTS
            || status == StatusCode::REQUEST_TIMEOUT
            || status.is_server_error()
        {
            TtsServiceError::Transient(message)
        } else {
            TtsServiceError::Rejected(message)
        }
    }
}

#[async_trait]
impl TtsRepository for ElevenLabsTtsRepository {
    async fn synthesize(
        &self,
        text: &str,
        voice: &VoiceProfile,
    ) -> Result<Vec<u8>, TtsServiceError> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                TtsServiceError::NotConfigured("ELEVENLABS_API_KEY is not set".to_string())
            })?;

        let start_time = std::time::Instant::now();
        let request = SpeechRequest::new(text, &self.model_id, voice);

        tracing::info!(
            voice_id = %voice.voice_id,
            model = %self.model_id,
            output_format = %self.output_format,
            text_length = text.len(),
            text_preview = %text.chars().take(80).collect::<String>(),
            "Calling ElevenLabs text-to-speech"
        );

        let response = self
            .http_client
            .post(self.endpoint(&voice.voice_id))
            .header(XI_API_KEY_HEADER, api_key)
            .header("Accept", "audio/mpeg")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    voice_id = %voice.voice_id,
                    "ElevenLabs request failed"
                );
                TtsServiceError::Transient(format!("ElevenLabs request error: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::error!(
                status = status.as_u16(),
                voice_id = %voice.voice_id,
                error = %error_text,
                "ElevenLabs returned an error status"
            );
            return Err(Self::classify(status, error_text));
        }

        let audio_bytes = response
            .bytes()
            .await
            .map_err(|e| TtsServiceError::Transient(format!("ElevenLabs body error: {}", e)))?
            .to_vec();

        tracing::info!(
            provider = "elevenlabs",
            voice_id = %voice.voice_id,
            latency_ms = start_time.elapsed().as_millis() as u64,
            audio_size_bytes = audio_bytes.len(),
            "TTS synthesis completed"
        );

        Ok(audio_bytes)
    }
}
