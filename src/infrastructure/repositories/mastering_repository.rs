use crate::domain::track::MasteringError;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

/// Loudness mastering of an assembled track.
/// Abstracts the underlying mastering service.
#[async_trait]
pub trait MasteringRepository: Send + Sync {
    /// Returns the mastered audio in the same encoding as the input
    async fn master(&self, audio: &[u8], target_lufs: f32) -> Result<Vec<u8>, MasteringError>;
}

#[derive(Debug, Serialize)]
struct MasteringRequest {
    audio_base64: String,
    target_lufs: f32,
}

#[derive(Debug, Deserialize)]
struct MasteringResponse {
    audio_base64: String,
}

/// HTTP implementation of mastering repository
pub struct HttpMasteringRepository {
    http_client: reqwest::Client,
    url: String,
}

impl HttpMasteringRepository {
    pub fn new(url: String) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            url,
        }
    }
}

#[async_trait]
impl MasteringRepository for HttpMasteringRepository {
    async fn master(&self, audio: &[u8], target_lufs: f32) -> Result<Vec<u8>, MasteringError> {
        let start_time = std::time::Instant::now();
        let request = MasteringRequest {
            audio_base64: STANDARD.encode(audio),
            target_lufs,
        };

        tracing::info!(
            url = %self.url,
            audio_size_bytes = audio.len(),
            target_lufs,
            "Calling mastering service"
        );

        let response = self
            .http_client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| MasteringError::Service(format!("request error: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(MasteringError::Service(format!(
                "{} {}",
                status.as_u16(),
                error_text
            )));
        }

        let body: MasteringResponse = response
            .json()
            .await
            .map_err(|e| MasteringError::InvalidResponse(e.to_string()))?;
        let mastered = STANDARD
            .decode(body.audio_base64.as_bytes())
            .map_err(|e| MasteringError::InvalidResponse(e.to_string()))?;

        if mastered.is_empty() {
            return Err(MasteringError::InvalidResponse("empty audio".to_string()));
        }

        tracing::info!(
            latency_ms = start_time.elapsed().as_millis() as u64,
            audio_size_bytes = mastered.len(),
            "Mastering completed"
        );

        Ok(mastered)
    }
}
