use crate::domain::tts::TtsServiceError;
use crate::domain::voice::VoiceProfile;
use async_trait::async_trait;

/// Repository for speech synthesis operations.
/// Abstracts the underlying TTS provider.
///
/// One call renders exactly one dialogue line. Implementations classify
/// failures so the caller can tell retryable errors from fatal ones:
/// - `NotConfigured` when credentials are missing
/// - `Rejected` when the service refuses the request
/// - `Transient` for network failures, rate limits and server errors
#[async_trait]
pub trait TtsRepository: Send + Sync {
    /// Synthesize one line with the given voice
    ///
    /// Returns encoded audio in the repository's configured output format
    async fn synthesize(
        &self,
        text: &str,
        voice: &VoiceProfile,
    ) -> Result<Vec<u8>, TtsServiceError>;
}
