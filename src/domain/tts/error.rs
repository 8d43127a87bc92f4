use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum TtsServiceError {
    /// Credentials or endpoint missing; fixable by the operator
    #[error("speech service not configured: {0}")]
    NotConfigured(String),
    /// The service refused the request (bad credentials, invalid voice, ...)
    #[error("speech service rejected the request: {0}")]
    Rejected(String),
    /// Network failure, rate limit or server error; worth retrying
    #[error("speech service unavailable: {0}")]
    Transient(String),
    #[error("line {line_index} failed after {attempts} attempts: {source}")]
    Exhausted {
        line_index: usize,
        attempts: u32,
        #[source]
        source: Box<TtsServiceError>,
    },
}

impl TtsServiceError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, TtsServiceError::Transient(_))
    }
}

impl From<TtsServiceError> for AppError {
    fn from(err: TtsServiceError) -> Self {
        match err {
            TtsServiceError::NotConfigured(msg) => AppError::NotConfigured(msg),
            TtsServiceError::Rejected(msg) => AppError::Rejected(msg),
            TtsServiceError::Transient(msg) => AppError::Synthesis(msg),
            TtsServiceError::Exhausted { source, .. } => match *source {
                TtsServiceError::NotConfigured(msg) => AppError::NotConfigured(msg),
                TtsServiceError::Rejected(msg) => AppError::Rejected(msg),
                other => AppError::Synthesis(other.to_string()),
            },
        }
    }
}
