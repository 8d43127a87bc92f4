use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum AssemblyError {
    #[error("got {chunks} audio chunks for {lines} script lines")]
    LengthMismatch { chunks: usize, lines: usize },
    #[error("chunk {index} was synthesized for the wrong speaker")]
    SpeakerMismatch { index: usize },
    #[error("script produced no audio")]
    NoAudio,
    #[error("byte rate must be positive, got {0}")]
    InvalidByteRate(f64),
}

impl From<AssemblyError> for AppError {
    fn from(err: AssemblyError) -> Self {
        AppError::Internal(err.to_string())
    }
}
