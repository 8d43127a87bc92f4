use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlaybackError {
    #[error("audio could not be decoded: {0}")]
    Decode(String),
    #[error("audio output unavailable: {0}")]
    Device(String),
    #[error("no track loaded")]
    NothingLoaded,
}

impl From<PlaybackError> for AppError {
    fn from(err: PlaybackError) -> Self {
        match err {
            PlaybackError::Decode(msg) => AppError::Decode(msg),
            other => AppError::Playback(other.to_string()),
        }
    }
}
