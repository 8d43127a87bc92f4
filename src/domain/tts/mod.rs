pub mod dto;
pub mod error;
pub mod format;
pub mod service;

pub use dto::{SpeechRequest, VoiceSettings};
pub use error::TtsServiceError;
pub use format::OutputFormat;
pub use service::{AudioChunk, RetryPolicy, SynthesisService, SynthesisServiceApi};
