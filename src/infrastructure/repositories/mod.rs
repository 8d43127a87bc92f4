pub mod elevenlabs_tts_repository;
pub mod mastering_repository;
pub mod track_repository;
pub mod tts_repository;

pub use elevenlabs_tts_repository::ElevenLabsTtsRepository;
pub use mastering_repository::{HttpMasteringRepository, MasteringRepository};
pub use track_repository::FileTrackRepository;
pub use tts_repository::TtsRepository;
