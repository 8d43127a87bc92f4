pub mod assembly;
pub mod normalizer;
pub mod playback;
pub mod script;
pub mod track;
pub mod tts;
pub mod voice;
