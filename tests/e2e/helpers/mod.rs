use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tapecast::domain::assembly::{PauseModel, SegmentTiming};
use tapecast::domain::script::Script;
use tapecast::domain::track::{MasteringSettings, TrackService};
use tapecast::domain::tts::{OutputFormat, RetryPolicy, SynthesisService};
use tapecast::domain::voice::VoiceConfig;
use tapecast::infrastructure::repositories::{
    ElevenLabsTtsRepository, FileTrackRepository, HttpMasteringRepository,
};
use tempfile::TempDir;
use wiremock::MockServer;

pub mod speech_mocks;

pub use audio::ByteRateEngine;
pub use speech_mocks::*;

/// mp3_44100_128
pub const BYTES_PER_SECOND: f64 = 16_000.0;

pub const API_KEY: &str = "test-api-key";

pub struct TestContext {
    pub server: MockServer,
    pub engine: Arc<ByteRateEngine>,
    pub tracks: Arc<FileTrackRepository>,
    pub voices: VoiceConfig,
    _dir: TempDir,
}

impl TestContext {
    pub async fn new() -> Result<Self> {
        Self::with_engine(ByteRateEngine::new(BYTES_PER_SECOND)).await
    }

    pub async fn with_engine(engine: ByteRateEngine) -> Result<Self> {
        let dir = tempfile::tempdir()?;
        Ok(Self {
            server: MockServer::start().await,
            engine: Arc::new(engine),
            tracks: Arc::new(FileTrackRepository::new(dir.path().join("tracks"))),
            voices: VoiceConfig::default(),
            _dir: dir,
        })
    }

    /// Track service wired to the mock server, with a short retry delay
    pub fn service(&self) -> TrackService {
        self.service_with_key(Some(API_KEY))
    }

    pub fn service_with_key(&self, api_key: Option<&str>) -> TrackService {
        let tts_repo = Arc::new(ElevenLabsTtsRepository::new(
            self.server.uri(),
            api_key.map(str::to_string),
            "eleven_multilingual_v2".to_string(),
            OutputFormat::default(),
        ));
        let synthesis = Arc::new(SynthesisService::new(
            tts_repo,
            self.voices.clone(),
            RetryPolicy {
                max_attempts: 3,
                delay: Duration::from_millis(10),
            },
            false,
        ));
        TrackService::new(
            synthesis,
            self.engine.clone(),
            self.tracks.clone(),
            OutputFormat::default(),
            PauseModel::default(),
        )
    }

    pub fn mastered_service(&self, timeout: Duration) -> TrackService {
        self.service().with_mastering(
            Arc::new(HttpMasteringRepository::new(format!("{}/master", self.server.uri()))),
            MasteringSettings {
                target_lufs: -14.0,
                timeout,
            },
        )
    }
}

pub fn script(json: serde_json::Value) -> Script {
    Script::from_json(&json.to_string()).expect("valid script")
}

pub fn two_line_script() -> Script {
    script(serde_json::json!({
        "title": "Quick hello",
        "script": [
            { "speaker": "Rahul", "text": "Hello there." },
            { "speaker": "Anjali", "text": "Oh, interesting!" }
        ]
    }))
}

pub fn episode_script() -> Script {
    script(serde_json::json!({
        "title": "Cricket and code",
        "script": [
            { "speaker": "Rahul", "text": "Arey yaar, did you see the match in 2016? (laughs)" },
            { "speaker": "Anjali", "text": "Haan, Virat Kohli! What a knock, seriously." },
            { "speaker": "Rahul", "text": "And then (thinking pause) the final over happened--" },
            { "speaker": "Anjali", "text": "--don't remind me, please." },
            { "speaker": "Anjali", "text": "Chalo, let's talk about the actual topic." }
        ]
    }))
}

pub fn assert_monotonic(timings: &[SegmentTiming]) {
    for t in timings {
        assert!(t.start <= t.end, "segment {} runs backwards", t.index);
    }
    for pair in timings.windows(2) {
        assert!(
            pair[0].start <= pair[1].start && pair[0].end <= pair[1].start,
            "segments {} and {} overlap",
            pair[0].index,
            pair[1].index
        );
    }
}
