use super::audio::UNDECODABLE;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::collections::HashMap;
use wiremock::matchers::{method, path_regex};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// Answers text-to-speech calls with a body whose length depends on the
/// requested text: an exact size when listed, otherwise `bytes_per_char`
/// bytes per character
pub struct SpeechResponder {
    pub sizes: HashMap<String, usize>,
    pub bytes_per_char: usize,
    pub undecodable: bool,
}

impl SpeechResponder {
    pub fn new() -> Self {
        Self {
            sizes: HashMap::new(),
            bytes_per_char: 400,
            undecodable: false,
        }
    }

    pub fn with_size(mut self, text: &str, size: usize) -> Self {
        self.sizes.insert(text.to_string(), size);
        self
    }

    /// Every body starts with the marker the test engine refuses to decode
    pub fn undecodable(mut self) -> Self {
        self.undecodable = true;
        self
    }
}

impl Respond for SpeechResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body: serde_json::Value = match serde_json::from_slice(&request.body) {
            Ok(body) => body,
            Err(_) => return ResponseTemplate::new(400),
        };
        let text = body["text"].as_str().unwrap_or_default();
        let size = self
            .sizes
            .get(text)
            .copied()
            .unwrap_or(text.chars().count() * self.bytes_per_char);

        let mut audio = vec![0xFF; size];
        if self.undecodable && size >= UNDECODABLE.len() {
            audio[..UNDECODABLE.len()].copy_from_slice(UNDECODABLE);
        }
        ResponseTemplate::new(200).set_body_bytes(audio)
    }
}

pub async fn mount_speech(server: &MockServer, responder: SpeechResponder) {
    Mock::given(method("POST"))
        .and(path_regex(r"^/v1/text-to-speech/[^/]+$"))
        .respond_with(responder)
        .mount(server)
        .await;
}

/// `failures` responses with `status` before the responder takes over
pub async fn mount_flaky_speech(
    server: &MockServer,
    status: u16,
    failures: u64,
    responder: SpeechResponder,
) {
    Mock::given(method("POST"))
        .and(path_regex(r"^/v1/text-to-speech/[^/]+$"))
        .respond_with(ResponseTemplate::new(status).set_body_string("try again later"))
        .up_to_n_times(failures)
        .with_priority(1)
        .mount(server)
        .await;
    mount_speech(server, responder).await;
}

/// Texts sent to the speech endpoint, in order, with the voice id used
pub async fn speech_requests(server: &MockServer) -> Vec<(String, String)> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|r| r.url.path().starts_with("/v1/text-to-speech/"))
        .map(|r| {
            let voice = r.url.path().rsplit('/').next().unwrap_or_default().to_string();
            let body: serde_json::Value = serde_json::from_slice(&r.body).unwrap_or_default();
            (voice, body["text"].as_str().unwrap_or_default().to_string())
        })
        .collect()
}

/// Mastering endpoint returning `mastered` for any input
pub async fn mount_mastering(server: &MockServer, mastered: &[u8]) {
    Mock::given(method("POST"))
        .and(path_regex(r"^/master$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "audio_base64": STANDARD.encode(mastered)
        })))
        .mount(server)
        .await;
}

pub async fn mount_failing_mastering(server: &MockServer, status: u16) {
    Mock::given(method("POST"))
        .and(path_regex(r"^/master$"))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

pub async fn mount_slow_mastering(server: &MockServer, delay: std::time::Duration) {
    Mock::given(method("POST"))
        .and(path_regex(r"^/master$"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "audio_base64": STANDARD.encode([1u8; 8]) }))
                .set_delay(delay),
        )
        .mount(server)
        .await;
}
