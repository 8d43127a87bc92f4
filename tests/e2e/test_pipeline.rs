use crate::e2e::helpers;

use helpers::{
    assert_monotonic, episode_script, mount_failing_mastering, mount_flaky_speech,
    mount_mastering, mount_slow_mastering, mount_speech, speech_requests, two_line_script,
    ByteRateEngine, SpeechResponder, TestContext, BYTES_PER_SECOND,
};
use pretty_assertions::assert_eq;
use std::time::Duration;
use tapecast::domain::assembly::AssemblyError;
use tapecast::domain::script::Speaker;
use tapecast::domain::track::{TrackError, TrackServiceApi};
use tapecast::domain::tts::TtsServiceError;
use tapecast::error::AppError;

#[tokio::test]
async fn it_should_generate_a_track_from_a_two_line_script() {
    let ctx = TestContext::new().await.unwrap();
    mount_speech(
        &ctx.server,
        SpeechResponder::new()
            .with_size("Hello there.", 4000)
            .with_size("Oh, interesting!", 6000),
    )
    .await;

    let track = ctx.service().generate(&two_line_script(), Some(11)).await.unwrap();

    // Decoded duration is the byte-rate length of the concatenated audio
    assert_eq!(track.audio.data.len(), 10_000);
    assert!((track.duration() - 10_000.0 / BYTES_PER_SECOND).abs() < 1e-9);

    let t = &track.timings;
    assert_eq!(t.len(), 2);
    assert_eq!(t[0].start, 0.0);
    assert!(t[1].start >= t[0].end);
    assert!((t[1].end - track.duration()).abs() < 1e-9);
    assert_eq!(t[1].speaker, Speaker::B);
    // Uniform rescale keeps the 0.25s : 0.375s ratio of the spoken parts
    assert!((t[1].duration() / t[0].duration() - 1.5).abs() < 1e-9);
}

#[tokio::test]
async fn it_should_synthesize_lines_in_order_with_each_speakers_voice() {
    let ctx = TestContext::new().await.unwrap();
    mount_speech(&ctx.server, SpeechResponder::new()).await;

    let track = ctx.service().generate(&episode_script(), Some(3)).await.unwrap();

    let requests = speech_requests(&ctx.server).await;
    let voices: Vec<&str> = requests.iter().map(|(voice, _)| voice.as_str()).collect();
    let (a, b) = (ctx.voices.a.voice_id.as_str(), ctx.voices.b.voice_id.as_str());
    assert_eq!(voices, vec![a, b, a, b, b]);

    let texts: Vec<&str> = requests.iter().map(|(_, text)| text.as_str()).collect();
    let cleaned: Vec<&str> = track
        .record
        .lines
        .iter()
        .map(|l| l.cleaned_text.as_str())
        .collect();
    assert_eq!(texts, cleaned);

    assert!(texts[0].contains("two thousand sixteen"));
    assert!(texts.iter().all(|t| !t.contains('(') && !t.contains(",,")));
    assert_monotonic(&track.timings);
    assert_eq!(track.record.speaker_names, ["Rahul".to_string(), "Anjali".to_string()]);
}

#[tokio::test]
async fn it_should_store_the_generated_track() {
    let ctx = TestContext::new().await.unwrap();
    mount_speech(&ctx.server, SpeechResponder::new()).await;
    let service = ctx.service();

    let track = service.generate(&episode_script(), Some(5)).await.unwrap();

    let listed = service.list().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, track.record.id);
    assert_eq!(listed[0].title, "Cricket and code");

    let stored = ctx.tracks.load(track.record.id).await.unwrap();
    assert_eq!(stored, track.record);
    assert_eq!(stored.timing_seed, 5);
    assert_eq!(stored.output_format, "mp3_44100_128");
    assert_eq!(stored.chunk_byte_lengths.as_ref().map(Vec::len), Some(5));
}

#[tokio::test]
async fn it_should_retry_rate_limited_calls() {
    let ctx = TestContext::new().await.unwrap();
    mount_flaky_speech(&ctx.server, 429, 2, SpeechResponder::new()).await;

    let track = ctx.service().generate(&two_line_script(), Some(1)).await.unwrap();

    // Two rejected attempts on the first line, then one call per line
    assert_eq!(speech_requests(&ctx.server).await.len(), 4);
    assert_eq!(track.timings.len(), 2);
}

#[tokio::test]
async fn it_should_fail_the_whole_track_when_retries_run_out() {
    let ctx = TestContext::new().await.unwrap();
    mount_flaky_speech(&ctx.server, 503, 100, SpeechResponder::new()).await;
    let service = ctx.service();

    let err = service.generate(&two_line_script(), Some(1)).await.unwrap_err();

    assert!(matches!(
        err,
        TrackError::Synthesis(TtsServiceError::Exhausted {
            line_index: 0,
            attempts: 3,
            ..
        })
    ));
    assert_eq!(speech_requests(&ctx.server).await.len(), 3);
    assert!(service.list().await.unwrap().is_empty());
    assert_eq!(AppError::from(err).kind(), "synthesis");
}

#[tokio::test]
async fn it_should_tell_missing_credentials_from_rejected_ones() {
    let ctx = TestContext::new().await.unwrap();
    mount_flaky_speech(&ctx.server, 401, 100, SpeechResponder::new()).await;

    let missing = ctx
        .service_with_key(None)
        .generate(&two_line_script(), Some(1))
        .await
        .unwrap_err();
    let missing = AppError::from(missing);
    assert!(matches!(missing, AppError::NotConfigured(_)));
    assert!(missing.is_operator_fixable());

    let rejected = ctx
        .service_with_key(Some("revoked"))
        .generate(&two_line_script(), Some(1))
        .await
        .unwrap_err();
    let rejected = AppError::from(rejected);
    assert!(matches!(rejected, AppError::Rejected(_)));
    assert!(!rejected.is_operator_fixable());

    // Not configured never reaches the service; rejected is not retried
    assert_eq!(speech_requests(&ctx.server).await.len(), 1);
}

#[tokio::test]
async fn it_should_report_undecodable_audio_as_decode_error() {
    let ctx = TestContext::new().await.unwrap();
    mount_speech(&ctx.server, SpeechResponder::new().undecodable()).await;

    let err = ctx.service().generate(&two_line_script(), Some(1)).await.unwrap_err();

    assert!(matches!(AppError::from(err), AppError::Decode(_)));
}

#[tokio::test]
async fn it_should_use_mastered_audio_and_rescale_to_it() {
    let ctx = TestContext::new().await.unwrap();
    mount_speech(
        &ctx.server,
        SpeechResponder::new()
            .with_size("Hello there.", 4000)
            .with_size("Oh, interesting!", 6000),
    )
    .await;
    let mastered = vec![0xAB; 12_000];
    mount_mastering(&ctx.server, &mastered).await;

    let track = ctx
        .mastered_service(Duration::from_secs(5))
        .generate(&two_line_script(), Some(2))
        .await
        .unwrap();

    assert!(track.record.mastered);
    assert_eq!(*track.audio.data, mastered);
    assert!((track.duration() - 0.75).abs() < 1e-9);
    assert!((track.timings[1].end - 0.75).abs() < 1e-9);
    // Timings still derive from the unmastered chunk lengths
    assert_eq!(track.record.chunk_byte_lengths, Some(vec![4000, 6000]));
}

#[tokio::test]
async fn it_should_keep_unmastered_audio_when_mastering_fails() {
    let ctx = TestContext::new().await.unwrap();
    mount_speech(&ctx.server, SpeechResponder::new()).await;
    mount_failing_mastering(&ctx.server, 500).await;

    let track = ctx
        .mastered_service(Duration::from_secs(5))
        .generate(&two_line_script(), Some(2))
        .await
        .unwrap();

    assert!(!track.record.mastered);
    let expected_len: usize = track.record.chunk_byte_lengths.iter().flatten().sum();
    assert_eq!(track.audio.data.len(), expected_len);
}

#[tokio::test]
async fn it_should_keep_unmastered_audio_when_mastering_times_out() {
    let ctx = TestContext::new().await.unwrap();
    mount_speech(&ctx.server, SpeechResponder::new()).await;
    mount_slow_mastering(&ctx.server, Duration::from_secs(3)).await;

    let track = ctx
        .mastered_service(Duration::from_millis(100))
        .generate(&two_line_script(), Some(2))
        .await
        .unwrap();

    assert!(!track.record.mastered);
    assert!(track.audio.data.iter().all(|b| *b == 0xFF));
}

#[tokio::test]
async fn it_should_rescale_timings_to_the_decoded_duration() {
    let ctx = TestContext::with_engine(ByteRateEngine::with_stretch(BYTES_PER_SECOND, 1.2))
        .await
        .unwrap();
    mount_speech(&ctx.server, SpeechResponder::new()).await;

    let track = ctx.service().generate(&episode_script(), Some(8)).await.unwrap();

    let last = track.timings.last().unwrap();
    assert!((last.end - track.duration()).abs() < 1e-9);
    assert_monotonic(&track.timings);
}

#[tokio::test]
async fn it_should_skip_synthesis_for_silent_lines() {
    let ctx = TestContext::new().await.unwrap();
    mount_speech(&ctx.server, SpeechResponder::new()).await;
    let script = helpers::script(serde_json::json!({
        "title": "Mostly stage directions",
        "script": [
            { "speaker": "Rahul", "text": "(laughs)" },
            { "speaker": "Anjali", "text": "(excited)" }
        ]
    }));

    let track = ctx.service().generate(&script, Some(1)).await.unwrap();

    // "(laughs)" still voices an interjection; "(excited)" alone is silent
    assert!(!track.record.lines[0].cleaned_text.is_empty());
    assert_eq!(track.record.lines[1].cleaned_text, "");
    assert_eq!(track.record.chunk_byte_lengths.as_ref().unwrap()[1], 0);
    assert_eq!(speech_requests(&ctx.server).await.len(), 1);
    assert_eq!(track.timings[1].start, track.timings[1].end);
}

#[tokio::test]
async fn it_should_reject_a_script_that_produces_no_audio() {
    let ctx = TestContext::new().await.unwrap();
    mount_speech(&ctx.server, SpeechResponder::new()).await;
    let script = helpers::script(serde_json::json!({
        "title": "Silence",
        "script": [
            { "speaker": "Rahul", "text": "(excited)" },
            { "speaker": "Anjali", "text": "[excited]" }
        ]
    }));

    let err = ctx.service().generate(&script, Some(1)).await.unwrap_err();

    assert!(matches!(err, TrackError::Assembly(AssemblyError::NoAudio)));
    assert!(speech_requests(&ctx.server).await.is_empty());
}
