use crate::e2e::helpers;

use helpers::{assert_monotonic, episode_script, mount_speech, SpeechResponder, TestContext};
use pretty_assertions::assert_eq;
use tapecast::domain::track::{TrackError, TrackServiceApi};
use tapecast::error::AppError;
use uuid::Uuid;

#[tokio::test]
async fn it_should_reload_a_track_with_identical_timings() {
    let ctx = TestContext::new().await.unwrap();
    mount_speech(&ctx.server, SpeechResponder::new()).await;
    let service = ctx.service();
    let generated = service.generate(&episode_script(), Some(21)).await.unwrap();

    let reloaded = service.reload(generated.record.clone()).await.unwrap();

    assert_eq!(reloaded.timings, generated.timings);
    assert_eq!(reloaded.duration(), generated.duration());
    assert_eq!(*reloaded.audio.data, *generated.audio.data);
}

#[tokio::test]
async fn it_should_load_a_stored_track_by_id() {
    let ctx = TestContext::new().await.unwrap();
    mount_speech(&ctx.server, SpeechResponder::new()).await;
    let generated = ctx
        .service()
        .generate(&episode_script(), Some(4))
        .await
        .unwrap();

    // A fresh service sees the same stored record
    let loaded = ctx.service().load(generated.record.id).await.unwrap();

    assert_eq!(loaded.record, generated.record);
    assert_eq!(loaded.timings, generated.timings);
}

#[tokio::test]
async fn it_should_report_a_missing_track_as_not_found() {
    let ctx = TestContext::new().await.unwrap();

    let err = ctx.service().load(Uuid::new_v4()).await.unwrap_err();

    assert!(matches!(AppError::from(err), AppError::NotFound(_)));
}

#[tokio::test]
async fn it_should_estimate_timings_for_records_without_chunk_lengths() {
    let ctx = TestContext::new().await.unwrap();
    mount_speech(&ctx.server, SpeechResponder::new()).await;
    let service = ctx.service();
    let generated = service.generate(&episode_script(), Some(6)).await.unwrap();

    let mut legacy = generated.record.clone();
    legacy.chunk_byte_lengths = None;
    let reloaded = service.reload(legacy).await.unwrap();

    assert_eq!(reloaded.timings.len(), generated.timings.len());
    assert_monotonic(&reloaded.timings);
    let last = reloaded.timings.last().unwrap();
    assert!((last.end - reloaded.duration()).abs() < 1e-9);
    // Responder sizes audio by text length, so the estimate lands close
    for (estimated, actual) in reloaded.timings.iter().zip(&generated.timings) {
        assert!((estimated.start - actual.start).abs() < 0.05);
    }
}

#[tokio::test]
async fn it_should_reject_a_corrupt_record() {
    let ctx = TestContext::new().await.unwrap();
    mount_speech(&ctx.server, SpeechResponder::new()).await;
    let service = ctx.service();
    let generated = service.generate(&episode_script(), Some(6)).await.unwrap();

    let mut corrupt = generated.record.clone();
    corrupt.audio_base64 = "***".to_string();
    assert!(matches!(
        service.reload(corrupt).await,
        Err(TrackError::InvalidRecord(_))
    ));

    let mut unknown_format = generated.record;
    unknown_format.output_format = "opus".to_string();
    assert!(matches!(
        service.reload(unknown_format).await,
        Err(TrackError::InvalidRecord(_))
    ));
}
