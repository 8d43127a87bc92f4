use crate::e2e::helpers;

use helpers::{episode_script, mount_speech, two_line_script, SpeechResponder, TestContext};
use std::time::Duration;
use tapecast::domain::playback::{resolve, CursorTracker, PlaybackEngine, PlaybackStatus};
use tapecast::domain::script::Script;
use tapecast::domain::track::{Track, TrackServiceApi};

async fn generated(ctx: &TestContext, script: &Script) -> Track {
    mount_speech(&ctx.server, SpeechResponder::new()).await;
    ctx.service().generate(script, Some(17)).await.unwrap()
}

#[tokio::test]
async fn it_should_highlight_every_line_in_order_until_the_end() {
    let ctx = TestContext::new().await.unwrap();
    let track = generated(&ctx, &episode_script()).await;

    // Network work is done; drive playback on a paused clock from here
    tokio::time::pause();

    let player = PlaybackEngine::new(ctx.engine.clone());
    player.load(track.audio.clone());
    let mut cursor = CursorTracker::new();
    let mut highlighted = Vec::new();

    player.play(0.0).unwrap();
    loop {
        let state = player.state();
        if let Some(index) = cursor.update(state.current_time, &track.timings) {
            highlighted.push(index);
        }
        if state.status == PlaybackStatus::Ended {
            assert_eq!(state.current_time, track.duration());
            break;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    assert_eq!(highlighted, vec![0, 1, 2, 3, 4]);
    assert_eq!(ctx.engine.active_sources(), 0);
}

#[tokio::test]
async fn it_should_seek_to_the_start_of_a_line() {
    let ctx = TestContext::new().await.unwrap();
    let track = generated(&ctx, &episode_script()).await;
    tokio::time::pause();

    let player = PlaybackEngine::new(ctx.engine.clone());
    player.load(track.audio.clone());
    player.play(0.0).unwrap();

    let target = track.timings[3].start;
    player.seek(target).unwrap();

    let state = player.state();
    assert_eq!(state.status, PlaybackStatus::Playing);
    assert_eq!(state.current_time, target);
    assert_eq!(resolve(state.current_time, &track.timings), Some(3));
    // seek is pause + play: a second source was built and the first released
    assert_eq!(ctx.engine.started_sources(), 2);
    assert_eq!(ctx.engine.active_sources(), 1);
}

#[tokio::test]
async fn it_should_keep_the_cursor_on_the_last_line_after_the_end() {
    let ctx = TestContext::new().await.unwrap();
    let track = generated(&ctx, &two_line_script()).await;
    tokio::time::pause();

    let player = PlaybackEngine::new(ctx.engine.clone());
    player.load(track.audio.clone());
    player.play(track.duration() - 0.01).unwrap();
    tokio::time::sleep(Duration::from_millis(200)).await;

    let state = player.state();
    assert_eq!(state.status, PlaybackStatus::Ended);
    assert_eq!(resolve(state.current_time, &track.timings), Some(1));
}

#[tokio::test]
async fn it_should_release_the_source_when_switching_tracks() {
    let ctx = TestContext::new().await.unwrap();
    let first = generated(&ctx, &episode_script()).await;
    let second = ctx.service().generate(&two_line_script(), Some(2)).await.unwrap();
    tokio::time::pause();

    let player = PlaybackEngine::new(ctx.engine.clone());
    player.load(first.audio.clone());
    player.play(1.0).unwrap();
    assert_eq!(ctx.engine.active_sources(), 1);

    player.load(second.audio.clone());
    let state = player.state();
    assert_eq!(ctx.engine.active_sources(), 0);
    assert_eq!(state.status, PlaybackStatus::Stopped);
    assert_eq!(state.duration, second.duration());
    assert_eq!(state.current_time, 0.0);
}

#[tokio::test]
async fn it_should_keep_position_across_speed_changes() {
    let ctx = TestContext::new().await.unwrap();
    let track = generated(&ctx, &episode_script()).await;
    tokio::time::pause();

    let player = PlaybackEngine::new(ctx.engine.clone());
    player.load(track.audio.clone());
    player.play(0.0).unwrap();
    tokio::time::sleep(Duration::from_millis(1000)).await;

    player.set_speed(2.0);
    player.pause();
    let at_change = player.state().current_time;
    assert!((at_change - 1.0).abs() < 0.01, "at {}", at_change);

    player.resume().unwrap();
    tokio::time::sleep(Duration::from_millis(500)).await;
    player.pause();

    // Half a second at double speed; line timings stay in track time
    let position = player.state().current_time;
    assert!((position - 2.0).abs() < 0.02, "at {}", position);
    assert_eq!(
        resolve(position, &track.timings),
        track.timings.iter().rposition(|t| t.start <= position)
    );
}
