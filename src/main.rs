use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tapecast::domain::assembly::PauseModel;
use tapecast::domain::normalizer::TextNormalizer;
use tapecast::domain::playback::{CursorTracker, PlaybackEngine, PlaybackStatus};
use tapecast::domain::script::Script;
use tapecast::domain::track::{Track, TrackService, TrackServiceApi};
use tapecast::domain::tts::SynthesisService;
use tapecast::error::AppError;
use tapecast::infrastructure::audio::{default_engine, AudioEngine};
use tapecast::infrastructure::config::{Config, LogFormat};
use tapecast::infrastructure::repositories::{
    ElevenLabsTtsRepository, FileTrackRepository, HttpMasteringRepository,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "tapecast", version, about = "Two-voice dialogue tracks from scripts")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the synthesis-ready form of a line
    Normalize {
        text: String,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Synthesize a script JSON file into a stored track
    Generate {
        #[arg(long)]
        script: PathBuf,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// List stored tracks
    List,
    /// Play a stored track, following the transcript
    Play { track_id: Uuid },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env().map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;

    // Initialize logging
    init_logging(&config);

    let cli = Cli::parse();

    if let Command::Normalize { text, seed } = &cli.command {
        let mut normalizer = match seed {
            Some(seed) => TextNormalizer::with_seed(*seed),
            None => TextNormalizer::new(),
        };
        println!("{}", normalizer.normalize(text));
        return Ok(());
    }

    // === DEPENDENCY INJECTION SETUP ===
    let engine = default_engine();
    tracing::info!(engine = engine.name(), "Audio engine selected");
    let track_service = build_track_service(&config, engine.clone());

    match cli.command {
        Command::Normalize { .. } => {}
        Command::Generate { script, seed } => {
            let json = tokio::fs::read_to_string(&script)
                .await
                .with_context(|| format!("Could not read script {}", script.display()))?;
            let script = Script::from_json(&json).map_err(AppError::from)?;

            let track = track_service
                .generate(&script, seed)
                .await
                .map_err(AppError::from)?;

            print_track(&track);
        }
        Command::List => {
            let tracks = track_service.list().await.map_err(AppError::from)?;
            if tracks.is_empty() {
                println!("No tracks in {}", config.tracks_dir.display());
            }
            for track in tracks {
                println!(
                    "{}  {}  {} lines{}  {}",
                    track.id,
                    track.created_at.format("%Y-%m-%d %H:%M"),
                    track.line_count,
                    if track.mastered { ", mastered" } else { "" },
                    track.title
                );
            }
        }
        Command::Play { track_id } => {
            let track = track_service.load(track_id).await.map_err(AppError::from)?;
            play(&track, engine).await?;
        }
    }

    Ok(())
}

fn build_track_service(config: &Config, engine: Arc<dyn AudioEngine>) -> TrackService {
    // 1. Instantiate repositories
    let tts_repo = Arc::new(ElevenLabsTtsRepository::new(
        config.elevenlabs_base_url.clone(),
        config.elevenlabs_api_key.clone(),
        config.tts_model_id.clone(),
        config.output_format(),
    ));
    let track_repo = Arc::new(FileTrackRepository::new(config.tracks_dir.clone()));

    if config.elevenlabs_api_key.is_none() {
        tracing::warn!("ELEVENLABS_API_KEY not set, synthesis will fail until it is configured");
    }

    // 2. Instantiate services
    let synthesis = Arc::new(SynthesisService::new(
        tts_repo,
        config.voices(),
        config.retry_policy(),
        config.synthesis_cache_enabled,
    ));
    let service = TrackService::new(
        synthesis,
        engine,
        track_repo,
        config.output_format(),
        PauseModel::new(config.pause_settings()),
    );

    match &config.mastering_url {
        Some(url) => {
            tracing::info!(url = %url, "Mastering enabled");
            service.with_mastering(
                Arc::new(HttpMasteringRepository::new(url.clone())),
                config.mastering_settings(),
            )
        }
        None => service,
    }
}

fn print_track(track: &Track) {
    println!("{}  {}", track.record.id, track.record.title);
    println!("duration {:.2}s", track.duration());
    for (timing, line) in track.timings.iter().zip(&track.record.lines) {
        println!(
            "  [{:>7.2} - {:>7.2}] {}: {}",
            timing.start,
            timing.end,
            track.record.speaker_name(line.speaker),
            line.cleaned_text
        );
    }
}

async fn play(track: &Track, engine: Arc<dyn AudioEngine>) -> anyhow::Result<()> {
    let player = PlaybackEngine::new(engine);
    let mut states = player.subscribe();
    let mut cursor = CursorTracker::new();

    player.load(track.audio.clone());
    player.play(0.0).map_err(AppError::from)?;

    loop {
        tokio::select! {
            changed = states.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = states.borrow_and_update().clone();

                if let Some(index) = cursor.update(state.current_time, &track.timings) {
                    if let Some(line) = track.line(index) {
                        tracing::info!(
                            line_index = index,
                            speaker = %track.record.speaker_name(line.speaker),
                            at_secs = state.current_time,
                            "{}",
                            line.cleaned_text
                        );
                    }
                }

                match state.status {
                    PlaybackStatus::Ended => {
                        tracing::info!(duration_secs = state.duration, "Playback finished");
                        break;
                    }
                    PlaybackStatus::Failed(message) => {
                        return Err(AppError::Playback(message).into());
                    }
                    _ => {}
                }
            }
            _ = tokio::signal::ctrl_c() => {
                player.stop();
                tracing::info!("Playback interrupted");
                break;
            }
        }
    }

    Ok(())
}

fn init_logging(config: &Config) {
    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "tapecast=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "tapecast=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
