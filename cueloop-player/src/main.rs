//! Segment Player (cueloop-player) - Main entry point
//!
//! Runs a headless review session: the audio position is tracked by a clock
//! driven playhead, keys are read from stdin one per line, and the active cue
//! is printed whenever it changes.
//!
//! Keys: `space`, `up`, `down`, `left`, `right`, `r`, `ctrl+c` / `cmd+c`,
//! plus `seek <seconds>` to move the playhead and `q` to quit.

use std::io::{BufRead, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tokio::signal;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cueloop_common::config::{load_or_default, resolve_config_path, CONFIG_ENV_VAR};
use cueloop_common::events::EventBus;
use cueloop_player::clipboard::MemoryClipboard;
use cueloop_player::config::PlayerConfig;
use cueloop_player::input::KeyEvent;
use cueloop_player::playback::{AudioSource, HeadlessPlayhead, PlaybackController};
use cueloop_player::session::{self, Session, SessionEvent, SessionHandle};
use cueloop_player::srt::load_srt_file;
use cueloop_player::subscription::Subscription;

/// Padding after the last cue when the audio duration is unknown (seconds)
const DURATION_TAIL_SEC: f64 = 1.0;

/// Command-line arguments for cueloop-player
#[derive(Parser, Debug)]
#[command(name = "cueloop-player")]
#[command(about = "Review audio against subtitle cues one segment at a time")]
#[command(version)]
struct Args {
    /// Audio file and/or .srt subtitle file
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Audio duration in seconds (defaults to the end of the last cue)
    #[arg(short, long, env = "CUELOOP_DURATION")]
    duration: Option<f64>,

    /// Config file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print every engine event as a JSON line on stdout
    #[arg(long)]
    json: bool,
}

/// One line typed on stdin
#[derive(Debug, Clone, PartialEq)]
enum Command {
    Key(KeyEvent),
    Seek(f64),
    Quit,
}

fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    match line.to_ascii_lowercase().as_str() {
        "q" | "quit" | "exit" => return Some(Command::Quit),
        "" => return Some(Command::Key(KeyEvent::parse("space")?)),
        _ => {}
    }
    if let Some(rest) = line.strip_prefix("seek ") {
        return rest.trim().parse::<f64>().ok().map(Command::Seek);
    }
    KeyEvent::parse(line).map(Command::Key)
}

#[derive(Debug, Default, PartialEq)]
struct InputFiles {
    audio: Option<PathBuf>,
    subtitles: Option<PathBuf>,
}

/// Sort input files into audio and subtitles by extension
fn classify_files(files: &[PathBuf]) -> Result<InputFiles> {
    let mut input = InputFiles::default();
    for file in files {
        let ext = file
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "srt" => input.subtitles = Some(file.clone()),
            "mp3" | "wav" | "m4a" => input.audio = Some(file.clone()),
            _ => bail!(cueloop_player::Error::UnsupportedFile(file.display().to_string())),
        }
    }
    Ok(input)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = resolve_config_path(args.config.as_deref(), CONFIG_ENV_VAR);
    let toml_config = load_or_default(config_path.as_deref()).context("Failed to load config")?;

    // Initialize tracing
    let default_filter = format!(
        "cueloop_player={level},cueloop_common={level}",
        level = toml_config.logging.level
    );
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = PlayerConfig::from(&toml_config);
    info!("Starting cueloop-player");
    if let Some(path) = &config_path {
        info!("Config file: {}", path.display());
    }

    let input = classify_files(&args.files)?;
    let cues = match &input.subtitles {
        Some(path) => Some(
            load_srt_file(path).with_context(|| format!("Failed to read {}", path.display()))?,
        ),
        None => None,
    };

    // Session wiring: the playhead reports into the session channel
    let event_bus = Arc::new(EventBus::new(config.event_capacity));
    let (handle, events_rx) = session::channel();
    let playhead = HeadlessPlayhead::new(handle.sender());
    let controller = PlaybackController::new(
        Box::new(playhead.clone()),
        Box::new(playhead.clone()),
        Box::new(MemoryClipboard::new()),
        &config,
        Arc::clone(&event_bus),
    );

    let mut session = Session::new(controller, events_rx);
    let mut snapshots = session.snapshots();
    let toasts = session.controller().toasts();
    session.attach(playhead.spawn_ticker(config.tick_interval));
    session.attach(
        spawn_keyboard(std::io::stdin(), handle.clone(), playhead.clone())
            .context("Failed to start keyboard reader")?,
    );
    session.attach(spawn_event_printer(&event_bus, args.json));
    if !args.json {
        session.attach(spawn_display(snapshots.clone(), toasts));
    }

    let mut session_task = tokio::spawn(session.run());

    if let Some(audio) = &input.audio {
        let duration = args
            .duration
            .or_else(|| {
                cues.as_ref()
                    .and_then(|c| cueloop_player::segments::SegmentIndex::from_raw(c).max_end_time())
                    .map(|end| end + DURATION_TAIL_SEC)
            })
            .unwrap_or(0.0);
        handle.send(SessionEvent::LoadAudio(
            AudioSource::new(file_name(audio)).with_duration(duration),
        ));

        // Subtitles after ready, so the first segment is selected right away
        if snapshots.wait_for(|s| s.state.is_ready).await.is_err() {
            warn!("Session ended before audio was ready");
        }
    }
    if let Some(cues) = cues {
        handle.send(SessionEvent::LoadSubtitles(cues));
    }

    let final_snapshot = tokio::select! {
        result = &mut session_task => result.context("Session task failed")?,
        _ = shutdown_signal() => {
            handle.shutdown();
            session_task.await.context("Session task failed")?
        }
    };

    info!(
        "Shutdown complete (last segment: {:?})",
        final_snapshot.state.current_index
    );
    Ok(())
}

/// Read key names from `input` and feed them to the session
///
/// The blocking read runs on its own thread, outside the tokio runtime, so a
/// read that never returns cannot hold up runtime shutdown. The thread ends at
/// the next line once the subscription is gone.
fn spawn_keyboard<R>(
    input: R,
    handle: SessionHandle,
    playhead: HeadlessPlayhead,
) -> std::io::Result<Subscription>
where
    R: Read + Send + 'static,
{
    let (line_tx, mut line_rx) = mpsc::unbounded_channel::<String>();
    std::thread::Builder::new()
        .name("stdin-keyboard".to_string())
        .spawn(move || {
            for line in std::io::BufReader::new(input).lines() {
                match line {
                    Ok(line) => {
                        if line_tx.send(line).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        warn!("Failed to read stdin: {}", e);
                        break;
                    }
                }
            }
        })?;

    Ok(Subscription::new(
        "stdin-keyboard",
        tokio::spawn(async move {
            while let Some(line) = line_rx.recv().await {
                match parse_command(&line) {
                    Some(Command::Key(key)) => {
                        if !handle.send(SessionEvent::Key(key)) {
                            return;
                        }
                    }
                    Some(Command::Seek(seconds)) => playhead.user_seek(seconds),
                    Some(Command::Quit) => break,
                    None => warn!("Unknown key: {:?}", line.trim()),
                }
            }
            handle.shutdown();
        }),
    ))
}

/// Log engine events, or print them as JSON lines
fn spawn_event_printer(event_bus: &EventBus, json: bool) -> Subscription {
    let mut rx = event_bus.subscribe();
    Subscription::new(
        "event-printer",
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(event) if json => match serde_json::to_string(&event) {
                        Ok(line) => println!("{}", line),
                        Err(e) => warn!("Failed to serialize {}: {}", event.event_type(), e),
                    },
                    Ok(event) => tracing::debug!("Event: {:?}", event),
                    Err(RecvError::Lagged(skipped)) => warn!("Event printer lagged, {} events skipped", skipped),
                    Err(RecvError::Closed) => break,
                }
            }
        }),
    )
}

/// Print the active cue whenever it changes, and notifications as they appear
fn spawn_display(
    mut snapshots: tokio::sync::watch::Receiver<cueloop_player::playback::PlaybackSnapshot>,
    mut toasts: tokio::sync::watch::Receiver<cueloop_player::notification::Toast>,
) -> Subscription {
    Subscription::new(
        "display",
        tokio::spawn(async move {
            let mut shown = None;
            loop {
                tokio::select! {
                    changed = snapshots.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let snapshot = snapshots.borrow_and_update().clone();
                        if snapshot.active_cue != shown {
                            if let Some(cue) = &snapshot.active_cue {
                                println!(
                                    "[{}/{}] {} --> {}\n{}\n",
                                    cue.index + 1,
                                    snapshot.cue_count,
                                    cue.start,
                                    cue.end,
                                    cue.text
                                );
                            }
                            shown = snapshot.active_cue;
                        }
                    }
                    changed = toasts.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let toast = toasts.borrow_and_update().clone();
                        if toast.visible {
                            println!("** {} **", toast.message);
                        }
                    }
                }
            }
        }),
    )
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
