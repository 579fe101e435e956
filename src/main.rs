//! yummytracker: play the default pattern once, live or to a WAV file.
//!
//! Usage:
//!   yummytracker
//!   yummytracker --config tracker.toml --row-duration 0.25
//!   yummytracker --wav output.wav

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing::error;
use yt_master::{
    render_frames, write_wav, AudioGraph, RealtimeGraph, Tracker, TrackerConfig, TrackerError,
};

/// Upper bound on offline render length, in seconds.
const MAX_RENDER_SECONDS: f64 = 600.0;

/// How often the live loop polls the transport.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Parser)]
#[command(name = "yummytracker", version, about = "Lookahead tracker player")]
struct Cli {
    /// TOML file with tracker settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Render to this WAV file instead of the sound card
    #[arg(long)]
    wav: Option<PathBuf>,

    /// Seconds per row
    #[arg(long)]
    row_duration: Option<f64>,

    /// Scheduling horizon in seconds
    #[arg(long)]
    lookahead: Option<f64>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), TrackerError> {
    let mut config = match &cli.config {
        Some(path) => TrackerConfig::load(path)?,
        None => TrackerConfig::default(),
    };
    if let Some(row_duration) = cli.row_duration {
        config.transport.row_duration = row_duration;
        config.transport.note_gate = config.transport.note_gate.min(row_duration);
    }
    if let Some(lookahead) = cli.lookahead {
        config.transport.lookahead = lookahead;
    }
    config.validate()?;

    match cli.wav {
        Some(path) => render_to_wav(&config, &path),
        None => play_live(&config),
    }
}

fn print_row<G: AudioGraph>(tracker: &Tracker<G>, row: usize) {
    let mut line = format!("{:02X}", row);
    for channel in 0..tracker.pattern().channel_count() {
        if let Ok(text) = tracker.row_to_str(channel, row) {
            line.push_str(" | ");
            line.push_str(&text);
        }
    }
    println!("{}", line);
}

fn play_live(config: &TrackerConfig) -> Result<(), TrackerError> {
    let graph = RealtimeGraph::start(config.master_gain)?;
    let mut tracker = Tracker::new(graph, config)?;

    tracker.play();
    let mut last_row = None;
    while tracker.is_playing() {
        tracker.update();
        let row = tracker.current_row();
        if last_row != Some(row) {
            print_row(&tracker, row);
            last_row = Some(row);
        }
        if !tracker.graph().is_running() {
            error!("render thread exited");
            break;
        }
        std::thread::sleep(POLL_INTERVAL);
    }

    // Let the final gate ring out before the output closes.
    std::thread::sleep(Duration::from_secs_f64(config.transport.note_gate));
    println!("Done.");
    Ok(())
}

fn render_to_wav(config: &TrackerConfig, path: &std::path::Path) -> Result<(), TrackerError> {
    println!("Rendering to {} at {} Hz...", path.display(), config.sample_rate);
    let frames = render_frames(config, MAX_RENDER_SECONDS, |tracker, row| {
        print_row(tracker, row)
    })?;
    write_wav(path, &frames, config.sample_rate)?;
    println!(
        "Wrote {:.2}s of audio.",
        frames.len() as f64 / config.sample_rate as f64
    );
    Ok(())
}
