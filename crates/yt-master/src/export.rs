//! Offline rendering of one pass through the pattern.

use std::path::Path;

use hound::{SampleFormat, WavSpec, WavWriter};
use tracing::{debug, info};
use yt_engine::{Frame, Synth};

use crate::config::TrackerConfig;
use crate::error::TrackerError;
use crate::tracker::Tracker;

/// Frames per scheduling step, as a fraction of a second.
const UPDATES_PER_SECOND: u32 = 100;

/// Play the tracker's pattern once from its current row through a fresh
/// synth and collect the output.
///
/// `on_row` sees each row as the playhead reaches it. Rendering ends when
/// the transport has stopped and every tone has finished, or after
/// `max_seconds`.
pub fn render_frames(
    config: &TrackerConfig,
    max_seconds: f64,
    mut on_row: impl FnMut(&Tracker<Synth>, usize),
) -> Result<Vec<Frame>, TrackerError> {
    let mut synth = Synth::new(config.sample_rate);
    synth.set_master_gain(config.master_gain);
    let mut tracker = Tracker::new(synth, config)?;

    let step = (config.sample_rate / UPDATES_PER_SECOND).max(1) as usize;
    let max_frames = (max_seconds.max(0.0) * config.sample_rate as f64) as usize;
    let mut frames = Vec::with_capacity(max_frames.min(config.sample_rate as usize * 60));
    let mut block = vec![Frame::silence(); step];

    tracker.play();
    let mut last_row = None;
    while frames.len() < max_frames {
        tracker.update();
        let row = tracker.current_row();
        if tracker.is_playing() && last_row != Some(row) {
            on_row(&tracker, row);
            last_row = Some(row);
        }
        if !tracker.is_playing() && tracker.graph().active_tones() == 0 {
            break;
        }

        let len = step.min(max_frames - frames.len());
        tracker.graph_mut().render(&mut block[..len]);
        frames.extend_from_slice(&block[..len]);
    }

    debug!(frames = frames.len(), "offline render finished");
    Ok(frames)
}

/// Write 16-bit stereo frames to a WAV file.
pub fn write_wav(path: &Path, frames: &[Frame], sample_rate: u32) -> Result<(), TrackerError> {
    let spec = WavSpec {
        channels: 2,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec)?;
    for frame in frames {
        writer.write_sample(frame.left)?;
        writer.write_sample(frame.right)?;
    }
    writer.finalize()?;
    info!(path = %path.display(), frames = frames.len(), "wrote WAV");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn short_config() -> TrackerConfig {
        TrackerConfig {
            pattern_length: 4,
            sample_rate: 8_000,
            ..Default::default()
        }
    }

    #[test]
    fn renders_one_pass_then_stops() {
        let mut rows = Vec::new();
        let frames = render_frames(&short_config(), 10.0, |_, row| rows.push(row)).unwrap();

        assert_eq!(rows, vec![0, 1, 2, 3]);
        // Four rows of half a second; the last gate ends well before.
        assert!(frames.len() >= 16_000 && frames.len() < 16_800, "{}", frames.len());
    }

    #[test]
    fn notes_are_gated() {
        let frames = render_frames(&short_config(), 10.0, |_, _| {}).unwrap();
        // Row 0 sounds for the first 0.1 s, then silence until row 1 at 0.5 s.
        assert!(frames[..800].iter().any(|f| !f.is_silent()));
        assert!(frames[1600..3600].iter().all(|f| f.is_silent()));
        assert!(frames[4000..4800].iter().any(|f| !f.is_silent()));
    }

    #[test]
    fn max_seconds_caps_output() {
        let frames = render_frames(&short_config(), 0.25, |_, _| {}).unwrap();
        assert_eq!(frames.len(), 2_000);
    }

    #[test]
    fn wav_round_trip_header() {
        let frames = render_frames(&short_config(), 0.5, |_, _| {}).unwrap();
        let path = std::env::temp_dir().join(format!("yt-export-{}.wav", std::process::id()));
        write_wav(&path, &frames, 8_000).unwrap();

        let reader = hound::WavReader::open(&path).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 2);
        assert_eq!(spec.sample_rate, 8_000);
        assert_eq!(reader.duration() as usize, frames.len());
        std::fs::remove_file(&path).unwrap();
    }
}
