//! Tracker facade for yummytracker.
//!
//! [`Tracker`] owns the pattern, the per-channel instruments and the
//! transport, and exposes the command and snapshot API a front end drives.
//! It runs over any [`AudioGraph`]: [`RealtimeGraph`] for the sound card, a
//! bare [`Synth`] for offline rendering.

mod config;
mod cursor;
mod error;
mod export;
mod keyboard;
mod realtime;
mod tracker;

// Re-export common types so callers don't need yt-ir/yt-engine directly.
pub use yt_engine::{
    AudioGraph, Frame, ScopeData, Synth, TransportConfig, TransportState, Waveform, SCOPE_LEN,
};
pub use yt_ir::{IrError, Note, Pattern, RowText, TrackerRow};

pub use config::TrackerConfig;
pub use cursor::{CellField, EditCursor};
pub use error::TrackerError;
pub use export::{render_frames, write_wav};
pub use keyboard::KeyboardPreview;
pub use realtime::RealtimeGraph;
pub use tracker::{Tracker, CHANNEL_WAVEFORMS};
