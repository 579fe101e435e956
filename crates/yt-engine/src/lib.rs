//! Playback engine for yummytracker.
//!
//! The [`TransportScheduler`] queues pattern rows onto [`Instrument`]s a
//! bounded interval ahead of the audio clock and advances the playhead
//! through a deterministic queue of deferred actions. Everything that makes
//! sound goes through the [`AudioGraph`] trait; [`Synth`] is the software
//! implementation used both offline and by the realtime backend.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod config;
mod deferred;
mod frame;
mod graph;
mod instrument;
mod oscillator;
mod synth;
#[cfg(any(test, feature = "test-support"))]
mod testing;
mod transport;

pub use config::{ConfigError, TransportConfig};
pub use deferred::{DeferredAction, DeferredQueue};
pub use frame::Frame;
pub use graph::{AudioGraph, BusId, ScopeData, ToneHandle, Waveform, SCOPE_LEN, SCOPE_SILENCE};
pub use instrument::Instrument;
pub use synth::Synth;
#[cfg(any(test, feature = "test-support"))]
pub use testing::{RecordedTone, RecordingGraph};
pub use transport::{TransportScheduler, TransportState};
