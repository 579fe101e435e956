//! An [`AudioGraph`] that records tones against a hand-driven clock.

use alloc::vec::Vec;
use slotmap::SlotMap;

use crate::graph::{AudioGraph, BusId, ToneHandle, Waveform};

/// A tone as the graph saw it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RecordedTone {
    pub bus: BusId,
    pub waveform: Waveform,
    pub frequency: f64,
    pub start: f64,
    pub stop: Option<f64>,
}

impl RecordedTone {
    /// False for tones stopped at or before they started.
    pub fn is_audible(&self) -> bool {
        self.stop.map_or(true, |stop| stop > self.start)
    }
}

/// Test double with a manual clock. Nothing is rendered.
#[derive(Debug, Default)]
pub struct RecordingGraph {
    now: f64,
    buses: Vec<f32>,
    tones: SlotMap<ToneHandle, RecordedTone>,
    order: Vec<ToneHandle>,
}

impl RecordingGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_time(&mut self, now: f64) {
        self.now = now;
    }

    pub fn tone(&self, handle: ToneHandle) -> Option<&RecordedTone> {
        self.tones.get(handle)
    }

    /// Every tone ever started, in start-call order.
    pub fn tones(&self) -> impl Iterator<Item = &RecordedTone> + '_ {
        self.order.iter().filter_map(|h| self.tones.get(*h))
    }

    /// Tones that were not stopped before they began.
    pub fn audible_tones(&self) -> impl Iterator<Item = &RecordedTone> + '_ {
        self.tones().filter(|t| t.is_audible())
    }

    pub fn tone_count(&self) -> usize {
        self.order.len()
    }

    pub fn bus_gain(&self, bus: BusId) -> Option<f32> {
        self.buses.get(bus.0).copied()
    }
}

impl AudioGraph for RecordingGraph {
    fn current_time(&self) -> f64 {
        self.now
    }

    fn create_bus(&mut self, gain: f32) -> BusId {
        self.buses.push(gain);
        BusId(self.buses.len() - 1)
    }

    fn start_tone(
        &mut self,
        bus: BusId,
        waveform: Waveform,
        frequency: f64,
        start: f64,
    ) -> ToneHandle {
        let handle = self.tones.insert(RecordedTone {
            bus,
            waveform,
            frequency,
            start,
            stop: None,
        });
        self.order.push(handle);
        handle
    }

    fn stop_tone(&mut self, handle: ToneHandle, at: f64) {
        if at < self.now {
            return;
        }
        if let Some(tone) = self.tones.get_mut(handle) {
            tone.stop = Some(tone.stop.map_or(at, |s| s.min(at)));
        }
    }
}
