//! Software audio graph: oscillator tones mixed through gain buses.

use alloc::vec::Vec;
use slotmap::SlotMap;
use tracing::trace;

use crate::frame::Frame;
use crate::graph::{AudioGraph, BusId, ScopeData, ToneHandle, Waveform, SCOPE_LEN, SCOPE_SILENCE};
use crate::oscillator;

/// Tone slots reserved up front so the render path never allocates.
const TONE_CAPACITY: usize = 256;

/// Peak level of a single tone before bus gain.
const TONE_LEVEL: f64 = 0.2;

#[derive(Clone, Debug)]
struct Tone {
    bus: BusId,
    waveform: Waveform,
    phase: f64,
    /// Phase advance per frame
    increment: f64,
    start: u64,
    stop: Option<u64>,
}

impl Tone {
    fn finished(&self, position: u64) -> bool {
        self.stop.is_some_and(|stop| position >= stop)
    }
}

#[derive(Clone, Debug)]
struct Bus {
    gain: f32,
    /// Sum of this frame's tones, before gain
    mix: f64,
    scope: ScopeData,
    scope_pos: usize,
}

impl Bus {
    fn new(gain: f32) -> Self {
        Self {
            gain,
            mix: 0.0,
            scope: [SCOPE_SILENCE; SCOPE_LEN],
            scope_pos: 0,
        }
    }

    fn capture(&mut self, sample: f64) {
        let byte = libm::round(SCOPE_SILENCE as f64 + sample * 127.0).clamp(0.0, 255.0);
        self.scope[self.scope_pos] = byte as u8;
        self.scope_pos = (self.scope_pos + 1) % SCOPE_LEN;
    }
}

/// The software synth.
///
/// Its clock is the number of frames rendered so far; time only moves when
/// [`render`](Self::render) is called.
pub struct Synth {
    sample_rate: u32,
    position: u64,
    master_gain: f32,
    buses: Vec<Bus>,
    tones: SlotMap<ToneHandle, Tone>,
}

impl Synth {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            position: 0,
            master_gain: 1.0,
            buses: Vec::new(),
            tones: SlotMap::with_capacity_and_key(TONE_CAPACITY),
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Frames rendered so far.
    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn set_master_gain(&mut self, gain: f32) {
        self.master_gain = gain;
    }

    /// Tones started and not yet finished.
    pub fn active_tones(&self) -> usize {
        self.tones.len()
    }

    fn seconds_to_frames(&self, seconds: f64) -> u64 {
        if seconds <= 0.0 {
            return 0;
        }
        libm::round(seconds * self.sample_rate as f64) as u64
    }

    /// Fill `out` with the next frames of audio.
    pub fn render(&mut self, out: &mut [Frame]) {
        for frame in out.iter_mut() {
            *frame = self.render_frame();
        }
        let position = self.position;
        self.tones.retain(|_, tone| !tone.finished(position));
    }

    fn render_frame(&mut self) -> Frame {
        for bus in &mut self.buses {
            bus.mix = 0.0;
        }

        let position = self.position;
        for tone in self.tones.values_mut() {
            if position < tone.start || tone.finished(position) {
                continue;
            }
            if let Some(bus) = self.buses.get_mut(tone.bus.0) {
                bus.mix += oscillator::sample(tone.waveform, tone.phase) * TONE_LEVEL;
            }
            tone.phase = oscillator::advance(tone.phase, tone.increment);
        }

        let mut master = 0.0;
        for bus in &mut self.buses {
            let level = bus.mix * bus.gain as f64;
            bus.capture(level);
            master += level;
        }

        self.position += 1;
        Frame::from_mono((master * self.master_gain as f64) as f32)
    }
}

impl AudioGraph for Synth {
    fn current_time(&self) -> f64 {
        self.position as f64 / self.sample_rate as f64
    }

    fn create_bus(&mut self, gain: f32) -> BusId {
        self.buses.push(Bus::new(gain));
        BusId(self.buses.len() - 1)
    }

    fn start_tone(
        &mut self,
        bus: BusId,
        waveform: Waveform,
        frequency: f64,
        start: f64,
    ) -> ToneHandle {
        let start = self.seconds_to_frames(start).max(self.position);
        trace!(bus = bus.0, frequency, start, "start tone");
        self.tones.insert(Tone {
            bus,
            waveform,
            phase: 0.0,
            increment: frequency / self.sample_rate as f64,
            start,
            stop: None,
        })
    }

    fn stop_tone(&mut self, handle: ToneHandle, at: f64) {
        if at < self.current_time() {
            return;
        }
        let at = self.seconds_to_frames(at);
        if let Some(tone) = self.tones.get_mut(handle) {
            tone.stop = Some(tone.stop.map_or(at, |s| s.min(at)));
        }
    }

    fn read_scope(&mut self, bus: BusId, out: &mut ScopeData) {
        let Some(bus) = self.buses.get(bus.0) else {
            out.fill(SCOPE_SILENCE);
            return;
        };
        let (newer, older) = bus.scope.split_at(bus.scope_pos);
        out[..older.len()].copy_from_slice(older);
        out[older.len()..].copy_from_slice(newer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    const RATE: u32 = 1000;

    fn render(synth: &mut Synth, frames: usize) -> Vec<Frame> {
        let mut out = vec![Frame::silence(); frames];
        synth.render(&mut out);
        out
    }

    #[test]
    fn clock_follows_rendered_frames() {
        let mut synth = Synth::new(RATE);
        assert_eq!(synth.current_time(), 0.0);
        render(&mut synth, 500);
        assert_eq!(synth.current_time(), 0.5);
    }

    #[test]
    fn tone_sounds_between_start_and_stop() {
        let mut synth = Synth::new(RATE);
        let bus = synth.create_bus(1.0);
        let tone = synth.start_tone(bus, Waveform::Square, 100.0, 0.1);
        synth.stop_tone(tone, 0.2);

        let out = render(&mut synth, 300);
        assert!(out[..100].iter().all(|f| f.is_silent()));
        assert!(out[100..200].iter().all(|f| !f.is_silent()));
        assert!(out[200..].iter().all(|f| f.is_silent()));
        assert_eq!(synth.active_tones(), 0);
    }

    #[test]
    fn late_start_is_clamped_to_now() {
        let mut synth = Synth::new(RATE);
        let bus = synth.create_bus(1.0);
        render(&mut synth, 100);
        synth.start_tone(bus, Waveform::Square, 100.0, 0.0);
        let out = render(&mut synth, 1);
        assert!(!out[0].is_silent());
    }

    #[test]
    fn stop_before_start_never_sounds() {
        let mut synth = Synth::new(RATE);
        let bus = synth.create_bus(1.0);
        let tone = synth.start_tone(bus, Waveform::Square, 100.0, 0.5);
        synth.stop_tone(tone, 0.0);
        let out = render(&mut synth, 1000);
        assert!(out.iter().all(|f| f.is_silent()));
    }

    #[test]
    fn stop_in_the_past_is_ignored() {
        let mut synth = Synth::new(RATE);
        let bus = synth.create_bus(1.0);
        let tone = synth.start_tone(bus, Waveform::Square, 100.0, 0.0);
        render(&mut synth, 100);
        synth.stop_tone(tone, 0.05);
        assert!(!render(&mut synth, 1)[0].is_silent());
    }

    #[test]
    fn bus_gain_scales_output() {
        let mut synth = Synth::new(RATE);
        let loud = synth.create_bus(1.0);
        let muted = synth.create_bus(0.0);
        synth.start_tone(muted, Waveform::Square, 100.0, 0.0);
        assert!(render(&mut synth, 10).iter().all(|f| f.is_silent()));

        synth.start_tone(loud, Waveform::Square, 100.0, 0.0);
        assert!(render(&mut synth, 10).iter().all(|f| !f.is_silent()));
    }

    #[test]
    fn scope_tracks_bus_output() {
        let mut synth = Synth::new(RATE);
        let bus = synth.create_bus(1.0);
        let quiet = synth.create_bus(1.0);
        synth.start_tone(bus, Waveform::Square, 100.0, 0.0);
        render(&mut synth, SCOPE_LEN);

        let mut scope = [0u8; SCOPE_LEN];
        synth.read_scope(bus, &mut scope);
        assert!(scope.iter().any(|&s| s > SCOPE_SILENCE));
        assert!(scope.iter().any(|&s| s < SCOPE_SILENCE));

        synth.read_scope(quiet, &mut scope);
        assert!(scope.iter().all(|&s| s == SCOPE_SILENCE));
    }

    #[test]
    fn unknown_bus_scope_is_silent() {
        let mut synth = Synth::new(RATE);
        let mut scope = [0u8; SCOPE_LEN];
        synth.read_scope(BusId(7), &mut scope);
        assert!(scope.iter().all(|&s| s == SCOPE_SILENCE));
    }
}
