//! The audio graph seam: clock, tone scheduling and scope taps.

use slotmap::new_key_type;

new_key_type! {
    /// Opaque reference to one scheduled tone.
    pub struct ToneHandle;
}

/// Index of a gain bus in the graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BusId(pub usize);

/// Oscillator shape of an instrument.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Waveform {
    #[default]
    Sine,
    Square,
    Triangle,
    Sawtooth,
}

/// Samples kept per oscilloscope buffer.
pub const SCOPE_LEN: usize = 1024;

/// Scope byte value for a zero sample.
pub const SCOPE_SILENCE: u8 = 128;

/// One oscilloscope buffer of unsigned byte samples, oldest first.
pub type ScopeData = [u8; SCOPE_LEN];

/// An audio backend the transport can schedule into.
///
/// Times are absolute seconds on the graph's own clock, which is the only
/// timing authority for scheduling.
pub trait AudioGraph {
    /// Current audio clock time in seconds.
    fn current_time(&self) -> f64;

    /// Create a gain bus feeding the master output.
    fn create_bus(&mut self, gain: f32) -> BusId;

    /// Start a tone at `start`. Times at or before now start immediately.
    fn start_tone(
        &mut self,
        bus: BusId,
        waveform: Waveform,
        frequency: f64,
        start: f64,
    ) -> ToneHandle;

    /// Silence a tone at `at`. No-op if `at` has passed or the tone is gone.
    fn stop_tone(&mut self, handle: ToneHandle, at: f64);

    /// Copy the latest scope samples for `bus` into `out`.
    fn read_scope(&mut self, bus: BusId, out: &mut ScopeData) {
        let _ = bus;
        out.fill(SCOPE_SILENCE);
    }
}
