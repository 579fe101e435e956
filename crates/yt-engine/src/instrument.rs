//! A waveform voice bound to its own gain bus.

use crate::graph::{AudioGraph, BusId, ToneHandle, Waveform};

/// A voice that schedules tones of one waveform onto one bus.
///
/// The bus is created once and lives as long as the graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Instrument {
    waveform: Waveform,
    bus: BusId,
}

impl Instrument {
    /// Create the instrument and its bus.
    pub fn new<G: AudioGraph + ?Sized>(graph: &mut G, waveform: Waveform, gain: f32) -> Self {
        let bus = graph.create_bus(gain);
        Self { waveform, bus }
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    pub fn bus(&self) -> BusId {
        self.bus
    }

    /// Start a tone at `start`. Pitch and start are fixed once scheduled.
    ///
    /// `frequency` must be positive; rests are filtered by the caller.
    pub fn schedule<G: AudioGraph + ?Sized>(
        &self,
        graph: &mut G,
        frequency: f64,
        start: f64,
    ) -> ToneHandle {
        debug_assert!(frequency > 0.0, "non-positive frequency {}", frequency);
        graph.start_tone(self.bus, self.waveform, frequency, start)
    }

    /// Silence a tone at `at`.
    pub fn stop<G: AudioGraph + ?Sized>(&self, graph: &mut G, handle: ToneHandle, at: f64) {
        graph.stop_tone(handle, at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingGraph;

    #[test]
    fn each_instrument_gets_its_own_bus() {
        let mut graph = RecordingGraph::new();
        let a = Instrument::new(&mut graph, Waveform::Sine, 1.0);
        let b = Instrument::new(&mut graph, Waveform::Square, 0.5);
        assert_ne!(a.bus(), b.bus());
        assert_eq!(graph.bus_gain(b.bus()), Some(0.5));
    }

    #[test]
    fn schedule_then_stop() {
        let mut graph = RecordingGraph::new();
        let inst = Instrument::new(&mut graph, Waveform::Triangle, 1.0);
        let handle = inst.schedule(&mut graph, 440.0, 1.0);
        inst.stop(&mut graph, handle, 1.1);

        let tone = graph.tone(handle).unwrap();
        assert_eq!(tone.waveform, Waveform::Triangle);
        assert_eq!(tone.bus, inst.bus());
        assert_eq!(tone.start, 1.0);
        assert_eq!(tone.stop, Some(1.1));
    }

    #[test]
    fn stop_in_the_past_is_ignored() {
        let mut graph = RecordingGraph::new();
        let inst = Instrument::new(&mut graph, Waveform::Sine, 1.0);
        let handle = inst.schedule(&mut graph, 440.0, 0.0);
        graph.set_time(2.0);
        inst.stop(&mut graph, handle, 1.0);
        assert_eq!(graph.tone(handle).unwrap().stop, None);
    }
}
