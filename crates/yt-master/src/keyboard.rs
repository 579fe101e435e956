//! Live keyboard preview, outside the transport.

use heapless::FnvIndexMap;
use tracing::{trace, warn};
use yt_engine::{AudioGraph, Instrument, ToneHandle, Waveform};
use yt_ir::note_for_key;

/// Keys that can sound at once. Must be a power of two.
const MAX_HELD: usize = 16;

/// Plays notes immediately while keys are held.
///
/// Tones are tracked per key, so releasing one key never silences another.
#[derive(Debug)]
pub struct KeyboardPreview {
    instrument: Instrument,
    held: FnvIndexMap<char, ToneHandle, MAX_HELD>,
}

impl KeyboardPreview {
    /// Create the preview voice, a sawtooth on its own bus.
    pub fn new<G: AudioGraph + ?Sized>(graph: &mut G, gain: f32) -> Self {
        Self {
            instrument: Instrument::new(graph, Waveform::Sawtooth, gain),
            held: FnvIndexMap::new(),
        }
    }

    pub fn instrument(&self) -> &Instrument {
        &self.instrument
    }

    /// Start the note bound to `key`. Returns false for unmapped keys and
    /// keys already held.
    pub fn press<G: AudioGraph + ?Sized>(&mut self, graph: &mut G, key: char) -> bool {
        let Some(frequency) = note_for_key(key).and_then(|note| note.frequency()) else {
            return false;
        };
        if self.held.contains_key(&key) {
            return false;
        }
        let now = graph.current_time();
        let handle = self.instrument.schedule(graph, frequency, now);
        if self.held.insert(key, handle).is_err() {
            warn!(key = %key, "too many held keys, dropping preview");
            self.instrument.stop(graph, handle, now);
            return false;
        }
        trace!(key = %key, frequency, "preview on");
        true
    }

    /// Stop the note held on `key`. A key with no tone is ignored.
    pub fn release<G: AudioGraph + ?Sized>(&mut self, graph: &mut G, key: char) -> bool {
        let Some(handle) = self.held.remove(&key) else {
            trace!(key = %key, "release without preview tone");
            return false;
        };
        let now = graph.current_time();
        self.instrument.stop(graph, handle, now);
        trace!(key = %key, "preview off");
        true
    }

    /// Stop every held note.
    pub fn release_all<G: AudioGraph + ?Sized>(&mut self, graph: &mut G) {
        let now = graph.current_time();
        for (_, handle) in self.held.iter() {
            self.instrument.stop(graph, *handle, now);
        }
        self.held.clear();
    }

    pub fn is_held(&self, key: char) -> bool {
        self.held.contains_key(&key)
    }

    pub fn held_count(&self) -> usize {
        self.held.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yt_engine::RecordingGraph;

    #[test]
    fn press_starts_sawtooth_now() {
        let mut graph = RecordingGraph::new();
        let mut preview = KeyboardPreview::new(&mut graph, 0.5);
        graph.set_time(1.5);

        assert!(preview.press(&mut graph, 'y'));
        let tone = graph.tones().next().copied().unwrap();
        assert_eq!(tone.frequency, 440.0);
        assert_eq!(tone.start, 1.5);
        assert_eq!(tone.waveform, Waveform::Sawtooth);
        assert_eq!(tone.stop, None);
    }

    #[test]
    fn two_held_keys_do_not_clobber() {
        let mut graph = RecordingGraph::new();
        let mut preview = KeyboardPreview::new(&mut graph, 0.5);

        assert!(preview.press(&mut graph, 'q'));
        assert!(preview.press(&mut graph, 'w'));
        graph.set_time(0.25);
        assert!(preview.release(&mut graph, 'q'));

        let tones: Vec<_> = graph.tones().copied().collect();
        assert_eq!(tones.len(), 2);
        assert_eq!(tones[0].stop, Some(0.25));
        assert_eq!(tones[1].stop, None);
        assert!(preview.is_held('w'));
    }

    #[test]
    fn repeated_press_is_ignored() {
        let mut graph = RecordingGraph::new();
        let mut preview = KeyboardPreview::new(&mut graph, 0.5);
        assert!(preview.press(&mut graph, 'e'));
        assert!(!preview.press(&mut graph, 'e'));
        assert_eq!(graph.tone_count(), 1);
    }

    #[test]
    fn release_without_press_is_noop() {
        let mut graph = RecordingGraph::new();
        let mut preview = KeyboardPreview::new(&mut graph, 0.5);
        assert!(!preview.release(&mut graph, 'q'));
        assert_eq!(graph.tone_count(), 0);
    }

    #[test]
    fn unmapped_key_plays_nothing() {
        let mut graph = RecordingGraph::new();
        let mut preview = KeyboardPreview::new(&mut graph, 0.5);
        assert!(!preview.press(&mut graph, 'z'));
        assert_eq!(preview.held_count(), 0);
    }

    #[test]
    fn release_all_stops_everything() {
        let mut graph = RecordingGraph::new();
        let mut preview = KeyboardPreview::new(&mut graph, 0.5);
        for key in ['q', 'r', 'u'] {
            preview.press(&mut graph, key);
        }
        graph.set_time(2.0);
        preview.release_all(&mut graph);
        assert_eq!(preview.held_count(), 0);
        assert!(graph.tones().all(|t| t.stop == Some(2.0)));
    }
}
