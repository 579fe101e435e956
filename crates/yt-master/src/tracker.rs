//! The tracker facade: commands in, snapshot out.

use tracing::{debug, info};
use yt_engine::{
    AudioGraph, Instrument, ScopeData, TransportConfig, TransportScheduler, TransportState,
    Waveform, SCOPE_LEN, SCOPE_SILENCE,
};
use yt_ir::{row_to_str, IrError, Pattern, RowText, Sequence, TrackerRow};

use crate::config::TrackerConfig;
use crate::cursor::EditCursor;
use crate::error::TrackerError;
use crate::keyboard::KeyboardPreview;

/// Waveform of each channel's instrument, cycling for extra channels.
pub const CHANNEL_WAVEFORMS: [Waveform; 4] = [
    Waveform::Sine,
    Waveform::Square,
    Waveform::Triangle,
    Waveform::Sawtooth,
];

/// Headless tracker: owns the pattern, instruments and transport.
///
/// Front ends send commands and call [`update`](Self::update) once per
/// frame (at least once per lookahead interval), then read the snapshot
/// accessors to draw.
pub struct Tracker<G: AudioGraph> {
    graph: G,
    sequence: Sequence,
    instruments: Vec<Instrument>,
    transport: TransportScheduler,
    preview: KeyboardPreview,
    cursor: EditCursor,
    is_editing: bool,
    scopes: Vec<ScopeData>,
}

impl<G: AudioGraph> Tracker<G> {
    /// A tracker over the default pattern of `config.pattern_length` rows.
    pub fn new(graph: G, config: &TrackerConfig) -> Result<Self, TrackerError> {
        config.validate()?;
        Self::with_pattern(graph, Pattern::demo(config.pattern_length), config)
    }

    /// A tracker over `pattern`. One instrument is created per channel.
    pub fn with_pattern(
        mut graph: G,
        pattern: Pattern,
        config: &TrackerConfig,
    ) -> Result<Self, TrackerError> {
        config.validate()?;
        let instruments: Vec<Instrument> = (0..pattern.channel_count())
            .map(|ch| {
                let waveform = CHANNEL_WAVEFORMS[ch % CHANNEL_WAVEFORMS.len()];
                Instrument::new(&mut graph, waveform, config.channel_gain)
            })
            .collect();
        let preview = KeyboardPreview::new(&mut graph, config.preview_gain);
        let scopes = vec![[SCOPE_SILENCE; SCOPE_LEN]; instruments.len()];

        info!(
            rows = pattern.length(),
            channels = pattern.channel_count(),
            "tracker ready"
        );
        Ok(Self {
            graph,
            sequence: Sequence::new(pattern),
            instruments,
            transport: TransportScheduler::new(config.transport),
            preview,
            cursor: EditCursor::default(),
            is_editing: false,
            scopes,
        })
    }

    // --- Transport ---

    pub fn toggle_play_pause(&mut self) {
        if self.transport.is_playing() {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Start playing from the current row. Returns false if already playing.
    pub fn play(&mut self) -> bool {
        let length = self.sequence.first().length();
        self.transport.play(length)
    }

    /// Stop at the current row. Returns false if already stopped.
    pub fn pause(&mut self) -> bool {
        let length = self.sequence.first().length();
        self.transport.pause(&mut self.graph, length, &self.instruments)
    }

    /// Pause, silence held preview keys and rewind to the first row.
    pub fn stop(&mut self) {
        self.pause();
        self.preview.release_all(&mut self.graph);
        let length = self.sequence.first().length();
        self.transport.seek(0, length);
        debug!("transport rewound");
    }

    /// Move the playhead up one row while stopped.
    pub fn on_up(&mut self) -> bool {
        self.transport.step_up()
    }

    /// Move the playhead down one row while stopped.
    pub fn on_down(&mut self) -> bool {
        let length = self.sequence.first().length();
        self.transport.step_down(length)
    }

    /// Replace the timing parameters. Applies to rows queued from now on.
    pub fn set_transport_config(&mut self, config: TransportConfig) -> Result<(), TrackerError> {
        config.validate()?;
        self.transport.set_config(config);
        Ok(())
    }

    /// Poll the audio clock: fire due row advances, queue rows ahead while
    /// playing and refresh the scopes. Returns the number of rows queued.
    pub fn update(&mut self) -> usize {
        let queued = self.transport.tick(
            &mut self.graph,
            self.sequence.first(),
            &self.instruments,
        );
        for (instrument, scope) in self.instruments.iter().zip(self.scopes.iter_mut()) {
            self.graph.read_scope(instrument.bus(), scope);
        }
        queued
    }

    // --- Editing ---

    pub fn toggle_edit_mode(&mut self) {
        self.is_editing = !self.is_editing;
        debug!(editing = self.is_editing, "edit mode");
    }

    pub fn move_left(&mut self) -> bool {
        self.cursor.move_left()
    }

    pub fn move_right(&mut self) -> bool {
        let channels = self.sequence.first().channel_count();
        self.cursor.move_right(channels)
    }

    /// Write one cell. The instrument index must name a live instrument.
    pub fn set_row(
        &mut self,
        channel: usize,
        row: usize,
        value: TrackerRow,
    ) -> Result<(), TrackerError> {
        if value.instrument.resolve(self.instruments.len()).is_none() {
            return Err(IrError::InvalidInstrument {
                index: value.instrument.get(),
                available: self.instruments.len(),
            }
            .into());
        }
        self.sequence.first_mut().set_row(channel, row, value)?;
        Ok(())
    }

    // --- Keyboard preview ---

    /// Sound the note bound to `key` now, unquantized.
    pub fn on_keyboard_key_pressed(&mut self, key: char) -> bool {
        self.preview.press(&mut self.graph, key)
    }

    pub fn on_keyboard_key_released(&mut self, key: char) -> bool {
        self.preview.release(&mut self.graph, key)
    }

    // --- Snapshot ---

    pub fn current_row(&self) -> usize {
        self.transport.current_row()
    }

    pub fn is_playing(&self) -> bool {
        self.transport.is_playing()
    }

    pub fn is_editing(&self) -> bool {
        self.is_editing
    }

    pub fn transport(&self) -> TransportState {
        self.transport.state()
    }

    pub fn transport_config(&self) -> &TransportConfig {
        self.transport.config()
    }

    pub fn pattern(&self) -> &Pattern {
        self.sequence.first()
    }

    pub fn get_row(&self, channel: usize, row: usize) -> Result<&TrackerRow, IrError> {
        self.sequence.first().get_row(channel, row)
    }

    pub fn row_to_str(&self, channel: usize, row: usize) -> Result<RowText, IrError> {
        self.get_row(channel, row).map(row_to_str)
    }

    pub fn cursor(&self) -> EditCursor {
        self.cursor
    }

    /// Latest oscilloscope samples of a channel, as of the last update.
    pub fn scope(&self, channel: usize) -> Option<&ScopeData> {
        self.scopes.get(channel)
    }

    pub fn instruments(&self) -> &[Instrument] {
        &self.instruments
    }

    pub fn preview(&self) -> &KeyboardPreview {
        &self.preview
    }

    pub fn graph(&self) -> &G {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut G {
        &mut self.graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yt_engine::{RecordingGraph, Synth};
    use yt_ir::{InstrumentIndex, Note};

    fn tracker() -> Tracker<RecordingGraph> {
        Tracker::new(RecordingGraph::new(), &TrackerConfig::default()).unwrap()
    }

    fn update_at(tracker: &mut Tracker<RecordingGraph>, now: f64) -> usize {
        tracker.graph_mut().set_time(now);
        tracker.update()
    }

    #[test]
    fn default_tracker_layout() {
        let t = tracker();
        assert_eq!(t.pattern().length(), 16);
        assert_eq!(t.pattern().channel_count(), 4);
        let waveforms: Vec<_> = t.instruments().iter().map(|i| i.waveform()).collect();
        assert_eq!(waveforms, CHANNEL_WAVEFORMS);
        assert_eq!(t.preview().instrument().waveform(), Waveform::Sawtooth);
        assert!(!t.is_playing());
        assert_eq!(t.current_row(), 0);
    }

    #[test]
    fn toggle_play_pause_round_trip() {
        let mut t = tracker();
        t.toggle_play_pause();
        assert!(t.is_playing());
        update_at(&mut t, 0.0);
        update_at(&mut t, 0.5);
        assert_eq!(t.current_row(), 1);

        t.toggle_play_pause();
        assert!(!t.is_playing());
        assert_eq!(t.current_row(), 1);
        assert_eq!(t.transport().next_row_to_schedule, 1);
    }

    #[test]
    fn stop_rewinds() {
        let mut t = tracker();
        t.play();
        for i in 0..=10 {
            update_at(&mut t, i as f64 * 0.1);
        }
        assert_eq!(t.current_row(), 2);
        t.stop();
        assert!(!t.is_playing());
        assert_eq!(t.current_row(), 0);
    }

    #[test]
    fn stop_silences_held_preview_keys() {
        let mut t = tracker();
        t.on_keyboard_key_pressed('q');
        t.on_keyboard_key_pressed('e');
        t.graph_mut().set_time(1.0);
        t.stop();

        assert_eq!(t.preview().held_count(), 0);
        assert!(t.graph().tones().all(|tone| tone.stop == Some(1.0)));
        // Keys can be played again after a stop.
        assert!(t.on_keyboard_key_pressed('q'));
    }

    #[test]
    fn up_down_only_while_stopped() {
        let mut t = tracker();
        assert!(!t.on_up());
        assert!(t.on_down());
        assert!(t.on_down());
        assert_eq!(t.current_row(), 2);
        assert!(t.on_up());
        assert_eq!(t.current_row(), 1);

        t.play();
        assert!(!t.on_down());
        assert!(!t.on_up());
        assert_eq!(t.current_row(), 1);
    }

    #[test]
    fn down_clamps_at_last_row() {
        let config = TrackerConfig { pattern_length: 2, ..Default::default() };
        let mut t = Tracker::new(RecordingGraph::new(), &config).unwrap();
        assert!(t.on_down());
        assert!(!t.on_down());
        assert_eq!(t.current_row(), 1);
    }

    #[test]
    fn play_from_last_row_plays_it_once() {
        let mut t = tracker();
        while t.on_down() {}
        assert_eq!(t.current_row(), 15);
        t.play();
        assert_eq!(update_at(&mut t, 0.0), 1);
        update_at(&mut t, 0.25);
        assert!(t.is_playing());
        update_at(&mut t, 0.5);
        assert!(!t.is_playing());
        assert_eq!(t.current_row(), 15);
    }

    #[test]
    fn edit_mode_and_cursor() {
        let mut t = tracker();
        assert!(!t.is_editing());
        t.toggle_edit_mode();
        assert!(t.is_editing());
        for _ in 0..6 {
            t.move_right();
        }
        assert_eq!(t.cursor().channel, 1);
        assert!(t.move_left());
        assert_eq!(t.cursor().channel, 0);
    }

    #[test]
    fn row_text_snapshot() {
        let mut t = tracker();
        let row = TrackerRow {
            instrument: InstrumentIndex::new(3).unwrap(),
            ..TrackerRow::with_note(Note::C_4)
        };
        t.set_row(2, 5, row).unwrap();
        assert_eq!(t.row_to_str(2, 5).unwrap().as_str(), "C - 4  0 3  0 0 0");
        assert_eq!(t.row_to_str(0, 0).unwrap().as_str(), "- - -  0 0  0 0 0");
    }

    #[test]
    fn out_of_range_access_is_an_error() {
        let t = tracker();
        assert_eq!(
            t.get_row(4, 0).unwrap_err(),
            IrError::InvalidIndex { channel: 4, row: 0 }
        );
        assert!(t.row_to_str(0, 16).is_err());
        assert!(t.scope(4).is_none());
    }

    #[test]
    fn set_row_rejects_missing_instrument() {
        let mut t = tracker();
        let row = TrackerRow {
            instrument: InstrumentIndex::new(4).unwrap(),
            ..TrackerRow::with_note(Note::A_4)
        };
        let err = t.set_row(0, 0, row).unwrap_err();
        assert!(matches!(
            err,
            TrackerError::Ir(IrError::InvalidInstrument { index: 4, available: 4 })
        ));
        assert_eq!(t.get_row(0, 0).unwrap().note, Note::NONE);
    }

    #[test]
    fn edited_row_is_played() {
        let mut t = tracker();
        t.set_row(3, 0, TrackerRow::with_note(Note::G_4)).unwrap();
        t.play();
        update_at(&mut t, 0.0);
        let sawtooth: Vec<_> = t
            .graph()
            .tones()
            .filter(|tone| tone.waveform == Waveform::Sawtooth)
            .collect();
        assert_eq!(sawtooth.len(), 1);
        assert_eq!(sawtooth[0].frequency, 392.0);
    }

    #[test]
    fn keyboard_preview_goes_through_tracker() {
        let mut t = tracker();
        assert!(t.on_keyboard_key_pressed('t'));
        assert!(t.preview().is_held('t'));
        assert!(t.on_keyboard_key_released('t'));
        assert!(!t.on_keyboard_key_released('t'));
    }

    #[test]
    fn invalid_transport_config_is_refused() {
        let mut t = tracker();
        let bad = TransportConfig { row_duration: -1.0, ..Default::default() };
        assert!(t.set_transport_config(bad).is_err());
        assert_eq!(t.transport_config().row_duration, 0.5);
    }

    #[test]
    fn scopes_follow_synth_output() {
        let mut t = Tracker::new(Synth::new(8_000), &TrackerConfig::default()).unwrap();
        assert!(t.scope(1).unwrap().iter().all(|&b| b == SCOPE_SILENCE));

        t.play();
        t.update();
        let mut block = [yt_engine::Frame::silence(); 400];
        t.graph_mut().render(&mut block);
        t.update();

        // Row 0 sounds D-4 on the square channel only.
        assert!(t.scope(1).unwrap().iter().any(|&b| b != SCOPE_SILENCE));
        assert!(t.scope(0).unwrap().iter().all(|&b| b == SCOPE_SILENCE));
    }
}
