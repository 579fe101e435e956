//! Lookahead transport scheduling.
//!
//! Rows are queued onto instruments up to `lookahead` seconds ahead of the
//! playhead. The playhead itself (`current_row`) only moves when a queued
//! row's duration has elapsed on the audio clock, through an `AdvanceRow`
//! action armed in the [`DeferredQueue`]. Queued audio is never rewound
//! except for tones that have not started yet when the transport stops.
//!
//! The host must call [`TransportScheduler::tick`] at least once per
//! `lookahead` interval; slower polling leaves audible gaps.

use alloc::vec::Vec;
use tracing::{debug, trace, warn};
use yt_ir::Pattern;

use crate::config::TransportConfig;
use crate::deferred::{DeferredAction, DeferredQueue};
use crate::graph::{AudioGraph, ToneHandle};
use crate::instrument::Instrument;

/// Snapshot of the transport position.
///
/// `next_row_to_schedule >= current_row` always holds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TransportState {
    pub is_playing: bool,
    /// Row the playhead is on (audible position)
    pub current_row: usize,
    /// First row not yet queued
    pub next_row_to_schedule: usize,
}

/// A queued tone that may still be retracted.
#[derive(Clone, Copy, Debug)]
struct PendingTone {
    channel: usize,
    handle: ToneHandle,
    start: f64,
}

/// Drives the `STOPPED`/`PLAYING` state machine and the lookahead loop.
#[derive(Debug)]
pub struct TransportScheduler {
    config: TransportConfig,
    state: TransportState,
    deferred: DeferredQueue,
    /// Tones queued with a start time not yet reached at the last tick
    pending: Vec<PendingTone>,
    /// End-of-pattern already armed for this run
    end_armed: bool,
}

impl TransportScheduler {
    pub fn new(config: TransportConfig) -> Self {
        Self {
            config,
            state: TransportState::default(),
            deferred: DeferredQueue::new(),
            pending: Vec::new(),
            end_armed: false,
        }
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// Replace the timing parameters. Takes effect from the next queued row.
    pub fn set_config(&mut self, config: TransportConfig) {
        self.config = config;
    }

    pub fn state(&self) -> TransportState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state.is_playing
    }

    pub fn current_row(&self) -> usize {
        self.state.current_row
    }

    pub fn next_row_to_schedule(&self) -> usize {
        self.state.next_row_to_schedule
    }

    /// Seconds between the playhead and the next row to queue.
    pub fn lead_time(&self) -> f64 {
        (self.state.next_row_to_schedule - self.state.current_row) as f64
            * self.config.row_duration
    }

    /// Deferred actions still armed.
    pub fn pending_actions(&self) -> usize {
        self.deferred.pending()
    }

    /// `STOPPED -> PLAYING`. Queuing resumes from the playhead row.
    ///
    /// Returns false if already playing or the pattern is empty.
    pub fn play(&mut self, pattern_length: usize) -> bool {
        if self.state.is_playing || pattern_length == 0 {
            return false;
        }
        self.state.current_row = self.state.current_row.min(pattern_length - 1);
        self.state.next_row_to_schedule = self.state.current_row;
        self.state.is_playing = true;
        self.end_armed = false;
        debug!(row = self.state.current_row, "transport play");
        true
    }

    /// `PLAYING -> STOPPED`.
    ///
    /// Actions already due fire first, so the playhead lands on the row
    /// being heard. Later row advances are cancelled and tones queued for
    /// the future are stopped before they start. Tones already sounding
    /// finish their gate.
    pub fn pause<G: AudioGraph + ?Sized>(
        &mut self,
        graph: &mut G,
        pattern_length: usize,
        instruments: &[Instrument],
    ) -> bool {
        if !self.state.is_playing {
            return false;
        }
        let now = graph.current_time();
        self.fire_due(now, pattern_length);
        if !self.state.is_playing {
            return false;
        }
        self.state.is_playing = false;
        self.state.next_row_to_schedule = self.state.current_row;
        self.deferred.invalidate();
        self.end_armed = false;

        let mut retracted = 0;
        for tone in self.pending.drain(..) {
            if tone.start > now {
                if let Some(instrument) = instruments.get(tone.channel) {
                    instrument.stop(graph, tone.handle, now);
                    retracted += 1;
                }
            }
        }
        debug!(row = self.state.current_row, retracted, "transport pause");
        true
    }

    /// Move the playhead up one row. Only while stopped.
    pub fn step_up(&mut self) -> bool {
        if self.state.is_playing || self.state.current_row == 0 {
            return false;
        }
        self.state.current_row -= 1;
        self.state.next_row_to_schedule = self.state.current_row;
        true
    }

    /// Move the playhead down one row. Only while stopped.
    pub fn step_down(&mut self, pattern_length: usize) -> bool {
        if self.state.is_playing || self.state.current_row + 1 >= pattern_length {
            return false;
        }
        self.state.current_row += 1;
        self.state.next_row_to_schedule = self.state.current_row;
        true
    }

    /// Place the playhead on `row`. Only while stopped.
    pub fn seek(&mut self, row: usize, pattern_length: usize) -> bool {
        if self.state.is_playing || row >= pattern_length {
            return false;
        }
        self.state.current_row = row;
        self.state.next_row_to_schedule = row;
        true
    }

    /// Run one scheduling pass against the graph clock.
    ///
    /// Fires every deferred action that has come due, then, while playing,
    /// queues rows until the next one would start more than `lookahead`
    /// seconds past the playhead. Returns the number of rows queued.
    ///
    /// Cost is bounded by `lookahead / row_duration` rows plus the actions
    /// fired, independent of the pattern length.
    pub fn tick<G: AudioGraph + ?Sized>(
        &mut self,
        graph: &mut G,
        pattern: &Pattern,
        instruments: &[Instrument],
    ) -> usize {
        let now = graph.current_time();
        self.fire_due(now, pattern.length());
        if !self.state.is_playing {
            return 0;
        }
        self.pending.retain(|tone| tone.start > now);
        let queued = self.schedule_ahead(now, graph, pattern, instruments);
        debug_assert!(self.state.next_row_to_schedule >= self.state.current_row);
        queued
    }

    fn fire_due(&mut self, now: f64, pattern_length: usize) {
        while let Some(action) = self.deferred.pop_due(now) {
            match action {
                DeferredAction::AdvanceRow => {
                    let last = pattern_length.saturating_sub(1);
                    self.state.current_row = (self.state.current_row + 1).min(last);
                    trace!(row = self.state.current_row, "playhead advanced");
                }
                DeferredAction::EndOfPattern => {
                    self.state.is_playing = false;
                    self.end_armed = false;
                    self.pending.clear();
                    debug!(row = self.state.current_row, "end of pattern");
                }
            }
        }
    }

    fn schedule_ahead<G: AudioGraph + ?Sized>(
        &mut self,
        now: f64,
        graph: &mut G,
        pattern: &Pattern,
        instruments: &[Instrument],
    ) -> usize {
        let mut queued = 0;
        loop {
            let lead = self.lead_time();
            if lead > self.config.lookahead {
                break;
            }

            let row = self.state.next_row_to_schedule;
            if row >= pattern.length() {
                if !self.end_armed {
                    self.deferred.arm(now + lead, DeferredAction::EndOfPattern);
                    self.end_armed = true;
                }
                break;
            }

            let start = now + lead;
            for (channel, cell) in pattern.row(row).iter().enumerate() {
                let Some(frequency) = cell.note.frequency() else {
                    continue;
                };
                let Some(instrument) = instruments.get(channel) else {
                    warn!(channel, "no instrument for channel");
                    continue;
                };
                let handle = instrument.schedule(graph, frequency, start);
                instrument.stop(graph, handle, start + self.config.note_gate);
                if start > now {
                    self.pending.push(PendingTone { channel, handle, start });
                }
            }

            self.deferred
                .arm(start + self.config.row_duration, DeferredAction::AdvanceRow);
            self.state.next_row_to_schedule += 1;
            queued += 1;
            trace!(row, start, "row queued");
        }
        queued
    }
}
