//! Pattern grid and row types.

use alloc::vec::Vec;

use crate::error::IrError;
use crate::note::Note;

/// Number of channels in a freshly created pattern.
pub const DEFAULT_CHANNELS: usize = 4;

/// Two-digit instrument number stored in a row.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InstrumentIndex(u8);

impl InstrumentIndex {
    /// Largest index that fits the two-digit display.
    pub const MAX: u8 = 99;

    pub const fn new(index: u8) -> Option<Self> {
        if index <= Self::MAX {
            Some(Self(index))
        } else {
            None
        }
    }

    pub const fn get(self) -> u8 {
        self.0
    }

    /// Resolve against the number of live instruments.
    pub fn resolve(self, instrument_count: usize) -> Option<usize> {
        let index = self.0 as usize;
        (index < instrument_count).then_some(index)
    }
}

/// Effect column placeholder. Not interpreted by playback.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Modifier {
    #[default]
    A,
    B,
}

/// A single cell in a pattern.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TrackerRow {
    pub note: Note,
    pub instrument: InstrumentIndex,
    pub modifier: Modifier,
}

impl TrackerRow {
    /// A row holding `note` with instrument 0 and the default modifier.
    pub const fn with_note(note: Note) -> Self {
        Self {
            note,
            instrument: InstrumentIndex(0),
            modifier: Modifier::A,
        }
    }

    pub const fn empty() -> Self {
        Self::with_note(Note::NONE)
    }
}

/// A pattern containing rows of cells across channels.
///
/// Every channel has the same number of rows.
#[derive(Clone, Debug)]
pub struct Pattern {
    length: usize,
    channels: usize,
    /// Row-major: data[row * channels + channel]
    data: Vec<TrackerRow>,
}

impl Pattern {
    /// Create a pattern of rests.
    pub fn new(length: usize, channels: usize) -> Self {
        Self {
            length,
            channels,
            data: alloc::vec![TrackerRow::empty(); length * channels],
        }
    }

    /// Build a pattern from per-channel note lists.
    pub fn from_channels(channels: &[&[Note]]) -> Result<Self, IrError> {
        let length = channels.first().map_or(0, |c| c.len());
        let mut pattern = Self::new(length, channels.len());
        for (ch, notes) in channels.iter().enumerate() {
            if notes.len() != length {
                return Err(IrError::ChannelLengthMismatch {
                    channel: ch,
                    expected: length,
                    found: notes.len(),
                });
            }
            for (row, &note) in notes.iter().enumerate() {
                pattern.data[row * pattern.channels + ch] = TrackerRow::with_note(note);
            }
        }
        Ok(pattern)
    }

    /// The startup pattern: an off-beat E-4 on channel 0 answering an
    /// on-beat D-4 on channel 1.
    pub fn demo(length: usize) -> Self {
        let mut pattern = Self::new(length, DEFAULT_CHANNELS);
        for row in 0..length {
            let even = row % 2 == 0;
            pattern.cell_mut(0, row).note = if even { Note::NONE } else { Note::E_4 };
            pattern.cell_mut(1, row).note = if even { Note::D_4 } else { Note::NONE };
        }
        pattern
    }

    /// Number of rows per channel.
    pub fn length(&self) -> usize {
        self.length
    }

    pub fn channel_count(&self) -> usize {
        self.channels
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    fn index_of(&self, channel: usize, row: usize) -> Result<usize, IrError> {
        if channel < self.channels && row < self.length {
            Ok(row * self.channels + channel)
        } else {
            Err(IrError::InvalidIndex { channel, row })
        }
    }

    /// Bounds-checked row access.
    pub fn get_row(&self, channel: usize, row: usize) -> Result<&TrackerRow, IrError> {
        let idx = self.index_of(channel, row)?;
        Ok(&self.data[idx])
    }

    /// Bounds-checked row write.
    pub fn set_row(&mut self, channel: usize, row: usize, value: TrackerRow) -> Result<(), IrError> {
        let idx = self.index_of(channel, row)?;
        self.data[idx] = value;
        Ok(())
    }

    /// Get a reference to a cell. Indices must be in range.
    pub fn cell(&self, channel: usize, row: usize) -> &TrackerRow {
        debug_assert!(row < self.length);
        debug_assert!(channel < self.channels);
        &self.data[row * self.channels + channel]
    }

    /// Get a mutable reference to a cell. Indices must be in range.
    pub fn cell_mut(&mut self, channel: usize, row: usize) -> &mut TrackerRow {
        debug_assert!(row < self.length);
        debug_assert!(channel < self.channels);
        &mut self.data[row * self.channels + channel]
    }

    /// All channels of one row, in channel order.
    pub fn row(&self, row: usize) -> &[TrackerRow] {
        debug_assert!(row < self.length);
        let start = row * self.channels;
        &self.data[start..start + self.channels]
    }

    /// Iterate over one channel from top to bottom.
    pub fn channel(&self, channel: usize) -> impl Iterator<Item = &TrackerRow> + '_ {
        debug_assert!(channel < self.channels);
        self.data.iter().skip(channel).step_by(self.channels.max(1))
    }
}
