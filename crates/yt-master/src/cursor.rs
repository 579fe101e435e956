//! Edit cursor over the pattern's cell fields.

/// Which editable field of a cell the cursor is on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CellField {
    #[default]
    Note,
    Instrument0,
    Instrument1,
    Modifier0,
    Modifier1,
    Modifier2,
}

/// Fields per channel.
const FIELD_COUNT: usize = 6;

impl CellField {
    /// All fields in display order.
    pub const ALL: [CellField; FIELD_COUNT] = [
        CellField::Note,
        CellField::Instrument0,
        CellField::Instrument1,
        CellField::Modifier0,
        CellField::Modifier1,
        CellField::Modifier2,
    ];

    fn index(self) -> usize {
        match self {
            CellField::Note => 0,
            CellField::Instrument0 => 1,
            CellField::Instrument1 => 2,
            CellField::Modifier0 => 3,
            CellField::Modifier1 => 4,
            CellField::Modifier2 => 5,
        }
    }

    /// Next field to the right. Returns (field, wrapped_to_next_channel).
    pub fn next(self) -> (CellField, bool) {
        let idx = self.index();
        if idx + 1 < FIELD_COUNT {
            (CellField::ALL[idx + 1], false)
        } else {
            (CellField::ALL[0], true)
        }
    }

    /// Next field to the left. Returns (field, wrapped_to_prev_channel).
    pub fn prev(self) -> (CellField, bool) {
        let idx = self.index();
        if idx > 0 {
            (CellField::ALL[idx - 1], false)
        } else {
            (CellField::ALL[FIELD_COUNT - 1], true)
        }
    }
}

/// Horizontal cursor position: a channel and a field within it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EditCursor {
    pub channel: usize,
    pub field: CellField,
}

impl EditCursor {
    /// Step right, wrapping into the next channel. Stays put on the last
    /// field of the last channel. Returns whether the cursor moved.
    pub fn move_right(&mut self, channel_count: usize) -> bool {
        let (field, wrapped) = self.field.next();
        if wrapped {
            if self.channel + 1 >= channel_count {
                return false;
            }
            self.channel += 1;
        }
        self.field = field;
        true
    }

    /// Step left, wrapping into the previous channel. Stays put on the
    /// first field of channel 0. Returns whether the cursor moved.
    pub fn move_left(&mut self) -> bool {
        let (field, wrapped) = self.field.prev();
        if wrapped {
            if self.channel == 0 {
                return false;
            }
            self.channel -= 1;
        }
        self.field = field;
        true
    }
}
