//! Static note table and computer-keyboard mapping.

/// A pitch with its three-glyph display label.
///
/// The rest note has no frequency.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Note {
    label: &'static str,
    frequency: Option<f64>,
}

impl Note {
    pub const NONE: Note = Note::new("---", None);
    pub const C_4: Note = Note::new("C-4", Some(261.63));
    pub const C_SHARP_4: Note = Note::new("C#4", Some(277.18));
    pub const D_4: Note = Note::new("D-4", Some(293.66));
    pub const E_4: Note = Note::new("E-4", Some(329.63));
    pub const F_4: Note = Note::new("F-4", Some(349.23));
    pub const G_4: Note = Note::new("G-4", Some(392.0));
    pub const A_4: Note = Note::new("A-4", Some(440.0));
    pub const B_4: Note = Note::new("B-4", Some(493.88));

    /// Every note in the table, rest first.
    pub const ALL: [Note; 9] = [
        Note::NONE,
        Note::C_4,
        Note::C_SHARP_4,
        Note::D_4,
        Note::E_4,
        Note::F_4,
        Note::G_4,
        Note::A_4,
        Note::B_4,
    ];

    const fn new(label: &'static str, frequency: Option<f64>) -> Self {
        Self { label, frequency }
    }

    /// Three-glyph label, e.g. `C#4`.
    pub const fn label(self) -> &'static str {
        self.label
    }

    /// Frequency in Hz, `None` for a rest.
    pub const fn frequency(self) -> Option<f64> {
        self.frequency
    }

    pub const fn is_rest(self) -> bool {
        self.frequency.is_none()
    }

    /// Look up a note by its label.
    pub fn from_label(label: &str) -> Option<Note> {
        Note::ALL.iter().copied().find(|n| n.label == label)
    }
}

impl Default for Note {
    fn default() -> Self {
        Note::NONE
    }
}

/// Keys that trigger a preview note, in pitch order.
pub const KEYBOARD_KEYS: [char; 8] = ['q', '2', 'w', 'e', 'r', 't', 'y', 'u'];

/// Map a computer-keyboard key to a note (upper piano row).
pub fn note_for_key(key: char) -> Option<Note> {
    match key {
        'q' => Some(Note::C_4),
        '2' => Some(Note::C_SHARP_4),
        'w' => Some(Note::D_4),
        'e' => Some(Note::E_4),
        'r' => Some(Note::F_4),
        't' => Some(Note::G_4),
        'y' => Some(Note::A_4),
        'u' => Some(Note::B_4),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_three_glyphs() {
        for note in Note::ALL {
            assert_eq!(note.label().chars().count(), 3, "{:?}", note);
        }
    }

    #[test]
    fn only_rest_lacks_frequency() {
        assert!(Note::NONE.is_rest());
        for note in &Note::ALL[1..] {
            assert!(note.frequency().is_some_and(|f| f > 0.0));
        }
    }

    #[test]
    fn keyboard_row_is_ascending() {
        let freqs: alloc::vec::Vec<f64> = KEYBOARD_KEYS
            .iter()
            .map(|&k| note_for_key(k).and_then(Note::frequency).unwrap())
            .collect();
        assert!(freqs.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn unmapped_key() {
        assert_eq!(note_for_key('z'), None);
        assert_eq!(note_for_key('Q'), None);
    }

    #[test]
    fn from_label_round_trips_table() {
        assert_eq!(Note::from_label("A-4"), Some(Note::A_4));
        assert_eq!(Note::from_label("H-4"), None);
    }
}
