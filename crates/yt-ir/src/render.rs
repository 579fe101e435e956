//! Fixed-width text rendering of pattern rows.

use arrayvec::ArrayString;

use crate::pattern::TrackerRow;

/// Length of a rendered row: `N N N  I I  M M M`.
pub const ROW_TEXT_LEN: usize = 17;

/// A rendered row. Fixed capacity, no heap allocation.
pub type RowText = ArrayString<ROW_TEXT_LEN>;

const FIELD_SEPARATOR: &str = "  ";

/// Render a row as space-separated glyphs.
///
/// Note label, two-digit instrument and three-digit modifier, each glyph
/// separated by one space and each field by two:
/// `C-4`, instrument 3 renders as `C - 4  0 3  0 0 0`.
pub fn row_to_str(row: &TrackerRow) -> RowText {
    let mut out = RowText::new();

    push_spaced(&mut out, row.note.label().chars());

    out.push_str(FIELD_SEPARATOR);
    let instrument = row.instrument.get();
    push_spaced(
        &mut out,
        [digit(instrument / 10), digit(instrument % 10)].into_iter(),
    );

    // Modifiers are placeholders and always read as zero.
    out.push_str(FIELD_SEPARATOR);
    push_spaced(&mut out, ['0'; 3].into_iter());

    out
}

fn push_spaced(out: &mut RowText, glyphs: impl Iterator<Item = char>) {
    for (i, glyph) in glyphs.enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push(glyph);
    }
}

fn digit(value: u8) -> char {
    char::from(b'0' + value % 10)
}
