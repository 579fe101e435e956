//! Core data types for yummytracker.
//!
//! Notes, pattern rows and the pattern grid that the transport schedules
//! from. The rendering side reads rows through [`row_to_str`].
//!
//! Designed to be `no_std` compatible with the `alloc` crate.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod error;
mod note;
mod pattern;
mod render;
mod sequence;

pub use error::IrError;
pub use note::{note_for_key, Note, KEYBOARD_KEYS};
pub use pattern::{InstrumentIndex, Modifier, Pattern, TrackerRow, DEFAULT_CHANNELS};
pub use render::{row_to_str, RowText, ROW_TEXT_LEN};
pub use sequence::Sequence;
