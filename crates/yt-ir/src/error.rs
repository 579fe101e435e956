//! Error type for grid access.

use core::fmt;

/// Errors raised by checked pattern accessors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IrError {
    /// Channel or row outside the pattern
    InvalidIndex { channel: usize, row: usize },
    /// Instrument index not backed by a live instrument
    InvalidInstrument { index: u8, available: usize },
    /// Channels handed to a pattern constructor differ in length
    ChannelLengthMismatch { channel: usize, expected: usize, found: usize },
}

impl fmt::Display for IrError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IrError::InvalidIndex { channel, row } => {
                write!(f, "Invalid index: channel {}, row {}", channel, row)
            }
            IrError::InvalidInstrument { index, available } => {
                write!(f, "Invalid instrument {:02} ({} available)", index, available)
            }
            IrError::ChannelLengthMismatch { channel, expected, found } => write!(
                f,
                "Channel {} has {} rows, expected {}",
                channel, found, expected
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for IrError {}
