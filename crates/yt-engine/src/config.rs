//! Transport timing parameters.

use core::fmt;

/// Tempo and lookahead settings for the transport.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TransportConfig {
    /// Seconds per row
    pub row_duration: f64,
    /// Seconds a triggered tone sounds. At most `row_duration`.
    pub note_gate: f64,
    /// Furthest a row may be queued ahead of the playhead, in seconds
    pub lookahead: f64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            row_duration: 0.5,
            note_gate: 0.1,
            lookahead: 0.55,
        }
    }
}

impl TransportConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.row_duration.is_finite() && self.row_duration > 0.0) {
            return Err(ConfigError::RowDuration(self.row_duration));
        }
        if !(self.note_gate > 0.0 && self.note_gate <= self.row_duration) {
            return Err(ConfigError::NoteGate {
                gate: self.note_gate,
                row_duration: self.row_duration,
            });
        }
        if !(self.lookahead.is_finite() && self.lookahead >= 0.0) {
            return Err(ConfigError::Lookahead(self.lookahead));
        }
        Ok(())
    }
}

/// Rejected transport parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ConfigError {
    RowDuration(f64),
    NoteGate { gate: f64, row_duration: f64 },
    Lookahead(f64),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::RowDuration(v) => write!(f, "row duration must be positive, got {}", v),
            ConfigError::NoteGate { gate, row_duration } => write!(
                f,
                "note gate must be in (0, {}], got {}",
                row_duration, gate
            ),
            ConfigError::Lookahead(v) => write!(f, "lookahead must not be negative, got {}", v),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}
