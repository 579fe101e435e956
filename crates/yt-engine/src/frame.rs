//! Audio frame type.

/// A stereo audio frame (16-bit integer).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Frame {
    pub left: i16,
    pub right: i16,
}

impl Frame {
    pub const fn silence() -> Self {
        Self { left: 0, right: 0 }
    }

    /// Convert a mono sample in [-1.0, 1.0] to a centered frame.
    pub fn from_mono(sample: f32) -> Self {
        let value = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        Self { left: value, right: value }
    }

    /// Left channel as a float in [-1.0, 1.0].
    pub fn left_f32(self) -> f32 {
        self.left as f32 / 32768.0
    }

    /// Right channel as a float in [-1.0, 1.0].
    pub fn right_f32(self) -> f32 {
        self.right as f32 / 32768.0
    }

    pub fn is_silent(self) -> bool {
        self.left == 0 && self.right == 0
    }
}
