//! Audio output trait and error types.

use yt_engine::Frame;

/// Error type for audio operations.
#[derive(Debug)]
pub enum AudioError {
    /// Failed to initialize audio device
    DeviceInit(String),
    /// Failed to create audio stream
    StreamCreate(String),
    /// Playback error
    Playback(String),
    /// No audio device available
    NoDevice,
    /// The render thread exited before reporting its device
    RenderThread,
}

impl std::fmt::Display for AudioError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AudioError::DeviceInit(msg) => write!(f, "Device init error: {}", msg),
            AudioError::StreamCreate(msg) => write!(f, "Stream create error: {}", msg),
            AudioError::Playback(msg) => write!(f, "Playback error: {}", msg),
            AudioError::NoDevice => write!(f, "No audio device available"),
            AudioError::RenderThread => write!(f, "Render thread exited during startup"),
        }
    }
}

impl std::error::Error for AudioError {}

/// Trait for audio output backends.
pub trait AudioOutput {
    /// Device sample rate in Hz.
    fn sample_rate(&self) -> u32;

    /// Queue frames without blocking. Returns how many were accepted.
    fn write(&mut self, frames: &[Frame]) -> usize;

    /// Queue frames, waiting for room as needed.
    fn write_all(&mut self, frames: &[Frame]);

    /// Start pulling frames.
    fn start(&mut self) -> Result<(), AudioError>;

    /// Stop pulling frames; the device outputs silence.
    fn stop(&mut self) -> Result<(), AudioError>;
}
