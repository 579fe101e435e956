//! Errors surfaced by the tracker and its hosts.

use std::fmt;

use yt_audio::AudioError;
use yt_engine::ConfigError;
use yt_ir::IrError;

#[derive(Debug)]
pub enum TrackerError {
    /// Grid access or row validation failed
    Ir(IrError),
    /// Transport timing rejected
    Config(ConfigError),
    /// A tracker setting outside its range
    Setting { name: &'static str, reason: &'static str },
    /// Config file is not valid TOML for [`TrackerConfig`](crate::TrackerConfig)
    ConfigParse(toml::de::Error),
    Audio(AudioError),
    Wav(hound::Error),
    Io(std::io::Error),
}

impl fmt::Display for TrackerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackerError::Ir(e) => write!(f, "{}", e),
            TrackerError::Config(e) => write!(f, "Invalid transport config: {}", e),
            TrackerError::Setting { name, reason } => write!(f, "Invalid {}: {}", name, reason),
            TrackerError::ConfigParse(e) => write!(f, "Config parse error: {}", e),
            TrackerError::Audio(e) => write!(f, "{}", e),
            TrackerError::Wav(e) => write!(f, "WAV error: {}", e),
            TrackerError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for TrackerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TrackerError::Ir(e) => Some(e),
            TrackerError::Config(e) => Some(e),
            TrackerError::ConfigParse(e) => Some(e),
            TrackerError::Audio(e) => Some(e),
            TrackerError::Wav(e) => Some(e),
            TrackerError::Io(e) => Some(e),
            TrackerError::Setting { .. } => None,
        }
    }
}

impl From<IrError> for TrackerError {
    fn from(e: IrError) -> Self {
        TrackerError::Ir(e)
    }
}

impl From<ConfigError> for TrackerError {
    fn from(e: ConfigError) -> Self {
        TrackerError::Config(e)
    }
}

impl From<toml::de::Error> for TrackerError {
    fn from(e: toml::de::Error) -> Self {
        TrackerError::ConfigParse(e)
    }
}

impl From<AudioError> for TrackerError {
    fn from(e: AudioError) -> Self {
        TrackerError::Audio(e)
    }
}

impl From<hound::Error> for TrackerError {
    fn from(e: hound::Error) -> Self {
        TrackerError::Wav(e)
    }
}

impl From<std::io::Error> for TrackerError {
    fn from(e: std::io::Error) -> Self {
        TrackerError::Io(e)
    }
}
