//! Error types for handswarm.
//!
//! Only setup-time operations can fail: loading configuration and acquiring
//! the landmark source. The per-frame simulation step and the gesture
//! classifier are infallible; degenerate input there is absorbed locally.

use std::fmt;

/// Errors that can occur while loading or validating a [`SwarmConfig`](crate::config::SwarmConfig).
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read or write the config file.
    Io(std::io::Error),
    /// The file is not valid config JSON.
    Parse(serde_json::Error),
    /// A value is out of its allowed range.
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Failed to access config file: {}", e),
            ConfigError::Parse(e) => write!(f, "Failed to parse config: {}", e),
            ConfigError::Invalid(msg) => write!(f, "Invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

/// Errors reported by a [`LandmarkSource`](crate::tracker::LandmarkSource).
#[derive(Debug, Clone, PartialEq)]
pub enum TrackingError {
    /// The camera or tracking model cannot be used at all.
    ///
    /// Fatal to tracking: the worker stops and the gesture stays at `None`.
    Unavailable(String),
    /// A single landmark request failed. The tick is skipped.
    Frame(String),
}

impl TrackingError {
    /// Whether the tracker should give up after this error.
    pub fn is_fatal(&self) -> bool {
        matches!(self, TrackingError::Unavailable(_))
    }
}

impl fmt::Display for TrackingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackingError::Unavailable(msg) => write!(f, "Hand tracking unavailable: {}", msg),
            TrackingError::Frame(msg) => write!(f, "Landmark request failed: {}", msg),
        }
    }
}

impl std::error::Error for TrackingError {}

/// Errors that can occur when setting up a session.
#[derive(Debug)]
pub enum SessionError {
    /// Configuration could not be loaded or is invalid.
    Config(ConfigError),
    /// The landmark source could not be opened.
    Tracking(TrackingError),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Config(e) => write!(f, "Config error: {}", e),
            SessionError::Tracking(e) => write!(f, "Tracking error: {}", e),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::Config(e) => Some(e),
            SessionError::Tracking(e) => Some(e),
        }
    }
}

impl From<ConfigError> for SessionError {
    fn from(e: ConfigError) -> Self {
        SessionError::Config(e)
    }
}

impl From<TrackingError> for SessionError {
    fn from(e: TrackingError) -> Self {
        SessionError::Tracking(e)
    }
}
