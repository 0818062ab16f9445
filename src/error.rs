//! Error taxonomy for the coordination core.
//!
//! None of these are fatal: each is logged at the boundary where it occurs and
//! the affected component keeps its previous (or a documented default) state.

use crate::app::Component;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A configuration value could not be interpreted; `fallback` was used instead.
    ConfigParse {
        key: &'static str,
        value: String,
        fallback: String,
    },
    /// The media subsystem could not open a recorded file for playback.
    PlaybackOpen { path: PathBuf, reason: String },
    /// The external recording service reported an error status.
    RecordingBackend { message: String },
    /// An instrumentation point failed to attach to the host.
    InstrumentationAttach { point: String, reason: String },
}

impl CoreError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ConfigParse { .. } => "ConfigParseError",
            Self::PlaybackOpen { .. } => "PlaybackOpenError",
            Self::RecordingBackend { .. } => "RecordingBackendError",
            Self::InstrumentationAttach { .. } => "InstrumentationAttachError",
        }
    }

    /// Where the error is logged.
    pub fn component(&self) -> Component {
        match self {
            Self::ConfigParse { .. } => Component::Config,
            Self::PlaybackOpen { .. } | Self::RecordingBackend { .. } => Component::Recording,
            Self::InstrumentationAttach { .. } => Component::Host,
        }
    }
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse {
                key,
                value,
                fallback,
            } => write!(
                f,
                "invalid value {value:?} for {key}; falling back to {fallback}"
            ),
            Self::PlaybackOpen { path, reason } => {
                write!(f, "cannot open {} for playback: {reason}", path.display())
            }
            Self::RecordingBackend { message } => write!(f, "recording backend error: {message}"),
            Self::InstrumentationAttach { point, reason } => {
                write!(f, "failed to attach {point}: {reason}")
            }
        }
    }
}

impl std::error::Error for CoreError {}
