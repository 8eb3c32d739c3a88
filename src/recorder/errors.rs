use std::fmt::Display;

/// Errors surfaced while constructing a [`MediaRecorder`](super::MediaRecorder).
///
/// Everything after construction is folded into the published
/// [`Status`](super::Status) instead of being returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaRecorderError {
    /// The platform cannot record at all.
    Unsupported,
    Config(ConfigError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// `muted` together with an audio-only request.
    MutedAudioOnly,
}

/// Why a capture stream could not be acquired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcquireError {
    /// The user or the system refused access.
    PermissionDenied,
    DeviceUnavailable(String),
    NotSupported(&'static str),
    /// Neither audio nor video was requested.
    NothingRequested,
}

impl Display for MediaRecorderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaRecorderError::Unsupported => {
                write!(f, "Media recorder is not supported on this platform")
            }
            MediaRecorderError::Config(err) => write!(f, "Invalid configuration: {err}"),
        }
    }
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::MutedAudioOnly => write!(
                f,
                "cannot mute an audio-only recording, request video or unmute"
            ),
        }
    }
}

impl Display for AcquireError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AcquireError::PermissionDenied => write!(f, "Permission to capture media denied"),
            AcquireError::DeviceUnavailable(msg) => write!(f, "Device unavailable: {msg}"),
            AcquireError::NotSupported(what) => write!(f, "Not supported: {what}"),
            AcquireError::NothingRequested => {
                write!(f, "At least one of audio or video must be requested")
            }
        }
    }
}

impl std::error::Error for MediaRecorderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MediaRecorderError::Config(err) => Some(err),
            MediaRecorderError::Unsupported => None,
        }
    }
}

impl std::error::Error for ConfigError {}

impl std::error::Error for AcquireError {}

impl From<ConfigError> for MediaRecorderError {
    fn from(err: ConfigError) -> Self {
        MediaRecorderError::Config(err)
    }
}
