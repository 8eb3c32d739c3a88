use std::fmt::Display;

/// Lifecycle status published to the render callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Status {
    #[default]
    Idle,
    /// The last capture acquisition failed.
    PermissionDenied,
    Recording,
    Paused,
    Stopped,
    /// The encoder session reported an internal failure.
    RecorderError,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Idle => "idle",
            Status::PermissionDenied => "permission_denied",
            Status::Recording => "recording",
            Status::Paused => "paused",
            Status::Stopped => "stopped",
            Status::RecorderError => "recorder_error",
        }
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
