use std::time::Duration;

use super::{
    blob::BlobOptions,
    constants::{DEFAULT_AUDIO_MIME_TYPE, DEFAULT_VIDEO_MIME_TYPE},
    errors::ConfigError,
};

/// Optional hints narrowing what a backend should capture.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackConstraints {
    /// Backend specific device identifier (the device name for cpal).
    pub device_id: Option<String>,
    pub sample_rate: Option<u32>,
    pub channel_count: Option<u16>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub frame_rate: Option<u32>,
}

/// Either a plain on/off switch or a set of constraints for one track kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaConstraint {
    Enabled(bool),
    Constraints(TrackConstraints),
}

impl MediaConstraint {
    /// Any constraint object counts as a request.
    pub fn is_requested(&self) -> bool {
        match self {
            MediaConstraint::Enabled(enabled) => *enabled,
            MediaConstraint::Constraints(_) => true,
        }
    }

    pub fn constraints(&self) -> Option<&TrackConstraints> {
        match self {
            MediaConstraint::Constraints(constraints) => Some(constraints),
            MediaConstraint::Enabled(_) => None,
        }
    }
}

impl From<bool> for MediaConstraint {
    fn from(enabled: bool) -> Self {
        MediaConstraint::Enabled(enabled)
    }
}

impl From<TrackConstraints> for MediaConstraint {
    fn from(constraints: TrackConstraints) -> Self {
        MediaConstraint::Constraints(constraints)
    }
}

/// The effective request handed to the platform on every acquisition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaRequest {
    pub audio: MediaConstraint,
    pub video: MediaConstraint,
}

impl MediaRequest {
    pub fn wants_audio(&self) -> bool {
        self.audio.is_requested()
    }

    pub fn wants_video(&self) -> bool {
        self.video.is_requested()
    }
}

/// Construction-time recorder configuration.
///
/// ```
/// use media_recorder_rs::RecorderConfig;
///
/// let config = RecorderConfig::new().video(true).muted(true);
/// let request = config.media_request().unwrap();
/// assert!(!request.wants_audio());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecorderConfig {
    pub audio: MediaConstraint,
    pub video: MediaConstraint,
    pub muted: bool,
    /// Tags the assembled blob; defaults depend on whether video is requested.
    pub output_format: Option<BlobOptions>,
    /// Chunk interval passed to every encoder session.
    pub timeslice: Option<Duration>,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        RecorderConfig {
            audio: MediaConstraint::Enabled(true),
            video: MediaConstraint::Enabled(false),
            muted: false,
            output_format: None,
            timeslice: None,
        }
    }
}

impl RecorderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn audio(mut self, audio: impl Into<MediaConstraint>) -> Self {
        self.audio = audio.into();
        self
    }

    pub fn video(mut self, video: impl Into<MediaConstraint>) -> Self {
        self.video = video.into();
        self
    }

    pub fn muted(mut self, muted: bool) -> Self {
        self.muted = muted;
        self
    }

    pub fn output_format(mut self, options: BlobOptions) -> Self {
        self.output_format = Some(options);
        self
    }

    pub fn timeslice(mut self, timeslice: Duration) -> Self {
        self.timeslice = Some(timeslice);
        self
    }

    /// Rejects muting an audio-only recording.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.muted && self.audio.is_requested() && !self.video.is_requested() {
            return Err(ConfigError::MutedAudioOnly);
        }
        Ok(())
    }

    /// Validates and computes the request the platform will see.
    ///
    /// Muting a video recording drops the audio track entirely.
    pub fn media_request(&self) -> Result<MediaRequest, ConfigError> {
        self.validate()?;

        let audio = if self.video.is_requested() && self.muted {
            MediaConstraint::Enabled(false)
        } else {
            self.audio.clone()
        };

        Ok(MediaRequest {
            audio,
            video: self.video.clone(),
        })
    }

    pub fn blob_options(&self) -> BlobOptions {
        match &self.output_format {
            Some(options) => options.clone(),
            None if self.video.is_requested() => BlobOptions::new(DEFAULT_VIDEO_MIME_TYPE),
            None => BlobOptions::new(DEFAULT_AUDIO_MIME_TYPE),
        }
    }
}
