/// The live cpal input stream.
mod capture;

mod constants;

/// Device lookup by name or host default.
mod get_default_device;

mod macros;

/// PCM encoder session over a capture.
mod pcm_session;

use cpal::traits::HostTrait;

pub use capture::{CaptureFormat, CaptureSample, CpalCapture, channels_to_mono};
pub use pcm_session::PcmSession;

use crate::recorder::{AcquireError, EventSink, MediaPlatform, MediaRequest};

/// Records audio from a cpal host.
///
/// Video requests are rejected at acquisition, which the recorder reports
/// as `permission_denied`.
pub struct CpalPlatform {
    host: cpal::Host,
}

impl CpalPlatform {
    /// Uses the default host.
    pub fn new() -> Self {
        CpalPlatform {
            host: cpal::default_host(),
        }
    }

    pub fn with_host(host: cpal::Host) -> Self {
        CpalPlatform { host }
    }
}

impl Default for CpalPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaPlatform for CpalPlatform {
    type Stream = CpalCapture;
    type Session = PcmSession;

    fn supports_recording(&self) -> bool {
        match self.host.input_devices() {
            Ok(_) => true,
            Err(e) => {
                tracing::error!("Host cannot enumerate input devices: {:?}", e);
                false
            }
        }
    }

    #[tracing::instrument(skip(self))]
    fn get_user_media(&mut self, request: &MediaRequest) -> Result<CpalCapture, AcquireError> {
        if request.wants_video() {
            tracing::error!("Video capture requested from an audio-only host");
            return Err(AcquireError::NotSupported("video capture"));
        }
        if !request.wants_audio() {
            return Err(AcquireError::NothingRequested);
        }

        let constraints = request.audio.constraints();
        let device = match constraints.and_then(|c| c.device_id.as_deref()) {
            Some(name) => get_default_device::find_input_device(&self.host, name)?,
            None => get_default_device::get_default_input_device(&self.host)?,
        };

        CpalCapture::open(device, constraints)
    }

    fn create_session(&mut self, stream: &CpalCapture, sink: EventSink) -> PcmSession {
        tracing::debug!(
            "Creating PCM session {} on {}",
            sink.session(),
            stream.device_name()
        );
        PcmSession::new(stream, sink)
    }
}
