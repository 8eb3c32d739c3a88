/// Blob assembly and the object URL registry.
mod blob;

/// Construction-time configuration and the derived media request.
mod config;

/// Default media types and URL scheme.
mod constants;

mod errors;

/// Notification handling and render publication.
mod helpers;

/// Traits implemented by capture backends.
pub mod platform;

/// The payload handed to the render callback.
mod render;

mod status;

use std::{fmt, time::Duration};

use crossbeam_channel::{Receiver, Sender};

pub use blob::{Blob, BlobOptions, BlobRegistry};
pub use config::{MediaConstraint, MediaRequest, RecorderConfig, TrackConstraints};
pub use errors::{AcquireError, ConfigError, MediaRecorderError};
pub use platform::{
    CaptureStream, EncoderEvent, EncoderSession, EncoderState, EventSink, MediaPlatform,
    SessionId,
};
pub use render::{RecorderControls, RenderProps};
pub use status::Status;

use platform::Message;

type RenderFn = Box<dyn FnMut(&RenderProps)>;

/// Drives one capture stream through record/pause/resume/stop and publishes
/// the result to a render callback.
///
/// All state lives on the caller's thread. Platform notifications and calls
/// made through [`RecorderControls`] are queued and applied by
/// [`process_events`](Self::process_events).
pub struct MediaRecorder<P: MediaPlatform> {
    platform: P,
    request: MediaRequest,
    blob_options: BlobOptions,
    timeslice: Option<Duration>,
    /// Kept across recordings until it goes inactive.
    stream: Option<P::Stream>,
    session: Option<P::Session>,
    /// The session whose notifications feed `chunks`, cleared once its
    /// recording has been assembled.
    current_session: Option<SessionId>,
    next_session: SessionId,
    chunks: Vec<Vec<u8>>,
    status: Status,
    media_blob: Option<String>,
    blobs: BlobRegistry,
    render: RenderFn,
    tx: Sender<Message>,
    rx: Receiver<Message>,
    controls: RecorderControls,
}

impl<P: MediaPlatform> MediaRecorder<P> {
    /// Validates `config` and prepares a recorder. Nothing is captured until
    /// [`mount`](Self::mount) or [`start_recording`](Self::start_recording).
    ///
    /// # Errors
    /// Returns [`MediaRecorderError::Config`] for an invalid configuration and
    /// [`MediaRecorderError::Unsupported`] if the platform cannot record.
    pub fn new<F>(
        platform: P,
        config: RecorderConfig,
        render: F,
    ) -> Result<Self, MediaRecorderError>
    where
        F: FnMut(&RenderProps) + 'static,
    {
        let request = match config.media_request() {
            Ok(request) => request,
            Err(error) => {
                tracing::error!("Invalid recorder configuration: {}", error);
                return Err(error.into());
            }
        };

        if !platform.supports_recording() {
            tracing::error!("Platform does not support recording");
            return Err(MediaRecorderError::Unsupported);
        }

        let (tx, rx) = crossbeam_channel::unbounded();
        let controls = RecorderControls::new(tx.clone());

        tracing::debug!("Recorder created with request {:?}", request);

        Ok(MediaRecorder {
            platform,
            request,
            blob_options: config.blob_options(),
            timeslice: config.timeslice,
            stream: None,
            session: None,
            current_session: None,
            next_session: 0,
            chunks: Vec::new(),
            status: Status::Idle,
            media_blob: None,
            blobs: BlobRegistry::new(),
            render: Box::new(render),
            tx,
            rx,
            controls,
        })
    }

    /// A recorder whose render callback does nothing.
    pub fn headless(platform: P, config: RecorderConfig) -> Result<Self, MediaRecorderError> {
        Self::new(platform, config, |_| {})
    }

    /// Renders once, then tries to acquire the capture stream up front.
    /// A stream that is already held is kept.
    #[tracing::instrument(skip(self))]
    pub fn mount(&mut self) {
        self.publish();

        if self.stream.is_some() {
            tracing::debug!("Capture stream already acquired");
            return;
        }

        match self.acquire() {
            Ok(stream) => self.stream = Some(stream),
            Err(_) => self.update(Status::PermissionDenied, self.media_blob.clone()),
        }
    }

    /// Starts a new recording, reacquiring the stream if needed.
    ///
    /// Ignored while a recording is already running or paused on a live
    /// stream.
    #[tracing::instrument(skip(self))]
    pub fn start_recording(&mut self) {
        let stream_live = self.stream.as_ref().is_some_and(|stream| stream.is_active());
        if stream_live
            && self.has_live_session()
            && matches!(self.status, Status::Recording | Status::Paused)
        {
            tracing::debug!("Recording already in progress, ignoring start");
            return;
        }

        self.discard_session();

        if !stream_live {
            if self.stream.take().is_some() {
                tracing::info!("Capture stream went inactive, reacquiring");
            }
            match self.acquire() {
                Ok(stream) => self.stream = Some(stream),
                Err(_) => {
                    self.update(Status::PermissionDenied, self.media_blob.clone());
                    return;
                }
            }
        }

        let Some(stream) = self.stream.as_ref() else {
            return;
        };

        let id = self.next_session;
        self.next_session += 1;
        let mut session = self
            .platform
            .create_session(stream, EventSink::new(id, self.tx.clone()));

        self.chunks.clear();
        self.current_session = Some(id);

        tracing::info!("Starting encoder session {}", id);
        session.start(self.timeslice);
        self.session = Some(session);

        self.update(Status::Recording, None);
    }

    #[tracing::instrument(skip(self))]
    pub fn pause_recording(&mut self) {
        if self.status == Status::RecorderError {
            tracing::debug!("Recorder errored, ignoring pause");
            return;
        }

        match self.session.as_mut() {
            Some(session) if session.state() == EncoderState::Recording => {
                tracing::info!("Pausing recording");
                session.pause();
            }
            _ => {
                tracing::debug!("Not recording, ignoring pause");
                return;
            }
        }

        self.update(Status::Paused, self.media_blob.clone());
    }

    #[tracing::instrument(skip(self))]
    pub fn resume_recording(&mut self) {
        if self.status == Status::RecorderError {
            tracing::debug!("Recorder errored, ignoring resume");
            return;
        }

        match self.session.as_mut() {
            Some(session) if session.state() == EncoderState::Paused => {
                tracing::info!("Resuming recording");
                session.resume();
            }
            _ => {
                tracing::debug!("Not paused, ignoring resume");
                return;
            }
        }

        self.update(Status::Recording, self.media_blob.clone());
    }

    /// Stops the running session. The blob is published later, once the
    /// session has flushed its data.
    #[tracing::instrument(skip(self))]
    pub fn stop_recording(&mut self) {
        if !self.has_live_session() {
            tracing::debug!("No active session, ignoring stop");
            return;
        }

        if let Some(mut session) = self.session.take() {
            tracing::info!("Stopping recording");
            session.stop();
        }

        self.update(Status::Stopped, self.media_blob.clone());
    }

    /// Applies every queued notification and control call. Returns how many
    /// were handled.
    pub fn process_events(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(message) = self.rx.try_recv() {
            self.handle_message(message);
            handled += 1;
        }
        handled
    }

    /// Blocks for up to `timeout` until the pending recording is assembled,
    /// handling other events meanwhile.
    ///
    /// Returns the current blob URL, which is `None` if nothing was assembled.
    pub fn wait_for_media_blob(&mut self, timeout: Duration) -> Option<String> {
        let deadline = std::time::Instant::now() + timeout;
        self.process_events();

        while self.current_session.is_some() {
            let remaining = deadline.saturating_duration_since(std::time::Instant::now());
            if remaining.is_zero() {
                tracing::debug!("Timed out waiting for the recording to finalize");
                break;
            }
            match self.rx.recv_timeout(remaining) {
                Ok(message) => self.handle_message(message),
                Err(_) => break,
            }
        }

        self.media_blob.clone()
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// URL of the last assembled recording.
    ///
    /// Earlier URLs stay registered until passed to
    /// [`BlobRegistry::revoke_object_url`].
    pub fn media_blob(&self) -> Option<&str> {
        self.media_blob.as_deref()
    }

    pub fn request(&self) -> &MediaRequest {
        &self.request
    }

    pub fn blob_options(&self) -> &BlobOptions {
        &self.blob_options
    }

    pub fn controls(&self) -> RecorderControls {
        self.controls.clone()
    }

    /// Resolves URLs published as `media_blob`. Every finished recording is
    /// kept here until its URL is revoked with
    /// [`BlobRegistry::revoke_object_url`].
    pub fn blobs(&self) -> &BlobRegistry {
        &self.blobs
    }

    /// Chunks received so far for the current session.
    pub fn buffered_chunks(&self) -> usize {
        self.chunks.len()
    }

    pub fn session_state(&self) -> Option<EncoderState> {
        self.session.as_ref().map(|session| session.state())
    }

    pub fn has_stream(&self) -> bool {
        self.stream.is_some()
    }

    /// The capture stream kept for the next recording, if any.
    pub fn stream(&self) -> Option<&P::Stream> {
        self.stream.as_ref()
    }

    fn has_live_session(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|session| session.state() != EncoderState::Inactive)
    }

    /// Stops and forgets a session left behind by an error.
    fn discard_session(&mut self) {
        if let Some(mut session) = self.session.take() {
            tracing::debug!("Discarding previous encoder session");
            if session.state() != EncoderState::Inactive {
                session.stop();
            }
        }
    }
}

impl<P: MediaPlatform> Drop for MediaRecorder<P> {
    fn drop(&mut self) {
        self.discard_session();
        if self.stream.take().is_some() {
            tracing::debug!("Releasing capture stream");
        }
    }
}

impl<P: MediaPlatform> fmt::Debug for MediaRecorder<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaRecorder")
            .field("status", &self.status)
            .field("media_blob", &self.media_blob)
            .field("request", &self.request)
            .field("current_session", &self.current_session)
            .field("buffered_chunks", &self.chunks.len())
            .field("has_stream", &self.stream.is_some())
            .finish()
    }
}
