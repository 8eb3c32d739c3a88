//! # Media Recorder Library
//!
//! `media-recorder-rs` drives a capture stream through a
//! record/pause/resume/stop lifecycle and hands the caller a playable blob URL
//! together with the current status, through a render callback invoked on
//! every change.
//!
//! ## Usage
//!
//! Build a [`MediaRecorder`] from a [`MediaPlatform`] (the bundled
//! [`backend::CpalPlatform`] records the default microphone), a
//! [`RecorderConfig`] and a render callback. Call `mount` to acquire the
//! stream, then `start_recording`/`stop_recording`, either directly or through
//! the [`RecorderControls`] handed to the render callback. Platform
//! notifications are applied when the caller pumps
//! [`MediaRecorder::process_events`] or waits with
//! [`MediaRecorder::wait_for_media_blob`]; the published URL resolves through
//! [`MediaRecorder::blobs`].

mod recorder;

/// Capture backends.
pub mod backend;

pub use recorder::platform;
pub use recorder::{
    AcquireError, Blob, BlobOptions, BlobRegistry, CaptureStream, ConfigError, EncoderEvent,
    EncoderSession, EncoderState, EventSink, MediaConstraint, MediaPlatform, MediaRecorder,
    MediaRecorderError, MediaRequest, RecorderConfig, RecorderControls, RenderProps, SessionId,
    Status, TrackConstraints,
};
