//! The capture and encoding primitives a [`MediaRecorder`](super::MediaRecorder)
//! drives. The recorder never talks to devices itself; a backend such as
//! [`CpalPlatform`](crate::backend::CpalPlatform) implements these traits.

use std::time::Duration;

use crossbeam_channel::Sender;

use super::{config::MediaRequest, errors::AcquireError, render::Command};

/// Identifies one encoder session for the lifetime of a recorder.
pub type SessionId = u64;

/// State reported by an encoder session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncoderState {
    Inactive,
    Recording,
    Paused,
}

/// Notifications an encoder session sends back to its recorder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncoderEvent {
    /// One encoded segment, in production order.
    Data(Vec<u8>),
    /// Finalization finished; no further data follows.
    Stop,
    Error(String),
}

#[derive(Debug)]
pub(crate) enum Message {
    Session { id: SessionId, event: EncoderEvent },
    Command(Command),
}

/// Handed to every new encoder session; tags each notification with the
/// session it came from.
#[derive(Debug, Clone)]
pub struct EventSink {
    session: SessionId,
    tx: Sender<Message>,
}

impl EventSink {
    pub(crate) fn new(session: SessionId, tx: Sender<Message>) -> Self {
        EventSink { session, tx }
    }

    pub fn session(&self) -> SessionId {
        self.session
    }

    /// Returns `false` once the recorder is gone.
    pub fn send(&self, event: EncoderEvent) -> bool {
        let message = Message::Session {
            id: self.session,
            event,
        };
        if let Err(e) = self.tx.send(message) {
            tracing::debug!("Recorder dropped, discarding event: {:?}", e.into_inner());
            return false;
        }
        true
    }

    pub fn data(&self, chunk: Vec<u8>) -> bool {
        self.send(EncoderEvent::Data(chunk))
    }

    pub fn stopped(&self) -> bool {
        self.send(EncoderEvent::Stop)
    }

    pub fn error(&self, message: impl Into<String>) -> bool {
        self.send(EncoderEvent::Error(message.into()))
    }
}

/// A live capture handle.
pub trait CaptureStream {
    /// Becomes `false` when the stream ends outside the recorder's control,
    /// e.g. the device was unplugged or access was revoked.
    fn is_active(&self) -> bool;
}

/// A stateful encoder bound to one capture stream.
///
/// Implementations report data, stop and errors through the [`EventSink`]
/// they were created with. After `stop` every remaining chunk must be sent
/// before [`EncoderEvent::Stop`].
pub trait EncoderSession {
    fn state(&self) -> EncoderState;
    /// With a timeslice, data is delivered every `timeslice`; otherwise all of
    /// it arrives when the session stops.
    fn start(&mut self, timeslice: Option<Duration>);
    fn pause(&mut self);
    fn resume(&mut self);
    fn stop(&mut self);
}

/// The host the recorder captures from.
pub trait MediaPlatform {
    type Stream: CaptureStream;
    type Session: EncoderSession;

    /// Whether the host can record at all.
    fn supports_recording(&self) -> bool;

    fn get_user_media(&mut self, request: &MediaRequest) -> Result<Self::Stream, AcquireError>;

    fn create_session(&mut self, stream: &Self::Stream, sink: EventSink) -> Self::Session;
}
