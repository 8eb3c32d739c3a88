use crossbeam_channel::Sender;

use super::{platform::Message, status::Status};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Command {
    Start,
    Pause,
    Resume,
    Stop,
}

/// Cloneable handle to a recorder's operations.
///
/// Calls are queued and applied, in order, on the recorder's next
/// [`process_events`](super::MediaRecorder::process_events) turn. Calls made
/// after the recorder is dropped are ignored.
#[derive(Debug, Clone)]
pub struct RecorderControls {
    tx: Sender<Message>,
}

impl RecorderControls {
    pub(crate) fn new(tx: Sender<Message>) -> Self {
        RecorderControls { tx }
    }

    fn send(&self, command: Command) {
        if self.tx.send(Message::Command(command)).is_err() {
            tracing::debug!("Recorder dropped, ignoring {:?}", command);
        }
    }

    pub fn start_recording(&self) {
        self.send(Command::Start);
    }

    pub fn pause_recording(&self) {
        self.send(Command::Pause);
    }

    pub fn resume_recording(&self) {
        self.send(Command::Resume);
    }

    pub fn stop_recording(&self) {
        self.send(Command::Stop);
    }
}

/// What the render callback receives on every change.
#[derive(Debug, Clone)]
pub struct RenderProps {
    pub status: Status,
    /// URL of the last assembled recording, if any.
    pub media_blob: Option<String>,
    pub controls: RecorderControls,
}

impl RenderProps {
    pub fn start_recording(&self) {
        self.controls.start_recording();
    }

    pub fn pause_recording(&self) {
        self.controls.pause_recording();
    }

    pub fn resume_recording(&self) {
        self.controls.resume_recording();
    }

    pub fn stop_recording(&self) {
        self.controls.stop_recording();
    }
}
