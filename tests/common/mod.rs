#![allow(dead_code)]

use std::{
    cell::{Cell, RefCell},
    rc::Rc,
    time::Duration,
};

use media_recorder_rs::{
    AcquireError, CaptureStream, EncoderSession, EncoderState, EventSink, MediaPlatform,
    MediaRecorder, MediaRequest, RecorderConfig, RenderProps, Status,
};

/// Everything a test wants to observe or steer on the fake platform.
#[derive(Default)]
pub struct Shared {
    pub granted: bool,
    pub acquisitions: usize,
    pub last_request: Option<MediaRequest>,
    pub streams: Vec<Rc<Cell<bool>>>,
    pub sessions: Vec<SessionProbe>,
}

#[derive(Clone)]
pub struct SessionProbe {
    pub sink: EventSink,
    pub state: Rc<Cell<EncoderState>>,
    pub calls: Rc<RefCell<Vec<&'static str>>>,
    pub timeslice: Rc<Cell<Option<Duration>>>,
    /// Sent as the final chunk when the session stops.
    pub tail: Rc<RefCell<Option<Vec<u8>>>>,
}

impl SessionProbe {
    pub fn deliver(&self, bytes: &[u8]) {
        self.sink.data(bytes.to_vec());
    }

    pub fn fail(&self, message: &str) {
        self.sink.error(message);
    }

    pub fn set_tail(&self, bytes: &[u8]) {
        *self.tail.borrow_mut() = Some(bytes.to_vec());
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.borrow().clone()
    }
}

pub struct FakeStream {
    active: Rc<Cell<bool>>,
}

impl CaptureStream for FakeStream {
    fn is_active(&self) -> bool {
        self.active.get()
    }
}

pub struct FakeSession {
    probe: SessionProbe,
}

impl EncoderSession for FakeSession {
    fn state(&self) -> EncoderState {
        self.probe.state.get()
    }

    fn start(&mut self, timeslice: Option<Duration>) {
        self.probe.calls.borrow_mut().push("start");
        self.probe.timeslice.set(timeslice);
        self.probe.state.set(EncoderState::Recording);
    }

    fn pause(&mut self) {
        self.probe.calls.borrow_mut().push("pause");
        if self.probe.state.get() == EncoderState::Recording {
            self.probe.state.set(EncoderState::Paused);
        }
    }

    fn resume(&mut self) {
        self.probe.calls.borrow_mut().push("resume");
        if self.probe.state.get() == EncoderState::Paused {
            self.probe.state.set(EncoderState::Recording);
        }
    }

    /// Finalizes like a real encoder: remaining data first, then stop.
    fn stop(&mut self) {
        self.probe.calls.borrow_mut().push("stop");
        if self.probe.state.get() == EncoderState::Inactive {
            return;
        }
        self.probe.state.set(EncoderState::Inactive);
        if let Some(tail) = self.probe.tail.borrow_mut().take() {
            self.probe.sink.data(tail);
        }
        self.probe.sink.stopped();
    }
}

pub struct FakePlatform {
    shared: Rc<RefCell<Shared>>,
    supported: bool,
}

impl MediaPlatform for FakePlatform {
    type Stream = FakeStream;
    type Session = FakeSession;

    fn supports_recording(&self) -> bool {
        self.supported
    }

    fn get_user_media(&mut self, request: &MediaRequest) -> Result<FakeStream, AcquireError> {
        let mut shared = self.shared.borrow_mut();
        shared.acquisitions += 1;
        shared.last_request = Some(request.clone());

        if !shared.granted {
            return Err(AcquireError::PermissionDenied);
        }

        let active = Rc::new(Cell::new(true));
        shared.streams.push(active.clone());
        Ok(FakeStream { active })
    }

    fn create_session(&mut self, _stream: &FakeStream, sink: EventSink) -> FakeSession {
        let probe = SessionProbe {
            sink,
            state: Rc::new(Cell::new(EncoderState::Inactive)),
            calls: Rc::new(RefCell::new(Vec::new())),
            timeslice: Rc::new(Cell::new(None)),
            tail: Rc::new(RefCell::new(None)),
        };
        self.shared.borrow_mut().sessions.push(probe.clone());
        FakeSession { probe }
    }
}

pub fn fake_platform(granted: bool) -> (FakePlatform, Rc<RefCell<Shared>>) {
    let shared = Rc::new(RefCell::new(Shared {
        granted,
        ..Default::default()
    }));
    let platform = FakePlatform {
        shared: shared.clone(),
        supported: true,
    };
    (platform, shared)
}

pub fn unsupported_platform() -> FakePlatform {
    FakePlatform {
        shared: Rc::new(RefCell::new(Shared::default())),
        supported: false,
    }
}

pub type Renders = Rc<RefCell<Vec<RenderProps>>>;

/// A recorder whose every render is captured.
pub fn recorder_with_renders(
    granted: bool,
    config: RecorderConfig,
) -> (MediaRecorder<FakePlatform>, Rc<RefCell<Shared>>, Renders) {
    let (platform, shared) = fake_platform(granted);
    let renders: Renders = Rc::new(RefCell::new(Vec::new()));
    let sink = renders.clone();
    let recorder = MediaRecorder::new(platform, config, move |props| {
        sink.borrow_mut().push(props.clone());
    })
    .expect("valid configuration");
    (recorder, shared, renders)
}

pub fn statuses(renders: &Renders) -> Vec<Status> {
    renders.borrow().iter().map(|props| props.status).collect()
}

pub fn session(shared: &Rc<RefCell<Shared>>, index: usize) -> SessionProbe {
    shared.borrow().sessions[index].clone()
}
