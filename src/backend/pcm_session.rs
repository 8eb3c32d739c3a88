use std::{
    sync::{Arc, Mutex},
    thread,
    time::Duration,
};

use crossbeam_channel::{Receiver, RecvTimeoutError};

use crate::recorder::{EncoderSession, EncoderState, EventSink};

use super::{
    capture::{CaptureFormat, CpalCapture, Tap, detach, is_set},
    constants::{BYTES_PER_SAMPLE, WORKER_POLL_DELAY},
};

/// Encodes a [`CpalCapture`] as signed 16-bit little-endian PCM.
///
/// A worker thread drains the capture while the session runs; samples that
/// arrive while paused are dropped.
#[derive(Debug)]
pub struct PcmSession {
    tap: Tap,
    receiver: Option<Receiver<Vec<i16>>>,
    capture_signal: Arc<Mutex<bool>>,
    format: CaptureFormat,
    sink: EventSink,
    state: Arc<Mutex<EncoderState>>,
}

impl PcmSession {
    /// Binds a session to `capture`. Samples flow only after `start`.
    pub fn new(capture: &CpalCapture, sink: EventSink) -> Self {
        PcmSession {
            tap: capture.tap(),
            receiver: Some(capture.attach()),
            capture_signal: capture.signal(),
            format: capture.format(),
            sink,
            state: Arc::new(Mutex::new(EncoderState::Inactive)),
        }
    }

    fn set_state(&self, state: EncoderState) {
        match self.state.lock() {
            Ok(mut current) => *current = state,
            Err(e) => tracing::error!("Failed to lock the session state: {}", e),
        }
    }

    /// Bytes of audio in one `timeslice`, rounded down to whole frames.
    fn chunk_bytes(&self, timeslice: Duration) -> usize {
        let frame_bytes = self.format.channels as usize * BYTES_PER_SAMPLE;
        let frames = (self.format.sample_rate as f64 * timeslice.as_secs_f64()) as usize;
        frames.max(1) * frame_bytes
    }
}

impl EncoderSession for PcmSession {
    fn state(&self) -> EncoderState {
        match self.state.lock() {
            Ok(state) => *state,
            Err(e) => {
                tracing::error!("Failed to lock the session state: {}", e);
                EncoderState::Inactive
            }
        }
    }

    #[tracing::instrument(skip(self), fields(session = self.sink.session()))]
    fn start(&mut self, timeslice: Option<Duration>) {
        let Some(receiver) = self.receiver.take() else {
            tracing::debug!("Session already started");
            return;
        };

        let chunk_bytes = timeslice.map(|t| self.chunk_bytes(t));
        self.set_state(EncoderState::Recording);

        let worker = Worker {
            receiver,
            capture_signal: self.capture_signal.clone(),
            state: self.state.clone(),
            sink: self.sink.clone(),
            chunk_bytes,
        };
        thread::spawn(move || worker.run());
    }

    fn pause(&mut self) {
        if self.state() == EncoderState::Recording {
            self.set_state(EncoderState::Paused);
        }
    }

    fn resume(&mut self) {
        if self.state() == EncoderState::Paused {
            self.set_state(EncoderState::Recording);
        }
    }

    #[tracing::instrument(skip(self), fields(session = self.sink.session()))]
    fn stop(&mut self) {
        if self.state() == EncoderState::Inactive {
            return;
        }
        tracing::debug!("Stopping PCM session");
        self.set_state(EncoderState::Inactive);
        detach(&self.tap);
    }
}

impl Drop for PcmSession {
    fn drop(&mut self) {
        // a session dropped before `start` still owns the tap receiver
        if self.receiver.is_some() {
            detach(&self.tap);
        }
    }
}

struct Worker {
    receiver: Receiver<Vec<i16>>,
    capture_signal: Arc<Mutex<bool>>,
    state: Arc<Mutex<EncoderState>>,
    sink: EventSink,
    chunk_bytes: Option<usize>,
}

impl Worker {
    fn run(self) {
        let mut pending: Vec<u8> = Vec::new();
        let mut capture_lost = false;

        loop {
            match self
                .receiver
                .recv_timeout(Duration::from_millis(WORKER_POLL_DELAY as _))
            {
                Ok(samples) => {
                    if self.is_paused() {
                        continue;
                    }
                    for sample in samples {
                        pending.extend_from_slice(&sample.to_le_bytes());
                    }
                    if let Some(limit) = self.chunk_bytes {
                        while pending.len() >= limit {
                            let rest = pending.split_off(limit);
                            self.sink.data(std::mem::replace(&mut pending, rest));
                        }
                    }
                }
                Err(RecvTimeoutError::Timeout) => {
                    if !capture_lost && !is_set(&self.capture_signal) {
                        capture_lost = true;
                        self.sink.error("capture stream ended while recording");
                    }
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        if !pending.is_empty() {
            self.sink.data(pending);
        }
        self.sink.stopped();
        tracing::debug!("PCM session {} finalized", self.sink.session());
    }

    fn is_paused(&self) -> bool {
        matches!(self.state.lock().as_deref(), Ok(EncoderState::Paused))
    }
}
