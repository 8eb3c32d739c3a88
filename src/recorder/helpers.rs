use super::{
    AcquireError, Blob, EncoderEvent, MediaPlatform, MediaRecorder, RenderProps, SessionId,
    Status, platform::Message, render::Command,
};

impl<P: MediaPlatform> MediaRecorder<P> {
    pub(super) fn handle_message(&mut self, message: Message) {
        match message {
            Message::Command(command) => self.handle_command(command),
            Message::Session { id, event } => self.handle_session_event(id, event),
        }
    }

    fn handle_command(&mut self, command: Command) {
        tracing::debug!("Handling queued command {:?}", command);
        match command {
            Command::Start => self.start_recording(),
            Command::Pause => self.pause_recording(),
            Command::Resume => self.resume_recording(),
            Command::Stop => self.stop_recording(),
        }
    }

    fn handle_session_event(&mut self, id: SessionId, event: EncoderEvent) {
        if self.current_session != Some(id) {
            tracing::debug!("Dropping event from stale session {}: {:?}", id, event);
            return;
        }

        match event {
            EncoderEvent::Data(chunk) => {
                tracing::trace!("Session {} delivered {} bytes", id, chunk.len());
                self.chunks.push(chunk);
            }
            EncoderEvent::Stop => self.on_recording_stop(id),
            EncoderEvent::Error(message) => {
                tracing::error!("Encoder session {} failed: {}", id, message);
                self.update(Status::RecorderError, self.media_blob.clone());
            }
        }
    }

    /// Assembles the buffered chunks into a blob and publishes its URL.
    fn on_recording_stop(&mut self, id: SessionId) {
        let chunks = std::mem::take(&mut self.chunks);
        let blob = Blob::new(&chunks, &self.blob_options);
        tracing::info!(
            "Session {} finalized: {} chunks, {} bytes",
            id,
            chunks.len(),
            blob.size()
        );

        let url = self.blobs.create_object_url(blob);
        self.current_session = None;
        self.update(self.status, Some(url));
    }

    pub(super) fn acquire(&mut self) -> Result<P::Stream, AcquireError> {
        tracing::debug!("Requesting capture stream for {:?}", self.request);
        match self.platform.get_user_media(&self.request) {
            Ok(stream) => {
                tracing::info!("Capture stream acquired");
                Ok(stream)
            }
            Err(error) => {
                tracing::warn!("Failed to acquire capture stream: {}", error);
                Err(error)
            }
        }
    }

    /// Stores the new state and re-renders if anything changed.
    pub(super) fn update(&mut self, status: Status, media_blob: Option<String>) {
        if self.status == status && self.media_blob == media_blob {
            return;
        }

        if self.status != status {
            tracing::info!("Status changed: {} -> {}", self.status, status);
        }
        self.status = status;
        self.media_blob = media_blob;
        self.publish();
    }

    pub(super) fn publish(&mut self) {
        let props = RenderProps {
            status: self.status,
            media_blob: self.media_blob.clone(),
            controls: self.controls.clone(),
        };
        (self.render)(&props);
    }
}
