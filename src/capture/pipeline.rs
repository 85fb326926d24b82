use std::sync::Arc;

use crate::{
    capture::{
        CaptureHandle, SurfaceCapture,
        session::{
            Artifact, ChunkEvent, ChunkPayload, ChunkReceiver, ChunkSender, Container,
            RecordingSession, SessionId,
        },
    },
    foundation::{
        core::FrameRGBA,
        error::{MathvizError, MathvizResult},
    },
    registry::AnimationKey,
};

struct ActiveRecording {
    session: RecordingSession,
    closed: bool,
}

impl ActiveRecording {
    fn accept(&mut self, event: ChunkEvent) {
        if event.session != self.session.id() {
            tracing::trace!(session = %event.session, "dropping chunk of a stale session");
            return;
        }
        match event.payload {
            ChunkPayload::Data(bytes) => {
                if self.closed {
                    tracing::warn!(session = %event.session, "chunk after close, dropped");
                } else {
                    self.session.push(bytes);
                }
            }
            ChunkPayload::Closed => self.closed = true,
        }
    }
}

/// Records exactly one animation run at a time.
///
/// The pipeline owns the current [`RecordingSession`] and the receiving half of
/// the chunk channel. Chunks are appended in arrival order, which is the
/// emission order of the capture; events of any other session are dropped.
pub struct CapturePipeline {
    capture: Arc<dyn SurfaceCapture>,
    tx: ChunkSender,
    rx: ChunkReceiver,
    next_id: u64,
    active: Option<ActiveRecording>,
    handle: Option<Box<dyn CaptureHandle>>,
}

impl CapturePipeline {
    /// Pipeline recording through `capture`.
    pub fn new(capture: Arc<dyn SurfaceCapture>) -> Self {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        Self {
            capture,
            tx,
            rx,
            next_id: 1,
            active: None,
            handle: None,
        }
    }

    /// Container of produced artifacts.
    pub fn container(&self) -> Container {
        self.capture.container()
    }

    /// Session currently being recorded.
    pub fn current_session(&self) -> Option<SessionId> {
        self.active.as_ref().map(|a| a.session.id())
    }

    /// Whether a session is being recorded.
    pub fn is_recording(&self) -> bool {
        self.active.is_some()
    }

    /// Chunks accepted so far by the current session.
    pub fn chunk_count(&self) -> usize {
        self.active.as_ref().map_or(0, |a| a.session.chunk_count())
    }

    /// Begin a new, empty session for `key`. An unfinalized prior session is discarded.
    pub async fn start(&mut self, key: AnimationKey) -> MathvizResult<SessionId> {
        self.abandon();

        let id = SessionId(self.next_id);
        self.next_id += 1;

        let handle = self.capture.start(id, self.tx.clone()).await?;
        tracing::debug!(session = %id, key = %key, "recording started");
        self.active = Some(ActiveRecording {
            session: RecordingSession::new(id, key),
            closed: false,
        });
        self.handle = Some(handle);
        Ok(id)
    }

    /// Route one chunk event. Only events of the current session are kept.
    pub fn on_chunk(&mut self, event: ChunkEvent) {
        match self.active.as_mut() {
            Some(active) => active.accept(event),
            None => tracing::trace!(session = %event.session, "no active recording, chunk dropped"),
        }
    }

    /// Drain every chunk event already delivered to the channel.
    pub fn pump(&mut self) {
        while let Ok(event) = self.rx.try_recv() {
            self.on_chunk(event);
        }
    }

    /// Hand one rendered frame to the active capture.
    pub async fn push_frame(&mut self, frame: &FrameRGBA) -> MathvizResult<()> {
        self.pump();
        let Some(handle) = self.handle.as_mut() else {
            return Err(MathvizError::capture("no active recording"));
        };
        handle.push_frame(frame).await
    }

    /// Stop the capture and assemble the current session into an artifact.
    #[tracing::instrument(skip(self), fields(session))]
    pub async fn finalize(&mut self) -> MathvizResult<Artifact> {
        self.pump();
        let (Some(mut active), Some(handle)) = (self.active.take(), self.handle.take()) else {
            return Err(MathvizError::capture("finalize without an active recording"));
        };
        tracing::Span::current().record("session", tracing::field::display(active.session.id()));

        let stopped = handle.stop().await;
        while let Ok(event) = self.rx.try_recv() {
            active.accept(event);
        }
        stopped?;
        if !active.closed {
            tracing::warn!("capture stopped without a close marker");
        }

        let artifact = active.session.into_artifact(self.container());
        if artifact.is_degenerate() {
            tracing::warn!(filename = %artifact.filename, "capture produced no data");
        } else {
            tracing::debug!(
                filename = %artifact.filename,
                bytes = artifact.data.len(),
                "recording finalized"
            );
        }
        Ok(artifact)
    }

    /// Drop the current session and its capture without producing an artifact.
    pub fn abandon(&mut self) {
        self.handle = None;
        if let Some(active) = self.active.take() {
            tracing::debug!(
                session = %active.session.id(),
                chunks = active.session.chunk_count(),
                "recording abandoned"
            );
        }
        while self.rx.try_recv().is_ok() {}
    }
}

#[cfg(test)]
#[path = "../../tests/unit/capture/pipeline.rs"]
mod tests;
