pub(crate) mod download;
pub(crate) mod ffmpeg;
pub(crate) mod pipeline;
pub(crate) mod session;

use crate::{
    capture::session::{ChunkSender, Container, SessionId},
    foundation::{core::FrameRGBA, error::MathvizResult},
};

/// Surface capture collaborator: turns rendered frames into encoded chunks.
#[async_trait::async_trait]
pub trait SurfaceCapture: Send + Sync {
    /// Container of the produced stream.
    fn container(&self) -> Container;

    /// Begin a capture for `session`. Every chunk is sent on `chunks` tagged with `session`.
    async fn start(
        &self,
        session: SessionId,
        chunks: ChunkSender,
    ) -> MathvizResult<Box<dyn CaptureHandle>>;
}

/// Live capture of one session.
///
/// Dropping a handle without [`CaptureHandle::stop`] abandons the capture; chunks it
/// may still emit carry the old session id.
#[async_trait::async_trait]
pub trait CaptureHandle: Send {
    /// Capture one frame of the surface.
    async fn push_frame(&mut self, frame: &FrameRGBA) -> MathvizResult<()>;

    /// Flush and stop. On return every chunk of the session has been sent,
    /// followed by a `Closed` marker.
    async fn stop(self: Box<Self>) -> MathvizResult<()>;
}
