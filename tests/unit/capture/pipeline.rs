use std::sync::Mutex;

use super::*;

#[derive(Default)]
struct FakeCapture {
    silent: bool,
    senders: Mutex<Vec<ChunkSender>>,
}

struct FakeHandle {
    session: SessionId,
    chunks: ChunkSender,
    frames: u8,
    silent: bool,
}

#[async_trait::async_trait]
impl SurfaceCapture for FakeCapture {
    fn container(&self) -> Container {
        Container::Webm
    }

    async fn start(
        &self,
        session: SessionId,
        chunks: ChunkSender,
    ) -> MathvizResult<Box<dyn CaptureHandle>> {
        self.senders.lock().unwrap().push(chunks.clone());
        Ok(Box::new(FakeHandle {
            session,
            chunks,
            frames: 0,
            silent: self.silent,
        }))
    }
}

#[async_trait::async_trait]
impl CaptureHandle for FakeHandle {
    async fn push_frame(&mut self, _frame: &FrameRGBA) -> MathvizResult<()> {
        self.frames += 1;
        if !self.silent {
            let _ = self
                .chunks
                .send(ChunkEvent::data(self.session, vec![self.frames]));
        }
        Ok(())
    }

    async fn stop(self: Box<Self>) -> MathvizResult<()> {
        if !self.silent {
            let _ = self.chunks.send(ChunkEvent::data(self.session, vec![0xff]));
        }
        let _ = self.chunks.send(ChunkEvent::closed(self.session));
        Ok(())
    }
}

fn key(s: &str) -> AnimationKey {
    AnimationKey::normalize(s).unwrap()
}

fn frame() -> FrameRGBA {
    FrameRGBA {
        width: 2,
        height: 2,
        data: vec![0; 16],
        premultiplied: true,
    }
}

#[tokio::test]
async fn chunks_keep_emission_order() {
    let mut pipeline = CapturePipeline::new(Arc::new(FakeCapture::default()));
    let id = pipeline.start(key("slope")).await.unwrap();
    assert_eq!(pipeline.current_session(), Some(id));

    for _ in 0..3 {
        pipeline.push_frame(&frame()).await.unwrap();
    }
    let artifact = pipeline.finalize().await.unwrap();

    assert_eq!(&*artifact.data, &[1, 2, 3, 0xff]);
    assert_eq!(artifact.filename, "slope-animation.webm");
    assert_eq!(artifact.session, id);
    assert!(!pipeline.is_recording());
}

#[tokio::test]
async fn silent_capture_yields_degenerate_artifact() {
    let capture = FakeCapture {
        silent: true,
        ..FakeCapture::default()
    };
    let mut pipeline = CapturePipeline::new(Arc::new(capture));
    pipeline.start(key("parabola")).await.unwrap();
    pipeline.push_frame(&frame()).await.unwrap();

    let artifact = pipeline.finalize().await.unwrap();
    assert!(artifact.is_degenerate());
    assert_eq!(artifact.filename, "parabola-animation.webm");
}

#[tokio::test]
async fn superseded_session_never_leaks_into_the_next() {
    let capture = Arc::new(FakeCapture::default());
    let mut pipeline = CapturePipeline::new(capture.clone());

    let first = pipeline.start(key("pythagoras")).await.unwrap();
    pipeline.push_frame(&frame()).await.unwrap();
    pipeline.push_frame(&frame()).await.unwrap();

    let second = pipeline.start(key("slope")).await.unwrap();
    assert_ne!(first, second);
    pipeline.push_frame(&frame()).await.unwrap();

    let stale = capture.senders.lock().unwrap()[0].clone();
    stale.send(ChunkEvent::data(first, vec![9, 9])).unwrap();
    stale.send(ChunkEvent::closed(first)).unwrap();

    let artifact = pipeline.finalize().await.unwrap();
    assert_eq!(artifact.session, second);
    assert_eq!(&*artifact.data, &[1, 0xff]);
}

#[tokio::test]
async fn data_after_close_is_dropped() {
    let mut pipeline = CapturePipeline::new(Arc::new(FakeCapture::default()));
    let id = pipeline.start(key("reflection")).await.unwrap();

    pipeline.on_chunk(ChunkEvent::data(id, vec![7]));
    pipeline.on_chunk(ChunkEvent::closed(id));
    pipeline.on_chunk(ChunkEvent::data(id, vec![8]));
    assert_eq!(pipeline.chunk_count(), 1);

    let artifact = pipeline.finalize().await.unwrap();
    assert_eq!(&*artifact.data, &[7]);
}

#[tokio::test]
async fn operations_without_a_session_fail() {
    let mut pipeline = CapturePipeline::new(Arc::new(FakeCapture::default()));
    assert!(pipeline.push_frame(&frame()).await.is_err());
    assert!(pipeline.finalize().await.is_err());

    pipeline.start(key("slope")).await.unwrap();
    pipeline.abandon();
    assert!(!pipeline.is_recording());
    assert!(pipeline.finalize().await.is_err());
}
