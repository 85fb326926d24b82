use std::{
    ffi::{OsStr, OsString},
    process::Stdio,
};

use tokio::{
    io::{AsyncReadExt as _, AsyncWriteExt as _},
    process::{Child, ChildStdin, Command},
    task::JoinHandle,
};

use crate::{
    capture::{
        CaptureHandle, SurfaceCapture,
        session::{ChunkEvent, ChunkSender, Container, SessionId},
    },
    foundation::{
        core::{Canvas, Fps, FrameRGBA, Rgba8},
        error::{MathvizError, MathvizResult},
    },
    render::cpu::flatten_to_opaque_rgba8,
};

const READ_CHUNK_BYTES: usize = 64 * 1024;

/// Settings of an ffmpeg-backed capture.
#[derive(Clone, Debug)]
pub struct CaptureConfig {
    pub canvas: Canvas,
    pub fps: Fps,
    pub container: Container,
    /// Opaque colour translucent pixels are flattened onto.
    pub background: Rgba8,
}

impl CaptureConfig {
    pub fn validate(&self) -> MathvizResult<()> {
        let Canvas { width, height } = self.canvas;
        if width == 0 || height == 0 {
            return Err(MathvizError::validation(
                "capture width/height must be non-zero",
            ));
        }
        if self.fps.num == 0 || self.fps.den == 0 {
            return Err(MathvizError::validation("capture fps must be non-zero"));
        }
        if !width.is_multiple_of(2) || !height.is_multiple_of(2) {
            // yuv420p needs even dimensions.
            return Err(MathvizError::validation(
                "capture width/height must be even (required for yuv420p output)",
            ));
        }
        Ok(())
    }

    fn frame_len(&self) -> usize {
        self.canvas.width as usize * self.canvas.height as usize * 4
    }

    fn ffmpeg_args(&self) -> Vec<String> {
        let mut args: Vec<String> = [
            "-hide_banner",
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-s",
        ]
        .into_iter()
        .map(str::to_owned)
        .collect();
        args.push(format!("{}x{}", self.canvas.width, self.canvas.height));
        args.push("-r".to_owned());
        args.push(self.fps.ffmpeg_rate());
        args.extend(["-i", "pipe:0", "-an"].map(str::to_owned));

        let codec: &[&str] = match self.container {
            Container::Webm => &[
                "-c:v",
                "libvpx-vp9",
                "-pix_fmt",
                "yuv420p",
                "-deadline",
                "realtime",
                "-cpu-used",
                "8",
                "-b:v",
                "0",
                "-crf",
                "32",
                "-f",
                "webm",
            ],
            Container::Mp4 => &[
                "-c:v",
                "libx264",
                "-pix_fmt",
                "yuv420p",
                "-preset",
                "veryfast",
                "-movflags",
                "frag_keyframe+empty_moov+default_base_moof",
                "-f",
                "mp4",
            ],
        };
        args.extend(codec.iter().map(|s| (*s).to_owned()));
        args.push("pipe:1".to_owned());
        args
    }
}

/// Whether an `ffmpeg` binary can be executed.
pub async fn is_ffmpeg_on_path() -> bool {
    program_runs(OsStr::new("ffmpeg")).await
}

async fn program_runs(program: &OsStr) -> bool {
    Command::new(program)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Capture that encodes frames with the system `ffmpeg` binary.
///
/// Raw RGBA frames go to ffmpeg's stdin; the encoded container is read from its
/// stdout by a background task and forwarded as chunks as soon as it appears.
#[derive(Clone, Debug)]
pub struct FfmpegCapture {
    cfg: CaptureConfig,
    program: OsString,
}

impl FfmpegCapture {
    pub fn new(cfg: CaptureConfig) -> MathvizResult<Self> {
        cfg.validate()?;
        Ok(Self {
            cfg,
            program: "ffmpeg".into(),
        })
    }

    /// Run `program` instead of the `ffmpeg` found on PATH.
    pub fn with_program(mut self, program: impl Into<OsString>) -> Self {
        self.program = program.into();
        self
    }

    pub fn config(&self) -> &CaptureConfig {
        &self.cfg
    }
}

#[async_trait::async_trait]
impl SurfaceCapture for FfmpegCapture {
    fn container(&self) -> Container {
        self.cfg.container
    }

    async fn start(
        &self,
        session: SessionId,
        chunks: ChunkSender,
    ) -> MathvizResult<Box<dyn CaptureHandle>> {
        if !program_runs(&self.program).await {
            return Err(MathvizError::capture(format!(
                "ffmpeg is required for recording, but '{}' could not be run",
                self.program.to_string_lossy()
            )));
        }

        // The system binary avoids native FFmpeg dev header/lib requirements.
        let mut cmd = Command::new(&self.program);
        cmd.args(self.cfg.ffmpeg_args())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = cmd.spawn().map_err(|e| {
            MathvizError::capture(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| MathvizError::capture("failed to open ffmpeg stdin (unexpected)"))?;
        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| MathvizError::capture("failed to open ffmpeg stdout (unexpected)"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| MathvizError::capture("failed to open ffmpeg stderr (unexpected)"))?;
        // Drained concurrently; a full stderr pipe would stall ffmpeg's stdin.
        let stderr_drain = tokio::spawn(async move {
            let mut bytes = Vec::new();
            stderr.read_to_end(&mut bytes).await?;
            Ok::<_, std::io::Error>(bytes)
        });

        let tx = chunks.clone();
        let reader = tokio::spawn(async move {
            let mut buf = vec![0u8; READ_CHUNK_BYTES];
            loop {
                match stdout.read(&mut buf).await {
                    Ok(0) => break,
                    Ok(n) => {
                        if tx.send(ChunkEvent::data(session, buf[..n].to_vec())).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::warn!(%session, "reading ffmpeg output failed: {e}");
                        break;
                    }
                }
            }
        });

        tracing::debug!(%session, container = ?self.cfg.container, "ffmpeg capture started");
        Ok(Box::new(FfmpegHandle {
            session,
            canvas: self.cfg.canvas,
            background: self.cfg.background,
            child,
            stdin: Some(stdin),
            stderr_drain: Some(stderr_drain),
            reader: Some(reader),
            chunks,
            scratch: vec![0u8; self.cfg.frame_len()],
        }))
    }
}

struct FfmpegHandle {
    session: SessionId,
    canvas: Canvas,
    background: Rgba8,
    child: Child,
    stdin: Option<ChildStdin>,
    stderr_drain: Option<JoinHandle<std::io::Result<Vec<u8>>>>,
    reader: Option<JoinHandle<()>>,
    chunks: ChunkSender,
    scratch: Vec<u8>,
}

#[async_trait::async_trait]
impl CaptureHandle for FfmpegHandle {
    async fn push_frame(&mut self, frame: &FrameRGBA) -> MathvizResult<()> {
        if frame.width != self.canvas.width || frame.height != self.canvas.height {
            return Err(MathvizError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, self.canvas.width, self.canvas.height
            )));
        }
        if frame.data.len() != self.scratch.len() {
            return Err(MathvizError::validation(
                "frame.data size mismatch with width*height*4",
            ));
        }

        flatten_to_opaque_rgba8(
            &mut self.scratch,
            &frame.data,
            frame.premultiplied,
            self.background,
        )?;

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(MathvizError::capture("ffmpeg capture is already stopped"));
        };
        stdin.write_all(&self.scratch).await.map_err(|e| {
            MathvizError::capture(format!("failed to write frame to ffmpeg stdin: {e}"))
        })?;
        Ok(())
    }

    async fn stop(mut self: Box<Self>) -> MathvizResult<()> {
        drop(self.stdin.take());

        if let Some(reader) = self.reader.take()
            && let Err(e) = reader.await
        {
            tracing::warn!(session = %self.session, "ffmpeg reader task failed: {e}");
        }

        let status = self.child.wait().await.map_err(|e| {
            MathvizError::capture(format!("failed to wait for ffmpeg to finish: {e}"))
        })?;

        let stderr_bytes = match self.stderr_drain.take() {
            Some(drain) => drain
                .await
                .map_err(|e| MathvizError::capture(format!("ffmpeg stderr drain failed: {e}")))?
                .map_err(|e| MathvizError::capture(format!("ffmpeg stderr read failed: {e}")))?,
            None => Vec::new(),
        };

        let _ = self.chunks.send(ChunkEvent::closed(self.session));

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(MathvizError::capture(format!(
                "ffmpeg exited with status {status}: {}",
                stderr.trim()
            )));
        }
        tracing::debug!(session = %self.session, "ffmpeg capture stopped");
        Ok(())
    }
}
