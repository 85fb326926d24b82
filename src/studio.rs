use std::{path::PathBuf, sync::Arc};

use crate::{
    capture::{
        SurfaceCapture,
        download::Downloader,
        pipeline::CapturePipeline,
        session::{Artifact, SessionId},
    },
    config::StudioConfig,
    foundation::{
        core::FrameRGBA,
        error::{MathvizError, MathvizResult},
    },
    lookup::{Explanation, LookupError, TextLookup},
    registry::{AnimationKey, Registry},
    render::{cpu::CpuRasterizer, text::FontBook},
    scene::surface::Surface,
    scheduler::{Advance, FrameScheduler},
};

/// Why a create request did not start an animation.
#[derive(thiserror::Error, Debug)]
pub enum CreateError {
    #[error("Please enter a topic.")]
    EmptyInput,
    #[error(transparent)]
    LookupNotFound(#[from] LookupError),
    /// The explanation exists and is carried along for display.
    #[error("Sorry, an animation for this topic isn't available yet.")]
    AnimationUnavailable { explanation: Explanation },
    #[error("could not start recording: {0}")]
    Capture(#[source] MathvizError),
}

/// A run that has been started.
#[derive(Clone, Debug)]
pub struct Created {
    pub key: AnimationKey,
    pub explanation: Explanation,
    pub session: SessionId,
    /// Updates until the animation finishes.
    pub frame_count: u32,
}

/// Result of one [`Studio::step`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// Nothing is animating.
    Idle,
    /// One frame was drawn and captured.
    Frame { step: u32 },
    /// The last frame was drawn; the recording is finalized.
    Finished(Artifact),
}

/// What the user-facing surface should offer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StudioState {
    Idle,
    Animating { key: AnimationKey },
    /// An artifact is ready; the download action is enabled.
    Ready { filename: String },
}

/// Context object owning the surface, the in-flight run and its recording.
///
/// Only one run exists at a time: [`Studio::create`] cancels the previous
/// animation and abandons its recording before anything else happens, so no
/// frame of the old run is drawn or captured afterwards.
pub struct Studio {
    registry: Registry,
    lookup: Arc<dyn TextLookup>,
    surface: Surface,
    rasterizer: CpuRasterizer,
    scheduler: FrameScheduler,
    pipeline: CapturePipeline,
    current: Option<AnimationKey>,
    artifact: Option<Artifact>,
}

impl Studio {
    pub fn new(
        config: &StudioConfig,
        lookup: Arc<dyn TextLookup>,
        capture: Arc<dyn SurfaceCapture>,
        fonts: &FontBook,
    ) -> MathvizResult<Self> {
        config.validate()?;
        Ok(Self {
            registry: Registry::builtin(),
            lookup,
            surface: Surface::new(config.canvas),
            rasterizer: CpuRasterizer::new(config.canvas, config.background, fonts)?,
            scheduler: FrameScheduler::new(config.frame_pacing()),
            pipeline: CapturePipeline::new(capture),
            current: None,
            artifact: None,
        })
    }

    pub fn with_registry(mut self, registry: Registry) -> Self {
        self.registry = registry;
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Start the animation for a raw user query.
    #[tracing::instrument(skip(self))]
    pub async fn create(&mut self, query: &str) -> Result<Created, CreateError> {
        self.cancel();
        self.artifact = None;

        let key = AnimationKey::normalize(query).ok_or(CreateError::EmptyInput)?;
        let explanation = self.lookup.lookup(&key).await?;
        let Some(animation) = self.registry.resolve(&key) else {
            tracing::info!(%key, "no animation registered");
            return Err(CreateError::AnimationUnavailable { explanation });
        };
        let frame_count = animation.frame_count();

        let session = self
            .pipeline
            .start(key.clone())
            .await
            .map_err(CreateError::Capture)?;
        self.scheduler.start(animation);
        self.current = Some(key.clone());

        tracing::info!(%key, %session, frame_count, "animation started");
        Ok(Created {
            key,
            explanation,
            session,
            frame_count,
        })
    }

    /// Drop the in-flight run, if any, and its recording.
    pub fn cancel(&mut self) {
        self.scheduler.cancel();
        self.pipeline.abandon();
        self.current = None;
    }

    /// Wait for the next frame boundary. Pending forever while idle; cancel-safe.
    pub async fn wait_for_frame(&mut self) {
        self.scheduler.wait_for_frame().await;
    }

    /// Draw and capture exactly one frame of the in-flight run.
    ///
    /// Errors abandon the run and leave the studio idle.
    pub async fn step(&mut self) -> MathvizResult<StepOutcome> {
        match self.try_step().await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                tracing::warn!("run aborted: {e}");
                self.cancel();
                Err(e)
            }
        }
    }

    async fn try_step(&mut self) -> MathvizResult<StepOutcome> {
        let Advance::Frame { step, finished } = self.scheduler.advance(&mut self.surface) else {
            return Ok(StepOutcome::Idle);
        };

        let frame = self.rasterizer.render(&self.surface)?;
        self.pipeline.push_frame(&frame).await?;
        if !finished {
            return Ok(StepOutcome::Frame { step });
        }

        let artifact = self.pipeline.finalize().await?;
        self.current = None;
        self.artifact = Some(artifact.clone());
        Ok(StepOutcome::Finished(artifact))
    }

    /// Drive the in-flight run to its end. `None` when nothing was animating.
    pub async fn run_to_completion(&mut self) -> MathvizResult<Option<Artifact>> {
        while self.scheduler.is_running() {
            self.wait_for_frame().await;
            if let StepOutcome::Finished(artifact) = self.step().await? {
                return Ok(Some(artifact));
            }
        }
        Ok(None)
    }

    /// Rasterize the current surface contents.
    pub fn snapshot(&mut self) -> MathvizResult<FrameRGBA> {
        self.rasterizer.render(&self.surface)
    }

    /// The finalized artifact of the last completed run.
    pub fn artifact(&self) -> Option<&Artifact> {
        self.artifact.as_ref()
    }

    /// Hand the finalized artifact to `downloader`.
    pub fn download(&self, downloader: &dyn Downloader) -> MathvizResult<PathBuf> {
        let artifact = self
            .artifact
            .as_ref()
            .ok_or_else(|| MathvizError::validation("no finished animation to download yet"))?;
        downloader.download(artifact)
    }

    pub fn state(&self) -> StudioState {
        if let Some(key) = &self.current {
            return StudioState::Animating { key: key.clone() };
        }
        match &self.artifact {
            Some(artifact) => StudioState::Ready {
                filename: artifact.filename.clone(),
            },
            None => StudioState::Idle,
        }
    }
}
