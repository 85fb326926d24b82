use crate::{animation::Animation, foundation::core::Fps, scene::surface::Surface};

/// How the scheduler waits between frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FramePacing {
    /// One frame per display refresh at `fps`; missed ticks are skipped.
    Realtime { fps: Fps },
    /// Frames as fast as possible, yielding to the runtime between them.
    Unpaced,
}

impl Default for FramePacing {
    fn default() -> Self {
        Self::Realtime { fps: Fps::default() }
    }
}

/// Result of one [`FrameScheduler::advance`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Advance {
    /// No animation is in flight.
    Idle,
    /// One update ran; `step` updates have run since the start.
    Frame { step: u32, finished: bool },
}

/// Cooperative frame loop around the single in-flight animation.
///
/// Exactly one `update` runs per [`FrameScheduler::advance`]; waiting happens only
/// in [`FrameScheduler::wait_for_frame`], between frames.
pub struct FrameScheduler {
    pacing: FramePacing,
    ticker: Option<tokio::time::Interval>,
    current: Option<Box<dyn Animation>>,
}

impl FrameScheduler {
    pub fn new(pacing: FramePacing) -> Self {
        Self {
            pacing,
            ticker: None,
            current: None,
        }
    }

    pub fn pacing(&self) -> FramePacing {
        self.pacing
    }

    /// Drop any in-flight animation and begin driving `animation` from its start.
    pub fn start(&mut self, mut animation: Box<dyn Animation>) {
        if let Some(prev) = self.current.take() {
            tracing::debug!(key = prev.key(), "preempting in-flight animation");
        }
        animation.init();
        self.ticker = match self.pacing {
            FramePacing::Realtime { fps } => {
                let mut interval = tokio::time::interval(fps.frame_duration());
                interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
                Some(interval)
            }
            FramePacing::Unpaced => None,
        };
        self.current = Some(animation);
    }

    /// Drop the in-flight animation; its pending frame never runs.
    pub fn cancel(&mut self) {
        if let Some(prev) = self.current.take() {
            tracing::debug!(key = prev.key(), "animation cancelled");
        }
        self.ticker = None;
    }

    pub fn is_running(&self) -> bool {
        self.current.is_some()
    }

    pub fn current(&self) -> Option<&dyn Animation> {
        self.current.as_deref()
    }

    /// Wait for the next frame boundary. Cancel-safe.
    pub async fn wait_for_frame(&mut self) {
        if self.current.is_none() {
            std::future::pending::<()>().await;
        }
        match self.ticker.as_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None => tokio::task::yield_now().await,
        }
    }

    /// Run exactly one update of the in-flight animation on `surface`.
    ///
    /// Once the update leaves the animation finished, it is released and the
    /// scheduler goes idle.
    pub fn advance(&mut self, surface: &mut Surface) -> Advance {
        let Some(animation) = self.current.as_mut() else {
            return Advance::Idle;
        };
        animation.update(surface);
        let step = animation.steps_taken();
        let finished = animation.is_finished();
        if finished {
            tracing::debug!(key = animation.key(), step, "animation finished");
            self.current = None;
            self.ticker = None;
        }
        Advance::Frame { step, finished }
    }
}
