pub(crate) mod clock;
pub(crate) mod reveal;
pub(crate) mod topics;

use crate::{animation::clock::Clock, scene::surface::Surface};

/// Uniform contract of a topic animation.
///
/// One [`Animation::update`] call is one frame: the surface is cleared, every
/// layer revealed at the current progress is painted, and progress advances by
/// one step unless the animation is already finished. Rendering depends only on
/// the progress value, never on prior surface contents.
pub trait Animation: Send {
    /// Registry key of the topic.
    fn key(&self) -> &'static str;

    /// Reset progress to its starting value.
    fn init(&mut self);

    /// Redraw the full frame for the current progress, then advance one step.
    fn update(&mut self, surface: &mut Surface);

    /// Whether progress has reached its terminal bound.
    fn is_finished(&self) -> bool;

    /// Progress clock.
    fn clock(&self) -> &Clock;

    /// Position progress `steps` updates after the start (clamped).
    fn seek(&mut self, steps: u32);

    /// Names of the layers the next `update` will paint.
    fn revealed_layers(&self) -> Vec<&'static str>;

    /// Current progress value.
    fn value(&self) -> f64 {
        self.clock().value()
    }

    /// Updates applied since the last `init`.
    fn steps_taken(&self) -> u32 {
        self.clock().steps_taken()
    }

    /// Number of `update` calls from start to finish.
    fn frame_count(&self) -> u32 {
        self.clock().frame_count()
    }
}
