use crate::{
    animation::{Animation, clock::Clock},
    scene::surface::Surface,
};

/// Condition under which a layer is drawn, evaluated against the clock value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Gate {
    /// Drawn on every frame.
    Always,
    /// Drawn once `value >= threshold`.
    AtLeast(f64),
    /// Drawn once `value > threshold`.
    Above(f64),
}

impl Gate {
    /// Whether the gate is open at `value`.
    pub fn is_open(self, value: f64) -> bool {
        match self {
            Gate::Always => true,
            Gate::AtLeast(t) => value >= t,
            Gate::Above(t) => value > t,
        }
    }
}

/// A named, gated draw callback of scene `S`.
pub struct Layer<S> {
    /// Stable name, used for diagnostics and tests.
    pub name: &'static str,
    /// Reveal condition.
    pub gate: Gate,
    /// Draws the layer for the given clock value.
    pub draw: fn(&S, f64, &mut Surface),
}

impl<S> Layer<S> {
    /// Layer drawn on every frame.
    pub const fn always(name: &'static str, draw: fn(&S, f64, &mut Surface)) -> Self {
        Self {
            name,
            gate: Gate::Always,
            draw,
        }
    }

    /// Layer drawn from `threshold` (inclusive) onward.
    pub const fn at_least(
        name: &'static str,
        threshold: f64,
        draw: fn(&S, f64, &mut Surface),
    ) -> Self {
        Self {
            name,
            gate: Gate::AtLeast(threshold),
            draw,
        }
    }

    /// Layer drawn once the value exceeds `threshold`.
    pub const fn above(name: &'static str, threshold: f64, draw: fn(&S, f64, &mut Surface)) -> Self {
        Self {
            name,
            gate: Gate::Above(threshold),
            draw,
        }
    }
}

/// Fixed geometry plus an ordered layer list: one topic animation.
pub trait Scene: Send + Sized + 'static {
    /// Registry key of the topic.
    const KEY: &'static str;

    /// Layers in paint order.
    const LAYERS: &'static [Layer<Self>];

    /// Progress clock at its starting value.
    fn clock(&self) -> Clock;
}

/// Drives a [`Scene`] through its timeline; the one [`Animation`] implementation
/// shared by every topic.
pub struct Reveal<S: Scene> {
    scene: S,
    clock: Clock,
}

impl<S: Scene> Reveal<S> {
    /// Wrap `scene`, clock at its start.
    pub fn new(scene: S) -> Self {
        let clock = scene.clock();
        Self { scene, clock }
    }

    /// Scene geometry.
    pub fn scene(&self) -> &S {
        &self.scene
    }

    /// Paint every layer open at `value` onto a cleared surface.
    pub fn draw_at(&self, value: f64, surface: &mut Surface) {
        surface.clear();
        for layer in S::LAYERS {
            if layer.gate.is_open(value) {
                (layer.draw)(&self.scene, value, surface);
            }
        }
    }
}

impl<S: Scene> Animation for Reveal<S> {
    fn key(&self) -> &'static str {
        S::KEY
    }

    fn init(&mut self) {
        self.clock.reset();
    }

    fn update(&mut self, surface: &mut Surface) {
        self.draw_at(self.clock.value(), surface);
        self.clock.advance();
    }

    fn is_finished(&self) -> bool {
        self.clock.is_finished()
    }

    fn clock(&self) -> &Clock {
        &self.clock
    }

    fn seek(&mut self, steps: u32) {
        self.clock.seek(steps);
    }

    fn revealed_layers(&self) -> Vec<&'static str> {
        let value = self.clock.value();
        S::LAYERS
            .iter()
            .filter(|l| l.gate.is_open(value))
            .map(|l| l.name)
            .collect()
    }
}
