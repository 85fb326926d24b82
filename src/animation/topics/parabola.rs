use crate::{
    animation::{
        clock::Clock,
        reveal::{Layer, Scene},
        topics::{GREEN, GRID},
    },
    foundation::core::{Line, Point, Rgba8},
    scene::surface::{FontSpec, StrokeStyle, Surface, polyline},
};

/// `y = x²` traced from left to right, x advancing by fractional steps.
#[derive(Clone, Debug)]
pub struct Parabola {
    /// Leftmost x.
    pub x_min: f64,
    /// Rightmost x.
    pub x_max: f64,
    /// Clock increment of x per frame.
    pub x_step: f64,
    /// Sampling interval of the traced curve.
    pub sample_step: f64,
    /// Horizontal pixels per unit of x.
    pub scale: f64,
    /// Canvas position of the origin.
    pub origin: Point,
}

impl Default for Parabola {
    fn default() -> Self {
        Self {
            x_min: -15.0,
            x_max: 15.0,
            x_step: 0.2,
            sample_step: 0.5,
            scale: 15.0,
            origin: Point::new(300.0, 400.0),
        }
    }
}

impl Parabola {
    /// Canvas point of the curve at `x`. Only the horizontal axis is scaled.
    pub fn point_at(&self, x: f64) -> Point {
        Point::new(self.origin.x + x * self.scale, self.origin.y - x * x)
    }

    /// Curve samples from `x_min` up to and including `x`.
    pub fn samples_to(&self, x: f64) -> impl Iterator<Item = Point> + '_ {
        (0u32..)
            .map(move |n| self.x_min + f64::from(n) * self.sample_step)
            .take_while(move |i| *i <= x + 1e-9)
            .map(|i| self.point_at(i))
    }
}

fn axes(s: &Parabola, _: f64, surface: &mut Surface) {
    let canvas = surface.canvas();
    let style = StrokeStyle::solid(GRID, 1.0);
    surface.stroke(
        &Line::new((0.0, s.origin.y), (canvas.width_f64(), s.origin.y)),
        style,
    );
    surface.stroke(
        &Line::new((s.origin.x, 50.0), (s.origin.x, canvas.height_f64())),
        style,
    );
}

fn curve(s: &Parabola, x: f64, surface: &mut Surface) {
    surface.stroke(
        &polyline(s.samples_to(x)),
        StrokeStyle::solid(Rgba8::BLUE, 3.0),
    );
}

fn label(_: &Parabola, _: f64, surface: &mut Surface) {
    surface.fill_text("y = x²", (250.0, 50.0), FontSpec::bold(24.0), GREEN);
}

impl Scene for Parabola {
    const KEY: &'static str = "parabola";
    const LAYERS: &'static [Layer<Self>] = &[
        Layer::always("axes", axes),
        Layer::always("curve", curve),
        Layer::always("label", label),
    ];

    fn clock(&self) -> Clock {
        Clock::new(self.x_min, self.x_step, self.x_max)
            .unwrap_or_else(|_| Clock::counter(0))
    }
}
