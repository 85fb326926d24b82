use crate::{
    animation::{
        clock::Clock,
        reveal::{Layer, Scene},
        topics::{GREEN, GRID, INK},
    },
    foundation::core::{Line, Point, Rgba8},
    scene::surface::{FontSpec, StrokeStyle, Surface},
};

/// A line between two points, with its run and rise drawn out underneath it.
#[derive(Clone, Debug)]
pub struct Slope {
    /// Lower-left end of the line.
    pub from: Point,
    /// Upper-right end of the line.
    pub to: Point,
}

impl Default for Slope {
    fn default() -> Self {
        Self {
            from: Point::new(100.0, 350.0),
            to: Point::new(500.0, 100.0),
        }
    }
}

/// Fraction of a segment revealed `start` steps in, over `span` steps.
fn reveal_fraction(value: f64, start: f64, span: f64) -> f64 {
    ((value - start) / span).clamp(0.0, 1.0)
}

const LABEL: FontSpec = FontSpec::regular(18.0);

fn axes(_: &Slope, _: f64, surface: &mut Surface) {
    let style = StrokeStyle::solid(GRID, 1.0);
    surface.stroke(&Line::new((50.0, 0.0), (50.0, 400.0)), style);
    surface.stroke(&Line::new((50.0, 400.0), (550.0, 400.0)), style);
}

fn line(s: &Slope, _: f64, surface: &mut Surface) {
    surface.stroke(&Line::new(s.from, s.to), StrokeStyle::solid(INK, 3.0));
}

fn run_and_rise(s: &Slope, value: f64, surface: &mut Surface) {
    let run = reveal_fraction(value, 30.0, 60.0);
    let rise = reveal_fraction(value, 90.0, 60.0);
    let (p1, p2) = (s.from, s.to);

    surface.stroke(
        &Line::new(p1, (p1.x + (p2.x - p1.x) * run, p1.y)),
        StrokeStyle::solid(Rgba8::BLUE, 3.0),
    );
    surface.stroke(
        &Line::new((p2.x, p1.y), (p2.x, p1.y + (p2.y - p1.y) * rise)),
        StrokeStyle::solid(Rgba8::RED, 3.0),
    );
}

fn run_label(_: &Slope, _: f64, surface: &mut Surface) {
    surface.fill_text("Run (Δx)", (280.0, 370.0), LABEL, Rgba8::BLUE);
}

fn rise_label(_: &Slope, _: f64, surface: &mut Surface) {
    surface.fill_text("Rise (Δy)", (510.0, 225.0), LABEL, Rgba8::RED);
}

fn formula(_: &Slope, _: f64, surface: &mut Surface) {
    surface.fill_text("Slope = Rise / Run", (150.0, 50.0), FontSpec::bold(24.0), GREEN);
}

impl Scene for Slope {
    const KEY: &'static str = "slope";
    const LAYERS: &'static [Layer<Self>] = &[
        Layer::always("axes", axes),
        Layer::always("line", line),
        Layer::above("run-rise", 30.0, run_and_rise),
        Layer::above("run-label", 100.0, run_label),
        Layer::above("rise-label", 150.0, rise_label),
        Layer::above("formula", 180.0, formula),
    ];

    fn clock(&self) -> Clock {
        Clock::counter(200)
    }
}
