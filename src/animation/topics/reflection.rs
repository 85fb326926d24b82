use crate::{
    animation::{
        clock::Clock,
        reveal::{Layer, Scene},
        topics::{GRID, PINK, SKY},
    },
    foundation::core::{Line, Point, Rgba8},
    scene::surface::{FontSpec, StrokeStyle, Surface, polygon},
};

/// A triangle mirrored across a vertical axis, the image sliding out over time.
#[derive(Clone, Debug)]
pub struct Reflection {
    /// x of the mirror axis.
    pub axis_x: f64,
    /// Triangle vertices as (offset from the axis, canvas y).
    pub vertices: [Point; 3],
}

impl Default for Reflection {
    fn default() -> Self {
        Self {
            axis_x: 300.0,
            vertices: [
                Point::new(50.0, 100.0),
                Point::new(200.0, 150.0),
                Point::new(150.0, 300.0),
            ],
        }
    }
}

impl Reflection {
    /// Triangle with every offset scaled by `k`: `1` is the original, `-1` its mirror.
    pub fn scaled_triangle(&self, k: f64) -> [Point; 3] {
        self.vertices
            .map(|p| Point::new(self.axis_x + p.x * k, p.y))
    }
}

fn axis(s: &Reflection, _: f64, surface: &mut Surface) {
    surface.stroke(
        &Line::new((s.axis_x, 50.0), (s.axis_x, 400.0)),
        StrokeStyle::dashed(GRID, 1.0, 5.0),
    );
}

fn original(s: &Reflection, _: f64, surface: &mut Surface) {
    surface.fill(&polygon(s.scaled_triangle(1.0)), PINK);
}

fn image(s: &Reflection, value: f64, surface: &mut Surface) {
    let t = ((value - 50.0) / 100.0).clamp(0.0, 1.0);
    surface.fill(&polygon(s.scaled_triangle(-t)), SKY);
}

fn labels(_: &Reflection, _: f64, surface: &mut Surface) {
    let font = FontSpec::regular(20.0);
    surface.fill_text("(x, y)", (480.0, 200.0), font, Rgba8::BLACK);
    surface.fill_text("(-x, y)", (50.0, 200.0), font, Rgba8::BLACK);
}

impl Scene for Reflection {
    const KEY: &'static str = "reflection";
    const LAYERS: &'static [Layer<Self>] = &[
        Layer::always("axis", axis),
        Layer::always("original", original),
        Layer::above("image", 50.0, image),
        Layer::above("labels", 100.0, labels),
    ];

    fn clock(&self) -> Clock {
        Clock::counter(150)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_reflection_negates_offsets() {
        let s = Reflection::default();
        let mirrored = s.scaled_triangle(-1.0);
        assert_eq!(mirrored[0], Point::new(250.0, 100.0));
        assert_eq!(mirrored[1], Point::new(100.0, 150.0));
        assert_eq!(mirrored[2], Point::new(150.0, 300.0));
    }
}
