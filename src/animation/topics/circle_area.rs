use crate::{
    animation::{
        clock::Clock,
        reveal::{Layer, Scene},
        topics::{INK, SKY_HALF},
    },
    foundation::core::{Circle, Line, Point, Rect, Rgba8},
    scene::surface::{FontSpec, StrokeStyle, Surface},
};

/// A circle filling up from the top, then its radius and area formula.
#[derive(Clone, Debug)]
pub struct CircleArea {
    /// Circle centre.
    pub center: Point,
    /// Radius in pixels.
    pub radius: f64,
    /// Steps needed to fill the circle completely.
    pub fill_steps: f64,
}

impl Default for CircleArea {
    fn default() -> Self {
        Self {
            center: Point::new(300.0, 225.0),
            radius: 150.0,
            fill_steps: 100.0,
        }
    }
}

impl CircleArea {
    fn circle(&self) -> Circle {
        Circle::new(self.center, self.radius)
    }
}

fn outline(s: &CircleArea, _: f64, surface: &mut Surface) {
    surface.stroke(&s.circle(), StrokeStyle::solid(INK, 1.0));
}

fn fill(s: &CircleArea, value: f64, surface: &mut Surface) {
    let fraction = (value / s.fill_steps).clamp(0.0, 1.0);
    let r = s.radius;
    let top = s.center.y - r;
    let sweep = Rect::new(
        s.center.x - r,
        top,
        s.center.x + r,
        top + 2.0 * r * fraction,
    );
    surface.fill_clipped(&sweep, SKY_HALF, &s.circle());
}

fn radius(s: &CircleArea, _: f64, surface: &mut Surface) {
    let Point { x: cx, y: cy } = s.center;
    surface.stroke(
        &Line::new(s.center, (cx + s.radius, cy)),
        StrokeStyle::solid(Rgba8::RED, 3.0),
    );
    surface.fill_text(
        "r",
        (cx + s.radius / 2.0, cy - 10.0),
        FontSpec::regular(20.0),
        Rgba8::RED,
    );
}

fn formula(_: &CircleArea, _: f64, surface: &mut Surface) {
    surface.fill_text("Area = πr²", (220.0, 50.0), FontSpec::bold(30.0), Rgba8::BLACK);
}

impl Scene for CircleArea {
    const KEY: &'static str = "circlearea";
    const LAYERS: &'static [Layer<Self>] = &[
        Layer::always("outline", outline),
        Layer::always("fill", fill),
        Layer::above("radius", 80.0, radius),
        Layer::above("formula", 150.0, formula),
    ];

    fn clock(&self) -> Clock {
        Clock::counter(200)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        animation::reveal::Reveal,
        foundation::core::{Canvas, Shape},
        scene::surface::DrawOp,
    };

    fn fill_height(value: f64) -> f64 {
        let anim = Reveal::new(CircleArea::default());
        let mut surface = Surface::new(Canvas::default());
        anim.draw_at(value, &mut surface);
        surface
            .ops()
            .iter()
            .find_map(|op| match op {
                DrawOp::Fill {
                    path,
                    clip: Some(_),
                    ..
                } => Some(path.bounding_box().height()),
                _ => None,
            })
            .unwrap()
    }

    #[test]
    fn fill_rises_then_saturates() {
        assert_eq!(fill_height(0.0), 0.0);
        assert!((fill_height(50.0) - 150.0).abs() < 1e-9);
        assert!((fill_height(100.0) - 300.0).abs() < 1e-9);
        assert!((fill_height(180.0) - 300.0).abs() < 1e-9);
    }
}
