use crate::{
    animation::{
        clock::Clock,
        reveal::{Layer, Scene},
        topics::{GOLD, GREEN, INK, PINK, SKY},
    },
    foundation::core::{Affine, Point, Rect, Rgba8, Shape},
    scene::surface::{FontSpec, StrokeStyle, Surface, polygon},
};

/// Right triangle with legs `a` (vertical) and `b` (horizontal), squares on each
/// side revealed in turn, then the theorem.
#[derive(Clone, Debug)]
pub struct Pythagoras {
    /// Vertical leg.
    pub a: f64,
    /// Horizontal leg.
    pub b: f64,
    /// Right-angle corner.
    pub corner: Point,
}

impl Default for Pythagoras {
    fn default() -> Self {
        Self {
            a: 150.0,
            b: 200.0,
            corner: Point::new(200.0, 250.0),
        }
    }
}

impl Pythagoras {
    /// Hypotenuse length.
    pub fn c(&self) -> f64 {
        self.a.hypot(self.b)
    }
}

const LABEL: FontSpec = FontSpec::regular(20.0);

fn triangle(s: &Pythagoras, _: f64, surface: &mut Surface) {
    let Point { x, y } = s.corner;
    let (a, b) = (s.a, s.b);
    surface.stroke(
        &polygon([
            Point::new(x, y),
            Point::new(x + b, y),
            Point::new(x, y - a),
        ]),
        StrokeStyle::solid(INK, 3.0),
    );
    surface.fill_text("a", (x - 20.0, y - a / 2.0), LABEL, INK);
    surface.fill_text("b", (x + b / 2.0, y + 20.0), LABEL, INK);
    surface.fill_text("c", (x + b / 2.0 - 20.0, y - a / 2.0), LABEL, INK);
}

fn square_a(s: &Pythagoras, _: f64, surface: &mut Surface) {
    let Point { x, y } = s.corner;
    let a = s.a;
    surface.fill(&Rect::new(x - a, y - a, x, y), PINK);
    surface.fill_text("a²", (x - a / 2.0 - 10.0, y - a / 2.0 + 10.0), LABEL, Rgba8::WHITE);
}

fn square_b(s: &Pythagoras, _: f64, surface: &mut Surface) {
    let Point { x, y } = s.corner;
    let b = s.b;
    surface.fill(&Rect::new(x, y, x + b, y + b), SKY);
    surface.fill_text("b²", (x + b / 2.0 - 10.0, y + b / 2.0 + 10.0), LABEL, Rgba8::WHITE);
}

fn square_c(s: &Pythagoras, _: f64, surface: &mut Surface) {
    let Point { x, y } = s.corner;
    let c = s.c();
    // Anchored at the top vertex, turned onto the hypotenuse.
    let placement = Affine::translate((x, y - s.a)) * Affine::rotate(s.b.atan2(s.a));
    let square = placement * Rect::new(0.0, -c, c, 0.0).to_path(0.1);
    surface.fill(&square, GOLD);
}

fn formula(_: &Pythagoras, _: f64, surface: &mut Surface) {
    surface.fill_text("a² + b² = c²", (200.0, 50.0), FontSpec::bold(30.0), GREEN);
}

impl Scene for Pythagoras {
    const KEY: &'static str = "pythagoras";
    const LAYERS: &'static [Layer<Self>] = &[
        Layer::at_least("triangle", 10.0, triangle),
        Layer::at_least("a-square", 30.0, square_a),
        Layer::at_least("b-square", 60.0, square_b),
        Layer::at_least("c-square", 90.0, square_c),
        Layer::at_least("formula", 120.0, formula),
    ];

    fn clock(&self) -> Clock {
        Clock::counter(140)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        animation::{Animation, reveal::Reveal},
        foundation::core::Canvas,
        scene::surface::DrawOp,
    };

    #[test]
    fn hypotenuse_of_default_triangle() {
        assert_eq!(Pythagoras::default().c(), 250.0);
    }

    #[test]
    fn before_first_gate_the_frame_is_blank() {
        let mut anim = Reveal::new(Pythagoras::default());
        let mut surface = Surface::new(Canvas::default());
        anim.update(&mut surface);
        assert!(surface.ops().is_empty());
    }

    #[test]
    fn rotated_square_spans_the_hypotenuse() {
        let anim = Reveal::new(Pythagoras::default());
        let mut surface = Surface::new(Canvas::default());
        anim.draw_at(90.0, &mut surface);

        let gold = surface
            .ops()
            .iter()
            .find_map(|op| match op {
                DrawOp::Fill { path, color, .. } if *color == GOLD => Some(path.clone()),
                _ => None,
            })
            .expect("c-square drawn at 90");
        let area = gold.area().abs();
        assert!((area - 250.0 * 250.0).abs() < 1.0, "area {area}");
    }
}
