use crate::{
    animation::{
        clock::Clock,
        reveal::{Layer, Scene},
        topics::{GRID, INK},
    },
    foundation::core::{Circle, Line, Point, Rgba8},
    scene::surface::{FontSpec, StrokeStyle, Surface, polyline},
};

/// A radius sweeping the unit circle, with its sine and cosine legs.
#[derive(Clone, Debug)]
pub struct UnitCircle {
    /// Circle centre.
    pub center: Point,
    /// Radius in pixels.
    pub radius: f64,
}

impl Default for UnitCircle {
    fn default() -> Self {
        Self {
            center: Point::new(300.0, 225.0),
            radius: 150.0,
        }
    }
}

impl UnitCircle {
    /// Point on the circle at `degrees` (counter-clockwise, y up).
    pub fn point_at(&self, degrees: f64) -> Point {
        let rad = degrees.to_radians();
        Point::new(
            self.center.x + self.radius * rad.cos(),
            self.center.y - self.radius * rad.sin(),
        )
    }
}

const LABEL: FontSpec = FontSpec::regular(18.0);

fn axes(s: &UnitCircle, _: f64, surface: &mut Surface) {
    let canvas = surface.canvas();
    let style = StrokeStyle::solid(GRID, 1.0);
    surface.stroke(
        &Line::new((0.0, s.center.y), (canvas.width_f64(), s.center.y)),
        style,
    );
    surface.stroke(
        &Line::new((s.center.x, 0.0), (s.center.x, canvas.height_f64())),
        style,
    );
}

fn circle(s: &UnitCircle, _: f64, surface: &mut Surface) {
    surface.stroke(
        &Circle::new(s.center, s.radius),
        StrokeStyle::solid(INK, 3.0),
    );
}

fn radius(s: &UnitCircle, angle: f64, surface: &mut Surface) {
    surface.stroke(
        &Line::new(s.center, s.point_at(angle)),
        StrokeStyle::solid(Rgba8::RED, 3.0),
    );
}

fn legs(s: &UnitCircle, angle: f64, surface: &mut Surface) {
    let p = s.point_at(angle);
    surface.stroke(
        &polyline([s.center, Point::new(p.x, s.center.y), p]),
        StrokeStyle::solid(Rgba8::BLUE, 3.0),
    );
}

fn labels(s: &UnitCircle, angle: f64, surface: &mut Surface) {
    let Point { x: cx, y: cy } = s.center;
    let p = s.point_at(angle);
    surface.fill_text("sin(θ)", (p.x + 10.0, cy - (cy - p.y) / 2.0), LABEL, Rgba8::BLUE);
    surface.fill_text("cos(θ)", (cx + (p.x - cx) / 2.0, cy + 20.0), LABEL, Rgba8::BLUE);

    // The "1" sits halfway along the bisector of the swept angle.
    let half = angle.to_radians() / 2.0;
    let one = Point::new(
        cx + s.radius / 2.0 * half.cos(),
        cy - s.radius / 2.0 * half.sin(),
    );
    surface.fill_text("1", one, LABEL, Rgba8::RED);
}

fn readout(_: &UnitCircle, angle: f64, surface: &mut Surface) {
    surface.fill_text(format!("θ = {angle:.0}°"), (40.0, 40.0), LABEL, Rgba8::BLACK);
}

impl Scene for UnitCircle {
    const KEY: &'static str = "unitcircle";
    const LAYERS: &'static [Layer<Self>] = &[
        Layer::always("axes", axes),
        Layer::always("circle", circle),
        Layer::always("radius", radius),
        Layer::always("legs", legs),
        Layer::always("labels", labels),
        Layer::always("readout", readout),
    ];

    fn clock(&self) -> Clock {
        Clock::counter(360)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        animation::{Animation, reveal::Reveal},
        foundation::core::Canvas,
    };

    #[test]
    fn point_at_quarter_turns() {
        let s = UnitCircle::default();
        let p0 = s.point_at(0.0);
        assert!((p0.x - 450.0).abs() < 1e-9 && (p0.y - 225.0).abs() < 1e-9);
        let p90 = s.point_at(90.0);
        assert!((p90.x - 300.0).abs() < 1e-9 && (p90.y - 75.0).abs() < 1e-9);
    }

    #[test]
    fn readout_tracks_the_angle() {
        let mut anim = Reveal::new(UnitCircle::default());
        let mut surface = Surface::new(Canvas::default());
        anim.seek(45);
        anim.update(&mut surface);
        assert!(surface.texts().any(|t| t == "θ = 45°"));
        assert_eq!(anim.clock().value(), 46.0);
    }
}
