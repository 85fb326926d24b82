use crate::{
    animation::{
        clock::Clock,
        reveal::{Layer, Scene},
        topics::GRID,
    },
    foundation::core::{Circle, Line, Point, Rgba8},
    scene::surface::{StrokeStyle, Surface, polyline},
};

/// A rotating radius whose height is traced out to the right as a sine wave.
#[derive(Clone, Debug)]
pub struct SineWave {
    /// Centre of the reference circle.
    pub center: Point,
    /// Reference circle radius, also the wave amplitude.
    pub radius: f64,
    /// Horizontal gap between the circle centre and the wave origin.
    pub wave_offset: f64,
}

impl Default for SineWave {
    fn default() -> Self {
        Self {
            center: Point::new(120.0, 225.0),
            radius: 80.0,
            wave_offset: 100.0,
        }
    }
}

impl SineWave {
    fn wave_point(&self, degrees: f64) -> Point {
        Point::new(
            self.center.x + self.wave_offset + degrees,
            self.center.y - self.radius * degrees.to_radians().sin(),
        )
    }

    fn tip(&self, degrees: f64) -> Point {
        let rad = degrees.to_radians();
        Point::new(
            self.center.x + self.radius * rad.cos(),
            self.center.y - self.radius * rad.sin(),
        )
    }
}

fn reference_circle(s: &SineWave, _: f64, surface: &mut Surface) {
    surface.stroke(
        &Circle::new(s.center, s.radius),
        StrokeStyle::solid(GRID, 1.0),
    );
}

fn rotor(s: &SineWave, angle: f64, surface: &mut Surface) {
    let tip = s.tip(angle);
    surface.stroke(
        &Line::new(s.center, tip),
        StrokeStyle::solid(Rgba8::RED, 1.0),
    );
    surface.fill(&Circle::new(tip, 5.0), Rgba8::RED);
}

fn projection(s: &SineWave, angle: f64, surface: &mut Surface) {
    let tip = s.tip(angle);
    surface.stroke(
        &Line::new(tip, (s.center.x + s.wave_offset + angle, tip.y)),
        StrokeStyle::dashed(GRID, 1.0, 5.0),
    );
}

fn wave(s: &SineWave, angle: f64, surface: &mut Surface) {
    // One sample per whole degree up to the current angle.
    let last = angle.floor().max(0.0) as u32;
    let points = (0..=last).map(|deg| s.wave_point(f64::from(deg)));
    surface.stroke(&polyline(points), StrokeStyle::solid(Rgba8::BLUE, 3.0));
}

impl Scene for SineWave {
    const KEY: &'static str = "sinewave";
    const LAYERS: &'static [Layer<Self>] = &[
        Layer::always("circle", reference_circle),
        Layer::always("rotor", rotor),
        Layer::always("projection", projection),
        Layer::always("wave", wave),
    ];

    fn clock(&self) -> Clock {
        Clock::counter(360)
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

    #[test]
    fn wave_grows_one_sample_per_degree() {
        let anim = Reveal::new(SineWave::default());
        let mut surface = Surface::new(Canvas::default());
        anim.draw_at(90.0, &mut surface);

        let DrawOp::Stroke { path, style } = surface.ops().last().unwrap() else {
            panic!("wave is the last op");
        };
        assert_eq!(style.color, Rgba8::BLUE);
        assert_eq!(path.elements().len(), 91);

        let bbox = path.bounding_box();
        assert!((bbox.min_y() - 145.0).abs() < 1e-6);
        assert!((bbox.max_x() - 310.0).abs() < 1e-6);
    }
}
