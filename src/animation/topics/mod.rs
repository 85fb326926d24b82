pub(crate) mod circle_area;
pub(crate) mod parabola;
pub(crate) mod pythagoras;
pub(crate) mod reflection;
pub(crate) mod sine_wave;
pub(crate) mod slope;
pub(crate) mod unit_circle;

use crate::foundation::core::Rgba8;

// Shared palette. Alpha bytes are the CSS fractions rounded: 0.7 -> 179, 0.5 -> 128.
pub(crate) const INK: Rgba8 = Rgba8::rgb(0x33, 0x33, 0x33);
pub(crate) const GRID: Rgba8 = Rgba8::rgb(0xcc, 0xcc, 0xcc);
pub(crate) const GREEN: Rgba8 = Rgba8::rgb(0x28, 0xa7, 0x45);
pub(crate) const PINK: Rgba8 = Rgba8 {
    r: 255,
    g: 99,
    b: 132,
    a: 179,
};
pub(crate) const SKY: Rgba8 = Rgba8 {
    r: 54,
    g: 162,
    b: 235,
    a: 179,
};
pub(crate) const SKY_HALF: Rgba8 = Rgba8 {
    r: 54,
    g: 162,
    b: 235,
    a: 128,
};
pub(crate) const GOLD: Rgba8 = Rgba8 {
    r: 255,
    g: 206,
    b: 86,
    a: 179,
};
