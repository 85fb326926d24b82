use super::*;
use crate::foundation::core::{Circle, Rect};

fn pixel(frame: &FrameRGBA, x: u32, y: u32) -> [u8; 4] {
    let i = ((y * frame.width + x) * 4) as usize;
    [
        frame.data[i],
        frame.data[i + 1],
        frame.data[i + 2],
        frame.data[i + 3],
    ]
}

fn small_canvas() -> Canvas {
    Canvas {
        width: 64,
        height: 48,
    }
}

#[test]
fn empty_surface_renders_background() {
    let mut r = CpuRasterizer::new(small_canvas(), Rgba8::WHITE, &FontBook::empty()).unwrap();
    let frame = r.render(&Surface::new(small_canvas())).unwrap();
    assert_eq!((frame.width, frame.height), (64, 48));
    assert_eq!(frame.data.len(), 64 * 48 * 4);
    assert!(frame.premultiplied);
    assert_eq!(pixel(&frame, 0, 0), [255, 255, 255, 255]);
    assert_eq!(pixel(&frame, 63, 47), [255, 255, 255, 255]);
}

#[test]
fn fill_covers_its_interior_only() {
    let mut r = CpuRasterizer::new(small_canvas(), Rgba8::WHITE, &FontBook::empty()).unwrap();
    let mut s = Surface::new(small_canvas());
    s.fill(&Rect::new(10.0, 10.0, 30.0, 30.0), Rgba8::RED);
    let frame = r.render(&s).unwrap();
    assert_eq!(pixel(&frame, 20, 20), [255, 0, 0, 255]);
    assert_eq!(pixel(&frame, 40, 40), [255, 255, 255, 255]);
}

#[test]
fn clip_limits_fill() {
    let mut r = CpuRasterizer::new(small_canvas(), Rgba8::WHITE, &FontBook::empty()).unwrap();
    let mut s = Surface::new(small_canvas());
    s.fill_clipped(
        &Rect::new(0.0, 0.0, 64.0, 48.0),
        Rgba8::BLUE,
        &Circle::new((32.0, 24.0), 10.0),
    );
    let frame = r.render(&s).unwrap();
    assert_eq!(pixel(&frame, 32, 24), [0, 0, 255, 255]);
    assert_eq!(pixel(&frame, 2, 2), [255, 255, 255, 255]);
}

#[test]
fn stroke_paints_along_the_line() {
    let mut r = CpuRasterizer::new(small_canvas(), Rgba8::WHITE, &FontBook::empty()).unwrap();
    let mut s = Surface::new(small_canvas());
    s.stroke(
        &crate::foundation::core::Line::new((0.0, 24.0), (64.0, 24.0)),
        StrokeStyle::solid(Rgba8::BLACK, 4.0),
    );
    let frame = r.render(&s).unwrap();
    assert_eq!(pixel(&frame, 32, 24), [0, 0, 0, 255]);
    assert_eq!(pixel(&frame, 32, 5), [255, 255, 255, 255]);
}

#[test]
fn text_without_fonts_is_skipped() {
    let mut r = CpuRasterizer::new(small_canvas(), Rgba8::WHITE, &FontBook::empty()).unwrap();
    let mut s = Surface::new(small_canvas());
    s.fill_text("θ = 1°", (4.0, 20.0), FontSpec::bold(18.0), Rgba8::BLACK);
    let frame = r.render(&s).unwrap();
    assert!(frame.data.chunks_exact(4).all(|px| px == [255, 255, 255, 255]));
}

#[test]
fn fontless_rasterizer_skips_labels_without_shaping() {
    let mut r = CpuRasterizer::new(small_canvas(), Rgba8::WHITE, &FontBook::empty()).unwrap();
    let mut s = Surface::new(small_canvas());
    s.fill_text("x", (4.0, 20.0), FontSpec::regular(0.0), Rgba8::BLACK);
    s.fill(&Rect::new(0.0, 0.0, 8.0, 8.0), Rgba8::RED);
    let frame = r.render(&s).unwrap();
    assert!(r.warned_missing_fonts);
    assert_eq!(pixel(&frame, 2, 2), [255, 0, 0, 255]);
}

#[test]
fn flatten_keeps_opaque_pixels_and_ignores_background_alpha() {
    let src = vec![10u8, 20, 30, 255, 0, 0, 0, 0];
    let mut dst = vec![0u8; 8];
    let bg = Rgba8 {
        a: 0,
        ..Rgba8::rgb(40, 50, 60)
    };
    flatten_to_opaque_rgba8(&mut dst, &src, true, bg).unwrap();
    assert_eq!(dst, vec![10, 20, 30, 255, 40, 50, 60, 255]);
}

#[test]
fn mismatched_surface_is_rejected() {
    let mut r = CpuRasterizer::new(small_canvas(), Rgba8::WHITE, &FontBook::empty()).unwrap();
    assert!(r.render(&Surface::new(Canvas::default())).is_err());
}

#[test]
fn oversized_or_empty_canvas_is_rejected() {
    let huge = Canvas {
        width: 70_000,
        height: 10,
    };
    assert!(CpuRasterizer::new(huge, Rgba8::WHITE, &FontBook::empty()).is_err());
    let empty = Canvas {
        width: 0,
        height: 10,
    };
    assert!(CpuRasterizer::new(empty, Rgba8::WHITE, &FontBook::empty()).is_err());
}

#[test]
fn flatten_premul_over_black_produces_expected_rgb() {
    let src = vec![128u8, 0u8, 0u8, 128u8];
    let mut dst = vec![0u8; 4];
    flatten_to_opaque_rgba8(&mut dst, &src, true, Rgba8::BLACK).unwrap();
    assert_eq!(dst, vec![128u8, 0u8, 0u8, 255u8]);
}

#[test]
fn flatten_straight_over_white_produces_expected_rgb() {
    let src = vec![255u8, 0u8, 0u8, 128u8];
    let mut dst = vec![0u8; 4];
    flatten_to_opaque_rgba8(&mut dst, &src, false, Rgba8::WHITE).unwrap();
    assert_eq!(dst, vec![255u8, 127u8, 127u8, 255u8]);
}

#[test]
fn flatten_rejects_mismatched_buffers() {
    let mut dst = vec![0u8; 8];
    assert!(flatten_to_opaque_rgba8(&mut dst, &[0u8; 4], true, Rgba8::BLACK).is_err());
}
