use crate::{
    foundation::{
        core::{BezPath, Canvas, FrameRGBA, Point, Rgba8},
        error::{MathvizError, MathvizResult},
    },
    render::text::{FontBook, ShapedText, TextShaper},
    scene::surface::{DrawOp, FontSpec, StrokeStyle, Surface},
};

/// Rasterizes a [`Surface`] display list into RGBA8 pixels with `vello_cpu`.
pub struct CpuRasterizer {
    canvas: Canvas,
    width: u16,
    height: u16,
    background: Rgba8,
    text: TextShaper,
    warned_missing_fonts: bool,
}

impl CpuRasterizer {
    /// Rasterizer for `canvas`, painting `background` under every frame.
    pub fn new(canvas: Canvas, background: Rgba8, fonts: &FontBook) -> MathvizResult<Self> {
        let width: u16 = canvas
            .width
            .try_into()
            .map_err(|_| MathvizError::render("canvas width exceeds u16"))?;
        let height: u16 = canvas
            .height
            .try_into()
            .map_err(|_| MathvizError::render("canvas height exceeds u16"))?;
        if width == 0 || height == 0 {
            return Err(MathvizError::validation("canvas width/height must be non-zero"));
        }

        Ok(Self {
            canvas,
            width,
            height,
            background,
            text: TextShaper::new(fonts)?,
            warned_missing_fonts: false,
        })
    }

    /// Canvas this rasterizer renders.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Render every op of `surface`, in order, over the background.
    pub fn render(&mut self, surface: &Surface) -> MathvizResult<FrameRGBA> {
        if surface.canvas() != self.canvas {
            return Err(MathvizError::render(format!(
                "surface size mismatch: got {}x{}, expected {}x{}",
                surface.canvas().width,
                surface.canvas().height,
                self.canvas.width,
                self.canvas.height
            )));
        }

        let mut ctx = vello_cpu::RenderContext::new(self.width, self.height);
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(color_to_cpu(self.background));
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(self.width),
            f64::from(self.height),
        ));

        for op in surface.ops() {
            self.draw_op(&mut ctx, op)?;
        }

        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);

        Ok(FrameRGBA {
            width: self.canvas.width,
            height: self.canvas.height,
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }

    fn draw_op(&mut self, ctx: &mut vello_cpu::RenderContext, op: &DrawOp) -> MathvizResult<()> {
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

        match op {
            DrawOp::Stroke { path, style } => {
                ctx.set_stroke(stroke_to_cpu(style));
                ctx.set_paint(color_to_cpu(style.color));
                ctx.stroke_path(&bezpath_to_cpu(path));
                Ok(())
            }
            DrawOp::Fill { path, color, clip } => {
                if let Some(clip) = clip {
                    ctx.push_clip_layer(&bezpath_to_cpu(clip));
                }
                ctx.set_paint(color_to_cpu(*color));
                ctx.fill_path(&bezpath_to_cpu(path));
                if clip.is_some() {
                    ctx.pop_layer();
                }
                Ok(())
            }
            DrawOp::Text {
                text,
                origin,
                font,
                color,
            } => self.draw_text(ctx, text, *origin, *font, *color),
        }
    }

    fn draw_text(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        text: &str,
        origin: Point,
        font: FontSpec,
        color: Rgba8,
    ) -> MathvizResult<()> {
        if !self.text.has_fonts() {
            if !self.warned_missing_fonts {
                tracing::warn!("no font face available, text labels are not rendered");
                self.warned_missing_fonts = true;
            }
            return Ok(());
        }
        let Some(shaped) = self.text.shape(text, font.size_px, font.weight, color)? else {
            return Ok(());
        };

        let ShapedText {
            layout,
            baseline,
            font: font_data,
        } = shaped;

        ctx.set_transform(vello_cpu::kurbo::Affine::translate((
            origin.x,
            origin.y - f64::from(baseline),
        )));

        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };

                ctx.set_paint(color_to_cpu(run.style().brush));

                let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&font_data)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }

        Ok(())
    }
}

fn color_to_cpu(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn stroke_to_cpu(style: &StrokeStyle) -> vello_cpu::kurbo::Stroke {
    let stroke = vello_cpu::kurbo::Stroke::new(style.width);
    match style.dash {
        Some(pattern) => stroke.with_dashes(0.0, pattern),
        None => stroke,
    }
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

/// Composite a rendered frame onto the opaque `background` of the studio.
///
/// Video capture and PNG export both carry no alpha, so every translucent pixel
/// left by the rasterizer is resolved against the same background colour the
/// canvas is painted with.
pub(crate) fn flatten_to_opaque_rgba8(
    dst: &mut [u8],
    src: &[u8],
    premultiplied: bool,
    background: Rgba8,
) -> MathvizResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(MathvizError::validation(
            "flatten_to_opaque_rgba8 expects equal-length rgba8 buffers",
        ));
    }

    let bg = [background.r, background.g, background.b];
    for (out, px) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let alpha = u16::from(px[3]);
        if alpha == 255 {
            out.copy_from_slice(px);
            continue;
        }
        for c in 0..3 {
            let own = if premultiplied {
                u16::from(px[c])
            } else {
                scale_by_alpha(u16::from(px[c]), alpha)
            };
            let under = scale_by_alpha(u16::from(bg[c]), 255 - alpha);
            out[c] = (own + under).min(255) as u8;
        }
        out[3] = 255;
    }
    Ok(())
}

/// `value * alpha / 255`, rounded.
fn scale_by_alpha(value: u16, alpha: u16) -> u16 {
    ((u32::from(value) * u32::from(alpha) + 127) / 255) as u16
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
