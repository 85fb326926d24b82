use std::path::Path;

use anyhow::Context as _;

use crate::{
    capture::download::ensure_parent_dir,
    foundation::{
        core::{FrameRGBA, Rgba8},
        error::MathvizResult,
    },
    render::cpu::flatten_to_opaque_rgba8,
};

/// Write `frame` as an opaque PNG, compositing translucent pixels over `background`.
pub fn save_png(frame: &FrameRGBA, background: Rgba8, path: &Path) -> MathvizResult<()> {
    let mut opaque = vec![0u8; frame.data.len()];
    flatten_to_opaque_rgba8(&mut opaque, &frame.data, frame.premultiplied, background)?;

    ensure_parent_dir(path)?;
    image::save_buffer_with_format(
        path,
        &opaque,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}
