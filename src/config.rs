use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context as _;

use crate::{
    capture::{ffmpeg::CaptureConfig, session::Container},
    foundation::{
        core::{Canvas, Fps, Rgba8},
        error::{MathvizError, MathvizResult},
    },
    lookup::CatalogLookup,
    render::text::FontBook,
    scheduler::FramePacing,
};

/// Frame pacing selected in configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PacingMode {
    /// One frame per tick at the configured fps.
    #[default]
    Realtime,
    /// As fast as the renderer allows.
    Unpaced,
}

/// Where label fonts come from.
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FontConfig {
    /// Regular face file. Takes precedence over system fonts.
    pub regular: Option<PathBuf>,
    /// Bold face file; regular is used for bold text when absent.
    pub bold: Option<PathBuf>,
    /// Fall back to the system sans-serif faces.
    pub system: bool,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            regular: None,
            bold: None,
            system: true,
        }
    }
}

/// Settings of a studio session, read from JSON and overridden by CLI flags.
///
/// ```json
/// { "canvas": { "width": 600, "height": 450 }, "fps": { "num": 60, "den": 1 },
///   "background": "#ffffff", "container": "webm", "pacing": "realtime" }
/// ```
#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StudioConfig {
    pub canvas: Canvas,
    pub fps: Fps,
    pub background: Rgba8,
    pub container: Container,
    pub fonts: FontConfig,
    /// Extra explanations merged into the built-in catalog.
    pub explanations: Option<PathBuf>,
    /// Simulated latency of the explanation lookup.
    pub lookup_delay_ms: u64,
    pub pacing: PacingMode,
    /// Directory downloads are written to.
    pub out_dir: PathBuf,
    pub overwrite: bool,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            canvas: Canvas::default(),
            fps: Fps::default(),
            background: Rgba8::WHITE,
            container: Container::default(),
            fonts: FontConfig::default(),
            explanations: None,
            lookup_delay_ms: 500,
            pacing: PacingMode::default(),
            out_dir: PathBuf::from("."),
            overwrite: true,
        }
    }
}

impl StudioConfig {
    /// Read a JSON config file. Missing fields keep their defaults.
    pub fn from_path(path: &Path) -> MathvizResult<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> MathvizResult<Self> {
        let cfg: Self =
            serde_json::from_str(json).map_err(|e| MathvizError::serde(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> MathvizResult<()> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(MathvizError::validation(
                "canvas width/height must be non-zero",
            ));
        }
        if self.fps.num == 0 || self.fps.den == 0 {
            return Err(MathvizError::validation("fps must be non-zero"));
        }
        if self.fonts.bold.is_some() && self.fonts.regular.is_none() {
            return Err(MathvizError::validation(
                "a bold font requires a regular font",
            ));
        }
        Ok(())
    }

    pub fn frame_pacing(&self) -> FramePacing {
        match self.pacing {
            PacingMode::Realtime => FramePacing::Realtime { fps: self.fps },
            PacingMode::Unpaced => FramePacing::Unpaced,
        }
    }

    pub fn lookup_delay(&self) -> Duration {
        Duration::from_millis(self.lookup_delay_ms)
    }

    pub fn capture_config(&self) -> CaptureConfig {
        CaptureConfig {
            canvas: self.canvas,
            fps: self.fps,
            container: self.container,
            background: self.background,
        }
    }

    /// Explanation catalog: built-in entries plus the configured extras.
    pub fn catalog(&self) -> MathvizResult<CatalogLookup> {
        let mut catalog = CatalogLookup::builtin().with_latency(self.lookup_delay());
        if let Some(path) = &self.explanations {
            catalog.merge_path(path)?;
        }
        Ok(catalog)
    }

    /// Label fonts as configured.
    pub fn font_book(&self) -> MathvizResult<FontBook> {
        match &self.fonts.regular {
            Some(regular) => FontBook::from_paths(regular, self.fonts.bold.as_deref()),
            None if self.fonts.system => Ok(FontBook::system()),
            None => Ok(FontBook::empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_classic_canvas() {
        let cfg = StudioConfig::default();
        assert_eq!(cfg.canvas, Canvas { width: 600, height: 450 });
        assert_eq!(cfg.fps, Fps { num: 60, den: 1 });
        assert_eq!(cfg.background, Rgba8::WHITE);
        assert_eq!(cfg.container, Container::Webm);
        assert_eq!(cfg.lookup_delay(), Duration::from_millis(500));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = StudioConfig::from_json(
            r##"{ "container": "mp4", "background": "#000", "pacing": "unpaced", "fonts": { "system": false } }"##,
        )
        .unwrap();
        assert_eq!(cfg.container, Container::Mp4);
        assert_eq!(cfg.background, Rgba8::BLACK);
        assert_eq!(cfg.frame_pacing(), FramePacing::Unpaced);
        assert_eq!(cfg.canvas, Canvas::default());
        assert!(cfg.font_book().unwrap().is_empty());
    }

    #[test]
    fn invalid_configs_are_rejected() {
        assert!(StudioConfig::from_json(r#"{ "fps": { "num": 0, "den": 1 } }"#).is_err());
        assert!(StudioConfig::from_json(r#"{ "canvas": { "width": 0, "height": 4 } }"#).is_err());
        assert!(StudioConfig::from_json(r#"{ "fonts": { "bold": "b.ttf" } }"#).is_err());
        assert!(StudioConfig::from_json(r##"{ "colour": "#fff" }"##).is_err());
    }
}
