use std::{path::Path, sync::Arc};

use anyhow::Context as _;

use crate::{
    foundation::{
        core::Rgba8,
        error::{MathvizError, MathvizResult},
    },
    scene::surface::FontWeight,
};

/// Raw bytes of one font face plus its index inside a collection file.
#[derive(Clone)]
pub struct FontFace {
    bytes: Arc<Vec<u8>>,
    index: u32,
    family: Option<String>,
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("len", &self.bytes.len())
            .field("index", &self.index)
            .field("family", &self.family)
            .finish()
    }
}

impl FontFace {
    /// Face from in-memory font bytes (TTF/OTF, face 0).
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            bytes: Arc::new(bytes),
            index: 0,
            family: None,
        }
    }

    /// Face read from a font file.
    pub fn from_path(path: &Path) -> MathvizResult<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("read font '{}'", path.display()))?;
        Ok(Self::from_bytes(bytes))
    }

    /// Font bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Regular and bold faces used for labels.
#[derive(Clone, Debug, Default)]
pub struct FontBook {
    regular: Option<FontFace>,
    bold: Option<FontFace>,
}

impl FontBook {
    /// Book without any face; text is skipped when rendering.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Book from explicit faces.
    pub fn new(regular: FontFace, bold: Option<FontFace>) -> Self {
        Self {
            regular: Some(regular),
            bold,
        }
    }

    /// Book from font files on disk.
    pub fn from_paths(regular: &Path, bold: Option<&Path>) -> MathvizResult<Self> {
        Ok(Self::new(
            FontFace::from_path(regular)?,
            bold.map(FontFace::from_path).transpose()?,
        ))
    }

    /// Sans-serif regular and bold faces from the system font database.
    pub fn system() -> Self {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();

        let pick = |weight: usvg::fontdb::Weight| {
            let families = [usvg::fontdb::Family::SansSerif];
            let query = usvg::fontdb::Query {
                families: &families,
                weight,
                ..usvg::fontdb::Query::default()
            };
            let id = db.query(&query).or_else(|| db.faces().next().map(|f| f.id))?;
            let family = db
                .face(id)
                .and_then(|info| info.families.first().map(|(name, _)| name.clone()));
            db.with_face_data(id, |data, index| FontFace {
                bytes: Arc::new(data.to_vec()),
                index,
                family,
            })
        };

        let book = Self {
            regular: pick(usvg::fontdb::Weight::NORMAL),
            bold: pick(usvg::fontdb::Weight::BOLD),
        };
        tracing::debug!(
            regular = ?book.regular.as_ref().and_then(|f| f.family.as_deref()),
            bold = ?book.bold.as_ref().and_then(|f| f.family.as_deref()),
            "resolved system fonts"
        );
        book
    }

    /// Face for `weight`; bold falls back to regular.
    pub fn face(&self, weight: FontWeight) -> Option<&FontFace> {
        match weight {
            FontWeight::Regular => self.regular.as_ref(),
            FontWeight::Bold => self.bold.as_ref().or(self.regular.as_ref()),
        }
    }

    /// Whether any face is available.
    pub fn is_empty(&self) -> bool {
        self.regular.is_none() && self.bold.is_none()
    }
}

/// Shaped single-line text ready to be drawn as glyph runs.
pub struct ShapedText {
    /// Parley layout, glyph positions relative to the layout's top-left.
    pub layout: parley::Layout<Rgba8>,
    /// Distance from the layout top to the first baseline.
    pub baseline: f32,
    /// Font handed to the rasterizer for the glyph runs.
    pub font: vello_cpu::peniko::FontData,
}

/// Parley contexts bound to one registered face.
struct FaceShaper {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<Rgba8>,
    family: String,
    font: vello_cpu::peniko::FontData,
}

impl FaceShaper {
    fn new(face: &FontFace) -> MathvizResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(face.bytes.as_ref().clone()), None);
        let registered = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| MathvizError::validation("no font families registered from font bytes"))?;

        let family = match &face.family {
            Some(name) => name.clone(),
            None => font_ctx
                .collection
                .family_name(registered)
                .ok_or_else(|| MathvizError::validation("registered font family has no name"))?
                .to_string(),
        };

        let font = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(face.bytes.as_ref().clone()),
            face.index,
        );

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family,
            font,
        })
    }

    fn shape(&mut self, text: &str, size_px: f32, brush: Rgba8) -> ShapedText {
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<Rgba8> = builder.build(text);
        layout.break_all_lines(None);

        let baseline = layout
            .lines()
            .next()
            .map(|line| line.metrics().baseline)
            .unwrap_or(size_px);

        ShapedText {
            layout,
            baseline,
            font: self.font.clone(),
        }
    }
}

/// Shapes label text with the faces of a [`FontBook`].
pub struct TextShaper {
    regular: Option<FaceShaper>,
    bold: Option<FaceShaper>,
}

impl TextShaper {
    /// Register every face of `book`.
    pub fn new(book: &FontBook) -> MathvizResult<Self> {
        Ok(Self {
            regular: book.regular.as_ref().map(FaceShaper::new).transpose()?,
            bold: book.bold.as_ref().map(FaceShaper::new).transpose()?,
        })
    }

    /// Whether any face can shape text.
    pub fn has_fonts(&self) -> bool {
        self.regular.is_some() || self.bold.is_some()
    }

    /// Shape `text`, or `None` when no face is available.
    pub fn shape(
        &mut self,
        text: &str,
        size_px: f32,
        weight: FontWeight,
        brush: Rgba8,
    ) -> MathvizResult<Option<ShapedText>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(MathvizError::validation(
                "text size_px must be finite and > 0",
            ));
        }

        let shaper = match weight {
            FontWeight::Regular => self.regular.as_mut(),
            FontWeight::Bold => match self.bold.as_mut() {
                Some(bold) => Some(bold),
                None => self.regular.as_mut(),
            },
        };
        Ok(shaper.map(|s| s.shape(text, size_px, brush)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_book_shapes_nothing() {
        let book = FontBook::empty();
        assert!(book.is_empty());
        assert!(book.face(FontWeight::Bold).is_none());

        let mut shaper = TextShaper::new(&book).unwrap();
        assert!(!shaper.has_fonts());
        let shaped = shaper
            .shape("a", 20.0, FontWeight::Regular, Rgba8::BLACK)
            .unwrap();
        assert!(shaped.is_none());
    }

    #[test]
    fn rejects_non_positive_sizes() {
        let mut shaper = TextShaper::new(&FontBook::empty()).unwrap();
        assert!(shaper.shape("a", 0.0, FontWeight::Regular, Rgba8::BLACK).is_err());
        assert!(shaper.shape("a", f32::NAN, FontWeight::Bold, Rgba8::BLACK).is_err());
    }

    #[test]
    fn bold_falls_back_to_regular() {
        let book = FontBook {
            regular: Some(FontFace::from_bytes(vec![0, 1, 2])),
            bold: None,
        };
        assert_eq!(book.face(FontWeight::Bold).unwrap().bytes(), &[0, 1, 2]);
    }

    #[test]
    fn garbage_font_bytes_fail_to_register() {
        let book = FontBook::new(FontFace::from_bytes(vec![0, 1, 2, 3]), None);
        assert!(TextShaper::new(&book).is_err());
    }

    #[test]
    fn missing_font_file_is_an_error() {
        assert!(FontBook::from_paths(Path::new("target/no/such/font.ttf"), None).is_err());
    }
}
