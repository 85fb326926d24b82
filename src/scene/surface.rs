use crate::foundation::core::{BezPath, Canvas, Point, Rgba8, Shape};

/// Font weight of a text op.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FontWeight {
    /// Regular face.
    #[default]
    Regular,
    /// Bold face.
    Bold,
}

/// Font selection for a text op: pixel size plus weight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FontSpec {
    /// Font size in pixels.
    pub size_px: f32,
    /// Face weight.
    pub weight: FontWeight,
}

impl FontSpec {
    /// Regular face at `size_px`.
    pub const fn regular(size_px: f32) -> Self {
        Self {
            size_px,
            weight: FontWeight::Regular,
        }
    }

    /// Bold face at `size_px`.
    pub const fn bold(size_px: f32) -> Self {
        Self {
            size_px,
            weight: FontWeight::Bold,
        }
    }
}

/// Stroke paint: colour, width and optional `[on, off]` dash pattern.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrokeStyle {
    /// Stroke colour.
    pub color: Rgba8,
    /// Line width in pixels.
    pub width: f64,
    /// Dash pattern, solid when `None`.
    pub dash: Option<[f64; 2]>,
}

impl StrokeStyle {
    /// Solid stroke.
    pub const fn solid(color: Rgba8, width: f64) -> Self {
        Self {
            color,
            width,
            dash: None,
        }
    }

    /// Dashed stroke with equal on/off lengths.
    pub const fn dashed(color: Rgba8, width: f64, dash: f64) -> Self {
        Self {
            color,
            width,
            dash: Some([dash, dash]),
        }
    }
}

/// One recorded drawing command.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    /// Stroke the outline of a path.
    Stroke {
        /// Path in canvas coordinates.
        path: BezPath,
        /// Paint.
        style: StrokeStyle,
    },
    /// Fill a path with the non-zero rule, optionally clipped to another path.
    Fill {
        /// Path in canvas coordinates.
        path: BezPath,
        /// Fill colour.
        color: Rgba8,
        /// Clip region.
        clip: Option<BezPath>,
    },
    /// Draw a single line of text with its baseline starting at `origin`.
    Text {
        /// UTF-8 text.
        text: String,
        /// Left edge of the alphabetic baseline.
        origin: Point,
        /// Font selection.
        font: FontSpec,
        /// Fill colour.
        color: Rgba8,
    },
}

/// The shared drawing surface: a display list over a fixed [`Canvas`].
///
/// Every animation frame starts with [`Surface::clear`], so the recorded ops
/// only ever describe the current frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Surface {
    canvas: Canvas,
    ops: Vec<DrawOp>,
}

impl Surface {
    /// Empty surface of the given size.
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            ops: Vec::new(),
        }
    }

    /// Surface dimensions.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Recorded ops in paint order.
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Drop every recorded op.
    pub fn clear(&mut self) {
        self.ops.clear();
    }

    /// Stroke `shape` with `style`.
    pub fn stroke(&mut self, shape: &impl Shape, style: StrokeStyle) {
        self.ops.push(DrawOp::Stroke {
            path: shape.to_path(0.1),
            style,
        });
    }

    /// Fill `shape` with `color`.
    pub fn fill(&mut self, shape: &impl Shape, color: Rgba8) {
        self.ops.push(DrawOp::Fill {
            path: shape.to_path(0.1),
            color,
            clip: None,
        });
    }

    /// Fill `shape` with `color`, clipped to `clip`.
    pub fn fill_clipped(&mut self, shape: &impl Shape, color: Rgba8, clip: &impl Shape) {
        self.ops.push(DrawOp::Fill {
            path: shape.to_path(0.1),
            color,
            clip: Some(clip.to_path(0.1)),
        });
    }

    /// Draw `text` with its baseline starting at `origin`.
    pub fn fill_text(
        &mut self,
        text: impl Into<String>,
        origin: impl Into<Point>,
        font: FontSpec,
        color: Rgba8,
    ) {
        self.ops.push(DrawOp::Text {
            text: text.into(),
            origin: origin.into(),
            font,
            color,
        });
    }

    /// Texts recorded this frame, in paint order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// Open polyline through `points`. Empty input yields an empty path.
pub fn polyline(points: impl IntoIterator<Item = Point>) -> BezPath {
    let mut path = BezPath::new();
    for (i, p) in points.into_iter().enumerate() {
        if i == 0 {
            path.move_to(p);
        } else {
            path.line_to(p);
        }
    }
    path
}

/// Closed polygon through `points`.
pub fn polygon(points: impl IntoIterator<Item = Point>) -> BezPath {
    let mut path = polyline(points);
    if !path.elements().is_empty() {
        path.close_path();
    }
    path
}
