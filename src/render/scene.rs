use std::sync::Arc;

use crate::assets::decode::PreparedImage;
use crate::assets::fonts::TextWeight;
use crate::foundation::core::{Affine, BezPath, Rect, Rgba8};

/// One drawing instruction, in canvas pixel coordinates.
#[derive(Clone, Debug)]
pub enum DrawOp {
    /// Flood the whole canvas.
    Fill {
        /// Fill color.
        color: Rgba8,
    },
    /// Diagonal gradient from the top-left corner to the bottom-right corner.
    LinearGradient {
        /// Color at `(0, 0)`.
        start: Rgba8,
        /// Color at `(W, H)`.
        end: Rgba8,
    },
    /// Bitmap mapped into the canvas by `transform` (image pixel space to canvas space).
    Image {
        /// Decoded pixels.
        image: Arc<PreparedImage>,
        /// Image-to-canvas transform.
        transform: Affine,
    },
    /// Solid rectangle.
    Rect {
        /// Area to fill.
        rect: Rect,
        /// Fill color.
        color: Rgba8,
    },
    /// Single line of text, horizontally centered on `center_x`.
    Text {
        /// Content; may be empty.
        text: String,
        /// Font size in pixels.
        size_px: f32,
        /// Glyph color.
        color: Rgba8,
        /// Horizontal center.
        center_x: f64,
        /// Baseline position.
        baseline_y: f64,
        /// Face to use.
        weight: TextWeight,
    },
    /// Filled vector shape.
    Path {
        /// Outline, non-zero fill.
        path: BezPath,
        /// Fill color.
        color: Rgba8,
    },
}

/// Ordered draw list for one paint of the surface.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    /// Operations, painted back to front.
    pub ops: Vec<DrawOp>,
}

impl Scene {
    /// Empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an operation.
    pub fn push(&mut self, op: DrawOp) -> &mut Self {
        self.ops.push(op);
        self
    }

    /// Texts in paint order; handy for inspecting what a slide shows.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}
