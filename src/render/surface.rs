use crate::foundation::core::{CanvasSize, Rgba8};
use crate::foundation::error::SlideshowResult;
use crate::foundation::math::premul_fill_over_in_place;
use crate::render::backend::{FrameRGBA, Rasterizer};
use crate::render::scene::Scene;

/// The single drawing surface of a generation run.
///
/// Owned by the session and borrowed mutably by whoever paints; the recorder reads it between
/// paints.
pub struct Surface {
    canvas: CanvasSize,
    frame: FrameRGBA,
    rasterizer: Box<dyn Rasterizer>,
    paints: u64,
}

impl Surface {
    /// Blank surface of `canvas` size painted by `rasterizer`.
    pub fn new(canvas: CanvasSize, rasterizer: Box<dyn Rasterizer>) -> Self {
        Self {
            canvas,
            frame: FrameRGBA::new(canvas),
            rasterizer,
            paints: 0,
        }
    }

    /// Surface dimensions.
    pub fn canvas(&self) -> CanvasSize {
        self.canvas
    }

    /// Current pixels.
    pub fn frame(&self) -> &FrameRGBA {
        &self.frame
    }

    /// How many times the surface has been painted.
    pub fn paint_count(&self) -> u64 {
        self.paints
    }

    /// Replace the surface contents with `scene`.
    pub fn draw(&mut self, scene: &Scene) -> SlideshowResult<()> {
        self.rasterizer.rasterize(scene, &mut self.frame)?;
        self.paints += 1;
        Ok(())
    }

    /// Composite a flat color over the current contents (accumulates across calls).
    pub fn overlay(&mut self, color: Rgba8) {
        premul_fill_over_in_place(&mut self.frame.data, color.to_premul());
        self.paints += 1;
    }
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("canvas", &self.canvas)
            .field("paints", &self.paints)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
