use crate::foundation::core::CanvasSize;
use crate::foundation::error::SlideshowResult;
use crate::render::scene::Scene;

/// A rendered frame as RGBA8 pixels.
///
/// Frames are **premultiplied alpha**; the `premultiplied` flag makes this explicit at API
/// boundaries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Transparent black frame of the given size.
    pub fn new(canvas: CanvasSize) -> Self {
        let len = (canvas.width as usize)
            .saturating_mul(canvas.height as usize)
            .saturating_mul(4);
        Self {
            width: canvas.width,
            height: canvas.height,
            data: vec![0; len],
            premultiplied: true,
        }
    }

    /// RGBA bytes of pixel `(x, y)`, if in bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.data.get(idx..idx + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

/// Something that turns a [`Scene`] into pixels.
pub trait Rasterizer {
    /// Draw `scene` into `dst`, replacing its previous contents.
    fn rasterize(&mut self, scene: &Scene, dst: &mut FrameRGBA) -> SlideshowResult<()>;
}

impl<T: Rasterizer + ?Sized> Rasterizer for Box<T> {
    fn rasterize(&mut self, scene: &Scene, dst: &mut FrameRGBA) -> SlideshowResult<()> {
        (**self).rasterize(scene, dst)
    }
}
