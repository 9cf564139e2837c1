use crate::animation::ease::Ease;
use crate::foundation::core::{Affine, CanvasSize, Rect, Vec2};
use crate::foundation::error::{SlideshowError, SlideshowResult};
use crate::foundation::math::lerp;

/// Slow zoom applied to a still photo over the length of its segment.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct KenBurns {
    /// Zoom factor at the start of the segment (on top of cover-fit).
    pub zoom_start: f64,
    /// Zoom factor at the end of the segment.
    pub zoom_end: f64,
    /// Curve applied to segment progress.
    pub ease: Ease,
}

impl Default for KenBurns {
    fn default() -> Self {
        Self {
            zoom_start: 1.0,
            zoom_end: 1.1,
            ease: Ease::Linear,
        }
    }
}

impl KenBurns {
    /// Check that both zoom factors are finite and strictly positive.
    pub fn validate(&self) -> SlideshowResult<()> {
        for (name, v) in [("zoom_start", self.zoom_start), ("zoom_end", self.zoom_end)] {
            if !v.is_finite() || v <= 0.0 {
                return Err(SlideshowError::validation(format!(
                    "ken_burns.{name} must be finite and > 0"
                )));
            }
        }
        Ok(())
    }

    /// Zoom factor at progress `t` in `[0, 1]`.
    pub fn zoom_at(&self, t: f64) -> f64 {
        lerp(self.zoom_start, self.zoom_end, self.ease.apply(t))
    }

    /// Placement of an `image_w × image_h` bitmap at progress `t`: cover-fit, zoomed, centered.
    pub fn placement(&self, canvas: CanvasSize, image_w: u32, image_h: u32, t: f64) -> Rect {
        let scale = cover_scale(canvas, image_w, image_h) * self.zoom_at(t);
        let w = f64::from(image_w) * scale;
        let h = f64::from(image_h) * scale;
        let x = (canvas.w() - w) / 2.0;
        let y = (canvas.h() - h) / 2.0;
        Rect::new(x, y, x + w, y + h)
    }

    /// Transform mapping image pixel space onto the canvas at progress `t`.
    pub fn image_transform(&self, canvas: CanvasSize, image_w: u32, image_h: u32, t: f64) -> Affine {
        let r = self.placement(canvas, image_w, image_h, t);
        let scale = if image_w == 0 {
            1.0
        } else {
            r.width() / f64::from(image_w)
        };
        Affine::translate(Vec2::new(r.x0, r.y0)) * Affine::scale(scale)
    }
}

/// Smallest uniform scale at which the bitmap covers the whole canvas.
pub fn cover_scale(canvas: CanvasSize, image_w: u32, image_h: u32) -> f64 {
    if image_w == 0 || image_h == 0 {
        return 1.0;
    }
    (canvas.w() / f64::from(image_w)).max(canvas.h() / f64::from(image_h))
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ken_burns.rs"]
mod tests;
