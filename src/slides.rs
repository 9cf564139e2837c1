//! Scene builders for every stage of the slideshow.

/// Ken Burns photo slide with caption bar.
pub mod photo;
/// Nominal timeline and still-frame painting.
pub mod plan;
/// Title and end slides.
pub mod title;
/// Cross-fade overlay schedule.
pub mod transition;

use crate::animation::ken_burns::KenBurns;
use crate::config::{SlideshowConfig, Theme};
use crate::foundation::core::CanvasSize;

/// Layout inputs shared by all slides.
///
/// Offsets and font sizes are authored for a 1080 px tall canvas and scaled with
/// [`CanvasSize::ui_scale`].
#[derive(Clone, Copy, Debug)]
pub struct SlideContext<'a> {
    /// Output size.
    pub canvas: CanvasSize,
    /// Colors and strings.
    pub theme: &'a Theme,
    /// Zoom for photo segments.
    pub ken_burns: KenBurns,
}

impl<'a> SlideContext<'a> {
    /// Context for `cfg`.
    pub fn from_config(cfg: &'a SlideshowConfig) -> Self {
        Self {
            canvas: cfg.canvas,
            theme: &cfg.theme,
            ken_burns: cfg.ken_burns,
        }
    }

    /// Scale a 1080p-reference length to this canvas.
    pub(crate) fn px(&self, v: f64) -> f64 {
        v * self.canvas.ui_scale()
    }

    /// Scale a 1080p-reference font size to this canvas.
    pub(crate) fn font_px(&self, v: f64) -> f32 {
        self.px(v) as f32
    }
}
