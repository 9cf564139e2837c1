use std::sync::Arc;

use crate::assets::decode::PreparedImage;
use crate::assets::fonts::TextWeight;
use crate::foundation::core::{Rect, Rgba8};
use crate::render::scene::{DrawOp, Scene};
use crate::slides::SlideContext;

const CAPTION_BAR_HEIGHT: f64 = 100.0;
const CAPTION_SIZE: f64 = 32.0;
const CAPTION_BASELINE_FROM_BOTTOM: f64 = 50.0;
const DATE_SIZE: f64 = 20.0;
const DATE_BASELINE_FROM_BOTTOM: f64 = 20.0;

/// One frame of a photo segment at progress `t` in `[0, 1)`.
///
/// Backdrop, zoomed cover-fit photo, caption band, caption, then date. Both text lines are
/// always emitted, possibly empty.
pub fn photo_scene(
    ctx: &SlideContext<'_>,
    image: &Arc<PreparedImage>,
    caption: &str,
    date_line: &str,
    t: f64,
) -> Scene {
    let (w, h) = (ctx.canvas.w(), ctx.canvas.h());
    let transform = ctx
        .ken_burns
        .image_transform(ctx.canvas, image.width, image.height, t);

    let mut scene = Scene::new();
    scene
        .push(DrawOp::Fill {
            color: ctx.theme.background,
        })
        .push(DrawOp::Image {
            image: Arc::clone(image),
            transform,
        })
        .push(DrawOp::Rect {
            rect: Rect::new(0.0, h - ctx.px(CAPTION_BAR_HEIGHT), w, h),
            color: ctx.theme.caption_bar,
        })
        .push(DrawOp::Text {
            text: caption.to_string(),
            size_px: ctx.font_px(CAPTION_SIZE),
            color: Rgba8::rgb(255, 255, 255),
            center_x: w / 2.0,
            baseline_y: h - ctx.px(CAPTION_BASELINE_FROM_BOTTOM),
            weight: TextWeight::Bold,
        })
        .push(DrawOp::Text {
            text: date_line.to_string(),
            size_px: ctx.font_px(DATE_SIZE),
            color: Rgba8::rgb_alpha(255, 255, 255, 0.7),
            center_x: w / 2.0,
            baseline_y: h - ctx.px(DATE_BASELINE_FROM_BOTTOM),
            weight: TextWeight::Regular,
        });
    scene
}

#[cfg(test)]
#[path = "../../tests/unit/slides/photo.rs"]
mod tests;
