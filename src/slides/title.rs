use kurbo::Shape as _;

use crate::assets::fonts::TextWeight;
use crate::foundation::core::{BezPath, Point, Rgba8, Vec2};
use crate::render::scene::{DrawOp, Scene};
use crate::slides::SlideContext;

fn backdrop(ctx: &SlideContext<'_>) -> Scene {
    let mut scene = Scene::new();
    scene.push(DrawOp::LinearGradient {
        start: ctx.theme.background,
        end: ctx.theme.gradient_end,
    });
    scene
}

/// Opening slide: child name, subtitle, year.
pub fn title_scene(ctx: &SlideContext<'_>, child_name: &str, year: i32) -> Scene {
    let cx = ctx.canvas.w() / 2.0;
    let mid = ctx.canvas.h() / 2.0;

    let mut scene = backdrop(ctx);
    scene
        .push(DrawOp::Text {
            text: child_name.to_string(),
            size_px: ctx.font_px(72.0),
            color: ctx.theme.accent,
            center_x: cx,
            baseline_y: mid - ctx.px(50.0),
            weight: TextWeight::Bold,
        })
        .push(DrawOp::Text {
            text: ctx.theme.subtitle.clone(),
            size_px: ctx.font_px(36.0),
            color: Rgba8::rgb(255, 255, 255),
            center_x: cx,
            baseline_y: mid + ctx.px(30.0),
            weight: TextWeight::Regular,
        })
        .push(DrawOp::Text {
            text: year.to_string(),
            size_px: ctx.font_px(24.0),
            color: Rgba8::rgb_alpha(255, 255, 255, 0.5),
            center_x: cx,
            baseline_y: mid + ctx.px(80.0),
            weight: TextWeight::Regular,
        });
    scene
}

/// Closing slide: whale mark, branding, site.
pub fn end_scene(ctx: &SlideContext<'_>) -> Scene {
    let cx = ctx.canvas.w() / 2.0;
    let mid = ctx.canvas.h() / 2.0;

    let whale_center = Point::new(cx, mid - ctx.px(85.0));
    let mut scene = backdrop(ctx);
    scene
        .push(DrawOp::Path {
            path: whale_path(whale_center, ctx.px(120.0)),
            color: ctx.theme.accent,
        })
        .push(DrawOp::Path {
            path: kurbo::Circle::new(
                whale_center + Vec2::new(-ctx.px(28.0), -ctx.px(6.0)),
                ctx.px(5.0),
            )
            .to_path(0.1),
            color: ctx.theme.background,
        })
        .push(DrawOp::Text {
            text: ctx.theme.branding.clone(),
            size_px: ctx.font_px(36.0),
            color: Rgba8::rgb(255, 255, 255),
            center_x: cx,
            baseline_y: mid + ctx.px(60.0),
            weight: TextWeight::Regular,
        })
        .push(DrawOp::Text {
            text: ctx.theme.site.clone(),
            size_px: ctx.font_px(20.0),
            color: Rgba8::rgb_alpha(255, 255, 255, 0.5),
            center_x: cx,
            baseline_y: mid + ctx.px(100.0),
            weight: TextWeight::Regular,
        });
    scene
}

/// Whale silhouette (body, tail fluke, spout) about `size` wide, centered on `center`.
pub fn whale_path(center: Point, size: f64) -> BezPath {
    let u = size / 120.0;
    let p = |x: f64, y: f64| Point::new(center.x + x * u, center.y + y * u);

    let mut path = kurbo::Ellipse::new(p(-8.0, 8.0), (44.0 * u, 26.0 * u), 0.0).to_path(0.1);

    // tail, rising from the back of the body
    path.move_to(p(30.0, 12.0));
    path.curve_to(p(42.0, 8.0), p(48.0, -2.0), p(50.0, -14.0));
    path.line_to(p(62.0, -24.0));
    path.curve_to(p(58.0, -10.0), p(56.0, -6.0), p(54.0, -6.0));
    path.curve_to(p(60.0, -4.0), p(64.0, 2.0), p(66.0, 10.0));
    path.line_to(p(50.0, 2.0));
    path.curve_to(p(46.0, 16.0), p(40.0, 24.0), p(26.0, 28.0));
    path.close_path();

    // spout
    path.move_to(p(-30.0, -18.0));
    path.curve_to(p(-32.0, -30.0), p(-40.0, -38.0), p(-48.0, -40.0));
    path.line_to(p(-46.0, -44.0));
    path.curve_to(p(-38.0, -42.0), p(-32.0, -36.0), p(-28.0, -30.0));
    path.curve_to(p(-24.0, -36.0), p(-18.0, -42.0), p(-10.0, -44.0));
    path.line_to(p(-8.0, -40.0));
    path.curve_to(p(-16.0, -38.0), p(-24.0, -30.0), p(-26.0, -18.0));
    path.close_path();

    path
}

#[cfg(test)]
#[path = "../../tests/unit/slides/title.rs"]
mod tests;
