use super::*;
use kurbo::Shape as _;
use crate::config::SlideshowConfig;

#[test]
fn title_slide_lines_and_positions() {
    let cfg = SlideshowConfig::default();
    let ctx = SlideContext::from_config(&cfg);
    let scene = title_scene(&ctx, "Mia", 2025);

    assert!(matches!(scene.ops[0], DrawOp::LinearGradient { .. }));
    assert_eq!(
        scene.texts().collect::<Vec<_>>(),
        vec!["Mia", "Learning Journey", "2025"]
    );
    let DrawOp::Text {
        baseline_y,
        color,
        size_px,
        ..
    } = &scene.ops[1]
    else {
        panic!("expected name text");
    };
    assert_eq!(*baseline_y, 490.0);
    assert_eq!(*size_px, 72.0);
    assert_eq!(*color, Rgba8::rgb(0x4e, 0xcc, 0xa3));
}

#[test]
fn end_slide_has_whale_and_branding() {
    let cfg = SlideshowConfig::default();
    let ctx = SlideContext::from_config(&cfg);
    let scene = end_scene(&ctx);

    assert!(
        scene
            .ops
            .iter()
            .any(|op| matches!(op, DrawOp::Path { color, .. } if *color == ctx.theme.accent))
    );
    assert_eq!(
        scene.texts().collect::<Vec<_>>(),
        vec!["My Classroom", "teacherpotato.xyz"]
    );
}

#[test]
fn whale_stays_near_its_center() {
    let center = Point::new(500.0, 300.0);
    let bbox = whale_path(center, 120.0).bounding_box();
    assert!(bbox.width() > 60.0 && bbox.width() < 160.0);
    assert!(bbox.contains(center));
    assert!(bbox.x0 > 400.0 && bbox.x1 < 600.0);
}

fn paint(scene: &Scene, canvas: crate::foundation::core::CanvasSize) -> crate::render::backend::FrameRGBA {
    use crate::render::backend::Rasterizer as _;

    let fonts = crate::assets::fonts::FontSet::from_bytes(
        std::fs::read("tests/data/fonts/DejaVuSans.ttf").unwrap(),
        Some(std::fs::read("tests/data/fonts/DejaVuSans-Bold.ttf").unwrap()),
    );
    let mut r = crate::render::cpu::CpuRasterizer::new(fonts);
    let mut frame = crate::render::backend::FrameRGBA::new(canvas);
    r.rasterize(scene, &mut frame).unwrap();
    frame
}

#[test]
fn child_name_is_painted_on_the_title() {
    let cfg = SlideshowConfig {
        canvas: crate::foundation::core::CanvasSize {
            width: 320,
            height: 180,
        },
        ..SlideshowConfig::default()
    };
    let ctx = SlideContext::from_config(&cfg);
    let named = paint(&title_scene(&ctx, "Mia", 2025), cfg.canvas);
    let unnamed = paint(&title_scene(&ctx, "", 2025), cfg.canvas);

    assert_ne!(named.data, unnamed.data);
    // name sits above the subtitle; rows below the name baseline are shared
    let stride = 320 * 4;
    let name_baseline = (90.0 - 50.0 / 6.0) as usize + 2;
    assert_eq!(
        named.data[name_baseline * stride..],
        unnamed.data[name_baseline * stride..]
    );
}
