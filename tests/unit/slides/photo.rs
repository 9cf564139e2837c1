use super::*;
use crate::config::SlideshowConfig;
use crate::foundation::core::CanvasSize;

fn image(w: u32, h: u32) -> Arc<PreparedImage> {
    Arc::new(PreparedImage {
        width: w,
        height: h,
        rgba8_premul: Arc::new(vec![255; (w * h * 4) as usize]),
    })
}

#[test]
fn draw_order_and_caption_band_at_1080p() {
    let cfg = SlideshowConfig::default();
    let ctx = SlideContext::from_config(&cfg);
    let scene = photo_scene(&ctx, &image(4, 3), "Pink Tower", "January 5, 2025", 0.0);

    assert!(matches!(scene.ops[0], DrawOp::Fill { color } if color == Rgba8::rgb(0x1a, 0x1a, 0x2e)));
    assert!(matches!(scene.ops[1], DrawOp::Image { .. }));
    let DrawOp::Rect { rect, color } = &scene.ops[2] else {
        panic!("expected caption band");
    };
    assert_eq!(*rect, Rect::new(0.0, 980.0, 1920.0, 1080.0));
    assert_eq!(color.a, 153);

    let DrawOp::Text {
        baseline_y,
        size_px,
        weight,
        ..
    } = &scene.ops[3]
    else {
        panic!("expected caption text");
    };
    assert_eq!(*baseline_y, 1030.0);
    assert_eq!(*size_px, 32.0);
    assert_eq!(*weight, TextWeight::Bold);

    let texts: Vec<&str> = scene.texts().collect();
    assert_eq!(texts, vec!["Pink Tower", "January 5, 2025"]);
}

#[test]
fn empty_caption_still_emits_text_ops() {
    let cfg = SlideshowConfig::default();
    let ctx = SlideContext::from_config(&cfg);
    let scene = photo_scene(&ctx, &image(2, 2), "", "", 0.5);
    assert_eq!(scene.texts().collect::<Vec<_>>(), vec!["", ""]);
}

#[test]
fn layout_scales_with_canvas_height() {
    let cfg = SlideshowConfig {
        canvas: CanvasSize {
            width: 960,
            height: 540,
        },
        ..SlideshowConfig::default()
    };
    let ctx = SlideContext::from_config(&cfg);
    let scene = photo_scene(&ctx, &image(2, 2), "x", "y", 0.0);
    let DrawOp::Rect { rect, .. } = &scene.ops[2] else {
        panic!("expected caption band");
    };
    assert_eq!(rect.y0, 490.0);
}

#[test]
fn image_transform_zooms_over_the_segment() {
    let cfg = SlideshowConfig::default();
    let ctx = SlideContext::from_config(&cfg);
    let img = image(1920, 1080);
    let scale_at = |t: f64| {
        let scene = photo_scene(&ctx, &img, "", "", t);
        let DrawOp::Image { transform, .. } = &scene.ops[1] else {
            panic!("expected image");
        };
        transform.as_coeffs()[0]
    };
    assert!((scale_at(0.0) - 1.0).abs() < 1e-9);
    assert!((scale_at(0.5) - 1.05).abs() < 1e-9);
}

fn half_hd() -> SlideshowConfig {
    SlideshowConfig {
        canvas: CanvasSize {
            width: 960,
            height: 540,
        },
        ..SlideshowConfig::default()
    }
}

fn paint(scene: &Scene, canvas: CanvasSize) -> crate::render::backend::FrameRGBA {
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

fn rows(frame: &crate::render::backend::FrameRGBA, y0: u32, y1: u32) -> &[u8] {
    let stride = frame.width as usize * 4;
    &frame.data[y0 as usize * stride..y1 as usize * stride]
}

fn gray() -> Arc<PreparedImage> {
    Arc::new(PreparedImage {
        width: 4,
        height: 3,
        rgba8_premul: Arc::new([120u8, 120, 120, 255].repeat(12)),
    })
}

#[test]
fn caption_is_drawn_inside_the_bar() {
    let cfg = half_hd();
    let ctx = SlideContext::from_config(&cfg);
    let date = "March 14, 2025";
    let with = paint(
        &photo_scene(&ctx, &gray(), "Sandpaper Letters", date, 0.0),
        cfg.canvas,
    );
    let without = paint(&photo_scene(&ctx, &gray(), "", date, 0.0), cfg.canvas);

    // bar spans 490..540; caption baseline at 515
    assert_ne!(rows(&with, 495, 520), rows(&without, 495, 520));
    assert_eq!(rows(&with, 0, 489), rows(&without, 0, 489));
    let lit = (495..520)
        .flat_map(|y| (0..960).map(move |x| (x, y)))
        .filter(|&(x, y)| with.pixel(x, y).unwrap()[0] > 200)
        .count();
    assert!(lit > 50, "caption ink pixels: {lit}");
}

#[test]
fn blank_caption_keeps_bar_and_date_line() {
    let cfg = half_hd();
    let ctx = SlideContext::from_config(&cfg);
    let date = "March 14, 2025";
    let captioned = paint(
        &photo_scene(&ctx, &gray(), "Sandpaper Letters", date, 0.0),
        cfg.canvas,
    );
    let blank = paint(&photo_scene(&ctx, &gray(), "", date, 0.0), cfg.canvas);
    let undated = paint(&photo_scene(&ctx, &gray(), "", "", 0.0), cfg.canvas);

    // bar geometry: darkened from row 490 down, untouched above
    let above = blank.pixel(480, 485).unwrap();
    let inside = blank.pixel(480, 495).unwrap();
    assert!(inside[0] < above[0], "{inside:?} vs {above:?}");
    assert_eq!(captioned.pixel(480, 495), blank.pixel(480, 495));

    // date line rows are identical with or without a caption, and carry the date
    assert_eq!(rows(&captioned, 521, 540), rows(&blank, 521, 540));
    assert_ne!(rows(&blank, 521, 540), rows(&undated, 521, 540));
}
