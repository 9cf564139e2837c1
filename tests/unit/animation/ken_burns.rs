use super::*;

const HD: CanvasSize = CanvasSize {
    width: 1920,
    height: 1080,
};

#[test]
fn cover_scale_fills_both_axes() {
    // Portrait photo: width is the binding axis.
    let s = cover_scale(HD, 1000, 2000);
    assert!((s - 1.92).abs() < 1e-12);
    assert!(1000.0 * s >= 1920.0 - 1e-9);
    assert!(2000.0 * s >= 1080.0);

    // Wide panorama: height is the binding axis.
    let s = cover_scale(HD, 4000, 500);
    assert!((s - 2.16).abs() < 1e-12);
}

#[test]
fn zoom_interpolates_linearly_by_default() {
    let kb = KenBurns::default();
    assert_eq!(kb.zoom_at(0.0), 1.0);
    assert!((kb.zoom_at(0.5) - 1.05).abs() < 1e-12);
    assert!((kb.zoom_at(1.0) - 1.1).abs() < 1e-12);
}

#[test]
fn placement_is_centered_and_grows_over_time() {
    let kb = KenBurns::default();
    let a = kb.placement(HD, 800, 600, 0.0);
    let b = kb.placement(HD, 800, 600, 1.0);

    for r in [a, b] {
        assert!((r.center().x - 960.0).abs() < 1e-9);
        assert!((r.center().y - 540.0).abs() < 1e-9);
        assert!(r.x0 <= 1e-9 && r.y0 <= 1e-9);
        assert!(r.x1 >= 1920.0 - 1e-9 && r.y1 >= 1080.0 - 1e-9);
    }
    assert!(b.width() > a.width());
    assert!((b.width() / a.width() - 1.1).abs() < 1e-9);
}

#[test]
fn image_transform_maps_corners_onto_placement() {
    let kb = KenBurns::default();
    let tr = kb.image_transform(HD, 800, 600, 0.25);
    let r = kb.placement(HD, 800, 600, 0.25);
    let p0 = tr * kurbo::Point::new(0.0, 0.0);
    let p1 = tr * kurbo::Point::new(800.0, 600.0);
    assert!((p0.x - r.x0).abs() < 1e-9 && (p0.y - r.y0).abs() < 1e-9);
    assert!((p1.x - r.x1).abs() < 1e-9 && (p1.y - r.y1).abs() < 1e-9);
}

#[test]
fn validate_rejects_non_positive_zoom() {
    let bad = KenBurns {
        zoom_start: 0.0,
        ..KenBurns::default()
    };
    assert!(bad.validate().is_err());
    let bad = KenBurns {
        zoom_end: f64::NAN,
        ..KenBurns::default()
    };
    assert!(bad.validate().is_err());
    assert!(KenBurns::default().validate().is_ok());
}
