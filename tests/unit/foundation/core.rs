use super::*;

#[test]
fn fps_rejects_zero_parts() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
    assert!(Fps::integer(30).is_ok());
}

#[test]
fn tick_times_are_exact_for_integer_rates() {
    let fps = Fps::integer(30).unwrap();
    assert_eq!(fps.tick_time(0), Duration::ZERO);
    assert_eq!(fps.tick_time(30), Duration::from_secs(1));
    assert_eq!(fps.tick_time(90), Duration::from_secs(3));
    assert_eq!(fps.frame_interval(), Duration::from_nanos(33_333_333));
}

#[test]
fn ticks_before_counts_strictly_earlier_ticks() {
    let fps = Fps::integer(30).unwrap();
    assert_eq!(fps.ticks_before(Duration::ZERO), 0);
    assert_eq!(fps.ticks_before(Duration::from_nanos(1)), 1);
    // Tick 60 sits exactly at 2s, so only ticks 0..60 precede it.
    assert_eq!(fps.ticks_before(Duration::from_secs(2)), 60);
    assert_eq!(fps.ticks_before(Duration::from_millis(2001)), 61);
}

#[test]
fn colors_parse_hex_and_rgba() {
    assert_eq!("#1a1a2e".parse::<Rgba8>().unwrap(), Rgba8::rgb(26, 26, 46));
    assert_eq!(
        "#4ECCA380".parse::<Rgba8>().unwrap(),
        Rgba8 {
            r: 0x4e,
            g: 0xcc,
            b: 0xa3,
            a: 0x80
        }
    );
    assert_eq!(
        "rgba(0, 0, 0, 0.6)".parse::<Rgba8>().unwrap(),
        Rgba8::rgb_alpha(0, 0, 0, 0.6)
    );
    assert!("#12345".parse::<Rgba8>().is_err());
    assert!("rgb(1,2,3)".parse::<Rgba8>().is_err());
}

#[test]
fn color_serde_uses_css_strings() {
    let c = Rgba8::rgb(0x16, 0x21, 0x3e);
    let json = serde_json::to_string(&c).unwrap();
    assert_eq!(json, "\"#16213e\"");
    let back: Rgba8 = serde_json::from_str(&json).unwrap();
    assert_eq!(back, c);
}

#[test]
fn premul_scales_channels_by_alpha() {
    assert_eq!(Rgba8::rgb(10, 20, 30).to_premul(), [10, 20, 30, 255]);
    assert_eq!(Rgba8::rgb(255, 255, 255).with_alpha(0.0).to_premul(), [0, 0, 0, 0]);
    let half = Rgba8::rgb(200, 100, 0).with_alpha(0.5).to_premul();
    assert_eq!(half[3], 128);
    assert_eq!(half[0], ((200u16 * 128 + 127) / 255) as u8);
}

#[test]
fn ui_scale_is_relative_to_1080p() {
    let c = CanvasSize {
        width: 1920,
        height: 1080,
    };
    assert_eq!(c.ui_scale(), 1.0);
    let small = CanvasSize {
        width: 64,
        height: 36,
    };
    assert!((small.ui_scale() - 36.0 / 1080.0).abs() < 1e-12);
}
