use super::*;

#[test]
fn default_fade_is_eleven_overlays_fifty_ms_apart() {
    let fade = Crossfade::new(&TransitionConfig::default(), Rgba8::rgb(26, 26, 46));
    let alphas: Vec<u8> = fade.overlays().map(|c| c.a).collect();

    assert_eq!(fade.overlay_count(), 11);
    assert_eq!(alphas.len(), 11);
    assert_eq!(alphas[0], 0);
    assert_eq!(alphas[10], 255);
    assert!(alphas.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(fade.pause(), Duration::from_millis(50));
    assert_eq!(fade.duration(), Duration::from_millis(550));
}

#[test]
fn single_step_fade_goes_straight_to_opaque() {
    let cfg = TransitionConfig {
        duration_ms: 100,
        steps: 1,
    };
    let fade = Crossfade::new(&cfg, Rgba8::rgb(0, 0, 0));
    let alphas: Vec<u8> = fade.overlays().map(|c| c.a).collect();
    assert_eq!(alphas, vec![0, 255]);
}
