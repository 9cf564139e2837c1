use super::*;
use crate::assets::fonts::FontSet;
use crate::encode::sink::InMemorySink;
use crate::foundation::core::{CanvasSize, Rgba8};
use crate::render::cpu::CpuRasterizer;
use crate::render::scene::{DrawOp, Scene};

fn setup() -> (Surface, SinkConfig) {
    let canvas = CanvasSize {
        width: 4,
        height: 2,
    };
    let surface = Surface::new(canvas, Box::new(CpuRasterizer::new(FontSet::empty())));
    let cfg = SinkConfig {
        width: 4,
        height: 2,
        fps: Fps::integer(10).unwrap(),
    };
    (surface, cfg)
}

fn fill(surface: &mut Surface, v: u8) {
    let mut scene = Scene::new();
    scene.push(DrawOp::Fill {
        color: Rgba8::rgb(v, v, v),
    });
    surface.draw(&scene).unwrap();
}

#[test]
fn ticks_carry_the_latest_paint_at_or_before_them() {
    let (mut surface, cfg) = setup();
    let mut sink = InMemorySink::new();
    let mut rec = Recorder::start(&mut sink, cfg, Duration::ZERO).unwrap();

    // paint A at t=0, paint B at t=250ms; ticks every 100ms.
    rec.capture_before(Duration::ZERO, &surface).unwrap();
    fill(&mut surface, 10);
    assert_eq!(rec.capture_before(Duration::from_millis(250), &surface).unwrap(), 3);
    fill(&mut surface, 200);
    let (blob, frames) = rec.stop(Duration::from_millis(400), &surface).unwrap();
    assert_eq!(frames, 4);

    let values: Vec<u8> = sink.frames().iter().map(|(_, f)| f.data[0]).collect();
    assert_eq!(values, vec![10, 10, 10, 200]);
    assert_eq!(blob.len(), 4 * 4 * 2 * 4);
    let idx: Vec<u64> = sink.frames().iter().map(|(i, _)| i.0).collect();
    assert_eq!(idx, vec![0, 1, 2, 3]);
}

#[test]
fn stop_without_elapsed_time_still_emits_one_frame() {
    let (mut surface, cfg) = setup();
    fill(&mut surface, 7);
    let mut sink = InMemorySink::new();
    let rec = Recorder::start(&mut sink, cfg, Duration::from_secs(5)).unwrap();
    let (_, frames) = rec.stop(Duration::from_secs(5), &surface).unwrap();
    assert_eq!(frames, 1);
    assert_eq!(sink.frames().len(), 1);
    assert!(sink.is_ended());
}

#[test]
fn ticks_are_relative_to_the_start_time() {
    let (surface, cfg) = setup();
    let mut sink = InMemorySink::new();
    let mut rec = Recorder::start(&mut sink, cfg, Duration::from_secs(100)).unwrap();
    assert_eq!(
        rec.capture_before(Duration::from_millis(100_150), &surface)
            .unwrap(),
        2
    );
    assert_eq!(rec.frames_captured(), 2);
    rec.abort();
    assert!(sink.is_aborted());
}
