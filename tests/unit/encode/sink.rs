use super::*;
use crate::foundation::core::CanvasSize;

fn cfg() -> SinkConfig {
    SinkConfig {
        width: 2,
        height: 2,
        fps: Fps::integer(30).unwrap(),
    }
}

fn frame(v: u8) -> FrameRGBA {
    let mut f = FrameRGBA::new(CanvasSize {
        width: 2,
        height: 2,
    });
    f.data.fill(v);
    f
}

#[test]
fn end_concatenates_frames_in_order() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg()).unwrap();
    sink.push_frame(FrameIndex(0), &frame(1)).unwrap();
    sink.push_frame(FrameIndex(1), &frame(2)).unwrap();
    let blob = sink.end().unwrap();

    assert!(sink.is_ended());
    assert_eq!(blob.len(), 32);
    assert_eq!(blob.bytes[0], 1);
    assert_eq!(blob.bytes[31], 2);
    assert_eq!(blob.extension, "rgba");
}

#[test]
fn out_of_order_push_is_rejected() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg()).unwrap();
    sink.push_frame(FrameIndex(3), &frame(1)).unwrap();
    assert!(sink.push_frame(FrameIndex(3), &frame(1)).is_err());
}

#[test]
fn abort_discards_frames_and_blocks_end() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg()).unwrap();
    sink.push_frame(FrameIndex(0), &frame(1)).unwrap();
    sink.abort();

    assert!(sink.is_aborted());
    assert!(sink.frames().is_empty());
    assert!(sink.end().is_err());
}

#[test]
fn push_before_begin_fails() {
    let mut sink = InMemorySink::new();
    assert!(sink.push_frame(FrameIndex(0), &frame(0)).is_err());
}
