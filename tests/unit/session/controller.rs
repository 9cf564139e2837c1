use std::io::Cursor;
use std::sync::Arc;

use super::*;
use crate::assets::fetch::MemoryImageFetcher;
use crate::assets::fonts::{FontSources, TextWeight};
use crate::clock::ManualClock;
use crate::encode::sink::InMemorySink;
use crate::foundation::core::CanvasSize;
use crate::photos::source::StaticPhotoSource;
use crate::session::download::DirectoryDownloads;
use crate::session::observer::{NoticeLevel, ObservedEvent, RecordingObserver};

fn png() -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(6, 4, image::Rgba([90, 160, 220, 255]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn photos(n: usize) -> Vec<Photo> {
    (0..n)
        .map(|i| Photo {
            id: format!("p{i}"),
            work_name: format!("Work {i}"),
            media_url: format!("mem://p{i}"),
            taken_at: "2025-01-05".to_string(),
            category: None,
        })
        .collect()
}

fn cfg() -> SlideshowConfig {
    SlideshowConfig {
        canvas: CanvasSize {
            width: 16,
            height: 10,
        },
        photo_duration_ms: 200,
        title_hold_ms: 100,
        end_hold_ms: 100,
        title_year: Some(2025),
        fonts: FontSources {
            regular: Some("tests/data/fonts/DejaVuSans.ttf".into()),
            bold: Some("tests/data/fonts/DejaVuSans-Bold.ttf".into()),
        },
        ..SlideshowConfig::default()
    }
}

fn generator(list: Vec<Photo>) -> (SlideshowGenerator, Arc<RecordingObserver>) {
    let mut fetcher = MemoryImageFetcher::new();
    for p in &list {
        fetcher.insert(p.media_url.clone(), png());
    }
    let observer = Arc::new(RecordingObserver::new());
    let generator = SlideshowGenerator::new(
        "child-1",
        "Mia Rose",
        cfg(),
        Box::new(StaticPhotoSource::new(list)),
        Box::new(fetcher),
    )
    .unwrap()
    .with_observer(Box::new(Arc::clone(&observer)));
    (generator, observer)
}

struct FailingSource;

impl PhotoSource for FailingSource {
    fn fetch_photos(&self, _child_id: &str) -> SlideshowResult<Vec<Photo>> {
        Err(SlideshowError::fetch("503 Service Unavailable"))
    }
}

fn downloads(name: &str) -> DirectoryDownloads {
    let dir = PathBuf::from("target").join("unit_session_controller").join(name);
    let _ = std::fs::remove_dir_all(&dir);
    DirectoryDownloads::new(dir)
}

#[test]
fn open_with_photos_is_ready_with_summary() {
    let (mut g, _) = generator(photos(10));
    assert_eq!(g.state(), &GeneratorState::Idle);
    assert_eq!(g.open().unwrap(), &GeneratorState::Ready);

    let view = g.ready_view().unwrap();
    assert_eq!(view.photo_count, 10);
    assert_eq!(view.count_line(), "10 photos will be included");
    assert_eq!(view.previews.len(), PREVIEW_LIMIT);
    assert_eq!(view.previews[0].id, "p0");
    assert_eq!(view.features.len(), 5);
    assert_eq!(view.format_note, "Video will download as WebM format");
}

#[test]
fn empty_set_cannot_generate() {
    let (mut g, observer) = generator(Vec::new());
    assert_eq!(g.open().unwrap(), &GeneratorState::Empty);
    assert!(g.ready_view().is_none());

    let mut sink = InMemorySink::new();
    let err = g
        .generate(
            &mut sink,
            &mut ManualClock::new(),
            &downloads("empty"),
            &CancelToken::new(),
        )
        .unwrap_err();
    assert!(matches!(err, SlideshowError::Validation(_)));
    assert_eq!(g.state(), &GeneratorState::Empty);
    assert!(sink.config().is_none());
    assert_eq!(
        observer.notices(),
        vec![Notice::info("No photos to include")]
    );
}

#[test]
fn load_failure_is_an_error_state_and_reopen_is_allowed() {
    let observer = Arc::new(RecordingObserver::new());
    let mut g = SlideshowGenerator::new(
        "child-1",
        "Mia",
        cfg(),
        Box::new(FailingSource),
        Box::new(MemoryImageFetcher::new()),
    )
    .unwrap()
    .with_observer(Box::new(Arc::clone(&observer)));

    assert!(g.open().is_err());
    assert!(matches!(g.state(), GeneratorState::Error(_)));
    let notices = observer.notices();
    assert_eq!(notices.last().unwrap().level, NoticeLevel::Error);
    assert_eq!(notices.last().unwrap().message, "Failed to load photos");

    // retry goes through loading again
    assert!(g.open().is_err());
}

#[test]
fn generate_saves_and_can_run_again() {
    let (mut g, observer) = generator(photos(2));
    g.open().unwrap();
    let target = downloads("ok");

    let mut sink = InMemorySink::new();
    let first = g
        .generate(
            &mut sink,
            &mut ManualClock::new(),
            &target,
            &CancelToken::new(),
        )
        .unwrap();
    assert_eq!(g.state(), &GeneratorState::Complete);
    assert_eq!(first.file_name, "Mia_Rose_Slideshow.rgba");
    assert!(first.saved_to.exists());
    assert_eq!(first.photo_count, 2);
    assert!(
        observer
            .notices()
            .contains(&Notice::success("🎬 Video downloaded!"))
    );

    let mut sink2 = InMemorySink::new();
    let second = g
        .generate(
            &mut sink2,
            &mut ManualClock::new(),
            &target,
            &CancelToken::new(),
        )
        .unwrap();
    assert_eq!(second.frames_captured, first.frames_captured);
    assert_eq!(second.segments, first.segments);
    assert_eq!(sink.frames().len(), sink2.frames().len());
    assert_eq!(g.photos().len(), 2);
}

#[test]
fn cancelled_generate_closes_without_a_file() {
    let (mut g, _) = generator(photos(1));
    g.open().unwrap();
    let target = downloads("cancelled");
    let cancel = CancelToken::new();
    cancel.cancel();

    let mut sink = InMemorySink::new();
    let err = g
        .generate(&mut sink, &mut ManualClock::new(), &target, &cancel)
        .unwrap_err();
    assert!(err.is_cancelled());
    assert_eq!(g.state(), &GeneratorState::Closed);
    assert!(!target.dir().join("Mia_Rose_Slideshow.rgba").exists());

    // a closed controller can be reopened
    assert_eq!(g.open().unwrap(), &GeneratorState::Ready);
}

#[test]
fn generate_before_open_is_refused() {
    let (mut g, _) = generator(photos(1));
    let err = g
        .generate(
            &mut InMemorySink::new(),
            &mut ManualClock::new(),
            &downloads("unopened"),
            &CancelToken::new(),
        )
        .unwrap_err();
    assert!(matches!(err, SlideshowError::Validation(_)));
    assert_eq!(g.state(), &GeneratorState::Idle);
}

#[test]
fn close_forgets_photos() {
    let (mut g, _) = generator(photos(3));
    g.open().unwrap();
    g.close();
    assert_eq!(g.state(), &GeneratorState::Closed);
    assert!(g.photos().is_empty());
    assert!(g.open().is_ok());
}

#[test]
fn configured_fonts_are_loaded_and_missing_ones_refused() {
    let (g, _) = generator(photos(1));
    let bold = std::fs::read("tests/data/fonts/DejaVuSans-Bold.ttf").unwrap();
    assert_eq!(g.fonts.bytes_for(TextWeight::Bold).unwrap().as_slice(), bold.as_slice());

    let mut bad = cfg();
    bad.fonts.regular = Some("tests/data/fonts/missing.ttf".into());
    let err = SlideshowGenerator::new(
        "child-1",
        "Mia",
        bad,
        Box::new(StaticPhotoSource::new(Vec::new())),
        Box::new(MemoryImageFetcher::new()),
    )
    .err()
    .unwrap();
    assert!(matches!(err, SlideshowError::Validation(_)));
}

#[test]
fn generate_without_fonts_leaves_the_dialog_ready() {
    let (g, observer) = generator(photos(2));
    let mut g = g.with_fonts(FontSet::empty());
    g.open().unwrap();

    let err = g
        .generate(
            &mut InMemorySink::new(),
            &mut ManualClock::new(),
            &downloads("nofonts"),
            &CancelToken::new(),
        )
        .unwrap_err();
    assert!(matches!(err, SlideshowError::Validation(_)));
    assert_eq!(g.state(), &GeneratorState::Ready);
    assert!(
        !observer
            .events()
            .iter()
            .any(|e| matches!(e, ObservedEvent::State(GeneratorState::Generating)))
    );
}
