use super::*;

#[test]
fn bold_falls_back_to_regular_and_back() {
    let only_regular = FontSet::from_bytes(vec![1, 2, 3], None);
    assert_eq!(
        only_regular.bytes_for(TextWeight::Bold).unwrap().as_slice(),
        &[1, 2, 3]
    );

    let both = FontSet::from_bytes(vec![1], Some(vec![2]));
    assert_eq!(both.bytes_for(TextWeight::Regular).unwrap().as_slice(), &[1]);
    assert_eq!(both.bytes_for(TextWeight::Bold).unwrap().as_slice(), &[2]);
}

const REGULAR: &str = "tests/data/fonts/DejaVuSans.ttf";
const BOLD: &str = "tests/data/fonts/DejaVuSans-Bold.ttf";

#[test]
fn empty_set_has_no_faces_and_is_refused() {
    let set = FontSet::empty();
    assert!(set.is_empty());
    assert!(set.bytes_for(TextWeight::Regular).is_none());
    assert!(matches!(set.require_any(), Err(SlideshowError::Validation(_))));
}

#[test]
fn configured_paths_are_loaded() {
    let sources = FontSources {
        regular: Some(PathBuf::from(REGULAR)),
        bold: Some(PathBuf::from(BOLD)),
    };
    let set = FontSet::resolve(&sources).unwrap();
    assert_eq!(
        set.bytes_for(TextWeight::Regular).unwrap().as_slice(),
        std::fs::read(REGULAR).unwrap().as_slice()
    );
    assert_eq!(
        set.bytes_for(TextWeight::Bold).unwrap().as_slice(),
        std::fs::read(BOLD).unwrap().as_slice()
    );
    assert!(set.require_any().is_ok());
}

#[test]
fn discovery_picks_faces_by_weight() {
    let mut db = usvg::fontdb::Database::new();
    db.load_font_file(REGULAR).unwrap();
    db.load_font_file(BOLD).unwrap();

    let regular = system_face(&db, usvg::fontdb::Weight::NORMAL).unwrap();
    let bold = system_face(&db, usvg::fontdb::Weight::BOLD).unwrap();
    assert_eq!(regular, std::fs::read(REGULAR).unwrap());
    assert_eq!(bold, std::fs::read(BOLD).unwrap());
}

#[test]
fn discovery_in_an_empty_database_finds_nothing() {
    let db = usvg::fontdb::Database::new();
    assert!(system_face(&db, usvg::fontdb::Weight::NORMAL).is_none());
}

#[test]
fn layout_shapes_a_single_line() {
    let bytes = std::fs::read(REGULAR).unwrap();
    let mut engine = TextLayoutEngine::new();
    let layout = engine
        .layout_plain("Sandpaper Letters", &bytes, 32.0, TextBrushRgba8::default())
        .unwrap();
    assert_eq!(layout.lines().count(), 1);
    assert!(layout.width() > 100.0, "width {}", layout.width());

    let short = engine
        .layout_plain("Mia", &bytes, 32.0, TextBrushRgba8::default())
        .unwrap();
    assert!(short.width() < layout.width());
}

#[test]
fn configured_font_that_cannot_be_read_is_an_error() {
    let sources = FontSources {
        regular: Some(PathBuf::from("target/definitely/missing.ttf")),
        bold: None,
    };
    assert!(matches!(
        FontSet::resolve(&sources),
        Err(SlideshowError::Validation(_))
    ));
}

#[test]
fn layout_rejects_non_positive_size() {
    let mut engine = TextLayoutEngine::new();
    let err = engine
        .layout_plain("hi", &[0u8; 16], 0.0, TextBrushRgba8::default())
        .err()
        .unwrap();
    assert!(matches!(err, SlideshowError::Validation(_)));
}
