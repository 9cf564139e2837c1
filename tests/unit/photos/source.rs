use std::path::PathBuf;

use super::*;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("unit_photos_source").join(name);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn endpoint_trims_trailing_slash() {
    let src = HttpPhotoSource::new("https://montree.example/", None).unwrap();
    assert_eq!(src.endpoint(), "https://montree.example/api/classroom/video");
}

#[test]
fn json_file_source_reads_envelope() {
    let dir = scratch_dir("envelope");
    let path = dir.join("photos.json");
    std::fs::write(
        &path,
        r#"{"photos":[{"id":"1","work_name":"Pouring","media_url":"1.png","taken_at":"2025-01-05"}]}"#,
    )
    .unwrap();

    let src = JsonFilePhotoSource::new(&path);
    let photos = src.fetch_photos("child-1").unwrap();
    assert_eq!(photos.len(), 1);
    assert_eq!(photos[0].work_name, "Pouring");
    assert_eq!(src.media_root(), dir.as_path());
}

#[test]
fn json_file_source_missing_file_is_fetch_error() {
    let src = JsonFilePhotoSource::new("target/unit_photos_source/does-not-exist.json");
    let err = src.fetch_photos("child-1").unwrap_err();
    assert!(matches!(err, SlideshowError::Fetch(_)), "{err}");
}

#[test]
fn static_source_preserves_order() {
    let photos: Vec<Photo> = ["c", "a", "b"]
        .iter()
        .map(|id| Photo {
            id: id.to_string(),
            work_name: String::new(),
            media_url: format!("{id}.png"),
            taken_at: String::new(),
            category: None,
        })
        .collect();
    let src = StaticPhotoSource::new(photos);
    let ids: Vec<String> = src
        .fetch_photos("x")
        .unwrap()
        .into_iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(ids, ["c", "a", "b"]);
}
