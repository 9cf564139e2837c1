use super::*;

fn blob() -> VideoBlob {
    VideoBlob {
        mime: "video/webm".to_string(),
        extension: "webm".to_string(),
        bytes: vec![0x1a, 0x45, 0xdf, 0xa3],
    }
}

#[test]
fn file_name_collapses_whitespace_runs() {
    assert_eq!(slideshow_file_name("Mia", "webm"), "Mia_Slideshow.webm");
    assert_eq!(
        slideshow_file_name("Mia  Rose\tLee", "webm"),
        "Mia_Rose_Lee_Slideshow.webm"
    );
    assert_eq!(slideshow_file_name("a/b\\c", "mp4"), "a_b_c_Slideshow.mp4");
}

#[test]
fn directory_downloads_write_the_blob() {
    let dir = PathBuf::from("target").join("unit_session_download");
    let _ = std::fs::remove_dir_all(&dir);
    let target = DirectoryDownloads::new(&dir);

    let path = target.save("Mia_Slideshow.webm", &blob()).unwrap();
    assert_eq!(path, dir.join("Mia_Slideshow.webm"));
    assert_eq!(std::fs::read(&path).unwrap(), blob().bytes);
    assert!(!dir.join(".Mia_Slideshow.webm.part").exists());
}

#[test]
fn nested_file_names_are_refused() {
    let target = DirectoryDownloads::new(PathBuf::from("target").join("unit_session_download2"));
    assert!(target.save("../escape.webm", &blob()).is_err());
}
