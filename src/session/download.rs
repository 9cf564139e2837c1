use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::encode::sink::VideoBlob;
use crate::foundation::error::{SlideshowError, SlideshowResult};

/// Where finished videos go.
pub trait DownloadTarget {
    /// Persist `blob` as `file_name`; returns where it landed.
    fn save(&self, file_name: &str, blob: &VideoBlob) -> SlideshowResult<PathBuf>;
}

impl<T: DownloadTarget + ?Sized> DownloadTarget for &T {
    fn save(&self, file_name: &str, blob: &VideoBlob) -> SlideshowResult<PathBuf> {
        (**self).save(file_name, blob)
    }
}

/// Saves into a directory, atomically (temp file, then rename).
#[derive(Clone, Debug)]
pub struct DirectoryDownloads {
    dir: PathBuf,
}

impl DirectoryDownloads {
    /// Save into `dir`, creating it on first use.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Target directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DownloadTarget for DirectoryDownloads {
    #[tracing::instrument(skip(self, blob), fields(bytes = blob.len()))]
    fn save(&self, file_name: &str, blob: &VideoBlob) -> SlideshowResult<PathBuf> {
        if file_name.is_empty() || file_name.contains(['/', '\\']) {
            return Err(SlideshowError::validation(format!(
                "download file name '{file_name}' must be a bare file name"
            )));
        }
        std::fs::create_dir_all(&self.dir).with_context(|| {
            format!("failed to create download directory '{}'", self.dir.display())
        })?;

        let final_path = self.dir.join(file_name);
        let tmp_path = self.dir.join(format!(".{file_name}.part"));
        let written = std::fs::write(&tmp_path, &blob.bytes)
            .with_context(|| format!("failed to write '{}'", tmp_path.display()))
            .and_then(|()| {
                std::fs::rename(&tmp_path, &final_path).with_context(|| {
                    format!("failed to move download into '{}'", final_path.display())
                })
            });
        if let Err(e) = written {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(e.into());
        }
        tracing::info!(path = %final_path.display(), "video saved");
        Ok(final_path)
    }
}

/// `{name}_Slideshow.{extension}`, with whitespace runs and path separators in `child_name`
/// replaced by `_`.
pub fn slideshow_file_name(child_name: &str, extension: &str) -> String {
    let mut stem = String::with_capacity(child_name.len());
    let mut in_space = false;
    for c in child_name.chars() {
        if c.is_whitespace() {
            if !in_space {
                stem.push('_');
            }
            in_space = true;
            continue;
        }
        in_space = false;
        stem.push(if matches!(c, '/' | '\\') { '_' } else { c });
    }
    format!("{stem}_Slideshow.{extension}")
}

#[cfg(test)]
#[path = "../../tests/unit/session/download.rs"]
mod tests;
