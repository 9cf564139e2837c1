use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context as _;
use reqwest::blocking::Client;
use reqwest::header::AUTHORIZATION;

use crate::foundation::error::{SlideshowError, SlideshowResult};
use crate::photos::model::{Photo, parse_photo_list};

/// Source of truth for which photos belong in a child's slideshow.
///
/// Implementations return photos in playback order and never filter them further; an empty list
/// is a valid answer.
pub trait PhotoSource {
    /// Fetch the photo set for `child_id`.
    fn fetch_photos(&self, child_id: &str) -> SlideshowResult<Vec<Photo>>;
}

impl<T: PhotoSource + ?Sized> PhotoSource for &T {
    fn fetch_photos(&self, child_id: &str) -> SlideshowResult<Vec<Photo>> {
        (**self).fetch_photos(child_id)
    }
}

impl<T: PhotoSource + ?Sized> PhotoSource for Box<T> {
    fn fetch_photos(&self, child_id: &str) -> SlideshowResult<Vec<Photo>> {
        (**self).fetch_photos(child_id)
    }
}

/// Blocking client for `GET {base}/api/classroom/video?childId=…`.
#[derive(Debug, Clone)]
pub struct HttpPhotoSource {
    base_url: String,
    http: Client,
    auth_token: Option<String>,
}

impl HttpPhotoSource {
    /// Create a client targeting `base_url` (scheme + host, optional path prefix).
    pub fn new(base_url: impl Into<String>, auth_token: Option<String>) -> SlideshowResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| SlideshowError::fetch(format!("failed to build http client: {e}")))?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
            auth_token,
        })
    }

    /// Endpoint URL without the query string.
    pub fn endpoint(&self) -> String {
        format!("{}/api/classroom/video", self.base_url)
    }
}

impl PhotoSource for HttpPhotoSource {
    #[tracing::instrument(skip(self), fields(endpoint = %self.endpoint()))]
    fn fetch_photos(&self, child_id: &str) -> SlideshowResult<Vec<Photo>> {
        let mut req = self
            .http
            .get(self.endpoint())
            .query(&[("childId", child_id)]);
        if let Some(token) = &self.auth_token {
            req = req.header(AUTHORIZATION, format!("Bearer {token}"));
        }

        let resp = req
            .send()
            .map_err(|e| SlideshowError::fetch(format!("photo list request failed: {e}")))?;
        let status = resp.status();
        let body = resp
            .bytes()
            .map_err(|e| SlideshowError::fetch(format!("failed to read photo list body: {e}")))?;
        if !status.is_success() {
            let text = String::from_utf8_lossy(&body);
            return Err(SlideshowError::fetch(format!(
                "photo list request returned {status}: {}",
                text.trim()
            )));
        }

        let photos = parse_photo_list(&body)
            .map_err(|e| SlideshowError::fetch(format!("photo list response unreadable: {e}")))?;
        tracing::debug!(count = photos.len(), "fetched photo list");
        Ok(photos)
    }
}

/// Photo list stored on disk in the API's response shape, for offline rendering.
///
/// The file is re-read on every fetch; `child_id` is not used for lookup.
#[derive(Debug, Clone)]
pub struct JsonFilePhotoSource {
    path: PathBuf,
}

impl JsonFilePhotoSource {
    /// Source backed by the JSON file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Directory used to resolve relative `media_url` values.
    pub fn media_root(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }
}

impl PhotoSource for JsonFilePhotoSource {
    fn fetch_photos(&self, _child_id: &str) -> SlideshowResult<Vec<Photo>> {
        let bytes = std::fs::read(&self.path)
            .with_context(|| format!("read photo list '{}'", self.path.display()))
            .map_err(|e| SlideshowError::fetch(format!("{e:#}")))?;
        parse_photo_list(&bytes)
            .map_err(|e| SlideshowError::fetch(format!("{}: {e}", self.path.display())))
    }
}

/// Fixed in-memory photo set.
#[derive(Debug, Clone, Default)]
pub struct StaticPhotoSource {
    photos: Vec<Photo>,
}

impl StaticPhotoSource {
    /// Source that always answers with `photos`.
    pub fn new(photos: Vec<Photo>) -> Self {
        Self { photos }
    }
}

impl PhotoSource for StaticPhotoSource {
    fn fetch_photos(&self, _child_id: &str) -> SlideshowResult<Vec<Photo>> {
        Ok(self.photos.clone())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/photos/source.rs"]
mod tests;
