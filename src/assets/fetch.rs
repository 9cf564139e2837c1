use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::blocking::Client;

use crate::foundation::error::{SlideshowError, SlideshowResult};

/// Resolves a photo's `media_url` into encoded image bytes.
pub trait ImageFetcher {
    /// Fetch the bytes behind `url`.
    fn fetch(&self, url: &str) -> SlideshowResult<Vec<u8>>;
}

impl<T: ImageFetcher + ?Sized> ImageFetcher for &T {
    fn fetch(&self, url: &str) -> SlideshowResult<Vec<u8>> {
        (**self).fetch(url)
    }
}

impl<T: ImageFetcher + ?Sized> ImageFetcher for Box<T> {
    fn fetch(&self, url: &str) -> SlideshowResult<Vec<u8>> {
        (**self).fetch(url)
    }
}

/// Fetches `http(s)://` URLs over the network and everything else from disk.
///
/// `file://` URLs and absolute paths are read as-is; relative paths resolve against
/// `media_root`.
#[derive(Debug, Clone)]
pub struct HttpImageFetcher {
    http: Client,
    media_root: PathBuf,
}

impl HttpImageFetcher {
    /// Create a fetcher resolving relative paths against `media_root`.
    pub fn new(media_root: impl Into<PathBuf>) -> SlideshowResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| SlideshowError::fetch(format!("failed to build http client: {e}")))?;
        Ok(Self {
            http,
            media_root: media_root.into(),
        })
    }

    fn local_path(&self, url: &str) -> PathBuf {
        let raw = url.strip_prefix("file://").unwrap_or(url);
        let p = Path::new(raw);
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.media_root.join(p)
        }
    }
}

impl ImageFetcher for HttpImageFetcher {
    fn fetch(&self, url: &str) -> SlideshowResult<Vec<u8>> {
        if url.trim().is_empty() {
            return Err(SlideshowError::fetch("photo has an empty media_url"));
        }

        if url.starts_with("http://") || url.starts_with("https://") {
            let resp = self
                .http
                .get(url)
                .send()
                .map_err(|e| SlideshowError::fetch(format!("GET {url} failed: {e}")))?;
            let status = resp.status();
            if !status.is_success() {
                return Err(SlideshowError::fetch(format!("GET {url} returned {status}")));
            }
            let bytes = resp
                .bytes()
                .map_err(|e| SlideshowError::fetch(format!("GET {url} body read failed: {e}")))?;
            return Ok(bytes.to_vec());
        }

        let path = self.local_path(url);
        std::fs::read(&path).map_err(|e| {
            SlideshowError::fetch(format!("failed to read image '{}': {e}", path.display()))
        })
    }
}

/// URL-keyed in-memory image bytes.
#[derive(Debug, Clone, Default)]
pub struct MemoryImageFetcher {
    images: HashMap<String, Vec<u8>>,
}

impl MemoryImageFetcher {
    /// Empty fetcher; every lookup fails until bytes are inserted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `bytes` under `url`.
    pub fn insert(&mut self, url: impl Into<String>, bytes: Vec<u8>) {
        self.images.insert(url.into(), bytes);
    }

    /// Builder-style [`MemoryImageFetcher::insert`].
    pub fn with(mut self, url: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.insert(url, bytes);
        self
    }
}

impl ImageFetcher for MemoryImageFetcher {
    fn fetch(&self, url: &str) -> SlideshowResult<Vec<u8>> {
        self.images
            .get(url)
            .cloned()
            .ok_or_else(|| SlideshowError::fetch(format!("no image registered for '{url}'")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fetch.rs"]
mod tests;
