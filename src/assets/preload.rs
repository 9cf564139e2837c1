use std::sync::Arc;

use crate::assets::decode::{PreparedImage, decode_image};
use crate::assets::fetch::ImageFetcher;
use crate::foundation::error::{SlideshowError, SlideshowResult};
use crate::photos::model::Photo;

/// Fetch and decode every photo's image, one at a time, in list order.
///
/// The first failure aborts the whole preload; the error names the photo id and URL.
#[tracing::instrument(skip_all, fields(count = photos.len()))]
pub fn preload_images(
    photos: &[Photo],
    fetcher: &dyn ImageFetcher,
) -> SlideshowResult<Vec<Arc<PreparedImage>>> {
    let mut out = Vec::with_capacity(photos.len());
    for photo in photos {
        let bytes = fetcher.fetch(&photo.media_url).map_err(|e| match e {
            SlideshowError::Fetch(msg) => SlideshowError::fetch(format!(
                "photo '{}' ({}): {msg}",
                photo.id, photo.media_url
            )),
            other => other,
        })?;
        let img = decode_image(&bytes).map_err(|e| {
            SlideshowError::decode(format!("photo '{}' ({}): {e}", photo.id, photo.media_url))
        })?;
        tracing::debug!(
            id = %photo.id,
            width = img.width,
            height = img.height,
            "image ready"
        );
        out.push(Arc::new(img));
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/preload.rs"]
mod tests;
