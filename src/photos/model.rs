use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::foundation::error::{SlideshowError, SlideshowResult};

/// Classification tag carried on portfolio media. The renderer ignores it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhotoCategory {
    /// Curriculum work.
    Work,
    /// Everyday classroom life.
    Life,
    /// Shared with the family.
    Shared,
    /// Any tag this build does not know about.
    #[serde(other)]
    Other,
}

/// One still image in a child's portfolio.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Photo {
    /// Identifier, unique within the child's set.
    pub id: String,
    /// Caption label. Missing or `null` becomes empty.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub work_name: String,
    /// Location of the full-resolution image.
    pub media_url: String,
    /// Capture timestamp as served (RFC 3339, SQL timestamp, or plain date).
    #[serde(default, deserialize_with = "null_as_empty")]
    pub taken_at: String,
    /// Classification tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<PhotoCategory>,
}

impl Photo {
    /// Caption text; may be empty.
    pub fn caption(&self) -> &str {
        &self.work_name
    }

    /// Calendar date of `taken_at`, in the timestamp's own offset.
    pub fn taken_on(&self) -> Option<NaiveDate> {
        parse_taken_at(&self.taken_at)
    }

    /// Secondary caption line, e.g. `January 5, 2025`. Blank when `taken_at` is unreadable.
    pub fn date_line(&self) -> String {
        self.taken_on().map(format_long_date).unwrap_or_default()
    }
}

/// Parse the timestamp shapes the API is known to produce.
pub fn parse_taken_at(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    for fmt in ["%Y-%m-%d %H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M:%S%.f%#z"] {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.date_naive());
        }
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// `January 5, 2025`.
pub fn format_long_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

fn null_as_empty<'de, D>(de: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let v: Option<String> = serde::Deserialize::deserialize(de)?;
    Ok(v.unwrap_or_default())
}

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum PhotoListBody {
    Envelope {
        #[serde(default)]
        photos: Option<Vec<Photo>>,
    },
    Bare(Vec<Photo>),
}

/// Parse a photo-list response body: `{ "photos": [...] }` or a bare array.
///
/// A missing or `null` `photos` field is an empty set, not an error.
pub fn parse_photo_list(body: &[u8]) -> SlideshowResult<Vec<Photo>> {
    let parsed: PhotoListBody = serde_json::from_slice(body)
        .map_err(|e| SlideshowError::serde(format!("invalid photo list: {e}")))?;
    Ok(match parsed {
        PhotoListBody::Envelope { photos } => photos.unwrap_or_default(),
        PhotoListBody::Bare(photos) => photos,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/photos/model.rs"]
mod tests;
