use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::foundation::error::{SlideshowError, SlideshowResult};

/// Font weight requested by a text draw op.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextWeight {
    /// Regular face.
    #[default]
    Regular,
    /// Bold face; falls back to the regular face when no bold font is loaded.
    Bold,
}

/// Optional font file locations, as they appear in configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontSources {
    /// Regular face (`.ttf`/`.otf`).
    pub regular: Option<PathBuf>,
    /// Bold face.
    pub bold: Option<PathBuf>,
}

/// Families tried, in order, when a face is discovered from the system font database.
const SYSTEM_FAMILIES: &[usvg::fontdb::Family<'static>] = &[
    usvg::fontdb::Family::SansSerif,
    usvg::fontdb::Family::Name("DejaVu Sans"),
    usvg::fontdb::Family::Name("Liberation Sans"),
    usvg::fontdb::Family::Name("Noto Sans"),
    usvg::fontdb::Family::Name("Helvetica"),
];

/// Raw font bytes for the faces slides draw with.
///
/// Rendering a slide needs at least one face; [`FontSet::resolve`] refuses to return an empty
/// set and the rasterizer reports text drawn without a font as an error.
#[derive(Clone, Debug, Default)]
pub struct FontSet {
    regular: Option<Arc<Vec<u8>>>,
    bold: Option<Arc<Vec<u8>>>,
}

impl FontSet {
    /// No fonts at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from in-memory font files.
    pub fn from_bytes(regular: Vec<u8>, bold: Option<Vec<u8>>) -> Self {
        Self {
            regular: Some(Arc::new(regular)),
            bold: bold.map(Arc::new),
        }
    }

    /// Load explicitly configured faces, discovering system fonts for any face left unset.
    ///
    /// A configured path that cannot be read is an error, and so is ending up with no face at
    /// all.
    #[tracing::instrument(skip_all)]
    pub fn resolve(sources: &FontSources) -> SlideshowResult<Self> {
        let mut db = None;
        let regular = match &sources.regular {
            Some(p) => Some(read_font(p)?),
            None => system_face(db.get_or_insert_with(system_fonts), usvg::fontdb::Weight::NORMAL),
        };
        let bold = match &sources.bold {
            Some(p) => Some(read_font(p)?),
            None => system_face(db.get_or_insert_with(system_fonts), usvg::fontdb::Weight::BOLD),
        };
        let set = Self {
            regular: regular.map(Arc::new),
            bold: bold.map(Arc::new),
        };
        set.require_any()?;
        Ok(set)
    }

    /// Fail unless at least one face is loaded.
    pub fn require_any(&self) -> SlideshowResult<()> {
        if self.is_empty() {
            return Err(SlideshowError::validation(
                "no font available for slide text; set fonts.regular in the config",
            ));
        }
        Ok(())
    }

    /// Whether any face is available.
    pub fn is_empty(&self) -> bool {
        self.regular.is_none() && self.bold.is_none()
    }

    /// Bytes for `weight`, falling back to whichever face is loaded.
    pub fn bytes_for(&self, weight: TextWeight) -> Option<Arc<Vec<u8>>> {
        let (want, other) = match weight {
            TextWeight::Regular => (&self.regular, &self.bold),
            TextWeight::Bold => (&self.bold, &self.regular),
        };
        want.as_ref().or(other.as_ref()).cloned()
    }
}

fn read_font(path: &Path) -> SlideshowResult<Vec<u8>> {
    std::fs::read(path).map_err(|e| {
        SlideshowError::validation(format!("failed to read font '{}': {e}", path.display()))
    })
}

fn system_fonts() -> usvg::fontdb::Database {
    let mut db = usvg::fontdb::Database::new();
    db.load_system_fonts();
    tracing::debug!(faces = db.len(), "loaded system font database");
    db
}

/// Bytes of the best sans-serif face of `weight`.
///
/// Only faces at index 0 of their file are used, since slides register whole font blobs.
fn system_face(db: &usvg::fontdb::Database, weight: usvg::fontdb::Weight) -> Option<Vec<u8>> {
    use usvg::fontdb::{Query, Style};

    let queried = db
        .query(&Query {
            families: SYSTEM_FAMILIES,
            weight,
            ..Query::default()
        })
        .and_then(|id| db.face(id))
        .filter(|face| face.index == 0);
    let face = queried.or_else(|| {
        db.faces()
            .find(|f| f.index == 0 && f.weight == weight && f.style == Style::Normal)
    })?;

    let bytes = db.with_face_data(face.id, |data, _| data.to_vec())?;
    tracing::debug!(
        family = face.families.first().map(|(name, _)| name.as_str()).unwrap_or(""),
        weight = weight.0,
        "discovered system font"
    );
    Some(bytes)
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub(crate) struct TextBrushRgba8 {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

/// Stateful helper for building Parley text layouts from raw font bytes.
pub(crate) struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    families: HashMap<(usize, usize), String>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    pub(crate) fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            families: HashMap::new(),
        }
    }

    fn family_for(&mut self, font_bytes: &[u8]) -> SlideshowResult<String> {
        let key = (font_bytes.as_ptr() as usize, font_bytes.len());
        if let Some(name) = self.families.get(&key) {
            return Ok(name.clone());
        }

        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.to_vec()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            SlideshowError::render("no font families registered from font bytes")
        })?;

        let family_name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| SlideshowError::render("registered font family has no name"))?
            .to_string();
        self.families.insert(key, family_name.clone());
        Ok(family_name)
    }

    /// Shape and lay out a single unwrapped line of text.
    pub(crate) fn layout_plain(
        &mut self,
        text: &str,
        font_bytes: &[u8],
        size_px: f32,
        brush: TextBrushRgba8,
    ) -> SlideshowResult<parley::Layout<TextBrushRgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(SlideshowError::validation(
                "text size_px must be finite and > 0",
            ));
        }

        let family_name = self.family_for(font_bytes)?;

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fonts.rs"]
mod tests;
