//! Front-loaded IO: image bytes, decoded bitmaps, and fonts. Nothing in here runs mid-render.

/// Image decoding into premultiplied RGBA8.
pub mod decode;
/// Image byte fetchers (HTTP, filesystem, memory).
pub mod fetch;
/// Font resolution and text layout.
pub mod fonts;
/// Fetch and decode a whole photo set before rendering.
pub mod preload;
