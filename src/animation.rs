//! Time-to-value mapping for the photo segments.

/// Easing curves.
pub mod ease;
/// Zoom-and-drift transform for a photo segment.
pub mod ken_burns;
