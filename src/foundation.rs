//! Shared primitives: frame timing, pixel colors, errors, and fixed-point helpers.

/// Timing, canvas and color primitives.
pub mod core;
/// Crate error type.
pub mod error;
pub(crate) mod math;
