//! The child's photo set: records served by the classroom API and the loaders that fetch them.

/// Photo records and timestamp formatting.
pub mod model;
/// Photo list loaders.
pub mod source;
