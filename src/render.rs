//! Scene description and CPU rasterization onto the session surface.

/// Frame buffer and rasterizer trait.
pub mod backend;
/// `vello_cpu` rasterizer.
pub mod cpu;
/// Draw operations for one paint.
pub mod scene;
/// Persistent painted canvas.
pub mod surface;

pub use backend::{FrameRGBA, Rasterizer};
pub use cpu::CpuRasterizer;
pub use scene::{DrawOp, Scene};
pub use surface::Surface;
