//! Frame rasterization for a composed [`crate::compose::VisualClip`].

/// Frame type and backend trait.
pub mod backend;
/// `vello_cpu` rasterizer.
pub mod cpu;

pub use backend::{BackendKind, FrameRGBA, RenderBackend, create_backend};
pub use cpu::CpuBackend;
