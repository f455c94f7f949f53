use crate::compose::VisualClip;
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{ReelError, ReelResult};

/// A rendered frame as RGBA8 pixels.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// RGBA8 value of the pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

/// A renderer that rasterizes one frame of a clip at a time.
pub trait RenderBackend {
    /// Render frame `idx` of `clip`.
    fn render_frame(&mut self, clip: &VisualClip, idx: FrameIndex) -> ReelResult<FrameRGBA>;
}

/// Available backend kinds.
#[derive(Clone, Copy, Debug, Default)]
pub enum BackendKind {
    /// CPU raster backend powered by `vello_cpu`.
    #[default]
    Cpu,
}

/// Create a rendering backend implementation.
pub fn create_backend(kind: BackendKind) -> ReelResult<Box<dyn RenderBackend>> {
    match kind {
        BackendKind::Cpu => Ok(Box::new(crate::render::cpu::CpuBackend::new())),
    }
}

pub(crate) fn check_frame_index(clip: &VisualClip, idx: FrameIndex) -> ReelResult<()> {
    if !clip.frame_range().contains(idx) {
        return Err(ReelError::render(format!(
            "frame {} is outside the clip (0..{})",
            idx.0, clip.duration_frames
        )));
    }
    Ok(())
}
