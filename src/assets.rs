//! Decoded inputs: background raster, caption fonts and audio PCM.

use std::sync::Arc;

/// Raster decode into premultiplied RGBA8.
pub mod decode;
/// Font probing and Parley text layout.
pub mod font;
/// `ffmpeg`-backed audio decode and raw PCM files.
pub mod media;

/// Decoded raster image in premultiplied RGBA8 form.
#[derive(Clone, Debug)]
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Premultiplied RGBA8, row-major, tightly packed.
    pub rgba8_premul: Arc<Vec<u8>>,
}
