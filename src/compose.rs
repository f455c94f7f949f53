//! Composition: a zooming background beneath an optional fading caption, bounded to an exact
//! frame count.

use crate::acquire::BackgroundSource;
use crate::assets::PreparedImage;
use crate::assets::decode::decode_image_file;
use crate::config::{PipelineConfig, ZoomConfig};
use crate::foundation::core::{Affine, Canvas, Fps, FrameIndex, FrameRange, Rgb8, Vec2};
use crate::foundation::error::{ReelError, ReelResult};

/// Outlined, fading caption layer.
pub mod caption;

pub use caption::CaptionLayer;

/// Bottom layer of every frame.
#[derive(Clone, Debug)]
pub enum BackgroundLayer {
    /// Decoded still, scaled to cover the canvas and zoomed about the centre.
    Image(PreparedImage),
    /// Flat fill of the whole canvas.
    Solid(Rgb8),
}

/// Time-bounded composited clip, rendered frame by frame.
#[derive(Debug)]
pub struct VisualClip {
    /// Frame size.
    pub canvas: Canvas,
    /// Frame rate.
    pub fps: Fps,
    /// Exact frame count.
    pub duration_frames: u64,
    /// Background layer.
    pub background: BackgroundLayer,
    /// Caption layer, absent when it could not be built.
    pub caption: Option<CaptionLayer>,
    /// Background zoom motion.
    pub zoom: ZoomConfig,
}

impl VisualClip {
    /// All frames of the clip, `[0, duration_frames)`.
    pub fn frame_range(&self) -> FrameRange {
        FrameRange {
            start: FrameIndex(0),
            end: FrameIndex(self.duration_frames),
        }
    }

    /// Clip length in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.fps.frames_to_secs(self.duration_frames)
    }

    /// Presentation time of `idx` in seconds.
    pub fn time_at(&self, idx: FrameIndex) -> f64 {
        self.fps.frames_to_secs(idx.0)
    }

    /// Image-to-canvas transform at `t_secs`, or `None` for a solid background.
    pub fn background_transform(&self, t_secs: f64) -> Option<Affine> {
        match &self.background {
            BackgroundLayer::Image(img) => Some(cover_zoom_transform(
                self.canvas,
                img.width,
                img.height,
                self.zoom.scale_at(t_secs),
            )),
            BackgroundLayer::Solid(_) => None,
        }
    }

    /// Caption opacity at `t_secs`; zero when there is no caption.
    pub fn caption_opacity(&self, t_secs: f64) -> f32 {
        self.caption
            .as_ref()
            .map_or(0.0, |c| c.opacity_at(t_secs, self.duration_secs()))
    }
}

/// Scale an `img_w x img_h` image to cover `canvas`, zoom by `zoom` and centre it.
pub fn cover_zoom_transform(canvas: Canvas, img_w: u32, img_h: u32, zoom: f64) -> Affine {
    let iw = f64::from(img_w.max(1));
    let ih = f64::from(img_h.max(1));
    let cover = (f64::from(canvas.width) / iw).max(f64::from(canvas.height) / ih);
    Affine::translate(canvas.center())
        * Affine::scale(cover * zoom)
        * Affine::translate(Vec2::new(-iw / 2.0, -ih / 2.0))
}

/// Build the clip for `background` and `caption`, spanning exactly `duration_secs`.
///
/// Never fails because of the background or the caption: an undecodable image degrades to
/// the configured fill, a caption that cannot be laid out is dropped.
#[tracing::instrument(skip(background, cfg), fields(background = background.label()))]
pub fn compose(
    background: &BackgroundSource,
    caption: &str,
    duration_secs: f64,
    cfg: &PipelineConfig,
) -> ReelResult<VisualClip> {
    if !duration_secs.is_finite() || duration_secs <= 0.0 {
        return Err(ReelError::validation("clip duration must be finite and > 0"));
    }
    let duration_frames = cfg.fps.secs_to_frames_round(duration_secs);
    if duration_frames == 0 {
        return Err(ReelError::validation(
            "clip duration is shorter than one frame",
        ));
    }

    let background = load_background(background, cfg.acquisition.fallback_rgb);

    // TODO: only a missing font should degrade silently; layout errors are currently
    // swallowed the same way.
    let caption = match CaptionLayer::build(caption, cfg.canvas, &cfg.caption) {
        Ok(layer) => Some(layer),
        Err(e) => {
            tracing::warn!(error = %e, "caption unavailable, rendering background only");
            None
        }
    };

    Ok(VisualClip {
        canvas: cfg.canvas,
        fps: cfg.fps,
        duration_frames,
        background,
        caption,
        zoom: cfg.zoom,
    })
}

fn load_background(source: &BackgroundSource, fallback: Rgb8) -> BackgroundLayer {
    match source {
        BackgroundSource::SolidColor { rgb } => BackgroundLayer::Solid(*rgb),
        BackgroundSource::GeneratedImage { local_path, .. } => {
            match decode_image_file(local_path) {
                Ok(img) if img.width > 0 && img.height > 0 => BackgroundLayer::Image(img),
                Ok(_) => {
                    tracing::warn!(path = %local_path.display(), "background image is empty, using fill");
                    BackgroundLayer::Solid(fallback)
                }
                Err(e) => {
                    tracing::warn!(path = %local_path.display(), error = %e, "background image unreadable, using fill");
                    BackgroundLayer::Solid(fallback)
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/compose/clip.rs"]
mod tests;
