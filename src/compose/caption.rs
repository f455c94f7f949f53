use crate::assets::font::{TextBrushRgba8, TextLayoutEngine, system_font_candidates};
use crate::config::CaptionConfig;
use crate::foundation::core::{Canvas, Rgb8, Vec2};
use crate::foundation::error::{ReelError, ReelResult};

/// Word-wrapped, centred caption with an outline and fade envelope.
pub struct CaptionLayer {
    /// Shaped lines, aligned inside the wrapping box width.
    pub layout: parley::Layout<TextBrushRgba8>,
    /// Font used by the rasterizer, same bytes the layout was shaped with.
    pub font: vello_cpu::peniko::FontData,
    /// Family name the layout resolved.
    pub font_family: String,
    /// Top-left corner of the layout in canvas pixels.
    pub origin: Vec2,
    /// Outline colour.
    pub stroke: Rgb8,
    /// Outline width in pixels.
    pub stroke_width: f64,
    /// Fade-in length in seconds.
    pub fade_in_secs: f64,
    /// Fade-out length in seconds.
    pub fade_out_secs: f64,
}

impl std::fmt::Debug for CaptionLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptionLayer")
            .field("lines", &self.layout.lines().count())
            .field("font_family", &self.font_family)
            .field("origin", &self.origin)
            .field("stroke_width", &self.stroke_width)
            .finish()
    }
}

impl CaptionLayer {
    /// Resolve a font, wrap `text` into the configured box and centre it on `canvas`.
    pub fn build(text: &str, canvas: Canvas, cfg: &CaptionConfig) -> ReelResult<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ReelError::caption("caption text is empty"));
        }

        let mut candidates = cfg.font_paths.clone();
        if cfg.probe_system_fonts {
            candidates.extend(system_font_candidates());
        }

        let mut engine = TextLayoutEngine::new();
        let font = engine.resolve_font(&candidates)?;

        let box_width = cfg.box_width.min(canvas.width);
        let box_height = cfg.box_height.min(canvas.height);
        let fill = TextBrushRgba8 {
            r: cfg.fill.r,
            g: cfg.fill.g,
            b: cfg.fill.b,
            a: 255,
        };
        let layout = engine.layout_centered(
            text,
            &font.family,
            cfg.font_size_px,
            fill,
            box_width as f32,
        )?;
        if layout.lines().count() == 0 {
            return Err(ReelError::caption("caption layout produced no lines"));
        }

        let box_x = f64::from(canvas.width - box_width) / 2.0;
        let box_y = f64::from(canvas.height - box_height) / 2.0;
        let text_y = box_y + (f64::from(box_height) - f64::from(layout.height())) / 2.0;

        let font_data = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(font.bytes.as_ref().clone()),
            0,
        );

        Ok(Self {
            layout,
            font: font_data,
            font_family: font.family,
            origin: Vec2::new(box_x, text_y),
            stroke: cfg.stroke,
            stroke_width: cfg.stroke_width,
            fade_in_secs: cfg.fade_in_secs,
            fade_out_secs: cfg.fade_out_secs,
        })
    }

    /// Opacity at `t_secs` in a clip lasting `duration_secs`.
    pub fn opacity_at(&self, t_secs: f64, duration_secs: f64) -> f32 {
        fade_opacity(
            t_secs,
            duration_secs,
            self.fade_in_secs,
            self.fade_out_secs,
        )
    }
}

/// Linear fade-in over `[0, fade_in)` multiplied by a linear fade-out over the last
/// `fade_out` seconds. Zero-length fades are no-ops.
pub fn fade_opacity(t_secs: f64, duration_secs: f64, fade_in: f64, fade_out: f64) -> f32 {
    let mut gain = 1.0f64;
    if fade_in > 0.0 {
        gain *= (t_secs / fade_in).clamp(0.0, 1.0);
    }
    if fade_out > 0.0 {
        let rem = (duration_secs - t_secs).max(0.0);
        gain *= (rem / fade_out).clamp(0.0, 1.0);
    }
    gain as f32
}

#[cfg(test)]
#[path = "../../tests/unit/compose/caption.rs"]
mod tests;
