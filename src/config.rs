//! Pipeline configuration.
//!
//! Every constant the generator relies on lives here with its default, so a JSON file can
//! override any subset (`#[serde(default)]`) and the environment can retarget endpoints,
//! fonts and the output path without a file.

use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::core::{Canvas, Fps, Rgb8};
use crate::foundation::error::{ReelError, ReelResult};

/// Environment variable overriding [`AcquisitionConfig::generator_url`].
pub const ENV_GENERATOR_URL: &str = "PROMPTREEL_GENERATOR_URL";
/// Environment variable overriding [`AcquisitionConfig::stock_url`].
pub const ENV_STOCK_URL: &str = "PROMPTREEL_STOCK_URL";
/// Environment variable naming a font file tried before the built-in probe list.
pub const ENV_FONT: &str = "PROMPTREEL_FONT";
/// Environment variable overriding [`PipelineConfig::output_path`].
pub const ENV_OUTPUT: &str = "PROMPTREEL_OUTPUT";

/// Default output file name inside the system temp directory.
pub const DEFAULT_OUTPUT_FILE: &str = "ai_video.mp4";

/// Upper bound for any single acquisition request, in seconds.
pub const MAX_FETCH_TIMEOUT_SECS: f64 = 3600.0;

/// Top-level configuration for [`crate::VideoGenerator`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Output frame size.
    pub canvas: Canvas,
    /// Output frame rate.
    pub fps: Fps,
    /// Background acquisition endpoints and timeouts.
    pub acquisition: AcquisitionConfig,
    /// Caption layout and styling.
    pub caption: CaptionConfig,
    /// Background zoom motion.
    pub zoom: ZoomConfig,
    /// Audio decode and mix format.
    pub audio: AudioConfig,
    /// Encoder codec selection.
    pub codec: CodecParams,
    /// Output MP4 path. `None` means `<temp dir>/ai_video.mp4`.
    pub output_path: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            canvas: Canvas::default(),
            fps: Fps::default(),
            acquisition: AcquisitionConfig::default(),
            caption: CaptionConfig::default(),
            zoom: ZoomConfig::default(),
            audio: AudioConfig::default(),
            codec: CodecParams::default(),
            output_path: None,
        }
    }
}

/// Remote image endpoints used by the background strategy chain.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AcquisitionConfig {
    /// Text-to-image endpoint; the encoded prompt is appended as a path segment.
    pub generator_url: String,
    /// Model identifier passed to the generator.
    pub generator_model: String,
    /// Bounded wait for the generator, in seconds.
    pub generator_timeout_secs: f64,
    /// Upper bound (inclusive) of the random seed sent to the generator.
    pub max_seed: u32,
    /// Deterministic stock-photo endpoint keyed by the sanitized prompt.
    pub stock_url: String,
    /// Bounded wait for the stock endpoint, in seconds.
    pub stock_timeout_secs: f64,
    /// `User-Agent` header sent with every request.
    pub user_agent: String,
    /// Fill used when every remote strategy failed.
    pub fallback_rgb: Rgb8,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            generator_url: "https://image.pollinations.ai/prompt/".to_string(),
            generator_model: "flux".to_string(),
            generator_timeout_secs: 45.0,
            max_seed: 99_999,
            stock_url: "https://picsum.photos/seed/".to_string(),
            stock_timeout_secs: 10.0,
            user_agent: "Mozilla/5.0".to_string(),
            fallback_rgb: Rgb8::new(20, 20, 60),
        }
    }
}

/// Caption text layout and styling.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CaptionConfig {
    /// Font size in pixels.
    pub font_size_px: f32,
    /// Wrapping box width; clamped to the canvas width.
    pub box_width: u32,
    /// Wrapping box height; text is vertically centred inside it.
    pub box_height: u32,
    /// Glyph fill colour.
    pub fill: Rgb8,
    /// Outline colour.
    pub stroke: Rgb8,
    /// Outline width in pixels. `0` disables the outline.
    pub stroke_width: f64,
    /// Linear fade-in length at the start of the clip.
    pub fade_in_secs: f64,
    /// Linear fade-out length at the end of the clip.
    pub fade_out_secs: f64,
    /// Font files tried before the built-in per-OS probe list.
    pub font_paths: Vec<PathBuf>,
    /// Whether the built-in per-OS probe list is consulted at all.
    pub probe_system_fonts: bool,
}

impl Default for CaptionConfig {
    fn default() -> Self {
        Self {
            font_size_px: 65.0,
            box_width: 1100,
            box_height: 720,
            fill: Rgb8::WHITE,
            stroke: Rgb8::BLACK,
            stroke_width: 3.0,
            fade_in_secs: 1.0,
            fade_out_secs: 1.0,
            font_paths: Vec::new(),
            probe_system_fonts: true,
        }
    }
}

/// Continuous background zoom: `scale(t) = min(1 + rate_per_sec * t, max_scale)`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ZoomConfig {
    /// Linear growth per second.
    pub rate_per_sec: f64,
    /// Upper bound of the scale factor.
    pub max_scale: f64,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            rate_per_sec: 0.05,
            max_scale: 2.5,
        }
    }
}

impl ZoomConfig {
    /// Scale factor at `t_secs` from clip start.
    pub fn scale_at(&self, t_secs: f64) -> f64 {
        (1.0 + self.rate_per_sec * t_secs.max(0.0)).min(self.max_scale)
    }
}

/// PCM format used between decode, shaping and the encoder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AudioConfig {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Interleaved channel count.
    pub channels: u16,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48_000,
            channels: 2,
        }
    }
}

/// Fixed codec pair passed to `ffmpeg`.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CodecParams {
    /// Video encoder name.
    pub video_codec: String,
    /// Output pixel format.
    pub pix_fmt: String,
    /// Audio encoder name.
    pub audio_codec: String,
}

impl Default for CodecParams {
    fn default() -> Self {
        Self {
            video_codec: "libx264".to_string(),
            pix_fmt: "yuv420p".to_string(),
            audio_codec: "aac".to_string(),
        }
    }
}

impl PipelineConfig {
    /// Read a JSON config file. Missing fields keep their defaults.
    pub fn from_json_file(path: &Path) -> ReelResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Parse a JSON config document. Missing fields keep their defaults.
    pub fn from_json_str(text: &str) -> ReelResult<Self> {
        serde_json::from_str(text).map_err(|e| ReelError::serde(format!("config json: {e}")))
    }

    /// Apply `PROMPTREEL_*` overrides from the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply `PROMPTREEL_*` overrides from an arbitrary lookup.
    ///
    /// Empty values are ignored.
    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get(ENV_GENERATOR_URL) {
            self.acquisition.generator_url = v;
        }
        if let Some(v) = get(ENV_STOCK_URL) {
            self.acquisition.stock_url = v;
        }
        if let Some(v) = get(ENV_FONT) {
            self.caption.font_paths.insert(0, PathBuf::from(v));
        }
        if let Some(v) = get(ENV_OUTPUT) {
            self.output_path = Some(PathBuf::from(v));
        }
        self
    }

    /// Resolved output path.
    pub fn output_path(&self) -> PathBuf {
        self.output_path
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_OUTPUT_FILE))
    }

    /// Reject values the pipeline cannot honour.
    pub fn validate(&self) -> ReelResult<()> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(ReelError::validation("canvas width/height must be non-zero"));
        }
        if !self.canvas.width.is_multiple_of(2) || !self.canvas.height.is_multiple_of(2) {
            return Err(ReelError::validation(
                "canvas width/height must be even (required for yuv420p output)",
            ));
        }
        if self.canvas.width > u32::from(u16::MAX) || self.canvas.height > u32::from(u16::MAX) {
            return Err(ReelError::validation("canvas width/height must fit in u16"));
        }
        Fps::new(self.fps.num, self.fps.den)?;

        let acq = &self.acquisition;
        for (name, secs) in [
            ("generator_timeout_secs", acq.generator_timeout_secs),
            ("stock_timeout_secs", acq.stock_timeout_secs),
        ] {
            if !secs.is_finite() || secs <= 0.0 || secs > MAX_FETCH_TIMEOUT_SECS {
                return Err(ReelError::validation(format!(
                    "acquisition.{name} must be within (0, {MAX_FETCH_TIMEOUT_SECS}]"
                )));
            }
        }

        let cap = &self.caption;
        if !cap.font_size_px.is_finite() || cap.font_size_px <= 0.0 {
            return Err(ReelError::validation(
                "caption.font_size_px must be finite and > 0",
            ));
        }
        if cap.box_width == 0 || cap.box_height == 0 {
            return Err(ReelError::validation("caption box must be non-empty"));
        }
        if !cap.stroke_width.is_finite() || cap.stroke_width < 0.0 {
            return Err(ReelError::validation(
                "caption.stroke_width must be finite and >= 0",
            ));
        }
        if cap.fade_in_secs < 0.0 || cap.fade_out_secs < 0.0 {
            return Err(ReelError::validation("caption fades must be >= 0"));
        }

        if !self.zoom.rate_per_sec.is_finite() || !self.zoom.max_scale.is_finite() {
            return Err(ReelError::validation("zoom parameters must be finite"));
        }
        if self.zoom.rate_per_sec < 0.0 {
            return Err(ReelError::validation("zoom.rate_per_sec must be >= 0"));
        }
        if self.zoom.max_scale < 1.0 {
            return Err(ReelError::validation("zoom.max_scale must be >= 1"));
        }

        if self.audio.sample_rate == 0 || self.audio.channels == 0 {
            return Err(ReelError::validation(
                "audio sample_rate/channels must be non-zero",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/config/config.rs"]
mod tests;
