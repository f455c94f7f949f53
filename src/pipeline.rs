//! End-to-end generation: acquisition, composition, audio preparation, render, cleanup.

use std::path::PathBuf;
use std::sync::Arc;

use crate::acquire::chain::BackgroundChain;
use crate::acquire::fetch::HttpFetcher;
use crate::assets::media::samples_to_f32le_bytes;
use crate::audio::{AudioTrack, frame_to_sample, prepare_audio};
use crate::compose::{VisualClip, compose};
use crate::config::{CodecParams, PipelineConfig};
use crate::encode::{AudioInputConfig, FfmpegSink, FrameSink, SinkConfig};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::{BackendKind, FrameRGBA, RenderBackend, create_backend};
use crate::scope::{CleanupReport, ResourceScope};

/// Suffix of the raw PCM file handed to the encoder.
pub const PCM_SUFFIX: &str = ".f32le";

/// Default music volume.
pub const DEFAULT_VOLUME: f32 = 0.5;

/// One generation request.
#[derive(Clone, Debug, PartialEq)]
pub struct VideoRequest {
    /// Prompt driving both the background and the caption.
    pub prompt: String,
    /// Encoded music bytes (any container `ffmpeg` reads).
    pub audio: Option<Vec<u8>>,
    /// Clip length in seconds.
    pub duration_secs: f64,
    /// Linear music gain in `[0, 1]`.
    pub volume: f32,
}

impl VideoRequest {
    /// Request without music.
    pub fn new(prompt: impl Into<String>, duration_secs: f64) -> Self {
        Self {
            prompt: prompt.into(),
            audio: None,
            duration_secs,
            volume: DEFAULT_VOLUME,
        }
    }

    /// Attach music at `volume`.
    pub fn with_audio(mut self, bytes: Vec<u8>, volume: f32) -> Self {
        self.audio = Some(bytes);
        self.volume = volume;
        self
    }

    /// Reject requests the pipeline cannot honour.
    pub fn validate(&self) -> ReelResult<()> {
        if self.prompt.trim().is_empty() {
            return Err(ReelError::validation("prompt must not be empty"));
        }
        if !self.duration_secs.is_finite() || self.duration_secs <= 0.0 {
            return Err(ReelError::validation("duration must be finite and > 0"));
        }
        if !self.volume.is_finite() || !(0.0..=1.0).contains(&self.volume) {
            return Err(ReelError::validation("volume must be finite and within [0, 1]"));
        }
        Ok(())
    }
}

/// Everything the encoder needs. Consumed by exactly one render.
#[derive(Debug)]
pub struct RenderJob {
    /// Frames to encode.
    pub clip: VisualClip,
    /// Music, already shaped to the clip length.
    pub audio: Option<AudioTrack>,
    /// MP4 destination.
    pub output_path: PathBuf,
    /// Codec selection.
    pub codec: CodecParams,
}

/// Render every frame of `job` into `sink`, muxing its audio when present.
///
/// The raw PCM input is staged in `scope`. On failure the sink is aborted before returning,
/// so no encoder handle outlives the call.
pub fn render_into(
    job: &RenderJob,
    backend: &mut dyn RenderBackend,
    sink: &mut dyn FrameSink,
    scope: &mut ResourceScope,
) -> ReelResult<u64> {
    let result = stream_frames(job, backend, sink, scope);
    if result.is_err() {
        sink.abort();
    }
    result
}

fn stream_frames(
    job: &RenderJob,
    backend: &mut dyn RenderBackend,
    sink: &mut dyn FrameSink,
    scope: &mut ResourceScope,
) -> ReelResult<u64> {
    let clip = &job.clip;
    let audio = match &job.audio {
        Some(track) => {
            let path = scope
                .materialize(&samples_to_f32le_bytes(&track.interleaved_f32), PCM_SUFFIX)
                .map_err(|e| ReelError::render(format!("stage audio for encoder: {e}")))?;
            Some(AudioInputConfig {
                path,
                sample_rate: track.sample_rate,
                channels: track.channels,
            })
        }
        None => None,
    };

    sink.begin(SinkConfig {
        width: clip.canvas.width,
        height: clip.canvas.height,
        fps: clip.fps,
        audio,
    })?;

    let mut frames = 0u64;
    for idx in clip.frame_range().iter() {
        let frame = backend.render_frame(clip, idx)?;
        sink.push_frame(idx, &frame)?;
        frames += 1;
    }
    sink.end()?;
    Ok(frames)
}

/// Encode `job` to its output path with the system `ffmpeg`.
#[tracing::instrument(skip(job, scope), fields(out = %job.output_path.display()))]
pub fn render(job: &RenderJob, scope: &mut ResourceScope) -> ReelResult<PathBuf> {
    let mut backend = create_backend(BackendKind::Cpu)?;
    let mut sink = FfmpegSink::new(&job.output_path, job.codec.clone());
    let frames = render_into(job, backend.as_mut(), &mut sink, scope)?;
    drop(sink);
    tracing::info!(frames, "video written");
    Ok(job.output_path.clone())
}

/// Summary of one generation.
#[derive(Clone, Debug, PartialEq)]
pub struct GenerationReport {
    /// Written MP4, `None` when frames went to a caller-provided sink.
    pub output_path: Option<PathBuf>,
    /// Which background strategy won (`generator`, `stock` or `solid_color`).
    pub background: String,
    /// Whether the caption layer was rendered.
    pub captioned: bool,
    /// Length of the attached music in seconds, `None` without music.
    pub audio_secs: Option<f64>,
    /// Source copies concatenated for the music.
    pub audio_loops: Option<u64>,
    /// Frames encoded.
    pub frames: u64,
    /// Non-fatal problems (skipped music).
    pub warnings: Vec<String>,
    /// Temp file cleanup outcome.
    pub cleanup: CleanupReport,
}

/// Prompt-to-video generator.
pub struct VideoGenerator {
    cfg: PipelineConfig,
    chain: BackgroundChain,
    backend: BackendKind,
    temp_dir: Option<PathBuf>,
}

impl VideoGenerator {
    /// Generator fetching backgrounds over HTTP.
    pub fn new(cfg: PipelineConfig) -> ReelResult<Self> {
        cfg.validate()?;
        let fetcher = Arc::new(HttpFetcher::new(&cfg.acquisition.user_agent)?);
        let chain = BackgroundChain::from_config(&cfg, fetcher);
        Ok(Self::with_chain(cfg, chain))
    }

    /// Generator with a caller-built acquisition chain.
    pub fn with_chain(cfg: PipelineConfig, chain: BackgroundChain) -> Self {
        Self {
            cfg,
            chain,
            backend: BackendKind::default(),
            temp_dir: None,
        }
    }

    /// Stage temp files in `dir` instead of the system temp directory.
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    /// Effective configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.cfg
    }

    fn new_scope(&self) -> ResourceScope {
        match &self.temp_dir {
            Some(dir) => ResourceScope::in_dir(dir),
            None => ResourceScope::new(),
        }
    }

    /// Run the whole pipeline and write the MP4 to the configured output path.
    #[tracing::instrument(skip(self, req), fields(duration = req.duration_secs, audio = req.audio.is_some()))]
    pub fn generate(&self, req: &VideoRequest) -> ReelResult<GenerationReport> {
        req.validate()?;
        let output_path = self.cfg.output_path();
        self.run(req, |job, scope| render(job, scope).map(Some), output_path)
    }

    /// Run the whole pipeline, streaming frames into `sink` instead of `ffmpeg`.
    pub fn generate_into(
        &self,
        req: &VideoRequest,
        sink: &mut dyn FrameSink,
    ) -> ReelResult<GenerationReport> {
        req.validate()?;
        let backend = self.backend;
        self.run(
            req,
            |job, scope| {
                let mut backend = create_backend(backend)?;
                render_into(job, backend.as_mut(), sink, scope).map(|_| None)
            },
            self.cfg.output_path(),
        )
    }

    fn run(
        &self,
        req: &VideoRequest,
        stage: impl FnOnce(&RenderJob, &mut ResourceScope) -> ReelResult<Option<PathBuf>>,
        output_path: PathBuf,
    ) -> ReelResult<GenerationReport> {
        let mut scope = self.new_scope();
        let result = self.run_in_scope(req, stage, output_path, &mut scope);

        // Every handle opened above is closed by now; only paths remain.
        let cleanup = scope.release();
        if !cleanup.is_clean() {
            tracing::warn!(failures = cleanup.failures.len(), "temp file cleanup incomplete");
        }

        let mut report = result?;
        report.cleanup = cleanup;
        Ok(report)
    }

    fn run_in_scope(
        &self,
        req: &VideoRequest,
        stage: impl FnOnce(&RenderJob, &mut ResourceScope) -> ReelResult<Option<PathBuf>>,
        output_path: PathBuf,
        scope: &mut ResourceScope,
    ) -> ReelResult<GenerationReport> {
        let background = self.chain.acquire_background(&req.prompt, scope);
        let clip = compose(&background, &req.prompt, req.duration_secs, &self.cfg)?;

        let mut warnings = Vec::new();
        let audio = match &req.audio {
            Some(raw) => {
                let target = frame_to_sample(
                    clip.duration_frames,
                    clip.fps,
                    self.cfg.audio.sample_rate,
                );
                match prepare_audio(raw, target, req.volume, &self.cfg.audio, scope) {
                    Ok(track) => Some(track),
                    Err(e) => {
                        tracing::warn!(error = %e, "continuing without audio");
                        warnings.push(format!("audio skipped: {e}"));
                        None
                    }
                }
            }
            None => None,
        };

        let job = RenderJob {
            clip,
            audio,
            output_path,
            codec: self.cfg.codec.clone(),
        };
        let written = stage(&job, scope)?;

        Ok(GenerationReport {
            output_path: written,
            background: background.label().to_string(),
            captioned: job.clip.caption.is_some(),
            audio_secs: job.audio.as_ref().map(AudioTrack::duration_secs),
            audio_loops: job.audio.as_ref().map(|t| t.loop_count),
            frames: job.clip.duration_frames,
            warnings,
            cleanup: CleanupReport::default(),
        })
    }

    /// Acquire and compose for `req`, then render the single frame shown at `at_secs`.
    ///
    /// Times past the end of the clip render its last frame.
    pub fn preview_frame(&self, req: &VideoRequest, at_secs: f64) -> ReelResult<FrameRGBA> {
        req.validate()?;
        if !at_secs.is_finite() || at_secs < 0.0 {
            return Err(ReelError::validation("preview time must be finite and >= 0"));
        }

        let mut scope = self.new_scope();
        let result = (|| {
            let background = self.chain.acquire_background(&req.prompt, &mut scope);
            let clip = compose(&background, &req.prompt, req.duration_secs, &self.cfg)?;
            let last = clip.duration_frames.saturating_sub(1);
            let idx = FrameIndex(clip.fps.frame_at_secs(at_secs).0.min(last));
            let mut backend = create_backend(self.backend)?;
            backend.render_frame(&clip, idx)
        })();
        let cleanup = scope.release();
        if !cleanup.is_clean() {
            tracing::warn!(failures = cleanup.failures.len(), "temp file cleanup incomplete");
        }
        result
    }
}

#[cfg(test)]
#[path = "../tests/unit/pipeline/request.rs"]
mod tests;
