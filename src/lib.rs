//! promptreel turns a text prompt into a short MP4 clip.
//!
//! The pipeline is strictly linear:
//!
//! - acquire a background still (text-to-image endpoint, stock photo, then a solid colour)
//! - compose it with a slow centre zoom and an outlined caption that fades in and out
//! - optionally loop, trim and scale a music track to the exact clip length
//! - rasterize on the CPU, encode with the system `ffmpeg`, then delete every temp file
//!
//! [`VideoGenerator`] drives the whole thing; each stage is also callable on its own.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Background acquisition strategies.
pub mod acquire;
/// Decoded inputs.
pub mod assets;
/// Music shaping.
pub mod audio;
/// Clip composition.
pub mod compose;
/// Pipeline configuration.
pub mod config;
/// Encoding sinks.
pub mod encode;
/// End-to-end generation.
pub mod pipeline;
/// Frame rasterization.
pub mod render;
/// Temp file ownership.
pub mod scope;

pub use crate::foundation::core::{Affine, Canvas, Fps, FrameIndex, FrameRange, Rgb8, Vec2};
pub use crate::foundation::error::{ReelError, ReelResult};

pub use crate::acquire::chain::{BackgroundChain, BackgroundStrategy, ImageEndpoint, RemoteImageStrategy};
pub use crate::acquire::fetch::{HttpFetcher, ImageFetcher};
pub use crate::acquire::{BackgroundSource, ImageOrigin};
pub use crate::audio::{AudioTrack, prepare_audio};
pub use crate::compose::{BackgroundLayer, CaptionLayer, VisualClip, compose};
pub use crate::config::PipelineConfig;
pub use crate::encode::{AudioInputConfig, FfmpegSink, FrameSink, InMemorySink, SinkConfig};
pub use crate::pipeline::{GenerationReport, RenderJob, VideoGenerator, VideoRequest, render, render_into};
pub use crate::render::{CpuBackend, FrameRGBA, RenderBackend};
pub use crate::scope::{CleanupReport, ResourceScope};
