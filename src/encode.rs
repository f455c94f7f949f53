//! Encoding sinks.
//!
//! Sinks consume rendered frames in clip order.

/// `ffmpeg`-based sink (MP4 output via system `ffmpeg`).
pub mod ffmpeg;
/// Generic frame sink trait and built-in sinks.
pub mod sink;

pub use ffmpeg::{FfmpegSink, ensure_parent_dir, is_ffmpeg_on_path};
pub use sink::{AudioInputConfig, FrameSink, InMemorySink, SinkConfig};
