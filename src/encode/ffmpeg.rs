use std::ffi::OsString;
use std::io::{Read as _, Write as _};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::thread::JoinHandle;

use anyhow::Context as _;

use crate::config::CodecParams;
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Canvas, FrameIndex};
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::FrameRGBA;

/// MP4 writer backed by the system `ffmpeg`.
///
/// Frames go to the child's stdin as raw RGBA. The music track, when present, is read by
/// `ffmpeg` from the `f32le` file named in [`SinkConfig::audio`]. An existing output file is
/// replaced. A sink dropped before a successful [`FrameSink::end`] kills and reaps its child.
pub struct FfmpegSink {
    out_path: PathBuf,
    codec: CodecParams,
    run: Option<Encoder>,
}

struct Encoder {
    child: Child,
    stdin: Option<ChildStdin>,
    stderr: Option<JoinHandle<std::io::Result<Vec<u8>>>>,
    canvas: Canvas,
    next: u64,
}

impl FfmpegSink {
    /// Sink writing `out_path` with `codec`.
    pub fn new(out_path: impl Into<PathBuf>, codec: CodecParams) -> Self {
        Self {
            out_path: out_path.into(),
            codec,
            run: None,
        }
    }

    /// Output path this sink writes to.
    pub fn out_path(&self) -> &Path {
        &self.out_path
    }

    fn kill_child(&mut self) {
        let Some(mut enc) = self.run.take() else {
            return;
        };
        drop(enc.stdin.take());
        if let Err(e) = enc.child.kill() {
            tracing::debug!(error = %e, "ffmpeg already exited");
        }
        if let Err(e) = enc.child.wait() {
            tracing::warn!(error = %e, "failed to reap ffmpeg");
        }
        if let Some(drain) = enc.stderr.take() {
            let _ = drain.join();
        }
    }
}

/// Command line for one encode, without the program name.
pub(crate) fn encoder_args(cfg: &SinkConfig, codec: &CodecParams, out: &Path) -> Vec<OsString> {
    let size = format!("{}x{}", cfg.width, cfg.height);
    let rate = format!("{}/{}", cfg.fps.num, cfg.fps.den);
    let mut args = os_args(&["-y", "-loglevel", "error", "-f", "rawvideo", "-pix_fmt", "rgba"]);
    args.extend(os_args(&["-s", size.as_str(), "-r", rate.as_str(), "-i", "pipe:0"]));

    match &cfg.audio {
        Some(audio) => {
            let ar = audio.sample_rate.to_string();
            let ac = audio.channels.to_string();
            args.extend(os_args(&["-f", "f32le", "-ar", ar.as_str(), "-ac", ac.as_str(), "-i"]));
            args.push(audio.path.clone().into_os_string());
        }
        None => args.push("-an".into()),
    }

    args.extend(os_args(&[
        "-c:v",
        codec.video_codec.as_str(),
        "-pix_fmt",
        codec.pix_fmt.as_str(),
    ]));
    if cfg.audio.is_some() {
        args.extend(os_args(&["-c:a", codec.audio_codec.as_str(), "-shortest"]));
    }
    args.extend(os_args(&["-movflags", "+faststart"]));
    args.push(out.as_os_str().to_owned());
    args
}

fn os_args(parts: &[&str]) -> Vec<OsString> {
    parts.iter().map(OsString::from).collect()
}

fn check_sink_config(cfg: &SinkConfig) -> ReelResult<()> {
    if cfg.fps.num == 0 || cfg.fps.den == 0 {
        return Err(ReelError::validation("fps must be non-zero"));
    }
    if cfg.width == 0 || cfg.height == 0 {
        return Err(ReelError::validation("frame size must be non-zero"));
    }
    if !cfg.width.is_multiple_of(2) || !cfg.height.is_multiple_of(2) {
        return Err(ReelError::validation(format!(
            "frame size {}x{} must be even for yuv420p",
            cfg.width, cfg.height
        )));
    }
    if let Some(audio) = &cfg.audio
        && (audio.sample_rate == 0 || audio.channels == 0)
    {
        return Err(ReelError::validation(
            "audio input needs a non-zero sample rate and channel count",
        ));
    }
    Ok(())
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> ReelResult<()> {
        check_sink_config(&cfg)?;
        if self.run.is_some() {
            return Err(ReelError::render("ffmpeg sink already started"));
        }
        ensure_parent_dir(&self.out_path)?;
        if !is_ffmpeg_on_path() {
            return Err(ReelError::render("ffmpeg not found on PATH"));
        }

        let mut child = Command::new("ffmpeg")
            .args(encoder_args(&cfg, &self.codec, &self.out_path))
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ReelError::render(format!("spawn ffmpeg: {e}")))?;

        let (Some(stdin), Some(mut stderr)) = (child.stdin.take(), child.stderr.take()) else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(ReelError::render("ffmpeg pipes unavailable"));
        };
        let drain = std::thread::spawn(move || {
            let mut buf = Vec::new();
            stderr.read_to_end(&mut buf)?;
            Ok(buf)
        });

        tracing::debug!(out = %self.out_path.display(), audio = cfg.audio.is_some(), "ffmpeg started");
        self.run = Some(Encoder {
            child,
            stdin: Some(stdin),
            stderr: Some(drain),
            canvas: Canvas {
                width: cfg.width,
                height: cfg.height,
            },
            next: 0,
        });
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> ReelResult<()> {
        let enc = self
            .run
            .as_mut()
            .ok_or_else(|| ReelError::render("ffmpeg sink not started"))?;
        if idx.0 < enc.next {
            return Err(ReelError::render(format!(
                "frame {} pushed after frame {}",
                idx.0,
                enc.next - 1
            )));
        }
        if (frame.width, frame.height) != (enc.canvas.width, enc.canvas.height)
            || frame.data.len() != enc.canvas.rgba8_len()
        {
            return Err(ReelError::validation(format!(
                "frame is {}x{} ({} bytes), encoder expects {}x{}",
                frame.width,
                frame.height,
                frame.data.len(),
                enc.canvas.width,
                enc.canvas.height
            )));
        }
        enc.next = idx.0 + 1;

        // Backgrounds are opaque, so premultiplied and straight RGBA coincide here.
        let stdin = enc
            .stdin
            .as_mut()
            .ok_or_else(|| ReelError::render("ffmpeg stdin already closed"))?;
        stdin
            .write_all(&frame.data)
            .map_err(|e| ReelError::render(format!("write frame {} to ffmpeg: {e}", idx.0)))
    }

    fn end(&mut self) -> ReelResult<()> {
        let mut enc = self
            .run
            .take()
            .ok_or_else(|| ReelError::render("ffmpeg sink not started"))?;
        drop(enc.stdin.take());

        let status = enc
            .child
            .wait()
            .map_err(|e| ReelError::render(format!("wait for ffmpeg: {e}")))?;
        let log = match enc.stderr.take() {
            Some(drain) => drain
                .join()
                .map_err(|_| ReelError::render("ffmpeg stderr reader panicked"))?
                .map_err(|e| ReelError::render(format!("read ffmpeg stderr: {e}")))?,
            None => Vec::new(),
        };

        if !status.success() {
            return Err(ReelError::render(format!(
                "ffmpeg exited with {status}: {}",
                String::from_utf8_lossy(&log).trim()
            )));
        }
        Ok(())
    }

    fn abort(&mut self) {
        if self.run.is_some() {
            tracing::warn!(out = %self.out_path.display(), "aborting ffmpeg encode");
        }
        self.kill_child();
    }
}

impl Drop for FfmpegSink {
    fn drop(&mut self) {
        self.kill_child();
    }
}

/// Create the parent directory of `path` when it has one.
pub fn ensure_parent_dir(path: &Path) -> ReelResult<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Return `true` when `ffmpeg -version` runs successfully.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|s| s.success())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
