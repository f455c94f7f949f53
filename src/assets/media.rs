use std::path::Path;

use crate::foundation::error::{ReelError, ReelResult};

/// Decoded interleaved floating-point PCM.
#[derive(Clone, Debug, PartialEq)]
pub struct AudioPcm {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Channel count.
    pub channels: u16,
    /// Interleaved `f32` PCM samples.
    pub interleaved_f32: Vec<f32>,
}

impl AudioPcm {
    /// Number of sample frames (one sample per channel).
    pub fn frames(&self) -> u64 {
        if self.channels == 0 {
            return 0;
        }
        (self.interleaved_f32.len() / usize::from(self.channels)) as u64
    }

    /// Duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames() as f64 / f64::from(self.sample_rate)
    }
}

/// Decode any audio container `ffmpeg` understands to interleaved `f32` PCM.
///
/// The output is resampled to `sample_rate` and up/down-mixed to `channels`.
pub fn decode_audio_f32(path: &Path, sample_rate: u32, channels: u16) -> ReelResult<AudioPcm> {
    if sample_rate == 0 || channels == 0 {
        return Err(ReelError::validation(
            "audio decode sample_rate/channels must be non-zero",
        ));
    }

    let out = std::process::Command::new("ffmpeg")
        .args(["-v", "error", "-i"])
        .arg(path)
        .args([
            "-vn",
            "-f",
            "f32le",
            "-acodec",
            "pcm_f32le",
            "-ac",
            &channels.to_string(),
            "-ar",
            &sample_rate.to_string(),
            "pipe:1",
        ])
        .output()
        .map_err(|e| ReelError::audio(format!("failed to run ffmpeg for audio decode: {e}")))?;

    if !out.status.success() {
        let msg = String::from_utf8_lossy(&out.stderr);
        return Err(ReelError::audio(format!(
            "ffmpeg audio decode failed for '{}': {}",
            path.display(),
            msg.trim()
        )));
    }

    let interleaved_f32 = f32le_bytes_to_samples(&out.stdout)?;
    let pcm = AudioPcm {
        sample_rate,
        channels,
        interleaved_f32,
    };
    if pcm.frames() == 0 {
        return Err(ReelError::audio(format!(
            "'{}' contains no decodable audio",
            path.display()
        )));
    }
    Ok(pcm)
}

pub(crate) fn f32le_bytes_to_samples(bytes: &[u8]) -> ReelResult<Vec<f32>> {
    if !bytes.len().is_multiple_of(4) {
        return Err(ReelError::audio(
            "decoded audio byte length is not aligned to f32 samples",
        ));
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

pub(crate) fn samples_to_f32le_bytes(samples_interleaved: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::<u8>::with_capacity(samples_interleaved.len() * 4);
    for &sample in samples_interleaved {
        bytes.extend_from_slice(&sample.to_le_bytes());
    }
    bytes
}

/// Write interleaved `f32` PCM samples to a raw little-endian `.f32le` file.
pub fn write_f32le_file(samples_interleaved: &[f32], out_path: &Path) -> ReelResult<()> {
    std::fs::write(out_path, samples_to_f32le_bytes(samples_interleaved)).map_err(|e| {
        ReelError::audio(format!(
            "failed to write raw audio file '{}': {e}",
            out_path.display()
        ))
    })
}

#[cfg(test)]
#[path = "../../tests/unit/assets/media.rs"]
mod tests;
