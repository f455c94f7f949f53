use crate::assets::media::{AudioPcm, decode_audio_f32};
use crate::audio::mix::{loop_and_trim, loop_count, scale_volume};
use crate::config::AudioConfig;
use crate::foundation::error::{ReelError, ReelResult};
use crate::scope::ResourceScope;

/// Suffix of the temp file holding the uploaded audio bytes.
pub const AUDIO_SUFFIX: &str = ".mp3";

/// Music track shaped to the clip: exactly `target_frames` sample frames long.
#[derive(Clone, Debug, PartialEq)]
pub struct AudioTrack {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Interleaved channel count.
    pub channels: u16,
    /// Interleaved `f32` PCM, `target_frames * channels` samples.
    pub interleaved_f32: Vec<f32>,
    /// Length of the decoded source in sample frames.
    pub source_frames: u64,
    /// Copies of the source that were concatenated before trimming.
    pub loop_count: u64,
    /// Linear gain applied.
    pub volume: f32,
}

impl AudioTrack {
    /// Length in sample frames.
    pub fn frames(&self) -> u64 {
        if self.channels == 0 {
            return 0;
        }
        (self.interleaved_f32.len() / usize::from(self.channels)) as u64
    }

    /// Length in seconds.
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames() as f64 / f64::from(self.sample_rate)
    }
}

/// Loop, trim and scale decoded PCM to exactly `target_frames` sample frames.
pub fn shape_track(pcm: AudioPcm, target_frames: u64, volume: f32) -> ReelResult<AudioTrack> {
    if !volume.is_finite() || !(0.0..=1.0).contains(&volume) {
        return Err(ReelError::validation("volume must be finite and within [0, 1]"));
    }
    if target_frames == 0 {
        return Err(ReelError::audio("target audio length is zero"));
    }
    let source_frames = pcm.frames();
    if source_frames == 0 {
        return Err(ReelError::audio("audio track is empty"));
    }

    let loops = loop_count(target_frames, source_frames);
    let mut samples = loop_and_trim(&pcm.interleaved_f32, pcm.channels, target_frames)?;
    scale_volume(&mut samples, volume);

    Ok(AudioTrack {
        sample_rate: pcm.sample_rate,
        channels: pcm.channels,
        interleaved_f32: samples,
        source_frames,
        loop_count: loops,
        volume,
    })
}

/// Materialize `raw` into `scope`, decode it with `ffmpeg` and shape it to `target_frames`.
#[tracing::instrument(skip(raw, cfg, scope), fields(raw_len = raw.len()))]
pub fn prepare_audio(
    raw: &[u8],
    target_frames: u64,
    volume: f32,
    cfg: &AudioConfig,
    scope: &mut ResourceScope,
) -> ReelResult<AudioTrack> {
    if raw.is_empty() {
        return Err(ReelError::audio("audio upload is empty"));
    }
    let path = scope
        .materialize(raw, AUDIO_SUFFIX)
        .map_err(|e| ReelError::audio(format!("stage audio upload: {e}")))?;
    let pcm = decode_audio_f32(&path, cfg.sample_rate, cfg.channels)?;
    let track = shape_track(pcm, target_frames, volume)?;
    tracing::info!(
        source_secs = track.source_frames as f64 / f64::from(track.sample_rate.max(1)),
        loops = track.loop_count,
        volume = track.volume,
        "audio prepared"
    );
    Ok(track)
}

#[cfg(test)]
#[path = "../../tests/unit/audio/prepare.rs"]
mod tests;
