use crate::foundation::core::Fps;
use crate::foundation::error::{ReelError, ReelResult};

/// Convert a video frame count to audio sample frames, rounding to nearest.
pub fn frame_to_sample(frame_delta: u64, fps: Fps, sample_rate: u32) -> u64 {
    let num = u128::from(frame_delta) * u128::from(sample_rate) * u128::from(fps.den);
    let den = u128::from(fps.num.max(1));
    ((num + (den / 2)) / den) as u64
}

/// Copies of a `source_frames` long track needed to cover `target_frames`.
///
/// `ceil(target / source)` when the source is shorter, `1` otherwise, `0` for an empty source.
pub fn loop_count(target_frames: u64, source_frames: u64) -> u64 {
    if source_frames == 0 {
        return 0;
    }
    target_frames.div_ceil(source_frames).max(1)
}

/// Repeat interleaved `samples` back to back until `target_frames` are covered, then cut to
/// exactly `target_frames`.
pub(crate) fn loop_and_trim(
    samples: &[f32],
    channels: u16,
    target_frames: u64,
) -> ReelResult<Vec<f32>> {
    let ch = usize::from(channels);
    if ch == 0 || !samples.len().is_multiple_of(ch) {
        return Err(ReelError::audio(
            "interleaved sample count is not a multiple of the channel count",
        ));
    }
    if samples.is_empty() {
        return Err(ReelError::audio("audio track is empty"));
    }

    let target_len = usize::try_from(target_frames)
        .ok()
        .and_then(|f| f.checked_mul(ch))
        .ok_or_else(|| ReelError::audio("target audio length overflows"))?;

    let mut out = Vec::with_capacity(target_len);
    while out.len() < target_len {
        let take = (target_len - out.len()).min(samples.len());
        out.extend_from_slice(&samples[..take]);
    }
    Ok(out)
}

/// Multiply every sample by `volume`. A factor of exactly `1.0` leaves samples untouched.
pub fn scale_volume(samples: &mut [f32], volume: f32) {
    if volume == 1.0 {
        return;
    }
    for s in samples {
        *s *= volume;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/audio/mix.rs"]
mod tests;
