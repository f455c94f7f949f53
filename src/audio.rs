//! Background music: decode, loop to cover the clip, trim to it exactly, scale volume.

/// Sample-grid arithmetic, looping and gain.
pub mod mix;
/// Upload staging, decode and shaping.
pub mod prepare;

pub use mix::{frame_to_sample, loop_count};
pub use prepare::{AUDIO_SUFFIX, AudioTrack, prepare_audio, shape_track};
