use super::*;

#[test]
fn frame_to_sample_on_whole_seconds() {
    let fps = Fps::new(24, 1).unwrap();
    assert_eq!(frame_to_sample(240, fps, 48_000), 480_000);
    assert_eq!(frame_to_sample(1, fps, 48_000), 2_000);
    assert_eq!(frame_to_sample(0, fps, 48_000), 0);
}

#[test]
fn loop_count_rounds_up() {
    assert_eq!(loop_count(20, 7), 3);
    assert_eq!(loop_count(21, 7), 3);
    assert_eq!(loop_count(22, 7), 4);
    assert_eq!(loop_count(5, 7), 1);
    assert_eq!(loop_count(7, 7), 1);
    assert_eq!(loop_count(7, 0), 0);
}

#[test]
fn shorter_source_is_repeated_without_gaps() {
    // Mono, 3 frames, looped to 8.
    let src = [0.1f32, 0.2, 0.3];
    let out = loop_and_trim(&src, 1, 8).unwrap();
    assert_eq!(out, vec![0.1, 0.2, 0.3, 0.1, 0.2, 0.3, 0.1, 0.2]);
}

#[test]
fn longer_source_is_cut_to_its_prefix() {
    let src = [1.0f32, -1.0, 2.0, -2.0, 3.0, -3.0];
    let out = loop_and_trim(&src, 2, 2).unwrap();
    assert_eq!(out, vec![1.0, -1.0, 2.0, -2.0]);
}

#[test]
fn misaligned_or_empty_input_is_an_audio_error() {
    assert!(matches!(
        loop_and_trim(&[0.0; 3], 2, 4).unwrap_err(),
        ReelError::Audio(_)
    ));
    assert!(matches!(
        loop_and_trim(&[], 2, 4).unwrap_err(),
        ReelError::Audio(_)
    ));
}

#[test]
fn unit_volume_is_bit_identical() {
    let src = vec![0.123_456_7f32, -0.987_654_3, f32::MIN_POSITIVE];
    let mut out = src.clone();
    scale_volume(&mut out, 1.0);
    assert_eq!(
        out.iter().map(|s| s.to_bits()).collect::<Vec<_>>(),
        src.iter().map(|s| s.to_bits()).collect::<Vec<_>>()
    );
}

#[test]
fn volume_scales_linearly() {
    let mut out = vec![1.0f32, -0.5, 0.0];
    scale_volume(&mut out, 0.3);
    assert_eq!(out, vec![0.3, -0.15, 0.0]);
}
