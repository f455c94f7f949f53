use super::*;

fn ramp(frames: usize, channels: u16, sample_rate: u32) -> AudioPcm {
    let ch = usize::from(channels);
    let interleaved_f32 = (0..frames * ch)
        .map(|i| ((i / ch) as f32 / frames as f32) * if i % ch == 0 { 1.0 } else { -1.0 })
        .collect();
    AudioPcm {
        sample_rate,
        channels,
        interleaved_f32,
    }
}

#[test]
fn seven_second_track_covers_twenty_seconds_in_three_loops() {
    // 100 Hz keeps the buffers small while preserving the ratios.
    let sr = 100;
    let pcm = ramp(7 * sr as usize, 2, sr);
    let source = pcm.interleaved_f32.clone();

    let track = shape_track(pcm, 20 * u64::from(sr), 0.3).unwrap();
    assert_eq!(track.loop_count, 3);
    assert_eq!(track.frames(), 2_000);
    assert!((track.duration_secs() - 20.0).abs() < 1e-12);

    let n = source.len();
    for (i, s) in track.interleaved_f32.iter().enumerate() {
        assert_eq!(*s, source[i % n] * 0.3, "sample {i}");
    }
}

#[test]
fn longer_track_is_prefix_without_looping() {
    let sr = 100;
    let pcm = ramp(12 * sr as usize, 2, sr);
    let source = pcm.interleaved_f32.clone();

    let track = shape_track(pcm, 5 * u64::from(sr), 1.0).unwrap();
    assert_eq!(track.loop_count, 1);
    assert_eq!(track.interleaved_f32, source[..5 * 100 * 2].to_vec());
}

#[test]
fn equal_length_track_is_unchanged() {
    let pcm = ramp(300, 1, 100);
    let source = pcm.interleaved_f32.clone();
    let track = shape_track(pcm, 300, 1.0).unwrap();
    assert_eq!(track.interleaved_f32, source);
}

#[test]
fn out_of_range_volume_is_rejected() {
    for v in [-0.1f32, 1.5, f32::NAN] {
        let err = shape_track(ramp(10, 1, 100), 10, v).unwrap_err();
        assert!(matches!(err, ReelError::Validation(_)));
    }
}

#[test]
fn empty_upload_is_an_audio_error_and_stages_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let mut scope = ResourceScope::in_dir(dir.path());
    let err = prepare_audio(&[], 480, 0.5, &AudioConfig::default(), &mut scope).unwrap_err();
    assert!(matches!(err, ReelError::Audio(_)));
    assert!(scope.is_empty());
}

#[test]
fn undecodable_upload_fails_but_stays_owned_by_scope() {
    let dir = tempfile::tempdir().unwrap();
    let mut scope = ResourceScope::in_dir(dir.path());
    let err = prepare_audio(
        b"definitely not audio",
        480,
        0.5,
        &AudioConfig::default(),
        &mut scope,
    )
    .unwrap_err();
    assert!(matches!(err, ReelError::Audio(_) | ReelError::Validation(_)));
    assert_eq!(scope.len(), 1);
    assert!(scope.release().is_clean());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}
