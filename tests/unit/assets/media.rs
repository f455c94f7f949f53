use super::*;

#[test]
fn pcm_duration_counts_frames_not_samples() {
    let pcm = AudioPcm {
        sample_rate: 4,
        channels: 2,
        interleaved_f32: vec![0.0; 16],
    };
    assert_eq!(pcm.frames(), 8);
    assert!((pcm.duration_secs() - 2.0).abs() < 1e-12);
}

#[test]
fn f32le_round_trips_through_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mix.f32le");
    let samples = vec![0.25f32, -0.5, 1.0, 0.0];
    write_f32le_file(&samples, &path).unwrap();
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(bytes.len(), 16);
    assert_eq!(f32le_bytes_to_samples(&bytes).unwrap(), samples);
}

#[test]
fn misaligned_pcm_is_an_audio_error() {
    let err = f32le_bytes_to_samples(&[0, 0, 0]).unwrap_err();
    assert!(matches!(err, ReelError::Audio(_)));
}

#[test]
fn decode_rejects_zero_format() {
    assert!(decode_audio_f32(Path::new("missing.mp3"), 0, 2).is_err());
}
