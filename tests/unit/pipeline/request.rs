use super::*;
use crate::foundation::core::Rgb8;

#[test]
fn request_defaults() {
    let req = VideoRequest::new("Ocean waves", 10.0);
    assert_eq!(req.volume, DEFAULT_VOLUME);
    assert!(req.audio.is_none());
    req.validate().unwrap();
}

#[test]
fn blank_prompt_is_rejected() {
    for prompt in ["", "   ", "\n\t"] {
        let err = VideoRequest::new(prompt, 10.0).validate().unwrap_err();
        assert!(matches!(err, ReelError::Validation(_)));
    }
}

#[test]
fn volume_outside_unit_range_is_rejected() {
    for v in [-0.01f32, 1.01, f32::INFINITY, f32::NAN] {
        let req = VideoRequest::new("x", 5.0).with_audio(vec![1, 2, 3], v);
        assert!(req.validate().is_err(), "volume {v} accepted");
    }
    VideoRequest::new("x", 5.0)
        .with_audio(vec![1], 0.0)
        .validate()
        .unwrap();
    VideoRequest::new("x", 5.0)
        .with_audio(vec![1], 1.0)
        .validate()
        .unwrap();
}

#[test]
fn non_positive_duration_is_rejected() {
    assert!(VideoRequest::new("x", 0.0).validate().is_err());
    assert!(VideoRequest::new("x", f64::NAN).validate().is_err());
}

#[test]
fn preview_renders_terminal_fill_without_network() {
    let mut cfg = PipelineConfig::default();
    cfg.canvas = crate::foundation::core::Canvas {
        width: 32,
        height: 18,
    };
    cfg.caption.font_paths.clear();
    cfg.caption.probe_system_fonts = false;

    let dir = tempfile::tempdir().unwrap();
    let generator = VideoGenerator::with_chain(cfg, BackgroundChain::new(Rgb8::new(20, 20, 60)))
        .with_temp_dir(dir.path());
    let frame = generator
        .preview_frame(&VideoRequest::new("Night sky", 5.0), 99.0)
        .unwrap();
    assert_eq!((frame.width, frame.height), (32, 18));
    assert_eq!(frame.pixel(5, 5), Some([20, 20, 60, 255]));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}
