use super::*;

#[test]
fn defaults_reproduce_generator_constants() {
    let cfg = PipelineConfig::default();
    cfg.validate().unwrap();
    assert_eq!((cfg.canvas.width, cfg.canvas.height), (1280, 720));
    assert_eq!(cfg.fps, Fps { num: 24, den: 1 });
    assert_eq!(cfg.acquisition.generator_timeout_secs, 45.0);
    assert_eq!(cfg.acquisition.stock_timeout_secs, 10.0);
    assert_eq!(cfg.acquisition.fallback_rgb, Rgb8::new(20, 20, 60));
    assert_eq!(cfg.caption.font_size_px, 65.0);
    assert_eq!((cfg.caption.box_width, cfg.caption.box_height), (1100, 720));
    assert_eq!(cfg.codec.video_codec, "libx264");
    assert_eq!(cfg.codec.audio_codec, "aac");
    assert!(cfg.output_path().ends_with(DEFAULT_OUTPUT_FILE));
}

#[test]
fn partial_json_keeps_other_defaults() {
    let cfg = PipelineConfig::from_json_str(
        r#"{ "canvas": { "width": 64, "height": 36 }, "zoom": { "max_scale": 1.2 } }"#,
    )
    .unwrap();
    assert_eq!(cfg.canvas, Canvas { width: 64, height: 36 });
    assert_eq!(cfg.zoom.max_scale, 1.2);
    assert_eq!(cfg.zoom.rate_per_sec, 0.05);
    assert_eq!(cfg.caption, CaptionConfig::default());
}

#[test]
fn unknown_fields_are_rejected() {
    let err = PipelineConfig::from_json_str(r#"{ "colour": 3 }"#).unwrap_err();
    assert!(matches!(err, ReelError::Serde(_)));
}

#[test]
fn overrides_retarget_endpoints_font_and_output() {
    let cfg = PipelineConfig::default().with_overrides_from(|key| match key {
        ENV_GENERATOR_URL => Some("http://127.0.0.1:9/gen/".to_string()),
        ENV_STOCK_URL => Some("   ".to_string()),
        ENV_FONT => Some("/opt/fonts/Custom.ttf".to_string()),
        ENV_OUTPUT => Some("/tmp/out/custom.mp4".to_string()),
        _ => None,
    });
    assert_eq!(cfg.acquisition.generator_url, "http://127.0.0.1:9/gen/");
    assert_eq!(
        cfg.acquisition.stock_url,
        AcquisitionConfig::default().stock_url
    );
    assert_eq!(
        cfg.caption.font_paths.first().map(PathBuf::as_path),
        Some(Path::new("/opt/fonts/Custom.ttf"))
    );
    assert_eq!(cfg.output_path(), PathBuf::from("/tmp/out/custom.mp4"));
}

#[test]
fn validate_rejects_odd_canvas_and_bad_zoom() {
    let mut cfg = PipelineConfig::default();
    cfg.canvas.width = 1281;
    assert!(cfg.validate().is_err());

    let mut cfg = PipelineConfig::default();
    cfg.zoom.max_scale = 0.5;
    assert!(cfg.validate().is_err());

    let mut cfg = PipelineConfig::default();
    cfg.acquisition.stock_timeout_secs = 0.0;
    assert!(cfg.validate().is_err());
}

#[test]
fn validate_caps_fetch_timeouts() {
    let mut cfg = PipelineConfig::default();
    cfg.acquisition.generator_timeout_secs = 1e30;
    let err = cfg.validate().unwrap_err();
    assert!(matches!(err, ReelError::Validation(_)));
    assert!(err.to_string().contains("generator_timeout_secs"));

    let mut cfg = PipelineConfig::default();
    cfg.acquisition.stock_timeout_secs = MAX_FETCH_TIMEOUT_SECS;
    cfg.validate().unwrap();
    cfg.acquisition.stock_timeout_secs = MAX_FETCH_TIMEOUT_SECS + 1.0;
    assert!(cfg.validate().is_err());
}

#[test]
fn validate_rejects_shrinking_zoom() {
    let mut cfg = PipelineConfig::default();
    cfg.zoom.rate_per_sec = -1.0;
    let err = cfg.validate().unwrap_err();
    assert!(err.to_string().contains("rate_per_sec"));

    cfg.zoom.rate_per_sec = 0.0;
    cfg.validate().unwrap();
}

#[test]
fn zoom_grows_linearly_then_caps() {
    let zoom = ZoomConfig {
        rate_per_sec: 0.05,
        max_scale: 1.5,
    };
    assert_eq!(zoom.scale_at(0.0), 1.0);
    assert!((zoom.scale_at(4.0) - 1.2).abs() < 1e-12);
    assert_eq!(zoom.scale_at(30.0), 1.5);
}
