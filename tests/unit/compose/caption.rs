use super::*;

#[test]
fn fade_envelope_ramps_in_and_out() {
    assert_eq!(fade_opacity(0.0, 10.0, 1.0, 1.0), 0.0);
    assert!((fade_opacity(0.5, 10.0, 1.0, 1.0) - 0.5).abs() < 1e-6);
    assert_eq!(fade_opacity(5.0, 10.0, 1.0, 1.0), 1.0);
    assert!((fade_opacity(9.75, 10.0, 1.0, 1.0) - 0.25).abs() < 1e-6);
    assert_eq!(fade_opacity(10.0, 10.0, 1.0, 1.0), 0.0);
}

#[test]
fn zero_length_fades_are_fully_opaque() {
    assert_eq!(fade_opacity(0.0, 10.0, 0.0, 0.0), 1.0);
    assert_eq!(fade_opacity(10.0, 10.0, 0.0, 0.0), 1.0);
}

#[test]
fn build_without_any_font_is_a_caption_error() {
    let cfg = CaptionConfig {
        font_paths: vec!["/nonexistent/font.ttf".into()],
        probe_system_fonts: false,
        ..CaptionConfig::default()
    };
    let err = CaptionLayer::build("Ocean waves", Canvas::default(), &cfg).unwrap_err();
    assert!(matches!(err, ReelError::Caption(_)));
}

#[test]
fn build_rejects_blank_text() {
    let err = CaptionLayer::build("   ", Canvas::default(), &CaptionConfig::default()).unwrap_err();
    assert!(matches!(err, ReelError::Caption(_)));
}

#[test]
fn build_centres_layout_when_a_system_font_exists() {
    let canvas = Canvas::default();
    let Ok(layer) = CaptionLayer::build("A futuristic city", canvas, &CaptionConfig::default())
    else {
        return;
    };
    assert_eq!(layer.origin.x, 90.0);
    let text_h = f64::from(layer.layout.height());
    let centre_y = layer.origin.y + text_h / 2.0;
    assert!((centre_y - 360.0).abs() < 1.0);
    assert_eq!(layer.stroke, Rgb8::BLACK);
}
