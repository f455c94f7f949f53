use super::*;

#[test]
fn probe_list_is_never_empty() {
    let candidates = system_font_candidates();
    assert!(!candidates.is_empty());
    assert!(candidates.iter().all(|p| p.is_absolute()));
}

#[test]
fn resolve_skips_missing_and_garbage_candidates() {
    let dir = tempfile::tempdir().unwrap();
    let garbage = dir.path().join("garbage.ttf");
    std::fs::write(&garbage, b"definitely not a font").unwrap();
    let empty = dir.path().join("empty.ttf");
    std::fs::write(&empty, b"").unwrap();

    let mut engine = TextLayoutEngine::new();
    let err = engine
        .resolve_font(&[dir.path().join("missing.ttf"), garbage, empty])
        .unwrap_err();
    assert!(matches!(err, ReelError::Caption(_)));
    assert!(err.to_string().contains("3 candidate"));
}

#[test]
fn resolve_with_no_candidates_is_a_caption_error() {
    let mut engine = TextLayoutEngine::new();
    assert!(matches!(
        engine.resolve_font(&[]),
        Err(ReelError::Caption(_))
    ));
}

#[test]
fn layout_wraps_long_text_when_a_system_font_exists() {
    let mut engine = TextLayoutEngine::new();
    let Ok(font) = engine.resolve_font(&system_font_candidates()) else {
        // Minimal hosts may ship no fonts at all.
        return;
    };
    let text = "A futuristic city with flying cars above a neon river at dusk";
    let layout = engine
        .layout_centered(text, &font.family, 65.0, TextBrushRgba8::default(), 400.0)
        .unwrap();
    assert!(layout.lines().count() > 1);
}

#[test]
fn layout_rejects_bad_sizes() {
    let mut engine = TextLayoutEngine::new();
    assert!(
        engine
            .layout_centered("x", "Any", 0.0, TextBrushRgba8::default(), 100.0)
            .is_err()
    );
    assert!(
        engine
            .layout_centered("x", "Any", 10.0, TextBrushRgba8::default(), f32::NAN)
            .is_err()
    );
}
