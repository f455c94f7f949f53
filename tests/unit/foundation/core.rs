use super::*;

#[test]
fn frame_range_is_half_open() {
    let r = FrameRange {
        start: FrameIndex(2),
        end: FrameIndex(5),
    };
    assert!(!r.contains(FrameIndex(1)));
    assert!(r.contains(FrameIndex(2)));
    assert!(r.contains(FrameIndex(4)));
    assert!(!r.contains(FrameIndex(5)));
    assert_eq!(r.iter().count() as u64, r.len_frames());
}

#[test]
fn reversed_range_is_empty() {
    let r = FrameRange {
        start: FrameIndex(5),
        end: FrameIndex(2),
    };
    assert_eq!(r.len_frames(), 0);
    assert_eq!(r.iter().count(), 0);
}

#[test]
fn fps_whole_seconds_are_exact() {
    let fps = Fps::default();
    for secs in 5..=30u32 {
        assert_eq!(fps.secs_to_frames_round(f64::from(secs)), u64::from(secs) * 24);
    }
    assert!((fps.frames_to_secs(240) - 10.0).abs() < 1e-12);
}

#[test]
fn frame_at_secs_floors_to_the_showing_frame() {
    let fps = Fps::default();
    assert_eq!(fps.frame_at_secs(0.0), FrameIndex(0));
    assert_eq!(fps.frame_at_secs(2.5), FrameIndex(60));
    assert_eq!(fps.frame_at_secs(1.0 / 24.0 - 1e-9), FrameIndex(0));
}

#[test]
fn fps_rejects_zero_parts() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(24, 0).is_err());
}

#[test]
fn canvas_default_is_720p() {
    let c = Canvas::default();
    assert_eq!((c.width, c.height), (1280, 720));
    assert_eq!(c.rgba8_len(), 1280 * 720 * 4);
    assert_eq!(c.center(), Vec2::new(640.0, 360.0));
}
