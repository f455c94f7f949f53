use super::*;
use crate::encode::sink::AudioInputConfig;
use crate::foundation::core::Fps;

fn sink_cfg(audio: Option<AudioInputConfig>) -> SinkConfig {
    SinkConfig {
        width: 1280,
        height: 720,
        fps: Fps::default(),
        audio,
    }
}

fn strings(args: &[OsString]) -> Vec<String> {
    args.iter().map(|a| a.to_string_lossy().into_owned()).collect()
}

fn value_after<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

#[test]
fn silent_encode_disables_audio() {
    let args = strings(&encoder_args(
        &sink_cfg(None),
        &CodecParams::default(),
        Path::new("/tmp/out/ai_video.mp4"),
    ));
    assert_eq!(args.first().map(String::as_str), Some("-y"));
    assert!(args.iter().any(|a| a == "-an"));
    assert!(!args.iter().any(|a| a == "-shortest" || a == "-c:a"));
    assert_eq!(value_after(&args, "-s"), Some("1280x720"));
    assert_eq!(value_after(&args, "-r"), Some("24/1"));
    assert_eq!(value_after(&args, "-c:v"), Some("libx264"));
    assert_eq!(args.last().map(String::as_str), Some("/tmp/out/ai_video.mp4"));
}

#[test]
fn music_is_a_second_input_trimmed_to_the_video() {
    let audio = AudioInputConfig {
        path: PathBuf::from("/tmp/promptreel-x.f32le"),
        sample_rate: 44_100,
        channels: 2,
    };
    let args = strings(&encoder_args(
        &sink_cfg(Some(audio)),
        &CodecParams::default(),
        Path::new("clip.mp4"),
    ));
    assert!(!args.iter().any(|a| a == "-an"));
    let inputs: Vec<_> = args
        .iter()
        .enumerate()
        .filter(|(_, a)| *a == "-i")
        .map(|(i, _)| args[i + 1].as_str())
        .collect();
    assert_eq!(inputs, vec!["pipe:0", "/tmp/promptreel-x.f32le"]);
    assert_eq!(value_after(&args, "-ar"), Some("44100"));
    assert_eq!(value_after(&args, "-ac"), Some("2"));
    assert_eq!(value_after(&args, "-c:a"), Some("aac"));
    assert!(args.iter().any(|a| a == "-shortest"));
}

#[test]
fn push_before_begin_is_a_render_error() {
    let mut sink = FfmpegSink::new("unused.mp4", CodecParams::default());
    let frame = FrameRGBA {
        width: 2,
        height: 2,
        data: vec![0; 16],
        premultiplied: true,
    };
    let err = sink.push_frame(FrameIndex(0), &frame).unwrap_err();
    assert!(matches!(err, ReelError::Render(_)));
    sink.abort();
}

#[test]
fn odd_dimensions_are_rejected_before_spawning() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("nested/clip.mp4");
    let mut sink = FfmpegSink::new(&out, CodecParams::default());
    let mut cfg = sink_cfg(None);
    cfg.width = 63;
    let err = sink.begin(cfg).unwrap_err();
    assert!(matches!(err, ReelError::Validation(_)));
    assert!(!out.parent().unwrap().exists());
}

#[test]
fn silent_audio_input_is_rejected() {
    let mut sink = FfmpegSink::new("unused.mp4", CodecParams::default());
    let err = sink
        .begin(sink_cfg(Some(AudioInputConfig {
            path: PathBuf::from("a.f32le"),
            sample_rate: 0,
            channels: 2,
        })))
        .unwrap_err();
    assert!(matches!(err, ReelError::Validation(_)));
}

#[test]
fn parent_dir_is_created_only_when_present() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("a/b/clip.mp4");
    ensure_parent_dir(&out).unwrap();
    assert!(dir.path().join("a/b").is_dir());
    ensure_parent_dir(Path::new("clip.mp4")).unwrap();
}
