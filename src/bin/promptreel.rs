use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "promptreel", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate an MP4 from a prompt (requires `ffmpeg` on PATH).
    Render(RenderArgs),
    /// Render a single preview frame as a PNG.
    Frame(FrameArgs),
    /// Print the effective configuration as JSON.
    Config(ConfigArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Prompt used for the background and the caption.
    #[arg(long)]
    prompt: String,

    /// Clip length in seconds.
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(5..=30))]
    duration: u32,

    /// Music file looped or trimmed to the clip length.
    #[arg(long)]
    audio: Option<PathBuf>,

    /// Music volume in [0, 1].
    #[arg(long, default_value_t = promptreel::pipeline::DEFAULT_VOLUME)]
    volume: f32,

    /// Output MP4 path (defaults to `<temp dir>/ai_video.mp4`).
    #[arg(long)]
    out: Option<PathBuf>,

    /// JSON configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Prompt used for the background and the caption.
    #[arg(long)]
    prompt: String,

    /// Time of the frame in seconds.
    #[arg(long)]
    at: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Clip length in seconds, which positions the caption fade-out.
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(5..=30))]
    duration: u32,

    /// JSON configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct ConfigArgs {
    /// JSON configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Config(args) => cmd_config(args),
    }
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<promptreel::PipelineConfig> {
    let cfg = match path {
        Some(p) => promptreel::PipelineConfig::from_json_file(p)?,
        None => promptreel::PipelineConfig::default(),
    };
    let cfg = cfg.with_env_overrides();
    cfg.validate()?;
    Ok(cfg)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut cfg = load_config(args.config.as_ref())?;
    if let Some(out) = args.out {
        cfg.output_path = Some(out);
    }

    let mut req = promptreel::VideoRequest::new(args.prompt, f64::from(args.duration));
    req.volume = args.volume;
    if let Some(path) = &args.audio {
        let bytes =
            std::fs::read(path).with_context(|| format!("read audio '{}'", path.display()))?;
        req.audio = Some(bytes);
    }

    let generator = promptreel::VideoGenerator::new(cfg)?;
    let report = generator.generate(&req)?;

    for w in &report.warnings {
        eprintln!("warning: {w}");
    }
    for f in &report.cleanup.failures {
        eprintln!("warning: {f}");
    }
    if let Some(path) = &report.output_path {
        eprintln!(
            "wrote {} ({} frames, background: {})",
            path.display(),
            report.frames,
            report.background
        );
        println!("{}", path.display());
    }
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.config.as_ref())?;
    let generator = promptreel::VideoGenerator::new(cfg)?;
    let req = promptreel::VideoRequest::new(args.prompt, f64::from(args.duration));
    let frame = generator.preview_frame(&req, args.at)?;

    promptreel::encode::ensure_parent_dir(&args.out)?;

    image::save_buffer_with_format(
        &args.out,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_config(args: ConfigArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.config.as_ref())?;
    println!(
        "{}",
        serde_json::to_string_pretty(&cfg).context("serialize config")?
    );
    Ok(())
}
