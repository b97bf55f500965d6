use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "scrollreel", version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Composite the frame shown at a scroll progress and write it as a PNG.
    Frame(FrameArgs),
    /// Print the snap decision for a settled scroll position as JSON.
    Snap(SnapArgs),
    /// List the frame URIs of a sequence.
    Uris(UrisArgs),
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Story config JSON. Defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory frame URIs are resolved against.
    #[arg(long)]
    root: PathBuf,

    /// Scroll progress in [0, 1].
    #[arg(long)]
    progress: f64,

    /// Surface width in pixels.
    #[arg(long, default_value_t = 1280)]
    width: u32,

    /// Surface height in pixels.
    #[arg(long, default_value_t = 720)]
    height: u32,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Wait for every frame to settle, not just the first one.
    #[arg(long, default_value_t = false)]
    wait_all: bool,

    /// Give up waiting for frames after this many milliseconds.
    #[arg(long, default_value_t = 30_000)]
    timeout_ms: u64,
}

#[derive(Parser, Debug)]
struct SnapArgs {
    /// JSON array of sections: `[{ "id": "a", "top": 0, "bottom": 1000 }, ...]`.
    #[arg(long)]
    sections: PathBuf,

    /// Viewport height in pixels.
    #[arg(long)]
    viewport: f64,

    /// Settled scroll progress over the whole page, in [0, 1].
    #[arg(long)]
    progress: f64,

    /// Direction of the last scroll motion.
    #[arg(long, value_enum, default_value_t = DirectionArg::None)]
    direction: DirectionArg,

    /// Total scrollable range in pixels. Defaults to the last section bottom minus the viewport.
    #[arg(long)]
    total_range: Option<f64>,

    /// Edge tolerance in pixels.
    #[arg(long, default_value_t = scrollreel::DEFAULT_TOLERANCE_PX)]
    tolerance: f64,
}

#[derive(Parser, Debug)]
struct UrisArgs {
    /// Story config JSON. Defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DirectionArg {
    Forward,
    Backward,
    None,
}

impl From<DirectionArg> for scrollreel::ScrollDirection {
    fn from(d: DirectionArg) -> Self {
        match d {
            DirectionArg::Forward => Self::Forward,
            DirectionArg::Backward => Self::Backward,
            DirectionArg::None => Self::None,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Snap(args) => cmd_snap(args),
        Command::Uris(args) => cmd_uris(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<scrollreel::StoryConfig> {
    let cfg = match path {
        Some(p) => scrollreel::StoryConfig::from_path(p)?,
        None => scrollreel::StoryConfig::default(),
    };
    cfg.validate()?;
    Ok(cfg)
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.config.as_ref())?;
    let source = Arc::new(scrollreel::FsFrameSource::new(&args.root));
    let mut player = scrollreel::FramePlayer::start(&cfg.sequence, source, cfg.preload)?;

    let timeout = Duration::from_millis(args.timeout_ms);
    let settled = if args.wait_all {
        player.wait_all(timeout)
    } else {
        player.wait_first_frame(timeout)
    };
    if !settled {
        anyhow::bail!("frames did not settle within {} ms", args.timeout_ms);
    }

    let mut surface = scrollreel::CpuSurface::new(args.width, args.height)?;
    player.on_scroll(args.progress);
    let outcome = player.on_animation_frame(&mut surface);
    match outcome {
        Some(scrollreel::CompositeOutcome::Drawn { index, .. }) => {
            tracing::debug!(index = index.0, "frame composited");
        }
        other => anyhow::bail!("nothing drawn for progress {}: {other:?}", args.progress),
    }
    let frame = surface.frame_rgba()?;

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

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

fn cmd_snap(args: SnapArgs) -> anyhow::Result<()> {
    let f = std::fs::File::open(&args.sections)
        .with_context(|| format!("open sections JSON '{}'", args.sections.display()))?;
    let sections: Vec<scrollreel::Section> = serde_json::from_reader(std::io::BufReader::new(f))
        .with_context(|| format!("parse sections JSON '{}'", args.sections.display()))?;
    let registry = scrollreel::SectionRegistry::with_sections(sections)?;
    let snapshot = registry.snapshot();

    let total_range = match args.total_range {
        Some(r) => r,
        None => snapshot
            .sections()
            .iter()
            .map(|s| s.bottom)
            .fold(0.0_f64, f64::max)
            - args.viewport,
    };
    let state = scrollreel::ScrollState::new(
        total_range * args.progress,
        args.progress,
        args.direction.into(),
    );
    let decision = scrollreel::SnapDecisionEngine::new(args.tolerance).decide(
        &state,
        &snapshot,
        args.viewport,
        total_range,
    );

    println!("{}", serde_json::to_string_pretty(&decision)?);
    Ok(())
}

fn cmd_uris(args: UrisArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.config.as_ref())?;
    for i in 0..cfg.sequence.frame_count {
        println!("{}", cfg.sequence.naming.uri_for(scrollreel::FrameIndex(i)));
    }
    Ok(())
}
