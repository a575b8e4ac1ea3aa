use std::{
    path::PathBuf,
    sync::Arc,
    time::{Duration, Instant},
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "emojipad", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render frames on the current thread and write the last one as a PNG.
    Frame(FrameArgs),
    /// Run the loop on a worker thread for a while, posting resizes, then write the last frame.
    Run(RunArgs),
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Sprite directory holding `<id>.png` or `<id>.svg`.
    #[arg(long, default_value = "assets")]
    assets: PathBuf,

    /// Render sprites as glyphs from this font instead of reading the asset directory.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Optional config JSON; flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Surface width in CSS pixels.
    #[arg(long)]
    width: f64,

    /// Surface height in CSS pixels.
    #[arg(long)]
    height: f64,

    /// Device pixel ratio.
    #[arg(long, default_value_t = 1.0)]
    ratio: f64,

    /// Number of layers.
    #[arg(long)]
    count: Option<usize>,

    /// RNG seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct FrameArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Frames to render before writing.
    #[arg(long, default_value_t = 1)]
    frames: u64,
}

#[derive(Args, Debug)]
struct RunArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Total run time in milliseconds.
    #[arg(long, default_value_t = 1000)]
    millis: u64,

    /// CSS size to post as a resize, e.g. `1024x768`. Repeatable; posted at even intervals.
    #[arg(long = "resize", value_parser = parse_size)]
    resizes: Vec<(f64, f64)>,
}

fn parse_size(s: &str) -> Result<(f64, f64), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WxH, got '{s}'"))?;
    let w: f64 = w.trim().parse().map_err(|e| format!("width '{w}': {e}"))?;
    let h: f64 = h.trim().parse().map_err(|e| format!("height '{h}': {e}"))?;
    Ok((w, h))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Run(args) => cmd_run(args),
    }
}

fn load_config(args: &CommonArgs) -> anyhow::Result<emojipad::EmojiPadConfig> {
    let mut cfg = match &args.config {
        Some(p) => emojipad::EmojiPadConfig::from_path(p)
            .with_context(|| format!("load config '{}'", p.display()))?,
        None => emojipad::EmojiPadConfig::default(),
    };
    if args.count.is_some() {
        cfg.layer_count = args.count;
    }
    if args.seed.is_some() {
        cfg.seed = args.seed;
    }
    cfg.validate()?;
    Ok(cfg)
}

fn make_loader(args: &CommonArgs) -> anyhow::Result<Arc<dyn emojipad::SpriteLoader>> {
    Ok(match &args.font {
        Some(font) => Arc::new(
            emojipad::GlyphSpriteLoader::from_path(font)
                .with_context(|| format!("load font '{}'", font.display()))?,
        ),
        None => Arc::new(emojipad::FsSpriteLoader::new(&args.assets)),
    })
}

fn surface_init(args: &CommonArgs) -> emojipad::SurfaceInit {
    emojipad::SurfaceInit::new(args.width, args.height, args.ratio)
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args.common)?;
    let loader = make_loader(&args.common)?;
    let pad = emojipad::EmojiPad::new(surface_init(&args.common), cfg, loader.as_ref())?;

    pad.into_loop(
        emojipad::PngSink::new(&args.common.out),
        emojipad::ImmediateScheduler,
    )
    .with_frame_limit(args.frames.max(1))
    .run()?;

    eprintln!("wrote {}", args.common.out.display());
    Ok(())
}

fn cmd_run(args: RunArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args.common)?;
    let loader = make_loader(&args.common)?;
    let init = surface_init(&args.common);

    let worker = emojipad::WorkerHandle::spawn(
        cfg,
        loader,
        emojipad::PngSink::new(&args.common.out),
        emojipad::IntervalScheduler::default(),
    )?;
    let surface = emojipad::Surface::from_init(init)?;
    worker.post(emojipad::WorkerMessage::init(surface, init))?;

    let started = Instant::now();
    let slice = Duration::from_millis(args.millis) / (args.resizes.len() as u32 + 1);
    for (w, h) in &args.resizes {
        std::thread::sleep(slice);
        worker.post(emojipad::WorkerMessage::Resize {
            width: *w,
            height: *h,
        })?;
    }
    std::thread::sleep(slice);

    worker.stop();
    worker.join()?;
    eprintln!(
        "wrote {} after {:.0?}",
        args.common.out.display(),
        started.elapsed()
    );
    Ok(())
}
