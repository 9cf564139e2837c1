use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use montree_slideshow::assets::preload::preload_images;
use montree_slideshow::render::CpuRasterizer;
use montree_slideshow::slides::SlideContext;
use montree_slideshow::slides::plan::{StillContent, paint_still};
use montree_slideshow::slides::transition::Crossfade;
use montree_slideshow::{
    CancelToken, DirectoryDownloads, FfmpegSink, FontSet, HttpImageFetcher,
    HttpPhotoSource, ImageFetcher, JsonFilePhotoSource, PhotoSource, SlideshowConfig,
    SlideshowGenerator, SlideshowPlan, Surface, VideoCodec, WallClock,
};

#[derive(Parser, Debug)]
#[command(name = "montree-slideshow", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load the photo list and print what the video would contain.
    List(CommonArgs),
    /// Render, encode and save the slideshow (requires `ffmpeg` on PATH).
    Generate(GenerateArgs),
    /// Render one still of the timeline as a PNG.
    Frame(FrameArgs),
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Classroom API base URL, e.g. `https://montree.example`.
    #[arg(long, conflicts_with = "photos_json", required_unless_present = "photos_json")]
    api_base: Option<String>,

    /// Bearer token for the classroom API.
    #[arg(long, requires = "api_base")]
    token: Option<String>,

    /// Read `{ "photos": [...] }` from a local file instead of the API.
    #[arg(long)]
    photos_json: Option<PathBuf>,

    /// Child id passed to the API.
    #[arg(long, default_value = "")]
    child_id: String,

    /// Name shown on the title slide and used for the file name.
    #[arg(long)]
    child_name: String,

    /// JSON config file; missing keys take their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output width in pixels.
    #[arg(long)]
    width: Option<u32>,

    /// Output height in pixels.
    #[arg(long)]
    height: Option<u32>,

    /// Regular font file.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Bold font file.
    #[arg(long)]
    font_bold: Option<PathBuf>,

    /// Year on the title slide.
    #[arg(long)]
    year: Option<i32>,
}

#[derive(Parser, Debug)]
struct GenerateArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Directory the video is saved into.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Output codec.
    #[arg(long, value_enum)]
    codec: Option<CodecChoice>,

    /// `ffmpeg` executable.
    #[arg(long)]
    ffmpeg: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Timeline position in milliseconds.
    #[arg(long, default_value_t = 0)]
    at_ms: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CodecChoice {
    Vp9,
    Vp8,
    H264,
}

impl From<CodecChoice> for VideoCodec {
    fn from(c: CodecChoice) -> Self {
        match c {
            CodecChoice::Vp9 => VideoCodec::Vp9,
            CodecChoice::Vp8 => VideoCodec::Vp8,
            CodecChoice::H264 => VideoCodec::H264,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::List(args) => cmd_list(args),
        Command::Generate(args) => cmd_generate(args),
        Command::Frame(args) => cmd_frame(args),
    }
}

fn load_config(args: &CommonArgs) -> anyhow::Result<SlideshowConfig> {
    let mut cfg = match &args.config {
        Some(path) => SlideshowConfig::from_json_file(path)?,
        None => SlideshowConfig::default(),
    };
    if let Some(w) = args.width {
        cfg.canvas.width = w;
    }
    if let Some(h) = args.height {
        cfg.canvas.height = h;
    }
    if args.font.is_some() {
        cfg.fonts.regular = args.font.clone();
    }
    if args.font_bold.is_some() {
        cfg.fonts.bold = args.font_bold.clone();
    }
    if args.year.is_some() {
        cfg.title_year = args.year;
    }
    cfg.validate()?;
    Ok(cfg)
}

fn make_sources(
    args: &CommonArgs,
) -> anyhow::Result<(Box<dyn PhotoSource>, Box<dyn ImageFetcher>)> {
    if let Some(path) = &args.photos_json {
        let source = JsonFilePhotoSource::new(path);
        let fetcher = HttpImageFetcher::new(source.media_root())?;
        return Ok((Box::new(source), Box::new(fetcher)));
    }
    let base = args
        .api_base
        .as_deref()
        .context("either --api-base or --photos-json is required")?;
    let source = HttpPhotoSource::new(base, args.token.clone())?;
    let fetcher = HttpImageFetcher::new(".")?;
    Ok((Box::new(source), Box::new(fetcher)))
}

fn make_generator(args: &CommonArgs, cfg: SlideshowConfig) -> anyhow::Result<SlideshowGenerator> {
    let (source, fetcher) = make_sources(args)?;
    Ok(SlideshowGenerator::new(
        args.child_id.clone(),
        args.child_name.clone(),
        cfg,
        source,
        fetcher,
    )?)
}

fn cmd_list(args: CommonArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args)?;
    let mut generator = make_generator(&args, cfg)?;
    generator.open()?;

    let Some(view) = generator.ready_view() else {
        println!("No photos to include");
        return Ok(());
    };
    println!("{}", view.count_line());
    for photo in &view.previews {
        let caption = if photo.caption().is_empty() {
            "(no caption)"
        } else {
            photo.caption()
        };
        println!("  {:<24} {caption}  {}", photo.id, photo.date_line());
    }
    if view.photo_count > view.previews.len() {
        println!("  ... and {} more", view.photo_count - view.previews.len());
    }
    println!("Includes:");
    for feature in &view.features {
        println!("  - {feature}");
    }
    println!("Length: about {:.1}s", view.nominal_duration.as_secs_f64());
    println!("{}", view.format_note);
    Ok(())
}

fn cmd_generate(args: GenerateArgs) -> anyhow::Result<()> {
    let mut cfg = load_config(&args.common)?;
    if let Some(codec) = args.codec {
        cfg.encoder.codec = codec.into();
    }
    if let Some(path) = &args.ffmpeg {
        cfg.encoder.ffmpeg_path = path.clone();
    }
    let opts = cfg.ffmpeg_opts();
    if !montree_slideshow::encode::is_ffmpeg_available(&opts.ffmpeg_path) {
        anyhow::bail!("'{}' not found or not runnable", opts.ffmpeg_path.display());
    }

    let mut generator = make_generator(&args.common, cfg)?;
    generator.open()?;
    if generator.ready_view().is_none() {
        println!("No photos to include");
        return Ok(());
    }

    let mut sink = FfmpegSink::new(opts);
    let mut clock = WallClock::new();
    let downloads = DirectoryDownloads::new(&args.out_dir);
    let cancel = CancelToken::new();
    cancel_on_ctrl_c(cancel.clone())?;
    let report = generator.generate(&mut sink, &mut clock, &downloads, &cancel)?;

    eprintln!(
        "{} photos, {} frames, {:.1}s",
        report.photo_count,
        report.frames_captured,
        report.recorded.as_secs_f64()
    );
    eprintln!("wrote {}", report.saved_to.display());
    Ok(())
}

/// Trip `token` on SIGINT so the recorder aborts ffmpeg and nothing is saved.
fn cancel_on_ctrl_c(token: CancelToken) -> anyhow::Result<()> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("build signal runtime")?;
    std::thread::Builder::new()
        .name("ctrl-c".to_string())
        .spawn(move || {
            rt.block_on(async {
                match tokio::signal::ctrl_c().await {
                    Ok(()) => {
                        tracing::info!("received Ctrl-C, cancelling");
                        token.cancel();
                    }
                    Err(e) => tracing::warn!(error = %e, "failed to listen for Ctrl-C"),
                }
            });
        })
        .context("spawn signal thread")?;
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args.common)?;
    let (source, fetcher) = make_sources(&args.common)?;
    let photos = source.fetch_photos(&args.common.child_id)?;
    let images = preload_images(&photos, fetcher.as_ref())?;
    let fonts = FontSet::resolve(&cfg.fonts)?;

    let plan = SlideshowPlan::new(&cfg, photos.len());
    let located = plan.locate(Duration::from_millis(args.at_ms));
    tracing::debug!(stage = ?located.stage, progress = located.progress, "still");

    let ctx = SlideContext::from_config(&cfg);
    let fade = Crossfade::new(&cfg.transition, cfg.theme.background);
    let content = StillContent {
        child_name: &args.common.child_name,
        year: cfg.year(),
        photos: &photos,
        images: &images,
    };
    let mut surface = Surface::new(cfg.canvas, Box::new(CpuRasterizer::new(fonts)));
    paint_still(&mut surface, &ctx, &fade, &content, &located)?;

    write_png(&args.out, &surface)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn write_png(out: &Path, surface: &Surface) -> anyhow::Result<()> {
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let frame = surface.frame();
    image::save_buffer_with_format(
        out,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", out.display()))?;
    Ok(())
}
