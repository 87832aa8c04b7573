use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};
use skinmerge::{
    FitMode, ImageSource, MergeSession, OverlayCatalog, SampleFilter, Settings, Slot,
    base_name_for_username, compute_transform, decode_pair, extract_overlay, load_bitmap,
    output_file_name, render_background, skin_url_for_username, write_png,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "skinmerge", version)]
struct Cli {
    /// Settings JSON; flags override its values.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Merge an overlay onto a base skin and write the PNG.
    Merge(MergeArgs),
    /// Write the overlay alone as a PNG.
    OverlayOnly(OverlayOnlyArgs),
    /// Print the background texture transform for an image and viewport.
    Fit(FitArgs),
    /// Render a background image as the preview would show it.
    Background(BackgroundArgs),
    /// List overlays from an unpacked bundle or a proxy listing.
    Catalog(CatalogArgs),
    /// Print the skin URL and download name for a player name.
    SkinUrl(SkinUrlArgs),
}

#[derive(Parser, Debug)]
struct MergeArgs {
    /// Base skin image.
    #[arg(long)]
    base: PathBuf,

    /// Overlay image.
    #[arg(long)]
    overlay: PathBuf,

    /// Output PNG path.
    #[arg(long, conflicts_with = "out_dir")]
    out: Option<PathBuf>,

    /// Output directory; the file is named after the base skin.
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Scale a differently sized overlay onto the base.
    #[arg(long, default_value_t = false)]
    auto_resize: bool,

    /// Name the output `merged_skin.png`.
    #[arg(long, default_value_t = false)]
    no_preserve_filename: bool,
}

#[derive(Parser, Debug)]
struct OverlayOnlyArgs {
    /// Overlay image.
    #[arg(long)]
    overlay: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug, Clone, Copy)]
struct FitFlags {
    /// Fit mode.
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,

    /// Zoom, clamped to the configured slider range.
    #[arg(long)]
    zoom: Option<f64>,
}

#[derive(Parser, Debug)]
struct FitArgs {
    /// Image size, e.g. `1920x1080`.
    #[arg(long, value_parser = parse_size)]
    image: (u32, u32),

    /// Viewport size; defaults to the configured viewport.
    #[arg(long, value_parser = parse_size)]
    viewport: Option<(u32, u32)>,

    #[command(flatten)]
    fit: FitFlags,
}

#[derive(Parser, Debug)]
struct BackgroundArgs {
    /// Background image.
    #[arg(long)]
    image: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Viewport size; defaults to the configured viewport.
    #[arg(long, value_parser = parse_size)]
    viewport: Option<(u32, u32)>,

    #[command(flatten)]
    fit: FitFlags,

    /// Sampling filter.
    #[arg(long, value_enum)]
    filter: Option<FilterArg>,
}

#[derive(Parser, Debug)]
#[command(group = clap::ArgGroup::new("source").required(true).args(["dir", "listing"]))]
struct CatalogArgs {
    /// Unpacked overlay bundle.
    #[arg(long)]
    dir: Option<PathBuf>,

    /// Proxy listing JSON.
    #[arg(long)]
    listing: Option<PathBuf>,

    /// Keep overlays whose name contains this term.
    #[arg(long)]
    search: Option<String>,

    /// Preferred variant per overlay, e.g. `slim`.
    #[arg(long)]
    variant: Option<String>,
}

#[derive(Parser, Debug)]
struct SkinUrlArgs {
    /// Player name.
    #[arg(long)]
    username: String,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum ModeArg {
    Cover,
    Contain,
    Stretch,
}

impl From<ModeArg> for FitMode {
    fn from(m: ModeArg) -> Self {
        match m {
            ModeArg::Cover => FitMode::Cover,
            ModeArg::Contain => FitMode::Contain,
            ModeArg::Stretch => FitMode::Stretch,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum FilterArg {
    Linear,
    Nearest,
}

impl From<FilterArg> for SampleFilter {
    fn from(f: FilterArg) -> Self {
        match f {
            FilterArg::Linear => SampleFilter::Linear,
            FilterArg::Nearest => SampleFilter::Nearest,
        }
    }
}

fn parse_size(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
    let w: u32 = w.trim().parse().map_err(|e| format!("width: {e}"))?;
    let h: u32 = h.trim().parse().map_err(|e| format!("height: {e}"))?;
    if w == 0 || h == 0 {
        return Err(format!("size must be non-empty, got '{s}'"));
    }
    Ok((w, h))
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = match &cli.config {
        Some(path) => Settings::from_path(path)
            .with_context(|| format!("load settings '{}'", path.display()))?,
        None => Settings::default(),
    };

    match cli.cmd {
        Command::Merge(args) => cmd_merge(settings, args),
        Command::OverlayOnly(args) => cmd_overlay_only(args),
        Command::Fit(args) => cmd_fit(settings, args),
        Command::Background(args) => cmd_background(settings, args),
        Command::Catalog(args) => cmd_catalog(&settings, args),
        Command::SkinUrl(args) => cmd_skin_url(&settings, args),
    }
}

fn cmd_merge(mut settings: Settings, args: MergeArgs) -> anyhow::Result<()> {
    if args.auto_resize {
        settings.merge.auto_resize = true;
    }
    if args.no_preserve_filename {
        settings.merge.preserve_filename = false;
    }

    let base = ImageSource::from_path(&args.base, Slot::Base)?;
    let overlay = ImageSource::from_path(&args.overlay, Slot::Overlay)?;

    let mut session = MergeSession::new(&settings)?;
    let base_ticket = session.begin_load(Slot::Base);
    let overlay_ticket = session.begin_load(Slot::Overlay);
    let (base_bmp, overlay_bmp) = decode_pair(&base, &overlay);
    session.finish_load(base_ticket, base_bmp, base.file_name.as_deref())?;
    session.finish_load(overlay_ticket, overlay_bmp, overlay.file_name.as_deref())?;

    let merged = session.composite()?;
    let out = match (args.out, args.out_dir) {
        (Some(out), _) => out,
        (None, dir) => dir
            .unwrap_or_else(|| PathBuf::from("."))
            .join(session.output_file_name()),
    };
    write_png(&out, &merged).with_context(|| format!("write png '{}'", out.display()))?;

    eprintln!("wrote {}", out.display());
    Ok(())
}

fn cmd_overlay_only(args: OverlayOnlyArgs) -> anyhow::Result<()> {
    let overlay = load_bitmap(&args.overlay, Slot::Overlay)?;
    let out = extract_overlay(&overlay)?;
    write_png(&args.out, &out).with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn apply_fit_flags(settings: &mut Settings, flags: FitFlags, viewport: Option<(u32, u32)>) {
    if let Some(mode) = flags.mode {
        settings.preview.fit = mode.into();
    }
    if let Some(zoom) = flags.zoom {
        settings.preview.zoom = zoom;
    }
    if let Some((w, h)) = viewport {
        settings.preview.viewport_width = w;
        settings.preview.viewport_height = h;
    }
}

fn cmd_fit(mut settings: Settings, args: FitArgs) -> anyhow::Result<()> {
    apply_fit_flags(&mut settings, args.fit, args.viewport);
    let preview = &settings.preview;
    let opts = preview.fit_options()?;
    let (iw, ih) = args.image;
    let transform = compute_transform(
        iw,
        ih,
        f64::from(preview.viewport_width),
        f64::from(preview.viewport_height),
        &opts,
    )?;
    let (mag, min) = opts.filter.texture_filters();

    let report = serde_json::json!({
        "mode": opts.mode,
        "zoom": opts.zoom.get(),
        "transform": transform,
        "mag_filter": mag,
        "min_filter": min,
        "wrap": opts.filter.wrap_mode(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn cmd_background(mut settings: Settings, args: BackgroundArgs) -> anyhow::Result<()> {
    apply_fit_flags(&mut settings, args.fit, args.viewport);
    if let Some(filter) = args.filter {
        settings.preview.filter = filter.into();
    }
    let preview = &settings.preview;
    let opts = preview.fit_options()?;

    let image = load_bitmap(&args.image, Slot::Background)?;
    let (vw, vh) = (preview.viewport_width, preview.viewport_height);
    let transform = compute_transform(
        image.width(),
        image.height(),
        f64::from(vw),
        f64::from(vh),
        &opts,
    )?;
    let rendered = render_background(&image, vw, vh, &transform, opts.filter)?;
    write_png(&args.out, &rendered)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn read_catalog(settings: &Settings, args: &CatalogArgs) -> anyhow::Result<OverlayCatalog> {
    if let Some(dir) = &args.dir {
        return Ok(OverlayCatalog::scan_dir(dir, &settings.catalog)?);
    }
    let listing: &Path = args
        .listing
        .as_deref()
        .context("either --dir or --listing is required")?;
    let json = std::fs::read_to_string(listing)
        .with_context(|| format!("read listing '{}'", listing.display()))?;
    Ok(OverlayCatalog::from_listing_json(&json)?)
}

fn cmd_catalog(settings: &Settings, args: CatalogArgs) -> anyhow::Result<()> {
    let mut catalog = read_catalog(settings, &args)?;
    if let Some(term) = &args.search {
        catalog = catalog.filter(term);
    }

    let rules = &settings.catalog;
    let rows: Vec<_> = catalog
        .folders
        .iter()
        .map(|folder| {
            let selected = match &args.variant {
                Some(variant) => folder.preferred(variant, rules),
                None => folder.default_file(rules),
            };
            serde_json::json!({
                "name": folder.name,
                "skin_type": folder.skin_type(rules),
                "files": folder.files.iter().map(|f| f.name.as_str()).collect::<Vec<_>>(),
                "selected": selected,
            })
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&rows)?);

    eprintln!(
        "{} overlays, {} files",
        catalog.folder_count(),
        catalog.file_count()
    );
    Ok(())
}

fn cmd_skin_url(settings: &Settings, args: SkinUrlArgs) -> anyhow::Result<()> {
    let url = skin_url_for_username(&args.username)?;
    let download = output_file_name(
        settings.merge.preserve_filename,
        &base_name_for_username(&args.username),
    );
    let report = serde_json::json!({ "url": url, "download_name": download });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
