use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{ArgAction, Args, Parser, Subcommand};
use diff_atlas_core::config::{DiffRegionMode, GeneratorConfig};
use diff_atlas_core::{
    detect_diff_region, encode_png, generate, regions_to_json, DiffAtlasError, InputImage,
    PreparedImage, Progress,
};
use globset::{Glob, GlobSetBuilder};
use image::{DynamicImage, ImageReader};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Deserialize;
use tracing::{error, info, warn};
use walkdir::WalkDir;

#[derive(Parser, Debug)]
#[command(
    name = "diff-atlas",
    about = "Pack a base portrait and its expression variants into a diff atlas",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Show a progress bar during the pixel scan (disable with --progress=false or --quiet)
    #[arg(long, default_value_t = true, action=ArgAction::Set, global=true, help_heading = "Logging/UX")]
    progress: bool,
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action=ArgAction::Count, global=true, help_heading = "Logging/UX")]
    verbose: u8,
    /// Quiet mode (overrides verbose)
    #[arg(
        short,
        long,
        default_value_t = false,
        global = true,
        help_heading = "Logging/UX"
    )]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Report the diff region (raw and block-aligned) without packing
    Detect(DetectArgs),
    /// Run the full pipeline: detect, pack, mesh; write atlas + metadata
    Generate(GenerateArgs),
}

#[derive(Args, Debug, Clone)]
struct InputArgs {
    /// Base (reference) image
    #[arg(help_heading = "Input")]
    base: PathBuf,
    /// Variant images; directories are walked recursively
    #[arg(required = true, help_heading = "Input")]
    variants: Vec<PathBuf>,
    /// Include patterns (glob) applied to directory walks
    #[arg(long, help_heading = "Input")]
    include: Vec<String>,
    /// Exclude patterns (glob) applied to directory walks
    #[arg(long, help_heading = "Input")]
    exclude: Vec<String>,
}

#[derive(Args, Debug, Clone)]
struct DetectArgs {
    #[command(flatten)]
    input: InputArgs,
    /// Compression block size in pixels
    #[arg(long, default_value_t = 4, help_heading = "Layout")]
    block_size: u32,
}

#[derive(Args, Debug, Clone)]
struct GenerateArgs {
    #[command(flatten)]
    input: InputArgs,

    // Output
    /// Output directory
    #[arg(short, long, default_value = "out", help_heading = "Output")]
    out_dir: PathBuf,
    /// Atlas base name (files will be name.png/.json/.mesh.json)
    #[arg(short, long, default_value = "atlas", help_heading = "Output")]
    name: String,
    /// Dry run: run the pipeline and log stats but do not write files
    #[arg(long, default_value_t = false, help_heading = "Output")]
    dry_run: bool,

    // Layout
    /// Compression block size in pixels
    #[arg(long, default_value_t = 4, help_heading = "Layout")]
    block_size: u32,
    /// Name recorded for the diff-summary region
    #[arg(long, default_value = "Default", help_heading = "Layout")]
    diff_name: String,
    /// Rect recorded for the diff-summary region: raw | aligned
    #[arg(long, default_value = "aligned", value_parser = ["raw", "aligned"], help_heading = "Layout")]
    diff_region: String,
    /// Extrude each packed slot's edges into its margin
    #[arg(long, default_value_t = false, help_heading = "Layout")]
    extrude: bool,

    // Mesh
    /// Build the tight mesh (border strips + diff quad) instead of the 16-vertex grid
    #[arg(long, default_value_t = false, help_heading = "Mesh")]
    tight: bool,
    /// Pixels per local mesh unit
    #[arg(long, default_value_t = 100.0, help_heading = "Mesh")]
    pixels_per_unit: f32,

    /// YAML config file path (overrides the options above)
    #[arg(long, help_heading = "Input")]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing_with_level(cli.quiet, cli.verbose);
    match &cli.command {
        Commands::Detect(args) => run_detect(args, cli.progress && !cli.quiet),
        Commands::Generate(args) => run_generate(args, cli.progress && !cli.quiet),
    }
}

fn run_detect(args: &DetectArgs, show_progress: bool) -> anyhow::Result<()> {
    let base = load_prepared(&args.input.base)?;
    let variants = load_variants(&args.input)?;
    info!(variants = variants.len(), "loaded input images");

    let bar = BarProgress::new(show_progress);
    let diff = match detect_diff_region(&base.rgba, &variants, args.block_size, &bar) {
        Ok(d) => d,
        Err(DiffAtlasError::NoDifferences) => {
            bar.finish();
            info!("no differences found; nothing to pack");
            return Ok(());
        }
        Err(e) => {
            bar.finish();
            return Err(e.into());
        }
    };
    bar.finish();
    println!("{}", serde_json::to_string_pretty(&diff)?);
    Ok(())
}

fn run_generate(args: &GenerateArgs, show_progress: bool) -> anyhow::Result<()> {
    let cfg = build_config(args)?;

    let base = load_input(&args.input.base)?;
    let variants: Vec<InputImage> = load_variants(&args.input)?
        .into_iter()
        .map(|p| InputImage {
            key: p.key,
            image: DynamicImage::ImageRgba8(p.rgba),
        })
        .collect();
    info!(variants = variants.len(), "loaded input images");

    let bar = BarProgress::new(show_progress);
    let out = match generate(base, variants, cfg, &bar) {
        Ok(out) => out,
        Err(DiffAtlasError::NoDifferences) => {
            bar.finish();
            warn!("no differences found; nothing to pack, no artifacts written");
            return Ok(());
        }
        Err(e) => {
            bar.finish();
            return Err(e.into());
        }
    };
    bar.finish();

    info!(
        atlas_w = out.atlas.width(),
        atlas_h = out.atlas.height(),
        regions = out.regions.len(),
        vertices = out.mesh.vertex_count(),
        raw = ?out.diff.raw,
        aligned = ?out.diff.aligned,
        "generated"
    );

    if args.dry_run {
        return Ok(());
    }

    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create out_dir {}", args.out_dir.display()))?;

    let png_path = args.out_dir.join(format!("{}.png", args.name));
    let png = encode_png(&out.atlas)?;
    fs::write(&png_path, png).with_context(|| format!("write {}", png_path.display()))?;
    info!(?png_path, "wrote atlas");

    let json_path = args.out_dir.join(format!("{}.json", args.name));
    let sheet = regions_to_json(out.atlas.dimensions(), &out.regions);
    fs::write(&json_path, serde_json::to_string_pretty(&sheet)?)
        .with_context(|| format!("write {}", json_path.display()))?;
    info!(?json_path, "wrote region sheet");

    let mesh_path = args.out_dir.join(format!("{}.mesh.json", args.name));
    fs::write(&mesh_path, serde_json::to_string_pretty(&out.mesh)?)
        .with_context(|| format!("write {}", mesh_path.display()))?;
    info!(?mesh_path, "wrote mesh");

    Ok(())
}

/// Optional YAML overlay for generation settings; any present key overrides
/// the corresponding CLI flag.
#[derive(Deserialize, Default, Debug)]
#[serde(deny_unknown_fields)]
struct YamlConfig {
    block_size: Option<u32>,
    diff_region_name: Option<String>,
    tight_mesh: Option<bool>,
    diff_region_mode: Option<String>,
    extrude_slots: Option<bool>,
    pixels_per_unit: Option<f32>,
}

fn build_config(args: &GenerateArgs) -> anyhow::Result<GeneratorConfig> {
    let mode: DiffRegionMode = args
        .diff_region
        .parse()
        .map_err(|_| anyhow::anyhow!("unknown diff region mode: {}", args.diff_region))?;
    let mut cfg = GeneratorConfig::builder()
        .block_size(args.block_size)
        .diff_region_name(args.diff_name.clone())
        .tight_mesh(args.tight)
        .diff_region_mode(mode)
        .extrude_slots(args.extrude)
        .pixels_per_unit(args.pixels_per_unit)
        .build();

    if let Some(path) = &args.config {
        let file = fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let y: YamlConfig = serde_yaml::from_str(&file)?;
        if let Some(v) = y.block_size {
            cfg.block_size = v;
        }
        if let Some(v) = y.diff_region_name {
            cfg.diff_region_name = v;
        }
        if let Some(v) = y.tight_mesh {
            cfg.tight_mesh = v;
        }
        if let Some(v) = y.diff_region_mode {
            cfg.diff_region_mode = v
                .parse()
                .map_err(|_| anyhow::anyhow!("unknown diff region mode: {v}"))?;
        }
        if let Some(v) = y.extrude_slots {
            cfg.extrude_slots = v;
        }
        if let Some(v) = y.pixels_per_unit {
            cfg.pixels_per_unit = v;
        }
    }
    Ok(cfg)
}

/// Indicatif-backed implementation of the core `Progress` sink.
struct BarProgress {
    bar: Option<ProgressBar>,
}

impl BarProgress {
    fn new(enabled: bool) -> Self {
        let bar = if enabled {
            let b = ProgressBar::new(100);
            b.set_style(
                ProgressStyle::with_template(
                    "{spinner:.green} {msg} {percent}% [{elapsed_precise}]",
                )
                .unwrap(),
            );
            Some(b)
        } else {
            None
        };
        Self { bar }
    }

    fn finish(&self) {
        if let Some(b) = &self.bar {
            b.finish_and_clear();
        }
    }
}

impl Progress for BarProgress {
    fn report(&self, message: &str, fraction: f32) {
        if let Some(b) = &self.bar {
            b.set_message(message.to_string());
            b.set_position((fraction * 100.0) as u64);
        }
    }
}

fn load_variants(input: &InputArgs) -> anyhow::Result<Vec<PreparedImage>> {
    let mut inc_set = None;
    if !input.include.is_empty() {
        let mut b = GlobSetBuilder::new();
        for pat in &input.include {
            b.add(Glob::new(pat)?);
        }
        inc_set = Some(b.build()?);
    }
    let mut exc_set = None;
    if !input.exclude.is_empty() {
        let mut b = GlobSetBuilder::new();
        for pat in &input.exclude {
            b.add(Glob::new(pat)?);
        }
        exc_set = Some(b.build()?);
    }

    let mut paths: Vec<PathBuf> = Vec::new();
    for p in &input.variants {
        if p.is_file() {
            paths.push(p.clone());
        } else {
            for entry in WalkDir::new(p).into_iter().filter_map(|e| e.ok()) {
                let p = entry.path();
                if p.is_file()
                    && !should_skip(p, inc_set.as_ref(), exc_set.as_ref())
                    && is_image(p)
                {
                    paths.push(p.to_path_buf());
                }
            }
        }
    }
    paths.sort();

    let mut list = Vec::with_capacity(paths.len());
    for p in &paths {
        match load_prepared(p) {
            Ok(img) => list.push(img),
            Err(e) => {
                error!(?p, error = %e, "skip image");
            }
        }
    }
    Ok(list)
}

fn should_skip(
    p: &Path,
    include: Option<&globset::GlobSet>,
    exclude: Option<&globset::GlobSet>,
) -> bool {
    let s = p.to_string_lossy().replace('\\', "/");
    if let Some(ex) = exclude {
        if ex.is_match(&s) {
            return true;
        }
    }
    if let Some(inc) = include {
        if !inc.is_match(&s) {
            return true;
        }
    }
    false
}

fn is_image(p: &Path) -> bool {
    matches!(
        p.extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_ascii_lowercase()),
        Some(ext) if matches!(ext.as_str(), "png" | "jpg" | "jpeg" | "bmp" | "tga" | "gif")
    )
}

/// Region names come from the file stem, matching how artists name the
/// variant files themselves.
fn image_key(p: &Path) -> String {
    p.file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.to_string())
        .unwrap_or_else(|| p.to_string_lossy().replace('\\', "/"))
}

fn load_input(p: &Path) -> anyhow::Result<InputImage> {
    let img = ImageReader::open(p)?.with_guessed_format()?.decode()?;
    Ok(InputImage {
        key: image_key(p),
        image: img,
    })
}

fn load_prepared(p: &Path) -> anyhow::Result<PreparedImage> {
    let inp = load_input(p)?;
    Ok(PreparedImage::from(inp))
}

fn init_tracing_with_level(quiet: bool, verbose: u8) {
    let level = if quiet {
        "error".to_string()
    } else {
        match verbose {
            0 => "info".into(),
            1 => "debug".into(),
            _ => "trace".into(),
        }
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_target(false)
        .try_init();
}
