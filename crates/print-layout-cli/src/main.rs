use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use globset::{Glob, GlobSet, GlobSetBuilder};
use print_layout_core::{Layout, PackerConfig, Strategy, pack_layout, to_json};
use serde::Deserialize;
use tracing::{error, info, warn};
use walkdir::WalkDir;

#[derive(Parser, Debug)]
#[command(
    name = "print-layout",
    about = "Lay images out onto fixed-size print pages",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Show progress bars (disable with --no-progress or --quiet)
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
    /// Compute placements for a folder of images and export them as JSON
    Layout(LayoutArgs),
    /// Time both strategies over the same inputs
    Bench(BenchArgs),
}

#[derive(Parser, Debug, Clone)]
struct InputArgs {
    /// Input file or directory
    #[arg(env = "ANNOT_DIR", help_heading = "Input")]
    input: PathBuf,
    /// Descend into subdirectories
    #[arg(long, default_value_t = false, help_heading = "Input")]
    recursive: bool,
    /// Include patterns (glob). If set, only files matching any pattern are considered
    #[arg(long, help_heading = "Input")]
    include: Vec<String>,
    /// Exclude patterns (glob). Files matching any pattern will be ignored
    #[arg(long, help_heading = "Input")]
    exclude: Vec<String>,
}

#[derive(Parser, Debug, Clone)]
struct PageArgs {
    /// Page width in pixels (fractional values are floored)
    #[arg(long, env = "PAGE_WIDTH", value_parser = parse_dimension, help_heading = "Page")]
    page_width: Option<u32>,
    /// Page height in pixels (fractional values are floored)
    #[arg(long, env = "PAGE_HEIGHT", value_parser = parse_dimension, help_heading = "Page")]
    page_height: Option<u32>,
    /// Strategy: sequential (keeps reading order) | random (lowest shelf)
    #[arg(long, value_parser = parse_strategy, help_heading = "Page")]
    strategy: Option<Strategy>,
    /// true|yes|1 selects the sequential strategy; anything else selects random.
    /// Ignored when --strategy is given
    #[arg(long, env = "PRESERVE_ORDER", value_parser = parse_flag, help_heading = "Page")]
    preserve_order: Option<bool>,
    /// YAML config file path (flags override its values)
    #[arg(long, help_heading = "Page")]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
struct LayoutArgs {
    #[command(flatten)]
    input: InputArgs,
    #[command(flatten)]
    page: PageArgs,

    /// Output file for the JSON layout (stdout when omitted)
    #[arg(short, long, env = "LAYOUT_FILE", help_heading = "Export")]
    out: Option<PathBuf>,
    /// Export layout stats (JSON) to this file
    #[arg(long, help_heading = "Export")]
    export_stats: Option<PathBuf>,
    /// Print the merged configuration (after YAML/CLI) and exit
    #[arg(long, default_value_t = false, help_heading = "Export")]
    print_config: bool,
    /// Output format for --print-config: json|yaml
    #[arg(long, default_value = "json", value_parser = ["json", "yaml"], help_heading = "Export")]
    print_config_format: String,
    /// Dry run: compute layout and stats but do not write files
    #[arg(long, default_value_t = false, help_heading = "Export")]
    dry_run: bool,
}

#[derive(Parser, Debug, Clone)]
struct BenchArgs {
    #[command(flatten)]
    input: InputArgs,
    #[command(flatten)]
    page: PageArgs,
    /// Repetitions per strategy
    #[arg(long, default_value_t = 5)]
    runs: u32,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing_with_level(cli.quiet, cli.verbose);
    let show_progress = cli.progress && !cli.quiet;
    match &cli.command {
        Commands::Layout(args) => run_layout(args, show_progress),
        Commands::Bench(args) => run_bench(args),
    }
}

fn run_layout(args: &LayoutArgs, show_progress: bool) -> anyhow::Result<()> {
    let cfg = resolve_config(&args.page)?;

    if args.print_config {
        match args.print_config_format.as_str() {
            "yaml" => println!("{}", serde_yaml::to_string(&cfg)?),
            _ => println!("{}", serde_json::to_string_pretty(&cfg)?),
        }
        return Ok(());
    }

    let paths = gather_paths(&args.input)?;
    let sizes = read_sizes_with_progress(&paths, show_progress)?;
    info!(count = sizes.len(), "read image sizes");

    let start = Instant::now();
    let layout = pack_layout(sizes, cfg).context("layout failed")?;
    let dur = start.elapsed();

    let stats = layout.stats();
    info!(
        pages = stats.num_pages,
        tiles = stats.num_tiles,
        occupancy = %format!("{:.2}%", stats.occupancy * 100.0),
        time = %fmt_dur(dur),
        "layout computed"
    );
    info!("{}", stats.summary());

    if args.dry_run {
        info!("dry run: nothing written");
        return Ok(());
    }

    let json = serde_json::to_string_pretty(&to_json(&layout))?;
    match &args.out {
        Some(path) => {
            if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
                fs::create_dir_all(dir)
                    .with_context(|| format!("create out dir {}", dir.display()))?;
            }
            fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
            info!(?path, pages = layout.page_count(), "layout written");
        }
        None => println!("{json}"),
    }

    if let Some(stats_path) = &args.export_stats {
        fs::write(stats_path, serde_json::to_string_pretty(&stats)?)
            .with_context(|| format!("write {}", stats_path.display()))?;
        info!(?stats_path, "stats exported");
    }
    Ok(())
}

fn run_bench(args: &BenchArgs) -> anyhow::Result<()> {
    let base = resolve_config(&args.page)?;
    let paths = gather_paths(&args.input)?;
    let sizes = read_sizes_with_progress(&paths, false)?;
    let runs = args.runs.max(1);
    for strategy in [Strategy::Sequential, Strategy::Random] {
        let cfg = PackerConfig { strategy, ..base.clone() };
        let mut best = Duration::MAX;
        let mut last: Option<Layout> = None;
        for _ in 0..runs {
            let start = Instant::now();
            let layout = pack_layout(sizes.clone(), cfg.clone())?;
            best = best.min(start.elapsed());
            last = Some(layout);
        }
        if let Some(layout) = last {
            let stats = layout.stats();
            println!(
                "{:<10} pages={} occupancy={:.2}% best={}",
                strategy.to_string(),
                stats.num_pages,
                stats.occupancy * 100.0,
                fmt_dur(best)
            );
        }
    }
    Ok(())
}

/// Defaults, then the YAML file, then flags and their environment fallbacks.
fn resolve_config(page: &PageArgs) -> anyhow::Result<PackerConfig> {
    let mut cfg = PackerConfig::default();
    if let Some(path) = &page.config {
        let file =
            fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
        let y: YamlConfig = serde_yaml::from_str(&file)
            .with_context(|| format!("parse config {}", path.display()))?;
        cfg = y.into_packer_config(cfg)?;
    }
    if let Some(w) = page.page_width {
        cfg.page_width = w;
    }
    if let Some(h) = page.page_height {
        cfg.page_height = h;
    }
    match (page.strategy, page.preserve_order) {
        (Some(s), _) => cfg.strategy = s,
        (None, Some(keep)) => cfg.strategy = Strategy::from_preserve_order(keep),
        (None, None) => {}
    }
    cfg.validate()?;
    Ok(cfg)
}

fn gather_paths(args: &InputArgs) -> anyhow::Result<Vec<PathBuf>> {
    let inc_set = build_globset(&args.include)?;
    let exc_set = build_globset(&args.exclude)?;
    let path = &args.input;
    let mut list: Vec<PathBuf> = Vec::new();
    if path.is_file() {
        if !should_skip(path, inc_set.as_ref(), exc_set.as_ref()) && is_image(path) {
            list.push(path.to_path_buf());
        }
    } else {
        if !path.is_dir() {
            anyhow::bail!("input {} is not a file or directory", path.display());
        }
        let mut walk = WalkDir::new(path).sort_by_file_name();
        if !args.recursive {
            walk = walk.max_depth(1);
        }
        for entry in walk.into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() && !should_skip(p, inc_set.as_ref(), exc_set.as_ref()) && is_image(p) {
                list.push(p.to_path_buf());
            }
        }
    }
    // Input order is placement order.
    list.sort();
    if list.is_empty() {
        warn!(input = %path.display(), "no images found");
    }
    Ok(list)
}

fn build_globset(patterns: &[String]) -> anyhow::Result<Option<GlobSet>> {
    if patterns.is_empty() {
        return Ok(None);
    }
    let mut b = GlobSetBuilder::new();
    for pat in patterns {
        b.add(Glob::new(pat).with_context(|| format!("bad glob {pat}"))?);
    }
    Ok(Some(b.build()?))
}

fn should_skip(p: &Path, include: Option<&GlobSet>, exclude: Option<&GlobSet>) -> bool {
    let s = p.to_string_lossy().replace('\\', "/");
    if exclude.is_some_and(|ex| ex.is_match(&s)) {
        return true;
    }
    include.is_some_and(|inc| !inc.is_match(&s))
}

fn is_image(p: &Path) -> bool {
    matches!(
        p.extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_ascii_lowercase()),
        Some(ext) if matches!(ext.as_str(), "png" | "jpg" | "jpeg" | "bmp" | "tga" | "gif")
    )
}

/// Reads only the image headers; pixel data is never decoded.
fn read_sizes_with_progress(
    paths: &[PathBuf],
    progress: bool,
) -> anyhow::Result<Vec<(String, u32, u32)>> {
    use indicatif::{ProgressBar, ProgressStyle};
    let bar = if progress {
        let b = ProgressBar::new(paths.len() as u64);
        b.set_style(ProgressStyle::with_template(
            "{spinner:.green} reading {pos}/{len} [{elapsed_precise}] {wide_msg}",
        )?);
        Some(b)
    } else {
        None
    };
    let mut list = Vec::with_capacity(paths.len());
    for p in paths {
        let msg = p.file_name().and_then(|s| s.to_str()).unwrap_or("");
        if let Some(b) = &bar {
            b.set_message(msg.to_string());
        }
        match image::image_dimensions(p) {
            Ok((w, h)) => {
                let key = p.to_string_lossy().replace('\\', "/");
                list.push((key, w, h));
            }
            Err(e) => {
                error!(?p, error = %e, "skip image");
            }
        }
        if let Some(b) = &bar {
            b.inc(1);
        }
    }
    if let Some(b) = &bar {
        b.finish_and_clear();
    }
    Ok(list)
}

fn fmt_dur(d: Duration) -> String {
    let ms = d.as_secs_f64() * 1000.0;
    if ms >= 1.0 {
        format!("{:.1}ms", ms)
    } else {
        format!("{}us", d.as_micros())
    }
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
    // stdout may carry the layout JSON.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Page dimensions arrive as decimal strings from upstream tools; floor them.
fn parse_dimension(s: &str) -> Result<u32, String> {
    let v: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("not a number: {s}"))?;
    if !v.is_finite() || v < 0.0 || v > u32::MAX as f64 {
        return Err(format!("dimension out of range: {s}"));
    }
    Ok(v.floor() as u32)
}

fn parse_flag(s: &str) -> Result<bool, String> {
    Ok(matches!(
        s.trim().to_ascii_lowercase().as_str(),
        "true" | "yes" | "1"
    ))
}

fn parse_strategy(s: &str) -> Result<Strategy, String> {
    s.parse()
        .map_err(|_| format!("unknown strategy: {s} (expected sequential|random)"))
}

#[derive(Debug, Deserialize, Default)]
struct YamlConfig {
    page_width: Option<f64>,
    page_height: Option<f64>,
    strategy: Option<String>,
    preserve_order: Option<bool>,
}

impl YamlConfig {
    fn into_packer_config(self, mut cfg: PackerConfig) -> anyhow::Result<PackerConfig> {
        if let Some(v) = self.page_width {
            cfg.page_width = parse_dimension(&v.to_string()).map_err(anyhow::Error::msg)?;
        }
        if let Some(v) = self.page_height {
            cfg.page_height = parse_dimension(&v.to_string()).map_err(anyhow::Error::msg)?;
        }
        if let Some(v) = self.preserve_order {
            cfg.strategy = Strategy::from_preserve_order(v);
        }
        if let Some(v) = self.strategy {
            cfg.strategy = parse_strategy(&v).map_err(anyhow::Error::msg)?;
        }
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimensions_are_floored() {
        assert_eq!(parse_dimension("2480"), Ok(2480));
        assert_eq!(parse_dimension("2480.9"), Ok(2480));
        assert_eq!(parse_dimension(" 3507.5 "), Ok(3507));
        assert!(parse_dimension("-1").is_err());
        assert!(parse_dimension("wide").is_err());
    }

    #[test]
    fn preserve_order_flag_values() {
        for s in ["true", "YES", "1", "True"] {
            assert_eq!(parse_flag(s), Ok(true), "{s}");
        }
        for s in ["false", "no", "0", ""] {
            assert_eq!(parse_flag(s), Ok(false), "{s}");
        }
    }

    #[test]
    fn strategy_flag_wins_over_preserve_order() {
        let page = PageArgs {
            page_width: Some(100),
            page_height: Some(200),
            strategy: Some(Strategy::Random),
            preserve_order: Some(true),
            config: None,
        };
        let cfg = resolve_config(&page).expect("config");
        assert_eq!(cfg.strategy, Strategy::Random);
        assert_eq!((cfg.page_width, cfg.page_height), (100, 200));
    }

    #[test]
    fn yaml_overlay_applies() {
        let y: YamlConfig =
            serde_yaml::from_str("page_width: 850.5\npreserve_order: false\n").expect("yaml");
        let cfg = y.into_packer_config(PackerConfig::default()).expect("cfg");
        assert_eq!(cfg.page_width, 850);
        assert_eq!(cfg.page_height, PackerConfig::default().page_height);
        assert_eq!(cfg.strategy, Strategy::Random);
    }

    #[test]
    fn zero_page_rejected() {
        let page = PageArgs {
            page_width: Some(0),
            page_height: Some(10),
            strategy: None,
            preserve_order: None,
            config: None,
        };
        assert!(resolve_config(&page).is_err());
    }
}
