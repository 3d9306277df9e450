//! Command-line front end
//!
//! Parses one G-code file and reports its statistics, Z levels and the point
//! counts the LOD simplifier would draw at a given zoom.

use anyhow::{Context, Result};
use clap::Parser;
use gcodeview_settings::{default_config_path, Config, Preset};
use gcodeview_visualizer::{
    DocumentStats, LodLevel, PathSegment, SegmentFilter, ViewState, Visualizer, ZLevel,
};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Command-line arguments for the gcodeview binary
#[derive(Debug, Parser)]
#[command(name = "gcodeview")]
#[command(about = "Interpret a G-code file into toolpath geometry and report on it")]
#[command(version)]
pub struct Args {
    /// G-code file to interpret
    pub file: PathBuf,

    /// Configuration file (.toml or .json)
    #[arg(long, conflicts_with = "preset")]
    pub config: Option<PathBuf>,

    /// Named preset instead of a configuration file
    #[arg(long, help = "Preset name (standard, high-detail, aggressive)")]
    pub preset: Option<Preset>,

    /// Override the LOD point budget (0 = unlimited)
    #[arg(long)]
    pub budget: Option<usize>,

    /// Zoom in pixels per unit used to pick the LOD tier
    #[arg(long, default_value_t = 1.0)]
    pub zoom: f32,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Log level when RUST_LOG is not set
    #[arg(
        long,
        default_value = "warn",
        help = "Log level (trace, debug, info, warn, error)"
    )]
    pub log_level: String,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,
}

/// LOD outcome for the requested zoom
#[derive(Debug, Clone, Serialize)]
pub struct LodReport {
    pub zoom: f32,
    pub level: LodLevel,
    pub budget: usize,
    pub segments: usize,
    pub points_before: usize,
    pub points_after: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub file: PathBuf,
    pub stats: DocumentStats,
    pub z_levels: Vec<ZLevel>,
    pub lod: LodReport,
}

/// Resolve settings: explicit file, then preset, then the user config file,
/// then defaults. `--budget` is applied last.
pub fn resolve_config(args: &Args) -> Result<Config> {
    let mut config = match (&args.config, args.preset) {
        (Some(path), _) => Config::load_from_file(path)
            .with_context(|| format!("could not load config {}", path.display()))?,
        (None, Some(preset)) => Config::from_preset(preset),
        (None, None) => match default_config_path().filter(|p| p.exists()) {
            Some(path) => Config::load_from_file(&path)
                .with_context(|| format!("could not load config {}", path.display()))?,
            None => Config::default(),
        },
    };

    if let Some(budget) = args.budget {
        config.lod.point_budget = budget;
    }
    config.validate().context("invalid configuration")?;
    debug!("Resolved config: {:?}", config);
    Ok(config)
}

fn point_count(segments: &[PathSegment]) -> usize {
    segments.iter().map(PathSegment::len).sum()
}

/// Build the report for an already parsed visualizer.
pub fn build_report(file: &Path, visualizer: &mut Visualizer, zoom: f32) -> Report {
    let stats = visualizer.stats();
    let z_levels = visualizer.z_levels().levels().to_vec();
    let points_before = visualizer.document().segment_point_count();
    let level = LodLevel::from_zoom(zoom);
    let budget = level.effective_budget(visualizer.config().lod.point_budget);

    let view = ViewState::with_zoom(zoom);
    let simplified = visualizer.render_segments(view, SegmentFilter::All);
    let lod = LodReport {
        zoom,
        level,
        budget,
        segments: simplified.len(),
        points_before,
        points_after: point_count(simplified),
    };

    Report {
        file: file.to_path_buf(),
        stats,
        z_levels,
        lod,
    }
}

/// Read, interpret and report on the file named in `args`.
pub fn run(args: &Args) -> Result<Report> {
    let config = resolve_config(args)?;
    let text = std::fs::read_to_string(&args.file)
        .with_context(|| format!("could not read {}", args.file.display()))?;

    let mut visualizer = Visualizer::with_config(config);
    visualizer.parse_gcode(&text);
    let report = build_report(&args.file, &mut visualizer, args.zoom);
    info!(
        "{}: {} points, {} after LOD",
        args.file.display(),
        report.stats.total_points,
        report.lod.points_after
    );
    Ok(report)
}

/// Human-readable rendering of a report
pub fn format_report(report: &Report) -> String {
    let mut out = String::new();
    let s = &report.stats;
    let _ = writeln!(out, "File: {}", report.file.display());
    let _ = writeln!(out, "Lines interpreted: {}", s.lines_processed);
    let _ = writeln!(out, "Arcs: {}", s.arc_count);
    let _ = writeln!(
        out,
        "Points: {} ({} travel, {} cutting)",
        s.total_points, s.travel_points, s.cutting_points
    );
    let _ = writeln!(
        out,
        "Segments: {} travel, {} cutting",
        s.travel_segments, s.cutting_segments
    );
    if let Some(b) = s.bounds {
        let _ = writeln!(
            out,
            "Bounds: X {:.3}..{:.3}  Y {:.3}..{:.3}  Z {:.3}..{:.3}",
            b.min_x, b.max_x, b.min_y, b.max_y, b.min_z, b.max_z
        );
    }

    let _ = writeln!(out, "Z levels:");
    for level in &report.z_levels {
        let _ = writeln!(out, "  {:>10.3} -> {:.3}", level.z, level.level);
    }

    let lod = &report.lod;
    let _ = writeln!(
        out,
        "LOD at zoom {}: {:?} (budget {}), {} -> {} points in {} segments",
        lod.zoom, lod.level, lod.budget, lod.points_before, lod.points_after, lod.segments
    );
    out
}

/// Report as pretty JSON
pub fn report_json(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).context("could not serialize report")
}
