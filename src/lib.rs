//! # GCodeView
//!
//! A G-code toolpath interpreter and level-of-detail geometry engine for CNC
//! visualization:
//! - Modal motion state machine (G0-G3, G17-G19, G90/G91, G92)
//! - Adaptive arc tessellation in all three planes
//! - Feature-preserving point reduction for large programs
//!
//! ## Architecture
//!
//! GCodeView is organized as a workspace with multiple crates:
//!
//! 1. **gcodeview-core** - Position and plane types, tolerances, errors
//! 2. **gcodeview-settings** - Parser and LOD configuration, presets, files
//! 3. **gcodeview-visualizer** - Parser, tessellation, LOD, caches
//! 4. **gcodeview** - Command-line binary that integrates all crates

pub mod cli;

pub use gcodeview_core::{Error, Plane, Position, Result, SettingsError};

pub use gcodeview_settings::{default_config_path, Config, LodSettings, ParserSettings, Preset};

pub use gcodeview_visualizer::{
    parse_document, simplify_segments, z_levels, Bounds, DocumentStats, LodLevel, ParsedDocument,
    PathSegment, SegmentFilter, ViewState, Visualizer, ZLevelMap,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging
///
/// Sets up structured logging with:
/// - Output on stderr so reports on stdout stay clean
/// - RUST_LOG environment variable support, falling back to `default_level`
/// - Pretty or JSON-lines formatting
pub fn init_logging(default_level: &str, json: bool) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))?;

    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        let fmt_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true)
            .json();
        registry.with(fmt_layer).try_init()?;
    } else {
        let fmt_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true)
            .with_line_number(true);
        registry.with(fmt_layer).try_init()?;
    }

    Ok(())
}
