//! Toolpath geometry module
//!
//! This module provides:
//! - Arc tessellation
//! - Toolpath aggregation into flat streams and segments
//! - Level-of-detail simplification and its caches
//! - Z-level analysis for depth shading
//! - The `Visualizer` facade tying it together

pub mod arc;
pub mod lod;
pub mod toolpath;
pub mod toolpath_cache;
pub mod viewport;
pub mod visualizer;
pub mod z_levels;

pub use arc::{tessellate_arc, ArcDirection, ArcMove};
pub use lod::{is_small_feature, simplify_segments, LodLevel};
pub use toolpath::{
    DocumentStats, GeometryAggregator, ParsedDocument, PathSegment, SegmentFilter, Waypoint,
};
pub use toolpath_cache::{DocumentCache, LodCache, LodCacheKey};
pub use viewport::{Bounds, ViewState};
pub use visualizer::Visualizer;
pub use z_levels::{z_levels, ZLevel, ZLevelMap};
