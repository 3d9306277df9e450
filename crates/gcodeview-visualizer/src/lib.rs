//! # GCodeView Visualizer
//!
//! Toolpath interpretation and level-of-detail geometry for GCodeView.
//! Includes the line preprocessor, the motion state machine, arc
//! tessellation and the LOD simplifier.

pub mod gcode;
pub mod visualizer;

pub use gcode::{
    clean_line, parse_document, parse_field, parse_fields, preprocess, process_line, Field, GCode,
    MotionCommand, ParserState,
};

pub use visualizer::{
    is_small_feature, simplify_segments, tessellate_arc, z_levels, ArcDirection, ArcMove, Bounds,
    DocumentCache, DocumentStats, GeometryAggregator, LodCache, LodCacheKey, LodLevel,
    ParsedDocument, PathSegment, SegmentFilter, ViewState, Visualizer, Waypoint, ZLevel,
    ZLevelMap,
};
