//! Numeric tolerances and defaults shared across the workspace.

/// Two positions closer than this on every axis are treated as the same point.
pub const POSITION_EPSILON: f32 = 1e-4;

/// Sweep angles (radians) below this are treated as zero.
pub const ANGLE_EPSILON: f32 = 1e-6;

/// Arc radii below this degrade to a straight line.
pub const MIN_ARC_RADIUS: f32 = 1e-6;

/// Default arc detail multiplier.
pub const DEFAULT_ARC_DETAIL: f32 = 1.0;

/// Arc detail multiplier used by the high-detail preset.
pub const HIGH_ARC_DETAIL: f32 = 4.0;

/// Default cap on segments emitted for a single arc.
pub const DEFAULT_MAX_ARC_SEGMENTS: u32 = 300;

/// Default floor on segments emitted for a single arc.
pub const DEFAULT_MIN_ARC_SEGMENTS: u32 = 4;

/// Default minimum spacing between emitted arc points (document units).
pub const DEFAULT_MIN_SEGMENT_SPACING: f32 = 0.05;

/// Spacing used by the high-detail preset.
pub const HIGH_DETAIL_MIN_SEGMENT_SPACING: f32 = 0.01;

/// Default total point budget before LOD reduction kicks in.
pub const DEFAULT_POINT_BUDGET: usize = 50_000;

/// Default small-feature area/dimension threshold (document units).
pub const DEFAULT_SMALL_FEATURE_THRESHOLD: f32 = 5.0;

/// Small-feature threshold used by the aggressive preset.
pub const AGGRESSIVE_SMALL_FEATURE_THRESHOLD: f32 = 20.0;
