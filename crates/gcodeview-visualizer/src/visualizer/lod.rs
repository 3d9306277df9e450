//! Level of detail for toolpath segments
//!
//! Reduces point counts to fit a render budget. Corners and small features
//! such as tabs and slots survive decimation; long smooth runs are thinned
//! first.

use super::toolpath::PathSegment;
use super::viewport::Bounds;
use gcodeview_core::Position;
use gcodeview_settings::LodSettings;
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use tracing::debug;

/// Segments this short are never decimated.
pub const PASSTHROUGH_MAX_POINTS: usize = 8;

/// Edge-vector dot product below which a vertex is a sharp turn.
pub const SHARP_TURN_DOT: f32 = 0.7;

/// Perimeter-to-area ratio above which a shape is not a simple loop.
const COMPLEXITY_THRESHOLD: f32 = 1.1;

/// cos(45°): turns sharper than this count towards a small feature.
const FEATURE_TURN_DOT: f32 = std::f32::consts::FRAC_1_SQRT_2;

const MIN_FEATURE_TURNS: usize = 2;

/// Detail tier chosen from zoom (pixels per unit)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LodLevel {
    Full,
    Medium,
    Low,
    Minimal,
}

impl LodLevel {
    pub fn from_zoom(pixels_per_unit: f32) -> Self {
        if pixels_per_unit >= 1.0 {
            Self::Full
        } else if pixels_per_unit >= 0.2 {
            Self::Medium
        } else if pixels_per_unit >= 0.05 {
            Self::Low
        } else {
            Self::Minimal
        }
    }

    pub fn budget_divisor(self) -> usize {
        match self {
            Self::Full => 1,
            Self::Medium => 2,
            Self::Low => 4,
            Self::Minimal => 8,
        }
    }

    /// Point budget at this tier; 0 (unlimited) stays unlimited.
    pub fn effective_budget(self, budget: usize) -> usize {
        if budget == 0 {
            0
        } else {
            (budget / self.budget_divisor()).max(1)
        }
    }
}

fn xy(p: &Position) -> Vec2 {
    Vec2::new(p.x, p.y)
}

/// Shoelace area of the closed XY polygon
fn polygon_area(points: &[Position]) -> f32 {
    let n = points.len();
    let twice: f32 = (0..n)
        .map(|i| {
            let (a, b) = (xy(&points[i]), xy(&points[(i + 1) % n]));
            a.perp_dot(b)
        })
        .sum();
    twice.abs() / 2.0
}

/// Perimeter of the closed XY polygon
fn polygon_perimeter(points: &[Position]) -> f32 {
    let n = points.len();
    (0..n)
        .map(|i| xy(&points[i]).distance(xy(&points[(i + 1) % n])))
        .sum()
}

/// Interior vertices whose XY turn exceeds 45 degrees
fn sharp_xy_turns(points: &[Position]) -> usize {
    points
        .windows(3)
        .filter(|w| {
            let e1 = (xy(&w[1]) - xy(&w[0])).normalize_or_zero();
            let e2 = (xy(&w[2]) - xy(&w[1])).normalize_or_zero();
            e1 != Vec2::ZERO && e2 != Vec2::ZERO && e1.dot(e2) < FEATURE_TURN_DOT
        })
        .count()
}

/// Whether a polyline is a small, detailed shape worth keeping dense.
pub fn is_small_feature(points: &[Position], threshold: f32) -> bool {
    if points.len() < 3 {
        return false;
    }

    let bounds = Bounds::from_points(points);
    if bounds.area_xy() >= threshold {
        return false;
    }
    if bounds.width().min(bounds.height()) >= threshold {
        return false;
    }

    let area = polygon_area(points);
    let complex = if area <= f32::EPSILON {
        true
    } else {
        let perimeter = polygon_perimeter(points);
        perimeter * perimeter / (4.0 * PI * area) > COMPLEXITY_THRESHOLD
    };

    complex && sharp_xy_turns(points) >= MIN_FEATURE_TURNS
}

/// True when the edges into and out of `points[i]` turn sharply.
fn is_sharp_turn(points: &[Position], i: usize) -> bool {
    let prev = points[i - 1].to_vec3();
    let here = points[i].to_vec3();
    let next = points[i + 1].to_vec3();
    let e1 = (here - prev).normalize_or_zero();
    let e2 = (next - here).normalize_or_zero();
    e1 != Vec3::ZERO && e2 != Vec3::ZERO && e1.dot(e2) < SHARP_TURN_DOT
}

/// Keep endpoints, every `skip`-th point and sharp turns.
fn decimate(points: &[Position], skip: usize) -> Vec<Position> {
    let last = points.len() - 1;
    points
        .iter()
        .enumerate()
        .filter(|&(i, _)| i == 0 || i == last || i % skip == 0 || is_sharp_turn(points, i))
        .map(|(_, p)| *p)
        .collect()
}

/// Simplify segments so the total point count approaches `budget`.
///
/// A budget of 0 means unlimited. The input is never modified and the same
/// input always yields the same output.
pub fn simplify_segments(
    segments: &[PathSegment],
    budget: usize,
    settings: &LodSettings,
) -> Vec<PathSegment> {
    let total: usize = segments.iter().map(PathSegment::len).sum();
    if budget == 0 || !settings.enabled || total <= budget {
        return segments.to_vec();
    }

    let general_skip = total.div_ceil(budget).max(1);
    let mut small_features = 0usize;

    let simplified: Vec<PathSegment> = segments
        .iter()
        .map(|segment| {
            let n = segment.len();
            if n <= PASSTHROUGH_MAX_POINTS {
                return segment.clone();
            }
            let skip = if settings.preserve_small_features
                && is_small_feature(&segment.points, settings.small_feature_threshold)
            {
                small_features += 1;
                (n / 20).max(2)
            } else {
                general_skip
            };
            PathSegment::new(decimate(&segment.points, skip), segment.is_travel)
        })
        .collect();

    debug!(
        "LOD: {} -> {} points (budget {}, skip {}, {} small features kept dense)",
        total,
        simplified.iter().map(PathSegment::len).sum::<usize>(),
        budget,
        general_skip,
        small_features
    );
    simplified
}
