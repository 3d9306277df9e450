//! Arc tessellation for G2/G3 moves
//!
//! Converts a circular interpolation into a polyline. Segment density adapts
//! to the radius: tight fillets and tabs get short chords, large sweeps get
//! long ones, and the total is clamped to the configured bounds.
//!
//! Angles are measured with `atan2(b, a)` over the active plane's axis pair
//! (see [`Plane::project`]), so counter-clockwise is always a positive sweep
//! about the plane normal.

use gcodeview_core::constants::{ANGLE_EPSILON, MIN_ARC_RADIUS, POSITION_EPSILON};
use gcodeview_core::{Plane, Position};
use gcodeview_settings::ParserSettings;
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, TAU};
use tracing::trace;

/// Sweeps within this many radians of a quarter turn count as corners.
const QUARTER_TURN_TOLERANCE: f32 = 0.2;

/// Segment floor for quarter-turn corners on small radii.
pub const QUARTER_ARC_MIN_SEGMENTS: u32 = 16;

/// Radius below which quarter-turn corners get the extra floor.
const SMALL_CORNER_RADIUS: f32 = 3.0;

/// Spacing-based point skipping only applies at or above this radius.
const SPACING_FILTER_MIN_RADIUS: f32 = 1.0;

/// Rotation direction of an arc move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArcDirection {
    /// G2
    Clockwise,
    /// G3
    CounterClockwise,
}

impl ArcDirection {
    /// +1 for counter-clockwise, -1 for clockwise
    fn sign(self) -> f32 {
        match self {
            ArcDirection::Clockwise => -1.0,
            ArcDirection::CounterClockwise => 1.0,
        }
    }
}

/// Everything needed to tessellate one arc
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcMove {
    pub start: Position,
    pub end: Position,
    pub plane: Plane,
    pub direction: ArcDirection,
    /// Center offset from `start` in the plane's `(a, b)` axis order
    pub center_offset: Option<(f32, f32)>,
    /// Explicit radius (R word); negative selects the major arc
    pub radius: Option<f32>,
    pub detail_multiplier: f32,
    pub min_segments: u32,
    pub max_segments: u32,
    pub min_spacing: f32,
    /// Interpolate the out-of-plane axis from start to end
    pub helical: bool,
}

impl ArcMove {
    /// Arc with parser settings applied and no center information yet
    pub fn new(
        start: Position,
        end: Position,
        plane: Plane,
        direction: ArcDirection,
        settings: &ParserSettings,
    ) -> Self {
        Self {
            start,
            end,
            plane,
            direction,
            center_offset: None,
            radius: None,
            detail_multiplier: settings.arc_detail_multiplier,
            min_segments: settings.min_arc_segments,
            max_segments: settings.max_arc_segments,
            min_spacing: settings.min_segment_spacing,
            helical: settings.helical_interpolation,
        }
    }

    pub fn with_center_offset(mut self, a: f32, b: f32) -> Self {
        self.center_offset = Some((a, b));
        self
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = Some(radius);
        self
    }

    /// Start and end share a point in the active plane. The normal axis may
    /// still differ, as on one turn of a helix.
    pub fn closes_in_plane(&self) -> bool {
        let (sa, sb, _) = self.plane.project(self.start);
        let (ea, eb, _) = self.plane.project(self.end);
        (sa - ea).abs() <= POSITION_EPSILON && (sb - eb).abs() <= POSITION_EPSILON
    }
}

/// Resolved circle in plane coordinates
#[derive(Debug, Clone, Copy)]
struct Circle {
    center_a: f32,
    center_b: f32,
    radius: f32,
}

fn resolve_circle(arc: &ArcMove) -> Option<Circle> {
    let (sa, sb, _) = arc.plane.project(arc.start);
    let (ea, eb, _) = arc.plane.project(arc.end);

    if let Some((off_a, off_b)) = arc.center_offset {
        let center_a = sa + off_a;
        let center_b = sb + off_b;
        let radius = match arc.radius {
            Some(r) => r.abs(),
            None => (sa - center_a).hypot(sb - center_b),
        };
        return Some(Circle {
            center_a,
            center_b,
            radius,
        });
    }

    let r = arc.radius?;
    let radius = r.abs();
    let (dx, dy) = (ea - sa, eb - sb);
    let chord = dx.hypot(dy);
    if chord < MIN_ARC_RADIUS || radius < MIN_ARC_RADIUS {
        return None;
    }

    // Center sits on the chord's perpendicular bisector; left of the chord
    // for a CCW minor arc, right for CW, flipped for a negative (major) R.
    let half = chord / 2.0;
    let h = (radius * radius - half * half).max(0.0).sqrt();
    let side = arc.direction.sign() * r.signum();
    let (mid_a, mid_b) = ((sa + ea) / 2.0, (sb + eb) / 2.0);
    let (left_a, left_b) = (-dy / chord, dx / chord);
    Some(Circle {
        center_a: mid_a + side * h * left_a,
        center_b: mid_b + side * h * left_b,
        radius: radius.max(half),
    })
}

/// Signed sweep from `start_angle` to `end_angle` in the given direction.
///
/// `None` means the arc collapses to a straight line.
fn sweep_angle(
    start_angle: f32,
    end_angle: f32,
    direction: ArcDirection,
    closed: bool,
) -> Option<f32> {
    let mut end = end_angle;
    match direction {
        ArcDirection::CounterClockwise => {
            while end < start_angle {
                end += TAU;
            }
        }
        ArcDirection::Clockwise => {
            while end > start_angle {
                end -= TAU;
            }
        }
    }
    let sweep = end - start_angle;

    if sweep.abs() < ANGLE_EPSILON {
        // Same start and end angle: full circle if the points meet in the
        // plane, otherwise the offsets were inconsistent and a line is the
        // best guess.
        return closed.then(|| direction.sign() * TAU);
    }
    if closed && (sweep.abs() - TAU).abs() > 1e-3 {
        // Angular noise on a full circle landed just past the start angle.
        return Some(direction.sign() * TAU);
    }
    Some(sweep)
}

/// Target chord length for a radius before the detail multiplier.
fn base_segment_length(radius: f32) -> f32 {
    if radius < 1.0 {
        0.05
    } else if radius < 3.0 {
        0.1
    } else if radius < 10.0 {
        0.25
    } else {
        0.5
    }
}

/// Number of chords for an arc of `radius` sweeping `sweep` radians.
pub fn segment_count(radius: f32, sweep: f32, arc: &ArcMove) -> u32 {
    let target = base_segment_length(radius) / arc.detail_multiplier.max(f32::EPSILON);
    let arc_length = radius * sweep.abs();
    let raw = (arc_length / target).ceil();
    let max = arc.max_segments.max(1);
    let min = arc.min_segments.clamp(1, max);
    let mut segments = if raw.is_finite() {
        (raw as u32).clamp(min, max)
    } else {
        max
    };

    if radius < SMALL_CORNER_RADIUS && (sweep.abs() - FRAC_PI_2).abs() < QUARTER_TURN_TOLERANCE {
        segments = segments.max(QUARTER_ARC_MIN_SEGMENTS);
    }
    segments
}

/// Tessellate an arc into an ordered polyline.
///
/// The first point is `arc.start` and the last is exactly `arc.end`.
/// Arcs without usable center information, with a degenerate radius, or
/// with a zero sweep between distinct points come back as `[start, end]`.
pub fn tessellate_arc(arc: &ArcMove) -> Vec<Position> {
    let line = || vec![arc.start, arc.end];

    let Some(circle) = resolve_circle(arc) else {
        trace!("Arc without center or radius, treating as line segment");
        return line();
    };
    if !circle.radius.is_finite() || circle.radius < MIN_ARC_RADIUS {
        trace!("Arc radius {:.6} degenerate, treating as line segment", circle.radius);
        return line();
    }

    let (sa, sb, sn) = arc.plane.project(arc.start);
    let (ea, eb, en) = arc.plane.project(arc.end);
    let start_angle = (sb - circle.center_b).atan2(sa - circle.center_a);
    let end_angle = (eb - circle.center_b).atan2(ea - circle.center_a);
    let closed = arc.closes_in_plane();

    let Some(sweep) = sweep_angle(start_angle, end_angle, arc.direction, closed) else {
        trace!("Arc sweep rounds to zero between distinct points, treating as line segment");
        return line();
    };

    let segments = segment_count(circle.radius, sweep, arc);
    trace!(
        "Arc: center=({:.3},{:.3}) radius={:.4} sweep={:.4} segments={} plane={:?} dir={:?}",
        circle.center_a,
        circle.center_b,
        circle.radius,
        sweep,
        segments,
        arc.plane,
        arc.direction
    );

    let skip_close_points = circle.radius >= SPACING_FILTER_MIN_RADIUS && arc.min_spacing > 0.0;
    let mut points = Vec::with_capacity(segments as usize + 1);
    points.push(arc.start);

    for i in 1..segments {
        let t = i as f32 / segments as f32;
        let angle = start_angle + t * sweep;
        let normal = if arc.helical { sn + (en - sn) * t } else { sn };
        let point = arc.plane.compose(
            circle.center_a + circle.radius * angle.cos(),
            circle.center_b + circle.radius * angle.sin(),
            normal,
        );

        if skip_close_points {
            if let Some(prev) = points.last() {
                if prev.distance_to(&point) < arc.min_spacing {
                    continue;
                }
            }
        }
        points.push(point);
    }

    // The end point is always emitted exactly so consecutive moves stay joined.
    points.push(arc.end);
    points
}

/// Signed sweep of an arc move, if it tessellates as an arc at all.
pub fn arc_sweep(arc: &ArcMove) -> Option<f32> {
    let circle = resolve_circle(arc)?;
    if !circle.radius.is_finite() || circle.radius < MIN_ARC_RADIUS {
        return None;
    }
    let (sa, sb, _) = arc.plane.project(arc.start);
    let (ea, eb, _) = arc.plane.project(arc.end);
    let start_angle = (sb - circle.center_b).atan2(sa - circle.center_a);
    let end_angle = (eb - circle.center_b).atan2(ea - circle.center_a);
    sweep_angle(start_angle, end_angle, arc.direction, arc.closes_in_plane())
}

/// Largest distance of any tessellated point from the ideal circle.
#[doc(hidden)]
pub fn max_radial_error(arc: &ArcMove, points: &[Position]) -> Option<f32> {
    let circle = resolve_circle(arc)?;
    points
        .iter()
        .map(|p| {
            let (a, b, _) = arc.plane.project(*p);
            ((a - circle.center_a).hypot(b - circle.center_b) - circle.radius).abs()
        })
        .reduce(f32::max)
}
