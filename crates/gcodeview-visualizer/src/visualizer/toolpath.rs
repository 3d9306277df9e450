//! Toolpath geometry produced by the parser
//!
//! The parser emits [`Waypoint`]s one at a time into a [`GeometryAggregator`],
//! which keeps two views of the same data:
//! - flat per-point streams (position, travel flag, Z) for simple consumers
//! - [`PathSegment`]s, maximal runs of same-classification points that can be
//!   drawn as independent polylines

use super::viewport::Bounds;
use gcodeview_core::Position;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One emitted toolpath point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub position: Position,
    /// Rapid (non-cutting) move
    pub is_travel: bool,
}

impl Waypoint {
    pub fn new(position: Position, is_travel: bool) -> Self {
        Self {
            position,
            is_travel,
        }
    }
}

/// A polyline of consecutive points sharing one classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathSegment {
    pub points: Vec<Position>,
    pub is_travel: bool,
}

impl PathSegment {
    pub fn new(points: Vec<Position>, is_travel: bool) -> Self {
        Self { points, is_travel }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&Position> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&Position> {
        self.points.last()
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::from_points(&self.points)
    }

    /// Polyline length
    pub fn length(&self) -> f32 {
        self.points
            .windows(2)
            .map(|w| w[0].distance_to(&w[1]))
            .sum()
    }
}

/// Which segment classes a view draws
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SegmentFilter {
    #[default]
    All,
    Travel,
    Cutting,
}

impl SegmentFilter {
    pub fn matches(self, segment: &PathSegment) -> bool {
        match self {
            SegmentFilter::All => true,
            SegmentFilter::Travel => segment.is_travel,
            SegmentFilter::Cutting => !segment.is_travel,
        }
    }
}

/// Summary counts and extents of a parsed document
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DocumentStats {
    /// Interpretable (non-empty, non-comment) lines seen
    pub lines_processed: usize,
    /// Arc moves tessellated
    pub arc_count: usize,
    pub total_points: usize,
    pub travel_points: usize,
    pub cutting_points: usize,
    pub travel_segments: usize,
    pub cutting_segments: usize,
    /// Extents of every point, `None` for an empty document
    pub bounds: Option<Bounds>,
    /// Extents of cutting points only
    pub cutting_bounds: Option<Bounds>,
}

/// Result of parsing one G-code document
///
/// The flat streams all have the same length. Concatenating the segments,
/// minus the first point of every segment after the first (the duplicated
/// boundary point), reproduces `points`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParsedDocument {
    pub points: Vec<Position>,
    pub travel_flags: Vec<bool>,
    pub z_values: Vec<f32>,
    pub segments: Vec<PathSegment>,
    lines_processed: usize,
    arc_count: usize,
}

impl ParsedDocument {
    /// Number of points in the flat stream
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterate the flat stream as waypoints
    pub fn waypoints(&self) -> impl Iterator<Item = Waypoint> + '_ {
        self.points
            .iter()
            .zip(&self.travel_flags)
            .map(|(p, t)| Waypoint::new(*p, *t))
    }

    /// Total points across all segments, boundary duplicates included
    pub fn segment_point_count(&self) -> usize {
        self.segments.iter().map(PathSegment::len).sum()
    }

    /// Segments of the requested classes, in document order
    pub fn filtered_segments(&self, filter: SegmentFilter) -> Vec<PathSegment> {
        self.segments
            .iter()
            .filter(|s| filter.matches(s))
            .cloned()
            .collect()
    }

    pub fn bounds(&self) -> Option<Bounds> {
        let bounds = Bounds::from_points(&self.points);
        bounds.is_valid().then_some(bounds)
    }

    /// Bounds of cutting moves only (excluding rapid moves)
    pub fn cutting_bounds(&self) -> Option<Bounds> {
        let bounds = Bounds::from_points(
            self.points
                .iter()
                .zip(&self.travel_flags)
                .filter(|(_, travel)| !**travel)
                .map(|(p, _)| p),
        );
        bounds.is_valid().then_some(bounds)
    }

    pub fn stats(&self) -> DocumentStats {
        let travel_points = self.travel_flags.iter().filter(|t| **t).count();
        let travel_segments = self.segments.iter().filter(|s| s.is_travel).count();
        DocumentStats {
            lines_processed: self.lines_processed,
            arc_count: self.arc_count,
            total_points: self.points.len(),
            travel_points,
            cutting_points: self.points.len() - travel_points,
            travel_segments,
            cutting_segments: self.segments.len() - travel_segments,
            bounds: self.bounds(),
            cutting_bounds: self.cutting_bounds(),
        }
    }
}

/// Builds a [`ParsedDocument`] from a stream of waypoints
#[derive(Debug, Default)]
pub struct GeometryAggregator {
    document: ParsedDocument,
    current: Option<PathSegment>,
}

impl GeometryAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// True until the first waypoint is pushed
    pub fn is_empty(&self) -> bool {
        self.document.points.is_empty()
    }

    pub fn push(&mut self, waypoint: Waypoint) {
        let Waypoint {
            position,
            is_travel,
        } = waypoint;

        self.document.points.push(position);
        self.document.travel_flags.push(is_travel);
        self.document.z_values.push(position.z);

        let same_class = self.current.as_ref().map(|s| s.is_travel == is_travel);
        match (same_class, self.current.take()) {
            (Some(true), Some(mut segment)) => {
                segment.points.push(position);
                self.current = Some(segment);
            }
            (_, Some(closed)) => {
                // Classification changed: close the run and start the next one
                // from the shared boundary point so both are drawable alone.
                let mut points = Vec::with_capacity(2);
                points.extend(closed.last().copied());
                points.push(position);
                self.document.segments.push(closed);
                self.current = Some(PathSegment::new(points, is_travel));
            }
            (_, None) => self.current = Some(PathSegment::new(vec![position], is_travel)),
        }
    }

    pub fn extend(&mut self, waypoints: impl IntoIterator<Item = Waypoint>) {
        for waypoint in waypoints {
            self.push(waypoint);
        }
    }

    pub(crate) fn record_line(&mut self) {
        self.document.lines_processed += 1;
    }

    pub(crate) fn record_arc(&mut self) {
        self.document.arc_count += 1;
    }

    /// Close the running segment and hand over the document
    pub fn finish(mut self) -> ParsedDocument {
        if let Some(segment) = self.current.take() {
            if !segment.is_empty() {
                self.document.segments.push(segment);
            }
        }
        debug!(
            "Toolpath aggregated: {} points in {} segments",
            self.document.points.len(),
            self.document.segments.len()
        );
        self.document
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f32, y: f32) -> Position {
        Position::new(x, y, 0.0)
    }

    #[test]
    fn test_empty_aggregator() {
        let doc = GeometryAggregator::new().finish();
        assert!(doc.is_empty());
        assert!(doc.segments.is_empty());
        assert!(doc.bounds().is_none());
        assert_eq!(doc.stats(), DocumentStats::default());
    }

    #[test]
    fn test_same_class_points_share_segment() {
        let mut agg = GeometryAggregator::new();
        agg.push(Waypoint::new(p(0.0, 0.0), false));
        agg.push(Waypoint::new(p(1.0, 0.0), false));
        agg.push(Waypoint::new(p(2.0, 0.0), false));
        let doc = agg.finish();
        assert_eq!(doc.segments.len(), 1);
        assert_eq!(doc.segments[0].len(), 3);
    }

    #[test]
    fn test_class_change_duplicates_boundary() {
        let mut agg = GeometryAggregator::new();
        agg.extend([
            Waypoint::new(p(0.0, 0.0), true),
            Waypoint::new(p(5.0, 0.0), true),
            Waypoint::new(p(5.0, 5.0), false),
            Waypoint::new(p(0.0, 5.0), false),
            Waypoint::new(p(0.0, 0.0), true),
        ]);
        let doc = agg.finish();

        assert_eq!(doc.segments.len(), 3);
        assert!(doc.segments[0].is_travel);
        assert!(!doc.segments[1].is_travel);
        assert!(doc.segments[2].is_travel);
        assert_eq!(doc.segments[1].points[0], p(5.0, 0.0));
        assert_eq!(doc.segments[2].points, vec![p(0.0, 5.0), p(0.0, 0.0)]);
        assert_eq!(doc.len(), 5);
        assert_eq!(doc.segment_point_count(), 7);
    }

    #[test]
    fn test_stats_and_cutting_bounds() {
        let mut agg = GeometryAggregator::new();
        agg.extend([
            Waypoint::new(Position::new(-50.0, -50.0, 10.0), true),
            Waypoint::new(Position::new(0.0, 0.0, 5.0), true),
            Waypoint::new(Position::new(10.0, 0.0, -1.0), false),
            Waypoint::new(Position::new(10.0, 20.0, -1.0), false),
        ]);
        let doc = agg.finish();
        let stats = doc.stats();

        assert_eq!(stats.total_points, 4);
        assert_eq!(stats.travel_points, 2);
        assert_eq!(stats.cutting_points, 2);
        assert_eq!(stats.travel_segments, 1);
        assert_eq!(stats.cutting_segments, 1);

        let all = stats.bounds.unwrap();
        assert_eq!(all.min_x, -50.0);
        let cut = stats.cutting_bounds.unwrap();
        assert_eq!(cut.min_x, 10.0);
        assert_eq!(cut.max_y, 20.0);
        assert_eq!(cut.max_z, -1.0);
    }

    #[test]
    fn test_segment_filter() {
        let mut agg = GeometryAggregator::new();
        agg.extend([
            Waypoint::new(p(0.0, 0.0), true),
            Waypoint::new(p(1.0, 0.0), false),
            Waypoint::new(p(2.0, 0.0), true),
        ]);
        let doc = agg.finish();
        assert_eq!(doc.filtered_segments(SegmentFilter::All).len(), 3);
        assert_eq!(doc.filtered_segments(SegmentFilter::Travel).len(), 2);
        let cutting = doc.filtered_segments(SegmentFilter::Cutting);
        assert_eq!(cutting.len(), 1);
        assert_eq!(cutting[0].points, vec![p(0.0, 0.0), p(1.0, 0.0)]);
    }

    #[test]
    fn test_z_stream_tracks_points() {
        let mut agg = GeometryAggregator::new();
        agg.push(Waypoint::new(Position::new(0.0, 0.0, 3.0), true));
        agg.push(Waypoint::new(Position::new(0.0, 0.0, -2.0), false));
        let doc = agg.finish();
        assert_eq!(doc.z_values, vec![3.0, -2.0]);
        assert_eq!(doc.travel_flags, vec![true, false]);
    }
}
