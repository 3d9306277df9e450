//! Motion state machine
//!
//! Tracks the modal state that decides where each line moves the tool:
//! - Motion mode (G00, G01, G02, G03), latched by explicit codes
//! - Plane selection (G17=XY, G18=ZX, G19=YZ)
//! - Distance mode (G90=absolute, G91=incremental)
//! - Origin setting (G92)
//!
//! Every other word is ignored. The state is owned by the caller and
//! threaded through [`process_line`]; [`parse_document`] wraps the whole loop.

use super::command::{parse_fields, Field, GCode};
use super::processors::{clean_line, preprocess};
use crate::visualizer::arc::{tessellate_arc, ArcDirection, ArcMove};
use crate::visualizer::toolpath::{GeometryAggregator, ParsedDocument, Waypoint};
use gcodeview_core::constants::MIN_ARC_RADIUS;
use gcodeview_core::{Plane, Position};
use gcodeview_settings::ParserSettings;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Modal motion command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MotionCommand {
    /// G00
    Rapid,
    /// G01
    Linear,
    /// G02
    ArcCw,
    /// G03
    ArcCcw,
    /// Nothing latched yet
    #[default]
    None,
}

impl MotionCommand {
    fn from_gcode(code: GCode) -> Option<Self> {
        match code {
            GCode::Rapid => Some(Self::Rapid),
            GCode::Linear => Some(Self::Linear),
            GCode::ArcCw => Some(Self::ArcCw),
            GCode::ArcCcw => Some(Self::ArcCcw),
            _ => None,
        }
    }

    fn arc_direction(self) -> Option<ArcDirection> {
        match self {
            Self::ArcCw => Some(ArcDirection::Clockwise),
            Self::ArcCcw => Some(ArcDirection::CounterClockwise),
            _ => None,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Rapid => "Rapid (G00)",
            Self::Linear => "Linear (G01)",
            Self::ArcCw => "Arc CW (G02)",
            Self::ArcCcw => "Arc CCW (G03)",
            Self::None => "None",
        }
    }
}

/// Interpreter state carried from one line to the next
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParserState {
    pub current_position: Position,
    /// G90 when true, G91 when false
    pub absolute_mode: bool,
    pub active_plane: Plane,
    pub last_motion: MotionCommand,
    /// Set once G92 has told us where the machine is
    pub initial_position_established: bool,
    /// True until a line carries an effective motion command
    pub first_motion_pending: bool,
    /// Physical line number, for tracing only
    pub line_number: usize,
}

impl Default for ParserState {
    fn default() -> Self {
        Self {
            current_position: Position::origin(),
            absolute_mode: true,
            active_plane: Plane::XY,
            last_motion: MotionCommand::None,
            initial_position_established: false,
            first_motion_pending: true,
            line_number: 0,
        }
    }
}

impl ParserState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn distance_mode_description(&self) -> &'static str {
        if self.absolute_mode {
            "Absolute (G90)"
        } else {
            "Incremental (G91)"
        }
    }
}

/// What one line asks for, gathered before any state changes
#[derive(Debug, Default)]
struct LineWords {
    motion: Option<MotionCommand>,
    set_origin: bool,
    x: Option<f32>,
    y: Option<f32>,
    z: Option<f32>,
    i: Option<f32>,
    j: Option<f32>,
    k: Option<f32>,
    r: Option<f32>,
}

impl LineWords {
    fn has_coordinates(&self) -> bool {
        self.x.is_some() || self.y.is_some() || self.z.is_some()
    }

    /// Apply the axis words to `from`, absolute or relative.
    fn target(&self, from: Position, absolute: bool) -> Position {
        let axis = |word: Option<f32>, current: f32| match word {
            Some(v) if absolute => v,
            Some(v) => current + v,
            None => current,
        };
        Position::new(axis(self.x, from.x), axis(self.y, from.y), axis(self.z, from.z))
    }

    /// Center offsets in the plane's `(a, b)` order; `None` when neither is given.
    fn plane_offsets(&self, plane: Plane) -> Option<(f32, f32)> {
        let (a, b) = match plane {
            Plane::XY => (self.i, self.j),
            Plane::ZX => (self.k, self.i),
            Plane::YZ => (self.j, self.k),
        };
        if a.is_none() && b.is_none() {
            None
        } else {
            Some((a.unwrap_or(0.0), b.unwrap_or(0.0)))
        }
    }
}

/// Collect the words of one line, applying modal plane and distance codes to
/// `state` as they are seen.
fn gather_words(state: &mut ParserState, fields: &[Field]) -> LineWords {
    let mut words = LineWords::default();
    for field in fields {
        match *field {
            Field::G(code) => match code {
                GCode::Rapid | GCode::Linear | GCode::ArcCw | GCode::ArcCcw => {
                    words.motion = MotionCommand::from_gcode(code);
                }
                GCode::PlaneXY => state.active_plane = Plane::XY,
                GCode::PlaneZX => state.active_plane = Plane::ZX,
                GCode::PlaneYZ => state.active_plane = Plane::YZ,
                GCode::Absolute => state.absolute_mode = true,
                GCode::Incremental => state.absolute_mode = false,
                GCode::SetOrigin => words.set_origin = true,
                GCode::Unsupported(value) => {
                    trace!("Line {}: ignoring G{}", state.line_number, value);
                }
            },
            Field::X(v) => words.x = Some(v),
            Field::Y(v) => words.y = Some(v),
            Field::Z(v) => words.z = Some(v),
            Field::I(v) => words.i = Some(v),
            Field::J(v) => words.j = Some(v),
            Field::K(v) => words.k = Some(v),
            Field::R(v) => words.r = Some(v),
            Field::Other(..) => {}
        }
    }
    words
}

/// Interpret one raw physical line.
///
/// Comments are stripped first. Returns the number of waypoints pushed into
/// `out`.
pub fn process_line(
    state: &mut ParserState,
    line: &str,
    settings: &ParserSettings,
    out: &mut GeometryAggregator,
) -> usize {
    state.line_number += 1;
    match clean_line(line) {
        Some(cleaned) => interpret_line(state, &cleaned, settings, out),
        None => 0,
    }
}

fn interpret_line(
    state: &mut ParserState,
    line: &str,
    settings: &ParserSettings,
    out: &mut GeometryAggregator,
) -> usize {
    out.record_line();
    let fields = parse_fields(line);
    let words = gather_words(state, &fields);

    if words.set_origin {
        // G92 redefines where we are; it never moves the tool.
        let position = words.target(state.current_position, true);
        trace!("Line {}: origin set to {}", state.line_number, position);
        state.current_position = position;
        state.initial_position_established = true;
        return 0;
    }

    let command = match words.motion {
        Some(explicit) => {
            state.last_motion = explicit;
            explicit
        }
        None if words.has_coordinates() => match state.last_motion {
            MotionCommand::None => MotionCommand::Rapid,
            modal => modal,
        },
        None => return 0,
    };

    let start = state.current_position;
    let target = words.target(start, state.absolute_mode);
    let offsets = words.plane_offsets(state.active_plane);

    let first_rapid = state.first_motion_pending
        && !state.initial_position_established
        && command == MotionCommand::Rapid;
    state.first_motion_pending = false;

    // A closed arc is a full circle only when the offsets name a real center.
    let full_circle_candidate = command.arc_direction().is_some()
        && offsets.is_some_and(|(a, b)| a.hypot(b) >= MIN_ARC_RADIUS);
    if start.coincides_with(&target) && !first_rapid && !full_circle_candidate {
        trace!(
            "Line {}: zero-length {} skipped",
            state.line_number,
            command.description()
        );
        return 0;
    }

    let emitted = match command.arc_direction() {
        Some(direction) => {
            let mut arc = ArcMove::new(start, target, state.active_plane, direction, settings);
            arc.center_offset = offsets;
            arc.radius = words.r;
            let points = tessellate_arc(&arc);
            out.record_arc();
            trace!(
                "Line {}: {} -> {} points",
                state.line_number,
                command.description(),
                points.len()
            );
            let count = points.len().saturating_sub(1);
            out.extend(
                points
                    .into_iter()
                    .skip(1)
                    .map(|p| Waypoint::new(p, false)),
            );
            count
        }
        None => {
            let is_travel = command == MotionCommand::Rapid;
            let mut count = 0;
            if out.is_empty() && is_travel {
                out.push(Waypoint::new(start, true));
                count += 1;
            }
            out.push(Waypoint::new(target, is_travel));
            trace!(
                "Line {}: {} {} -> {}",
                state.line_number,
                command.description(),
                start,
                target
            );
            count + 1
        }
    };

    state.current_position = target;
    emitted
}

/// Parse a whole document into toolpath geometry.
///
/// Never fails; unparseable content is skipped and an empty text yields an
/// empty document.
pub fn parse_document(text: &str, settings: &ParserSettings) -> ParsedDocument {
    let mut state = ParserState::new();
    let mut out = GeometryAggregator::new();

    for (line_number, cleaned) in preprocess(text) {
        state.line_number = line_number;
        interpret_line(&mut state, &cleaned, settings, &mut out);
    }

    let document = out.finish();
    let stats = document.stats();
    debug!(
        "Parsed {} lines: {} points ({} travel, {} cutting), {} arcs, final position {}",
        stats.lines_processed,
        stats.total_points,
        stats.travel_points,
        stats.cutting_points,
        stats.arc_count,
        state.current_position
    );
    document
}
