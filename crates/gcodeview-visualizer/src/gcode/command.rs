//! G-Code word parsing
//!
//! Splits a cleaned line into typed fields. Only the letters that affect
//! position or modal geometry get their own variant; everything else is kept
//! as [`Field::Other`] so callers can see it without the motion engine caring.

use serde::{Deserialize, Serialize};
use tracing::trace;

/// One `<letter><number>` word from a G-Code line
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Field {
    /// Motion or modal code (G0, G17, G90, ...)
    G(GCode),
    X(f32),
    Y(f32),
    Z(f32),
    /// Arc center offset along X
    I(f32),
    /// Arc center offset along Y
    J(f32),
    /// Arc center offset along Z
    K(f32),
    /// Arc radius
    R(f32),
    /// Feed, spindle, tool, M-codes, line numbers and anything else
    Other(char, f32),
}

/// G codes understood by the motion engine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GCode {
    /// G0
    Rapid,
    /// G1
    Linear,
    /// G2
    ArcCw,
    /// G3
    ArcCcw,
    /// G17
    PlaneXY,
    /// G18
    PlaneZX,
    /// G19
    PlaneYZ,
    /// G90
    Absolute,
    /// G91
    Incremental,
    /// G92
    SetOrigin,
    /// Any other G code (dwell, units, work offsets, canned cycles, ...)
    Unsupported(f32),
}

impl GCode {
    /// Classify a G word value. `G01`, `G1` and `G1.0` are the same code.
    pub fn from_value(value: f32) -> Self {
        let tenths = (value * 10.0).round() as i32;
        match tenths {
            0 => Self::Rapid,
            10 => Self::Linear,
            20 => Self::ArcCw,
            30 => Self::ArcCcw,
            170 => Self::PlaneXY,
            180 => Self::PlaneZX,
            190 => Self::PlaneYZ,
            900 => Self::Absolute,
            910 => Self::Incremental,
            920 => Self::SetOrigin,
            _ => Self::Unsupported(value),
        }
    }
}

/// Parse a single word like `X10.5` or `g01`.
///
/// Returns `None` for words without a leading ASCII letter or whose
/// remainder is not a finite number.
pub fn parse_field(word: &str) -> Option<Field> {
    let mut chars = word.chars();
    let letter = chars.next()?.to_ascii_uppercase();
    if !letter.is_ascii_alphabetic() {
        return None;
    }

    let value = match chars.as_str().parse::<f32>() {
        Ok(v) if v.is_finite() => v,
        _ => {
            trace!("Dropping unparseable field '{}'", word);
            return None;
        }
    };

    Some(match letter {
        'G' => Field::G(GCode::from_value(value)),
        'X' => Field::X(value),
        'Y' => Field::Y(value),
        'Z' => Field::Z(value),
        'I' => Field::I(value),
        'J' => Field::J(value),
        'K' => Field::K(value),
        'R' => Field::R(value),
        other => Field::Other(other, value),
    })
}

/// Split a cleaned line on whitespace and parse every word.
pub fn parse_fields(line: &str) -> Vec<Field> {
    line.split_whitespace().filter_map(parse_field).collect()
}
