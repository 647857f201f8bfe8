//! Pure parsing of adjacency-matrix cell values into polarities.
//!
//! This module has no file I/O: it consumes whatever scalar value a spreadsheet/CSV adapter
//! handed it and decides whether the cell represents no edge, a positive edge, a negative edge,
//! or an invalid value. Keeping it pure (rather than threading `try`/`except` control flow
//! through the loader, as the reference implementation does) makes it trivially unit-testable.

use std::fmt::{self, Display, Formatter};

/// The outcome of parsing one adjacency-matrix cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    /// The cell was empty, missing, or numerically zero: no edge.
    NoEdge,
    /// The cell parsed to a valid polarity of `+1` or `-1`.
    Edge(i64),
}

/// A cell held a value that isn't empty/zero and isn't `+1`/`-1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellParseError(pub String);

impl Display for CellParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "value {:?} is not empty, +1 or -1", self.0)
    }
}

impl std::error::Error for CellParseError {}

/// Parses a numeric cell value (as read from a spreadsheet's typed cell).
pub fn parse_numeric_cell(value: f64) -> Result<Cell, CellParseError> {
    if value == 0.0 {
        return Ok(Cell::NoEdge);
    }
    let rounded = value.round();
    if (rounded - value).abs() > f64::EPSILON || (rounded != 1.0 && rounded != -1.0) {
        return Err(CellParseError(value.to_string()));
    }
    Ok(Cell::Edge(rounded as i64))
}

/// Parses a string cell value.
///
/// Accepts internal whitespace, a leading `+`, and arbitrary surrounding whitespace, e.g.
/// `"+ 1"`, `"- 1"`, `" 1 "`, `" +1"`. Parsing strips all whitespace and a leading `+`, then
/// parses the remainder as a signed integer.
pub fn parse_string_cell(value: &str) -> Result<Cell, CellParseError> {
    let stripped: String = value.chars().filter(|c| !c.is_whitespace()).collect();
    if stripped.is_empty() || stripped == "0" {
        return Ok(Cell::NoEdge);
    }
    let without_plus = stripped.strip_prefix('+').unwrap_or(&stripped);
    let polarity: i64 = without_plus
        .parse()
        .map_err(|_| CellParseError(value.to_owned()))?;
    match polarity {
        0 => Ok(Cell::NoEdge),
        1 | -1 => Ok(Cell::Edge(polarity)),
        _ => Err(CellParseError(value.to_owned())),
    }
}
