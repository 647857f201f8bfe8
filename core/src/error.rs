//! The crate's error taxonomy.
//!
//! Errors are a plain enum with manual [`Display`]/[`std::error::Error`] impls, matching
//! `bellframe`'s `mask::ParseError` rather than reaching for a derive-macro crate: the set of
//! variants is small and stable, and each one needs a distinct, hand-written message.

use std::fmt::{self, Display, Formatter};

use crate::model::ConceptId;

/// Errors that can occur while building or querying an analysis.
///
/// `CellParse` is raised by adapters (not by this crate directly) for individual bad cells; it is
/// non-fatal and is expected to be logged and skipped rather than propagated. `OrderingInvariant`
/// is defensive: the design of [`crate::network::Network::find_loops`] guarantees it can't occur.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The source file does not exist or cannot be opened.
    InputMissing { path: String },
    /// The sheet lacks a header row/column, or the file type is unsupported.
    InputFormat { detail: String },
    /// A single cell held a value that isn't `+1` or `-1`.
    CellParse {
        source: String,
        target: String,
        value: String,
    },
    /// An attempt was made to append a [`crate::model::Link`] to a [`crate::sequence::Sequence`]
    /// that is already closed.
    OrderingInvariant { concept: ConceptId },
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Error::InputMissing { path } => write!(f, "input file not found: {path}"),
            Error::InputFormat { detail } => write!(f, "malformed input: {detail}"),
            Error::CellParse {
                source,
                target,
                value,
            } => write!(
                f,
                "invalid polarity {value:?} for {source} -> {target}, expected +1 or -1"
            ),
            Error::OrderingInvariant { concept } => write!(
                f,
                "attempted to extend a closed sequence at concept {concept}"
            ),
        }
    }
}

impl std::error::Error for Error {}
