//! Loop enumeration and diversity-based centrality scoring for signed causal loop diagrams.
//!
//! This crate is pure analysis: it has no knowledge of files. Callers build a
//! [`model::ConceptRegistry`] and a [`network::Network`] from whatever source they like (a CSV, an
//! XLSX sheet, a hand-written test fixture), then call [`network::Network::find_loops`] to get a
//! finalized [`loop_set::LoopSet`] and [`loop_set::LoopSet::score`] to get per-concept centrality.

pub mod cell;
pub mod edit_distance;
pub mod error;
pub mod loop_set;
pub mod model;
pub mod network;
pub mod sequence;

pub use error::Error;
pub use loop_set::{LoopId, LoopSet};
pub use model::{Concept, ConceptId, ConceptRegistry, Influence, Link};
pub use network::Network;
pub use sequence::{Polarity, Sequence};
