//! Concepts and links: the vertices and edges of a causal loop diagram.

use std::collections::HashMap;
use std::fmt::{self, Display, Formatter};

/// The unique identifier of a [`Concept`] within one analysis.
///
/// Ids are dense, start at 0, and are assigned in order of first occurrence by a
/// [`ConceptRegistry`].  Equality and ordering of [`Concept`]s are entirely determined by this id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConceptId(pub(crate) usize);

impl ConceptId {
    #[inline(always)]
    pub fn as_usize(self) -> usize {
        self.0
    }
}

impl Display for ConceptId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named vertex in a causal loop diagram.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Concept {
    id: ConceptId,
    name: String,
}

impl Concept {
    pub fn id(&self) -> ConceptId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Display for Concept {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Maps concept names to [`Concept`]s, assigning dense ids in first-occurrence order.
///
/// Owned by the analysis driver and constructed fresh per run, so that ids are deterministic
/// given the input order — never a process-wide/`static` counter.
#[derive(Debug, Clone, Default)]
pub struct ConceptRegistry {
    by_name: HashMap<String, ConceptId>,
    concepts: Vec<Concept>,
}

impl ConceptRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the [`Concept`] for `name`, creating it (with a freshly assigned id) if this is
    /// the first time `name` has been seen.
    pub fn get_or_create(&mut self, name: &str) -> ConceptId {
        let trimmed = name.trim();
        if let Some(&id) = self.by_name.get(trimmed) {
            return id;
        }
        let id = ConceptId(self.concepts.len());
        self.concepts.push(Concept {
            id,
            name: trimmed.to_owned(),
        });
        self.by_name.insert(trimmed.to_owned(), id);
        id
    }

    pub fn get(&self, id: ConceptId) -> &Concept {
        &self.concepts[id.0]
    }

    /// All concepts, in creation order (i.e. sorted by [`ConceptId`]).
    pub fn iter(&self) -> impl Iterator<Item = &Concept> {
        self.concepts.iter()
    }

    pub fn len(&self) -> usize {
        self.concepts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }
}

/// The sign of a causal [`Link`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Influence {
    /// A positive (reinforcing) influence: an increase in the source tends to increase the
    /// target.
    Increases,
    /// A negative (balancing) influence: an increase in the source tends to decrease the target.
    Decreases,
}

impl Influence {
    /// Converts a parsed polarity of `+1` or `-1` into an [`Influence`].
    ///
    /// # Panics
    ///
    /// Panics if `polarity` is not `1` or `-1`; callers are expected to have already validated
    /// this via [`crate::cell::parse_polarity`].
    pub fn from_polarity(polarity: i64) -> Self {
        match polarity {
            1 => Influence::Increases,
            -1 => Influence::Decreases,
            other => panic!("invalid polarity {other}, expected +1 or -1"),
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Influence::Increases => '+',
            Influence::Decreases => '-',
        }
    }

    /// The uppercase identifier used in report output (`INCREASES` / `DECREASES`).
    pub fn report_name(self) -> &'static str {
        match self {
            Influence::Increases => "INCREASES",
            Influence::Decreases => "DECREASES",
        }
    }
}

impl Display for Influence {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.report_name())
    }
}

/// A directed, signed edge between two concepts.
///
/// Equal iff source, influence and target are all equal; this gives the set semantics required
/// when the same cell is encountered twice in an input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Link {
    pub source: ConceptId,
    pub influence: Influence,
    pub target: ConceptId,
}

impl Link {
    pub fn new(source: ConceptId, influence: Influence, target: ConceptId) -> Self {
        Self {
            source,
            influence,
            target,
        }
    }
}
