//! A path of [`Link`]s, with the derived flags that classify it as open, closed, or a loop.
//!
//! Equality, hashing and ordering are all defined over a rotation-canonical triple list rather
//! than over the raw `links` vector: two `Sequence`s that are rotations of one another (the
//! common case once a loop has been discovered from more than one starting node) must compare
//! equal so that [`crate::loop_set::LoopSet`] can deduplicate them by key.

use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};

use crate::error::Error;
use crate::model::{ConceptId, Influence, Link};

/// One step of a canonical representation: `(source, influence, target)`.
type Triple = (ConceptId, Influence, ConceptId);

/// A `Reinforcing` (even number of `Decreases` links) or `Balancing` (odd) loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    Reinforcing,
    Balancing,
}

impl Display for Polarity {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Polarity::Reinforcing => f.write_str("REINFORCING"),
            Polarity::Balancing => f.write_str("BALANCING"),
        }
    }
}

/// An ordered path of [`Link`]s, with cached classification.
///
/// `repr_cache` holds a rotation-canonical tuple list once the sequence is a loop; it backs
/// `Eq`/`Hash`/`Ord` directly; the `repr()` string is materialized from it lazily.
#[derive(Debug, Clone)]
pub struct Sequence {
    links: Vec<Link>,
    closed: bool,
    loop_: bool,
    negatives: u32,
    repr_cache: Option<Vec<Triple>>,
}

impl Sequence {
    pub fn new() -> Self {
        Self {
            links: Vec::new(),
            closed: false,
            loop_: false,
            negatives: 0,
            repr_cache: None,
        }
    }

    /// Appends `link` to the path. No-op-but-error if the sequence is already closed.
    pub fn append(&mut self, link: Link) -> Result<(), Error> {
        if self.closed {
            return Err(Error::OrderingInvariant {
                concept: link.source,
            });
        }
        self.links.push(link);
        if link.influence == Influence::Decreases {
            self.negatives += 1;
        }
        self.recompute_closure();
        self.repr_cache = None;
        Ok(())
    }

    /// Removes the most recently appended link, restoring the prior closure state. Used by the
    /// DFS driver's explicit-stack backtracking; panics if the sequence is empty.
    pub fn pop(&mut self) -> Link {
        let link = self.links.pop().expect("pop from an empty Sequence");
        if link.influence == Influence::Decreases {
            self.negatives -= 1;
        }
        self.recompute_closure();
        self.repr_cache = None;
        link
    }

    fn recompute_closure(&mut self) {
        self.closed = false;
        self.loop_ = false;
        let Some(last) = self.links.last() else {
            return;
        };
        if let Some(close_at) = self.links[..self.links.len() - 1]
            .iter()
            .position(|l| l.source == last.target)
        {
            // Closes on an earlier link's source: a loop iff that earlier link is the head.
            self.closed = true;
            self.loop_ = close_at == 0;
        } else if self.links.len() == 1 && last.target == self.links[0].source {
            // A single link from a concept back to itself is a self-loop, excluded by the
            // no-self-loop input contract; `Network` never constructs one.
            self.closed = true;
            self.loop_ = true;
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn is_loop(&self) -> bool {
        self.loop_
    }

    pub fn polarity(&self) -> Option<Polarity> {
        if !self.loop_ {
            return None;
        }
        Some(if self.negatives % 2 == 0 {
            Polarity::Reinforcing
        } else {
            Polarity::Balancing
        })
    }

    /// Rotates the head link to the tail. No-op unless the sequence is a loop.
    pub fn rotate(&mut self) {
        if !self.loop_ || self.links.len() < 2 {
            return;
        }
        let head = self.links.remove(0);
        self.links.push(head);
        self.repr_cache = None;
    }

    /// Rotates until `concept` is the source of the head link, if it occurs as any link's source.
    pub fn rotate_to(&mut self, concept: ConceptId) {
        if !self.loop_ {
            return;
        }
        let Some(target_index) = self.links.iter().position(|l| l.source == concept) else {
            return;
        };
        for _ in 0..target_index {
            self.rotate();
        }
    }

    /// Rotates until the head's source is the minimum `ConceptId` occurring in the loop.
    pub fn rotate_to_canonical(&mut self) {
        if !self.loop_ {
            return;
        }
        let min_concept = self
            .links
            .iter()
            .map(|l| l.source)
            .min()
            .expect("a loop has at least one link");
        self.rotate_to(min_concept);
    }

    fn canonical_triples(&self) -> Vec<Triple> {
        self.links
            .iter()
            .map(|l| (l.source, l.influence, l.target))
            .collect()
    }

    /// The triple list backing `Eq`/`Hash`/`Ord`/`repr()`: the cached one if present (always true
    /// for a [`Sequence::to_canonical`] result), otherwise freshly built from the current
    /// rotation.
    fn triples(&self) -> Vec<Triple> {
        self.repr_cache
            .clone()
            .unwrap_or_else(|| self.canonical_triples())
    }

    /// Materializes and caches the canonical triple list. Callers that need `repr()`, `Eq`,
    /// `Hash` or `Ord` to reflect the loop's *canonical* rotation (rather than whatever rotation
    /// it happens to be in) must call [`Sequence::rotate_to_canonical`] first.
    fn ensure_repr_cache(&mut self) {
        if self.repr_cache.is_none() {
            self.repr_cache = Some(self.canonical_triples());
        }
    }

    /// A short string key: `LOOP: s0+s1-{s2}` style for loops, `SEQUENCE:`/`CLOSED:` diagnostic
    /// prefixes otherwise.
    pub fn repr(&self) -> String {
        let prefix = if self.loop_ {
            "LOOP: "
        } else if self.closed {
            "CLOSED: "
        } else {
            "SEQUENCE: "
        };
        let triples = self.triples();
        let mut out = String::from(prefix);
        for (i, (source, _, _)) in triples.iter().enumerate() {
            if i > 0 {
                out.push(triples[i - 1].1.symbol());
            }
            out.push_str(&source.to_string());
        }
        if let Some((_, influence, target)) = triples.last() {
            out.push(influence.symbol());
            out.push('{');
            out.push_str(&target.to_string());
            out.push('}');
        }
        out
    }

    /// The ordered list of source concept ids; input to [`crate::edit_distance`].
    pub fn ids(&self) -> Vec<ConceptId> {
        self.links.iter().map(|l| l.source).collect()
    }

    /// The ordered list of source concept ids as `u32`s, ready for `lev_cyclic`.
    pub fn id_values(&self) -> Vec<u32> {
        self.links.iter().map(|l| l.source.as_usize() as u32).collect()
    }

    pub fn contains_link(&self, source: ConceptId, target: ConceptId) -> bool {
        self.links
            .iter()
            .any(|l| l.source == source && l.target == target)
    }

    pub fn has_source(&self, concept: ConceptId) -> bool {
        self.links.iter().any(|l| l.source == concept)
    }

    pub fn size(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn head(&self) -> Option<&Link> {
        self.links.first()
    }

    pub fn tail(&self) -> Option<&Link> {
        self.links.last()
    }

    /// Every concept occurring as a source or target in the sequence, in first-occurrence order,
    /// deduplicated.
    pub fn all_concepts(&self) -> Vec<ConceptId> {
        let mut seen = Vec::new();
        for link in &self.links {
            if !seen.contains(&link.source) {
                seen.push(link.source);
            }
            if !seen.contains(&link.target) {
                seen.push(link.target);
            }
        }
        seen
    }

    /// A clone rotated to canonical form, ready for insertion into a [`crate::loop_set::LoopSet`].
    ///
    /// Panics if `self` is not a loop; callers must check [`Sequence::is_loop`] first.
    pub fn to_canonical(&self) -> Sequence {
        assert!(self.loop_, "to_canonical called on a non-loop sequence");
        let mut clone = self.clone();
        clone.rotate_to_canonical();
        clone.ensure_repr_cache();
        clone
    }
}

impl Default for Sequence {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Sequence {
    fn eq(&self, other: &Self) -> bool {
        self.triples().eq(&other.triples())
    }
}

impl Eq for Sequence {}

impl std::hash::Hash for Sequence {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.triples().hash(state);
    }
}

impl PartialOrd for Sequence {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Sequence {
    fn cmp(&self, other: &Self) -> Ordering {
        // Ordering is specified over `repr()`'s lexicographic string form; the triple list sorts
        // identically since ConceptId and Influence both order the same way their ids/symbols do.
        self.repr().cmp(&other.repr())
    }
}

impl Display for Sequence {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.repr())
    }
}
