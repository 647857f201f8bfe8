//! Deduplicated storage of discovered loops, plus greedy diversity-based centrality scoring.

use std::collections::HashMap;

use ordered_float::OrderedFloat;

use crate::edit_distance::lev_cyclic;
use crate::model::ConceptId;
use crate::sequence::Sequence;

/// A dense id assigned to a stored loop once [`LoopSet::finalize`] has run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoopId(pub usize);

/// A deduplicated, eventually-finalized collection of loop [`Sequence`]s.
///
/// Before [`LoopSet::finalize`], loops are keyed by `repr()` in an internal map (insertion order
/// otherwise unspecified). After `finalize`, loops are frozen into a `Vec` sorted by `repr()` and
/// every loop has a stable [`LoopId`] equal to its index.
#[derive(Debug, Clone, Default)]
pub struct LoopSet {
    by_repr: HashMap<String, Sequence>,
    finalized: Vec<Sequence>,
    is_finalized: bool,
    distances: HashMap<(usize, usize), f64>,
}

impl LoopSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Canonicalizes and inserts `seq`. Returns `None` if `seq` is not a loop; returns the stored
    /// (possibly pre-existing) loop otherwise.
    pub fn add(&mut self, seq: Sequence) -> Option<&Sequence> {
        if !seq.is_loop() {
            return None;
        }
        let canon = seq.to_canonical();
        let key = canon.repr();
        self.by_repr.entry(key.clone()).or_insert(canon);
        self.by_repr.get(&key)
    }

    /// Sorts stored loops by `repr()` and assigns dense ids in that order. Idempotent.
    pub fn finalize(&mut self) {
        let mut loops: Vec<Sequence> = self.by_repr.values().cloned().collect();
        loops.sort();
        self.finalized = loops;
        self.is_finalized = true;
    }

    pub fn len(&self) -> usize {
        if self.is_finalized {
            self.finalized.len()
        } else {
            self.by_repr.len()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All finalized loops, in `repr()`-sorted (id) order.
    pub fn loops(&self) -> &[Sequence] {
        &self.finalized
    }

    pub fn get(&self, id: LoopId) -> &Sequence {
        &self.finalized[id.0]
    }

    pub fn containing_concept(&self, concept: ConceptId) -> usize {
        self.finalized
            .iter()
            .filter(|l| l.has_source(concept))
            .count()
    }

    pub fn containing_link(&self, source: ConceptId, target: ConceptId) -> usize {
        self.finalized
            .iter()
            .filter(|l| l.contains_link(source, target))
            .count()
    }

    /// `lev_cyclic(a.ids(), b.ids())`, cached by unordered `(LoopId, LoopId)` pair. Self-distance
    /// is `0` but is never requested by the scoring algorithm.
    fn distance(&mut self, a: LoopId, b: LoopId) -> u32 {
        if a == b {
            return 0;
        }
        let key = if a.0 < b.0 { (a.0, b.0) } else { (b.0, a.0) };
        if let Some(&cached) = self.distances.get(&key) {
            return cached as u32;
        }
        let dist = lev_cyclic(
            &self.finalized[a.0].id_values(),
            &self.finalized[b.0].id_values(),
        );
        self.distances.insert(key, dist as f64);
        dist
    }

    /// The normalized distance used for scoring: raw cyclic edit distance divided by the sum of
    /// the two loops' lengths.
    fn normalized_distance(&mut self, a: LoopId, b: LoopId) -> f64 {
        let raw = self.distance(a, b) as f64;
        let denom = (self.finalized[a.0].size() + self.finalized[b.0].size()) as f64;
        raw / denom
    }

    /// Every [`LoopId`] (in finalized order) of loops whose source list contains `concept`.
    fn loop_ids_containing(&self, concept: ConceptId) -> Vec<LoopId> {
        self.finalized
            .iter()
            .enumerate()
            .filter(|(_, l)| l.has_source(concept))
            .map(|(i, _)| LoopId(i))
            .collect()
    }

    /// Computes the greedy diversity-based centrality score for every concept that is the source
    /// of at least one link in a stored loop. Concepts touched by at most one loop are skipped.
    ///
    /// Requires [`LoopSet::finalize`] to have been called.
    pub fn score(&mut self) -> HashMap<ConceptId, f64> {
        let mut all_concepts: Vec<ConceptId> = Vec::new();
        for l in &self.finalized {
            for c in l.all_concepts() {
                if l.has_source(c) && !all_concepts.contains(&c) {
                    all_concepts.push(c);
                }
            }
        }

        let mut scores = HashMap::new();
        for concept in all_concepts {
            let mut ids = self.loop_ids_containing(concept);
            if ids.len() <= 1 {
                continue;
            }
            // Primary key -size (descending size), secondary key repr() ascending.
            ids.sort_by(|&a, &b| {
                let sa = self.finalized[a.0].size();
                let sb = self.finalized[b.0].size();
                sb.cmp(&sa).then_with(|| {
                    self.finalized[a.0].repr().cmp(&self.finalized[b.0].repr())
                })
            });

            let seed = ids.pop().expect("ids has at least 2 entries");
            let mut total = self.finalized[seed.0].size() as f64;
            let mut last_added = seed;
            let mut best_dist: HashMap<LoopId, f64> =
                ids.iter().map(|&id| (id, 1.0)).collect();

            while !ids.is_empty() {
                for &id in &ids {
                    let d = self.normalized_distance(id, last_added);
                    let entry = best_dist.get_mut(&id).unwrap();
                    *entry = entry.min(d);
                }
                let (pos, &winner) = ids
                    .iter()
                    .enumerate()
                    .min_by_key(|(_, id)| OrderedFloat(best_dist[id]))
                    .expect("ids is non-empty inside the loop");
                ids.remove(pos);
                total += self.finalized[winner.0].size() as f64 * best_dist[&winner];
                last_added = winner;
            }

            scores.insert(concept, total);
        }
        scores
    }
}
