//! The signed digraph and its depth-first, node-eliminating simple-cycle search.

use std::collections::HashMap;

use crate::loop_set::LoopSet;
use crate::model::{ConceptId, Link};
use crate::sequence::Sequence;

/// One vertex: its outbound and inbound links, in insertion order.
#[derive(Debug, Clone, Default)]
struct NodeData {
    outbound: Vec<Link>,
    inbound: Vec<Link>,
}

/// A signed digraph over [`ConceptId`]s.
///
/// Nodes are addressed by a `HashMap`, but each node's link lists are plain `Vec`s so that
/// [`Network::dfs`] iterates outbound links in the order they were inserted, matching
/// `monument`'s graph (`HashMap` of chunks, `Vec<LinkId>` successor/predecessor lists) rather than
/// a map keyed by neighbour.
#[derive(Debug, Clone, Default)]
pub struct Network {
    order: Vec<ConceptId>,
    nodes: HashMap<ConceptId, NodeData>,
}

impl Network {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_node(&mut self, concept: ConceptId) {
        self.nodes.entry(concept).or_insert_with(|| {
            self.order.push(concept);
            NodeData::default()
        });
    }

    /// Inserts `link`, creating its endpoints if needed. Idempotent on a duplicate insert.
    pub fn add_link(&mut self, link: Link) {
        self.ensure_node(link.source);
        self.ensure_node(link.target);
        let outbound = &mut self.nodes.get_mut(&link.source).unwrap().outbound;
        if !outbound.iter().any(|l| l.target == link.target && l.influence == link.influence) {
            outbound.push(link);
        }
        let inbound = &mut self.nodes.get_mut(&link.target).unwrap().inbound;
        if !inbound.iter().any(|l| l.source == link.source && l.influence == link.influence) {
            inbound.push(link);
        }
    }

    pub fn contains_node(&self, concept: ConceptId) -> bool {
        self.nodes.contains_key(&concept)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn is_source(&self, concept: ConceptId) -> bool {
        self.nodes[&concept].inbound.is_empty()
    }

    fn is_sink(&self, concept: ConceptId) -> bool {
        self.nodes[&concept].outbound.is_empty()
    }

    /// Removes `concept` and every link incident to it from its neighbours' tables.
    pub fn remove_node(&mut self, concept: ConceptId) {
        let Some(data) = self.nodes.remove(&concept) else {
            return;
        };
        self.order.retain(|&c| c != concept);
        for link in &data.outbound {
            if let Some(target_data) = self.nodes.get_mut(&link.target) {
                target_data.inbound.retain(|l| l.source != concept);
            }
        }
        for link in &data.inbound {
            if let Some(source_data) = self.nodes.get_mut(&link.source) {
                source_data.outbound.retain(|l| l.target != concept);
            }
        }
    }

    /// Iteratively strips every source and sink until a fixed point is reached.
    pub fn prune(&mut self) {
        loop {
            let dead: Vec<ConceptId> = self
                .order
                .iter()
                .copied()
                .filter(|&c| self.is_source(c) || self.is_sink(c))
                .collect();
            if dead.is_empty() {
                break;
            }
            for concept in dead {
                self.remove_node(concept);
            }
        }
    }

    /// Finds every simple directed cycle, consuming the graph via destructive node elimination.
    pub fn find_loops(&mut self) -> LoopSet {
        let mut loops = LoopSet::new();
        self.prune();
        let snapshot = self.order.clone();
        for root in snapshot {
            if !self.contains_node(root) || self.is_source(root) || self.is_sink(root) {
                continue;
            }
            let mut seq = Sequence::new();
            self.dfs(root, &mut seq, &mut loops);
            self.remove_node(root);
            self.prune();
        }
        loops.finalize();
        loops
    }

    fn dfs(&mut self, current: ConceptId, seq: &mut Sequence, loops: &mut LoopSet) {
        let Some(targets) = self.nodes.get(&current).map(|data| data.outbound.clone()) else {
            return;
        };
        for link in targets {
            seq.append(link)
                .expect("DFS never appends to an already-closed Sequence");
            if seq.is_loop() {
                loops.add(seq.clone());
            } else if !seq.is_closed() && self.contains_node(link.target) {
                self.dfs(link.target, seq, loops);
            }
            seq.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Influence;

    fn link(s: usize, influence: Influence, t: usize) -> Link {
        Link::new(ConceptId(s), influence, ConceptId(t))
    }

    #[test]
    fn prune_strips_sources_and_sinks() {
        let mut net = Network::new();
        // 0 -> 1 -> 2 -> 1 is a cycle on {1,2}; 0 is a pure source and never part of a cycle.
        net.add_link(link(0, Influence::Increases, 1));
        net.add_link(link(1, Influence::Increases, 2));
        net.add_link(link(2, Influence::Increases, 1));
        net.prune();
        assert!(!net.contains_node(ConceptId(0)));
        assert!(net.contains_node(ConceptId(1)));
        assert!(net.contains_node(ConceptId(2)));
    }

    #[test]
    fn find_loops_counts_simple_triangle() {
        let mut net = Network::new();
        net.add_link(link(0, Influence::Increases, 1));
        net.add_link(link(1, Influence::Increases, 2));
        net.add_link(link(2, Influence::Increases, 0));
        let loops = net.find_loops();
        assert_eq!(loops.len(), 1);
    }

    #[test]
    fn find_loops_counts_two_independent_cycles() {
        let mut net = Network::new();
        net.add_link(link(0, Influence::Increases, 1));
        net.add_link(link(1, Influence::Increases, 0));
        net.add_link(link(2, Influence::Increases, 3));
        net.add_link(link(3, Influence::Increases, 2));
        let loops = net.find_loops();
        assert_eq!(loops.len(), 2);
    }

    #[test]
    fn find_loops_on_graph_with_no_cycle_is_empty() {
        let mut net = Network::new();
        net.add_link(link(0, Influence::Increases, 1));
        net.add_link(link(1, Influence::Increases, 2));
        let loops = net.find_loops();
        assert_eq!(loops.len(), 0);
    }

    #[test]
    fn find_loops_dedups_loop_found_from_either_root() {
        let mut net = Network::new();
        net.add_link(link(0, Influence::Increases, 1));
        net.add_link(link(1, Influence::Decreases, 2));
        net.add_link(link(2, Influence::Increases, 0));
        net.add_link(link(0, Influence::Increases, 2));
        net.add_link(link(2, Influence::Decreases, 1));
        net.add_link(link(1, Influence::Increases, 0));
        // Two distinct triangles sharing all three vertices: {0->1->2->0} and {0->2->1->0}.
        let loops = net.find_loops();
        assert_eq!(loops.len(), 2);
    }

    #[test]
    fn add_link_is_idempotent_on_duplicate() {
        let mut net = Network::new();
        net.add_link(link(0, Influence::Increases, 1));
        net.add_link(link(0, Influence::Increases, 1));
        net.add_link(link(1, Influence::Increases, 0));
        let loops = net.find_loops();
        assert_eq!(loops.len(), 1);
    }
}
