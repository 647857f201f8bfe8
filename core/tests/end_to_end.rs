//! End-to-end scenarios exercising the full pipeline: `ConceptRegistry` → `Network` →
//! `find_loops` → `LoopSet::score`.

use cld_core::cell::parse_string_cell;
use cld_core::sequence::Polarity;
use cld_core::{ConceptRegistry, Influence, Link, Network};

fn setup() -> (ConceptRegistry, [cld_core::ConceptId; 4]) {
    let mut registry = ConceptRegistry::new();
    let a = registry.get_or_create("A");
    let b = registry.get_or_create("B");
    let c = registry.get_or_create("C");
    let d = registry.get_or_create("D");
    (registry, [a, b, c, d])
}

#[test]
fn three_cycle_triangle() {
    let (_registry, [a, b, c, _d]) = setup();
    let mut net = Network::new();
    net.add_link(Link::new(a, Influence::Increases, b));
    net.add_link(Link::new(b, Influence::Increases, c));
    net.add_link(Link::new(c, Influence::Increases, a));

    let mut loops = net.find_loops();
    assert_eq!(loops.len(), 1);
    let loop0 = loops.get(cld_core::LoopId(0));
    assert_eq!(loop0.size(), 3);
    assert_eq!(loop0.polarity(), Some(Polarity::Reinforcing));
    assert!(loop0.repr().starts_with("LOOP: 0"));

    // At most one loop touches any concept, so no score entries are emitted.
    let scores = loops.score();
    assert!(scores.is_empty());
}

#[test]
fn balancing_loop() {
    let (_registry, [a, b, c, _d]) = setup();
    let mut net = Network::new();
    net.add_link(Link::new(a, Influence::Increases, b));
    net.add_link(Link::new(b, Influence::Increases, c));
    net.add_link(Link::new(c, Influence::Decreases, a));

    let mut loops = net.find_loops();
    assert_eq!(loops.len(), 1);
    let loop0 = loops.get(cld_core::LoopId(0));
    assert_eq!(loop0.polarity(), Some(Polarity::Balancing));
}

#[test]
fn two_overlapping_cycles_exact_score() {
    let (_registry, [a, b, c, d]) = setup();
    let mut net = Network::new();
    net.add_link(Link::new(a, Influence::Increases, b));
    net.add_link(Link::new(b, Influence::Increases, c));
    net.add_link(Link::new(c, Influence::Increases, a));
    net.add_link(Link::new(b, Influence::Increases, d));
    net.add_link(Link::new(d, Influence::Decreases, a));

    let mut loops = net.find_loops();
    assert_eq!(loops.len(), 2);

    let scores = loops.score();
    // Both loops have size 3 and share concepts A and B; C and D each appear in only one loop.
    assert!(!scores.contains_key(&c));
    assert!(!scores.contains_key(&d));

    // lev_cyclic([0,1,2], [0,1,3]) == 1 (a single substitution); normalized by (3+3) == 1/6.
    let expected = 3.0 + 3.0 * (1.0 / 6.0);
    assert!((scores[&a] - expected).abs() < 1e-9, "score(A) = {}", scores[&a]);
    assert!((scores[&b] - expected).abs() < 1e-9, "score(B) = {}", scores[&b]);
}

#[test]
fn source_sink_pruning_matches_unpruned_graph() {
    let (_registry, [a, b, c, d]) = setup();
    let mut with_extra = ConceptRegistry::new();
    let mut net = Network::new();
    net.add_link(Link::new(a, Influence::Increases, b));
    net.add_link(Link::new(b, Influence::Increases, c));
    net.add_link(Link::new(c, Influence::Increases, a));
    net.add_link(Link::new(b, Influence::Increases, d));
    net.add_link(Link::new(d, Influence::Decreases, a));

    // An isolated chain E -> F: E is a pure source, F a pure sink, neither ever in a cycle.
    let e = with_extra.get_or_create("E");
    let f = with_extra.get_or_create("F");
    net.add_link(Link::new(e, Influence::Increases, f));

    let mut loops = net.find_loops();
    assert_eq!(loops.len(), 2);
    let scores = loops.score();
    let expected = 3.0 + 3.0 * (1.0 / 6.0);
    assert!((scores[&a] - expected).abs() < 1e-9);
    assert!((scores[&b] - expected).abs() < 1e-9);
}

#[test]
fn string_format_cells_match_numeric() {
    for (s, expected_polarity) in [("+ 1", 1), ("- 1", -1), (" 1 ", 1), (" +1", 1)] {
        let cell = parse_string_cell(s).unwrap();
        match cell {
            cld_core::cell::Cell::Edge(p) => assert_eq!(p, expected_polarity, "input {s:?}"),
            cld_core::cell::Cell::NoEdge => panic!("expected an edge for {s:?}"),
        }
    }
    assert_eq!(parse_string_cell("0").unwrap(), cld_core::cell::Cell::NoEdge);
}

#[test]
fn duplicate_input_collapses_to_one_link() {
    let (_registry, [a, b, _c, _d]) = setup();
    let mut links = std::collections::HashSet::new();
    links.insert(Link::new(a, Influence::Increases, b));
    links.insert(Link::new(a, Influence::Increases, b));
    assert_eq!(links.len(), 1);

    let mut net = Network::new();
    for &link in &links {
        net.add_link(link);
    }
    // A single link with no return path has no cycles regardless of dedup.
    let loops = net.find_loops();
    assert_eq!(loops.len(), 0);
}
