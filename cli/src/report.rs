//! Writes the four result artifacts produced by one analysis run.

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use cld_core::{ConceptId, ConceptRegistry, Influence, Link, LoopSet};
use itertools::Itertools;
use ordered_float::OrderedFloat;
use serde::Serialize;

#[derive(Serialize)]
struct ConceptNodeRow<'a> {
    id: &'a str,
    #[serde(rename = "numberOfLoops")]
    number_of_loops: usize,
    #[serde(rename = "relevanceScore")]
    relevance_score: f64,
}

#[derive(Serialize)]
struct ConceptLinkRow<'a> {
    source: &'a str,
    target: &'a str,
    #[serde(rename = "linkInfluence")]
    link_influence: &'static str,
    #[serde(rename = "loopsTraversing")]
    loops_traversing: usize,
}

#[derive(Serialize)]
struct LoopNodeRow {
    id: String,
    size: usize,
}

/// Writes `{prefix}_concept_nodes.csv`: one row per concept ever created, in creation order.
pub fn write_concept_nodes(
    prefix: &str,
    registry: &ConceptRegistry,
    loops: &LoopSet,
    scores: &HashMap<ConceptId, f64>,
) -> std::io::Result<()> {
    let path = format!("{prefix}_concept_nodes.csv");
    let mut writer = csv::Writer::from_writer(BufWriter::new(File::create(&path)?));
    for concept in registry.iter() {
        let row = ConceptNodeRow {
            id: concept.name(),
            number_of_loops: loops.containing_concept(concept.id()),
            relevance_score: scores.get(&concept.id()).copied().unwrap_or(0.0),
        };
        writer
            .serialize(row)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    }
    writer.flush()?;
    log::info!("wrote concept scores to {path}");
    Ok(())
}

/// Writes `{prefix}_concept_links.csv`: one row per input link touched by at least one loop.
pub fn write_concept_links(
    prefix: &str,
    registry: &ConceptRegistry,
    all_links: &HashSet<Link>,
    loops: &LoopSet,
) -> std::io::Result<()> {
    let path = format!("{prefix}_concept_links.csv");
    let mut writer = csv::Writer::from_writer(BufWriter::new(File::create(&path)?));
    for link in all_links {
        let count = loops.containing_link(link.source, link.target);
        if count == 0 {
            continue;
        }
        let row = ConceptLinkRow {
            source: registry.get(link.source).name(),
            target: registry.get(link.target).name(),
            link_influence: link.influence.report_name(),
            loops_traversing: count,
        };
        writer
            .serialize(row)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    }
    writer.flush()?;
    log::info!("wrote link information to {path}");
    Ok(())
}

/// Writes `{prefix}_loop_nodes.csv`: one row per stored loop, sorted by size descending.
pub fn write_loop_nodes(prefix: &str, loops: &LoopSet) -> std::io::Result<()> {
    let path = format!("{prefix}_loop_nodes.csv");
    let mut writer = csv::Writer::from_writer(BufWriter::new(File::create(&path)?));
    let ordered: Vec<(usize, usize)> = loops
        .loops()
        .iter()
        .enumerate()
        .map(|(id, seq)| (id, seq.size()))
        .sorted_by_key(|&(_, size)| std::cmp::Reverse(size))
        .collect();
    for (id, size) in ordered {
        writer
            .serialize(LoopNodeRow {
                id: format!("SEQ_{id}"),
                size,
            })
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    }
    writer.flush()?;
    log::info!("wrote loop information to {path}");
    Ok(())
}

/// Writes `{prefix}_scores.txt`: one `name = value` line per scored concept, sorted by score
/// descending.
pub fn write_scores(
    prefix: &str,
    registry: &ConceptRegistry,
    scores: &HashMap<ConceptId, f64>,
) -> std::io::Result<()> {
    let path = format!("{prefix}_scores.txt");
    let ordered: Vec<(&ConceptId, &f64)> = scores
        .iter()
        .sorted_by_key(|&(_, &score)| std::cmp::Reverse(OrderedFloat(score)))
        .collect();

    let mut writer = BufWriter::new(File::create(&path)?);
    for (concept, score) in ordered {
        writeln!(writer, "{} = {}", registry.get(*concept).name(), score)?;
    }
    writer.flush()?;
    log::info!("wrote score report to {path}");
    Ok(())
}

/// Prints the top-N scored concepts to stdout, matching the reference tool's interactive summary.
pub fn print_top(
    registry: &ConceptRegistry,
    loops: &LoopSet,
    scores: &HashMap<ConceptId, f64>,
    top: usize,
) {
    let ordered: Vec<(&ConceptId, &f64)> = scores
        .iter()
        .sorted_by_key(|&(_, &score)| std::cmp::Reverse(OrderedFloat(score)))
        .collect();

    println!("Top {} most central concepts:", top.min(ordered.len()));
    for (i, (concept, score)) in ordered.into_iter().take(top).enumerate() {
        let name = registry.get(*concept).name();
        let loop_count = loops.containing_concept(*concept);
        println!("  {}. {name}: {score:.2} (in {loop_count} loops)", i + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cld_core::Network;
    use std::io::Read as _;

    fn build_triangle() -> (ConceptRegistry, HashSet<Link>, LoopSet) {
        let mut registry = ConceptRegistry::new();
        let a = registry.get_or_create("A");
        let b = registry.get_or_create("B");
        let c = registry.get_or_create("C");
        let mut all_links = HashSet::new();
        let mut net = Network::new();
        for link in [
            Link::new(a, Influence::Increases, b),
            Link::new(b, Influence::Increases, c),
            Link::new(c, Influence::Increases, a),
        ] {
            all_links.insert(link);
            net.add_link(link);
        }
        let loops = net.find_loops();
        (registry, all_links, loops)
    }

    #[test]
    fn concept_nodes_file_has_one_row_per_concept() {
        let (registry, _links, loops) = build_triangle();
        let scores = HashMap::new();
        let dir = tempfile::tempdir().unwrap();
        let prefix = dir.path().join("out").to_str().unwrap().to_owned();
        write_concept_nodes(&prefix, &registry, &loops, &scores).unwrap();

        let mut content = String::new();
        File::open(format!("{prefix}_concept_nodes.csv"))
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content.lines().count(), 4); // header + 3 concepts
    }

    #[test]
    fn loop_nodes_file_sorts_by_size_descending() {
        let (_registry, _links, loops) = build_triangle();
        let dir = tempfile::tempdir().unwrap();
        let prefix = dir.path().join("out").to_str().unwrap().to_owned();
        write_loop_nodes(&prefix, &loops).unwrap();

        let mut content = String::new();
        File::open(format!("{prefix}_loop_nodes.csv"))
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert!(content.starts_with("id,size\n"));
        assert!(content.contains("SEQ_0,3"));
    }

    #[test]
    fn scores_file_sorted_descending() {
        let (registry, _links, _loops) = build_triangle();
        let find = |name: &str| registry.iter().find(|c| c.name() == name).unwrap().id();
        let mut scores = HashMap::new();
        scores.insert(find("A"), 1.0);
        scores.insert(find("B"), 5.0);
        let dir = tempfile::tempdir().unwrap();
        let prefix = dir.path().join("out").to_str().unwrap().to_owned();
        write_scores(&prefix, &registry, &scores).unwrap();

        let mut content = String::new();
        File::open(format!("{prefix}_scores.txt"))
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert!(lines[0].starts_with("B ="));
        assert!(lines[1].starts_with("A ="));
    }
}
