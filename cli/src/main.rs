//! `cld`: a command-line driver for causal loop diagram centrality analysis.

mod matrix;
mod report;

use std::path::PathBuf;

use anyhow::{Context, Result};
use cld_core::ConceptRegistry;
use log::LevelFilter;
use structopt::StructOpt;

use matrix::SheetSelector;

/// Analyze a signed causal loop diagram and report per-concept centrality scores.
#[derive(Debug, StructOpt)]
#[structopt(name = "cld")]
struct Args {
    /// Path to the adjacency matrix file (CSV or XLSX).
    #[structopt(parse(from_os_str))]
    input_file: PathBuf,

    /// Sheet name or index, for XLSX inputs.
    #[structopt(long, default_value = "0")]
    sheet: String,

    /// Prefix for the output files.
    #[structopt(long, default_value = "output")]
    prefix: String,

    /// Suppress progress logging.
    #[structopt(short, long)]
    quiet: bool,

    /// Number of top concepts to display.
    #[structopt(long, default_value = "10")]
    top: usize,
}

fn main() -> Result<()> {
    let args = Args::from_args();

    let level = if args.quiet {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    };
    simple_logger::SimpleLogger::new()
        .with_level(level)
        .init()
        .expect("logger can only be initialized once");

    match run(&args) {
        Ok(()) => Ok(()),
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(1);
        }
    }
}

fn run(args: &Args) -> Result<()> {
    log::info!("input file: {}", args.input_file.display());
    log::info!("output prefix: {}", args.prefix);

    let mut registry = ConceptRegistry::new();
    let sheet = SheetSelector::parse(&args.sheet);
    let all_links = matrix::load(&args.input_file, &sheet, &mut registry)
        .with_context(|| format!("loading {}", args.input_file.display()))?;
    log::info!("{} concepts, {} links", registry.len(), all_links.len());

    let mut net = cld_core::Network::new();
    for &link in &all_links {
        net.add_link(link);
    }

    log::info!("finding loops...");
    let mut loops = net.find_loops();
    log::info!("found {} unique loops", loops.len());

    log::info!("calculating centrality scores...");
    let scores = loops.score();

    report::write_concept_nodes(&args.prefix, &registry, &loops, &scores)
        .context("writing concept nodes report")?;
    report::write_concept_links(&args.prefix, &registry, &all_links, &loops)
        .context("writing concept links report")?;
    report::write_loop_nodes(&args.prefix, &loops).context("writing loop nodes report")?;
    report::write_scores(&args.prefix, &registry, &scores).context("writing scores report")?;

    if !args.quiet {
        report::print_top(&registry, &loops, &scores, args.top);
    }

    Ok(())
}
