use std::path::PathBuf;

use tracing::info;

use crate::analysis;
use crate::cli::commands::{
    CentralityArgs, ChokepointsArgs, ImpactArgs, PathsArgs, SurfaceArgs,
};
use crate::config;
use crate::errors::VantageError;
use crate::graph::{self, AttackGraph};
use crate::reporting;

async fn load_graph(path: &str) -> Result<AttackGraph, VantageError> {
    let config = config::load_topology(&PathBuf::from(path)).await?;
    let graph = graph::build(&config)?;
    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "Snapshot built"
    );
    Ok(graph)
}

fn print_report<T: serde::Serialize>(
    graph: &AttackGraph,
    report: &T,
    json: bool,
    render: impl Fn(&T) -> String,
) -> Result<(), VantageError> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print!("{}", reporting::format_summary(&graph.summary()));
        print!("{}", render(report));
    }
    Ok(())
}

pub async fn handle_paths(args: PathsArgs) -> Result<(), VantageError> {
    let graph = load_graph(&args.config).await?;
    let report = analysis::find_paths(&graph, &args.source, &args.target, args.max_paths)?;
    print_report(&graph, &report, args.json, reporting::format_paths)
}

pub async fn handle_centrality(args: CentralityArgs) -> Result<(), VantageError> {
    let graph = load_graph(&args.config).await?;
    let algorithm = args.algorithm.parse::<analysis::Algorithm>()?;
    let report = analysis::compute_centrality(&graph, algorithm, args.limit)?;
    print_report(&graph, &report, args.json, reporting::format_centrality)
}

pub async fn handle_chokepoints(args: ChokepointsArgs) -> Result<(), VantageError> {
    let graph = load_graph(&args.config).await?;
    let report = analysis::find_chokepoints(&graph, args.limit)?;
    print_report(&graph, &report, args.json, |r| {
        reporting::format_chokepoints(r)
    })
}

pub async fn handle_surface(args: SurfaceArgs) -> Result<(), VantageError> {
    let graph = load_graph(&args.config).await?;
    let report = analysis::analyze_surface(&graph);
    print_report(&graph, &report, args.json, |r| reporting::format_surface(r))
}

pub async fn handle_impact(args: ImpactArgs) -> Result<(), VantageError> {
    let graph = load_graph(&args.config).await?;
    let report = analysis::score_impact(&graph, &args.vulnerability)?;
    print_report(&graph, &report, args.json, reporting::format_impact)
}
