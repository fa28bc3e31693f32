use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::{json, Value};

use crate::analysis;
use crate::api::models::{
    CentralityQuery, ChokepointsQuery, ImpactQuery, PathsQuery, DEFAULT_LIMIT, DEFAULT_MAX_PATHS,
};
use crate::api::AppState;
use crate::config::TopologyConfig;
use crate::errors::VantageError;
use crate::graph::{self, AttackGraph};

/// Each analysis request gets its own snapshot built from the stored
/// document, used for the single computation and dropped.
fn snapshot(state: &AppState, id: &str) -> Result<AttackGraph, VantageError> {
    let config: TopologyConfig = state
        .topologies
        .get(id)
        .map(|entry| entry.config.clone())
        .ok_or_else(|| VantageError::TopologyNotFound(id.to_string()))?;
    graph::build(&config)
}

fn envelope(id: &str, graph: &AttackGraph, report: Value) -> Json<Value> {
    Json(json!({
        "topology": id,
        "graph": graph.summary(),
        "report": report,
        "generated_at": chrono::Utc::now(),
    }))
}

fn required(value: Option<String>, name: &str) -> Result<String, VantageError> {
    value.ok_or_else(|| VantageError::InvalidParameter(format!("{name} is required")))
}

pub async fn get_paths(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<PathsQuery>,
) -> Result<Json<Value>, VantageError> {
    let graph = snapshot(&state, &id)?;
    let source = required(query.source, "source")?;
    let target = required(query.target, "target")?;
    let report = analysis::find_paths(
        &graph,
        &source,
        &target,
        query.max_paths.unwrap_or(DEFAULT_MAX_PATHS),
    )?;
    Ok(envelope(&id, &graph, serde_json::to_value(&report)?))
}

pub async fn get_centrality(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<CentralityQuery>,
) -> Result<Json<Value>, VantageError> {
    let graph = snapshot(&state, &id)?;
    let algorithm = query
        .algorithm
        .as_deref()
        .unwrap_or("degree")
        .parse::<analysis::Algorithm>()?;
    let report =
        analysis::compute_centrality(&graph, algorithm, query.limit.unwrap_or(DEFAULT_LIMIT))?;
    Ok(envelope(
        &id,
        &graph,
        json!({
            "algorithm": algorithm,
            "scores": report,
        }),
    ))
}

pub async fn get_chokepoints(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ChokepointsQuery>,
) -> Result<Json<Value>, VantageError> {
    let graph = snapshot(&state, &id)?;
    let report = analysis::find_chokepoints(&graph, query.limit.unwrap_or(DEFAULT_LIMIT))?;
    Ok(envelope(&id, &graph, serde_json::to_value(&report)?))
}

pub async fn get_surface(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, VantageError> {
    let graph = snapshot(&state, &id)?;
    let report = analysis::analyze_surface(&graph);
    Ok(envelope(&id, &graph, serde_json::to_value(&report)?))
}

pub async fn get_impact(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ImpactQuery>,
) -> Result<Json<Value>, VantageError> {
    let graph = snapshot(&state, &id)?;
    let vulnerability = required(query.vulnerability, "vulnerability")?;
    let report = analysis::score_impact(&graph, &vulnerability)?;
    Ok(envelope(&id, &graph, serde_json::to_value(&report)?))
}
