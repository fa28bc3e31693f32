use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use tracing::info;

use crate::api::{AppState, StoredTopology};
use crate::config::TopologyConfig;
use crate::errors::VantageError;
use crate::graph;

/// Uploads a topology document. The graph is built once here so a broken
/// document is rejected with the full problem list; only the raw document
/// is retained.
pub async fn create_topology(
    State(state): State<AppState>,
    Json(config): Json<TopologyConfig>,
) -> Result<(StatusCode, Json<Value>), VantageError> {
    let snapshot = graph::build(&config)?;
    let summary = snapshot.summary();

    let id = uuid::Uuid::new_v4().to_string();
    let name = config
        .name
        .clone()
        .unwrap_or_else(|| format!("topology-{}", &id[..8]));
    let created_at = chrono::Utc::now();
    info!(topology = %name, nodes = summary.nodes, edges = summary.edges, "Topology stored");

    state.topologies.insert(
        id.clone(),
        StoredTopology {
            name: name.clone(),
            config,
            created_at,
        },
    );

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "id": id,
            "name": name,
            "graph": summary,
            "created_at": created_at,
        })),
    ))
}

pub async fn list_topologies(State(state): State<AppState>) -> Json<Value> {
    let mut topologies: Vec<Value> = state
        .topologies
        .iter()
        .map(|entry| {
            json!({
                "id": entry.key(),
                "name": entry.value().name,
                "created_at": entry.value().created_at,
            })
        })
        .collect();
    topologies.sort_by(|a, b| a["created_at"].as_str().cmp(&b["created_at"].as_str()));

    Json(json!({ "topologies": topologies, "total": topologies.len() }))
}

pub async fn get_topology(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, VantageError> {
    let entry = state
        .topologies
        .get(&id)
        .ok_or_else(|| VantageError::TopologyNotFound(id.clone()))?;
    Ok(Json(json!({
        "id": id,
        "name": entry.name,
        "created_at": entry.created_at,
        "topology": entry.config,
    })))
}

pub async fn delete_topology(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, VantageError> {
    match state.topologies.remove(&id) {
        Some(_) => Ok(Json(json!({"deleted": true}))),
        None => Err(VantageError::TopologyNotFound(id)),
    }
}
