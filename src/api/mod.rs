pub mod errors;
pub mod models;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::TopologyConfig;

/// A topology held by the server: the raw declarative document plus
/// metadata. Only the document is stored — every analysis request builds
/// its own graph snapshot from it and discards it afterward.
#[derive(Debug, Clone)]
pub struct StoredTopology {
    pub name: String,
    pub config: TopologyConfig,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Default)]
pub struct AppState {
    pub topologies: Arc<DashMap<String, StoredTopology>>,
}

pub fn create_app_state() -> AppState {
    AppState {
        topologies: Arc::new(DashMap::new()),
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", axum::routing::get(routes::health::health_check))
        .route(
            "/api/topologies",
            axum::routing::post(routes::topologies::create_topology)
                .get(routes::topologies::list_topologies),
        )
        .route(
            "/api/topologies/{id}",
            axum::routing::get(routes::topologies::get_topology)
                .delete(routes::topologies::delete_topology),
        )
        .route(
            "/api/topologies/{id}/paths",
            axum::routing::get(routes::analysis::get_paths),
        )
        .route(
            "/api/topologies/{id}/centrality",
            axum::routing::get(routes::analysis::get_centrality),
        )
        .route(
            "/api/topologies/{id}/chokepoints",
            axum::routing::get(routes::analysis::get_chokepoints),
        )
        .route(
            "/api/topologies/{id}/surface",
            axum::routing::get(routes::analysis::get_surface),
        )
        .route(
            "/api/topologies/{id}/impact",
            axum::routing::get(routes::analysis::get_impact),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
