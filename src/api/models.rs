use serde::Deserialize;

#[derive(Deserialize)]
pub struct PathsQuery {
    pub source: Option<String>,
    pub target: Option<String>,
    pub max_paths: Option<usize>,
}

#[derive(Deserialize)]
pub struct CentralityQuery {
    pub algorithm: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Deserialize)]
pub struct ChokepointsQuery {
    pub limit: Option<usize>,
}

#[derive(Deserialize)]
pub struct ImpactQuery {
    pub vulnerability: Option<String>,
}

pub const DEFAULT_MAX_PATHS: usize = 100;
pub const DEFAULT_LIMIT: usize = 10;
