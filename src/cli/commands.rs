use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "vantage", version, about = "Attack graph modeling and analysis")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Enumerate attack paths between two nodes
    Paths(PathsArgs),
    /// Rank nodes by a centrality measure
    Centrality(CentralityArgs),
    /// Detect bottleneck nodes
    Chokepoints(ChokepointsArgs),
    /// Report entry points and what they reach
    Surface(SurfaceArgs),
    /// Score a vulnerability's reachability-weighted impact
    Impact(ImpactArgs),
    /// Start the HTTP REST API server
    Serve(ServeArgs),
    /// Validate a topology file
    Validate(ValidateArgs),
}

#[derive(Args, Clone)]
pub struct PathsArgs {
    /// Topology file (TOML, JSON, or YAML)
    #[arg(short, long)]
    pub config: String,

    /// Source node id
    #[arg(short, long)]
    pub source: String,

    /// Target node id
    #[arg(short, long)]
    pub target: String,

    /// Stop after this many paths
    #[arg(long, default_value = "100")]
    pub max_paths: usize,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Clone)]
pub struct CentralityArgs {
    /// Topology file (TOML, JSON, or YAML)
    #[arg(short, long)]
    pub config: String,

    /// Measure: degree, betweenness, closeness, pagerank, all
    #[arg(short, long, default_value = "degree")]
    pub algorithm: String,

    /// Number of top entries to report
    #[arg(short, long, default_value = "10")]
    pub limit: usize,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Clone)]
pub struct ChokepointsArgs {
    /// Topology file (TOML, JSON, or YAML)
    #[arg(short, long)]
    pub config: String,

    /// Number of top entries to report
    #[arg(short, long, default_value = "10")]
    pub limit: usize,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Clone)]
pub struct SurfaceArgs {
    /// Topology file (TOML, JSON, or YAML)
    #[arg(short, long)]
    pub config: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Clone)]
pub struct ImpactArgs {
    /// Topology file (TOML, JSON, or YAML)
    #[arg(short, long)]
    pub config: String,

    /// Vulnerability node id to score
    #[arg(long)]
    pub vulnerability: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Clone)]
pub struct ServeArgs {
    /// Listen port
    #[arg(long, default_value = "8080")]
    pub port: u16,

    /// Listen address
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,
}

#[derive(Args, Clone)]
pub struct ValidateArgs {
    /// Topology file to validate
    pub config: String,
}
