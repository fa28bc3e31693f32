use clap::Parser;
use tracing_subscriber::EnvFilter;

use vantage::cli::{self, Cli, Commands};
use vantage::errors::VantageError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(!cli.no_color)
        .init();

    let result = match cli.command {
        Commands::Paths(args) => cli::analyze::handle_paths(args).await,
        Commands::Centrality(args) => cli::analyze::handle_centrality(args).await,
        Commands::Chokepoints(args) => cli::analyze::handle_chokepoints(args).await,
        Commands::Surface(args) => cli::analyze::handle_surface(args).await,
        Commands::Impact(args) => cli::analyze::handle_impact(args).await,
        Commands::Serve(args) => cli::serve::handle_serve(args).await,
        Commands::Validate(args) => handle_validate(args).await,
    };

    match result {
        Ok(()) => {}
        Err(e) => {
            eprintln!("Error: {}", e);
            let exit_code = match &e {
                VantageError::Config(_) => 2,
                VantageError::InvalidParameter(_) => 3,
                VantageError::NodeNotFound(_) | VantageError::TopologyNotFound(_) => 4,
                _ => 1,
            };
            std::process::exit(exit_code);
        }
    }
}

async fn handle_validate(args: cli::commands::ValidateArgs) -> Result<(), VantageError> {
    let path = std::path::PathBuf::from(&args.config);
    let config = vantage::config::load_topology(&path).await?;
    let graph = vantage::graph::build(&config)?;
    println!(
        "Topology is valid: {} ({} nodes, {} edges)",
        args.config,
        graph.node_count(),
        graph.edge_count()
    );
    Ok(())
}
