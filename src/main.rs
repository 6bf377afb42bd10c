//! Network Analytics - Command line entry point
//!
//! Loads an agent/affiliation dataset and prints structural metrics and
//! centrality rankings, or the graph description for a rendering sink.

use anyhow::Result;
use clap::{Parser, Subcommand};
use network_analytics::graph::{models::parse_top_k, CentralityKind, SubgraphSelection};
use network_analytics::{ingest, run_analysis, Config};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "network-analytics")]
#[command(about = "Affiliation network analytics")]
struct Cli {
    /// YAML config file (defaults to ./config.yaml when present)
    #[arg(short, long, global = true, env = "NETWORK_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute metrics and rankings for a dataset
    Analyze {
        /// Directory holding agent.csv, affiliation.csv and affiliationrel.csv
        #[arg(short, long)]
        data_dir: Option<PathBuf>,

        /// Centrality measure to rank by (degree, eigenvector, closeness, betweenness)
        #[arg(long)]
        centrality: Option<CentralityKind>,

        /// Number of top nodes to list
        #[arg(short = 'k', long, allow_hyphen_values = true)]
        top_k: Option<String>,

        /// Graph handed to the rendering sink (full or largest)
        #[arg(long, default_value = "full")]
        subgraph: SubgraphSelection,

        /// Normalize betweenness by 2/((n-1)(n-2))
        #[arg(long)]
        normalized_betweenness: bool,

        /// Print the whole report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the graph description as JSON
    Describe {
        /// Directory holding the dataset
        #[arg(short, long)]
        data_dir: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,network_analytics=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    // Load configuration
    let mut config = match cli.config.as_deref() {
        Some(path) => Config::from_yaml_and_env(Some(path))?,
        None => Config::from_env()?,
    };

    match cli.command {
        Commands::Analyze {
            data_dir,
            centrality,
            top_k,
            subgraph,
            normalized_betweenness,
            json,
        } => {
            if let Some(dir) = data_dir {
                config.dataset.data_dir = dir;
            }
            if let Some(kind) = centrality {
                config.analytics.centrality = kind;
            }
            if let Some(raw) = top_k {
                config.analytics.top_k = parse_top_k(&raw)?;
            }
            if normalized_betweenness {
                config.analytics.normalized_betweenness = true;
            }
            run_analyze(&config, subgraph, json)
        }
        Commands::Describe { data_dir } => {
            if let Some(dir) = data_dir {
                config.dataset.data_dir = dir;
            }
            run_describe(&config)
        }
    }
}

fn run_analyze(config: &Config, selection: SubgraphSelection, json: bool) -> Result<()> {
    tracing::info!("Analyzing dataset in {}", config.dataset.data_dir.display());

    let run = run_analysis(config, selection)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&run.report)?);
    } else {
        print!("{}", run.report.render_text());
        if !run.build.skipped_relations.is_empty() {
            println!(
                "\n{} relation(s) skipped: blank or unknown agent or affiliation",
                run.build.skipped_relations.len()
            );
        }
    }
    Ok(())
}

fn run_describe(config: &Config) -> Result<()> {
    let dataset = ingest::load_dataset(&config.dataset)?;
    let (graph, _) = dataset.build_graph();
    println!("{}", serde_json::to_string_pretty(&graph.describe())?);
    Ok(())
}
