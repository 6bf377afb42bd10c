//! Network Analytics
//!
//! Structural and centrality analytics for agent/affiliation networks:
//! - CSV ingestion of agents, affiliations and affiliation relations
//! - Undirected attributed graph with referential integrity on edges
//! - Density, transitivity, assortativity, components, degree distribution
//! - Degree, eigenvector, closeness and betweenness centrality with top-k ranking
//! - Largest connected component extraction for rendering sinks

pub mod graph;
pub mod ingest;

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use graph::{
    models::parse_top_k, AnalyticsConfig, BuildReport, CentralityKind, GraphAnalyticsEngine,
    NetworkReport, SubgraphSelection,
};
use ingest::DatasetFiles;

// ============================================================================
// YAML config structs (deserialization targets)
// ============================================================================

/// Top-level YAML configuration file structure
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct YamlConfig {
    pub dataset: DatasetFiles,
    pub analytics: AnalyticsConfig,
}

// ============================================================================
// Runtime config (what the application actually uses)
// ============================================================================

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub dataset: DatasetFiles,
    pub analytics: AnalyticsConfig,
}

impl Config {
    /// Load configuration from environment variables only.
    /// Equivalent to from_yaml_and_env(None).
    pub fn from_env() -> Result<Self> {
        Self::from_yaml_and_env(None)
    }

    /// Load configuration from an optional YAML file, then override with env vars.
    ///
    /// Priority: env var > YAML > default
    ///
    /// If `yaml_path` is None, tries "config.yaml" in CWD and falls back to
    /// env vars / defaults when it does not exist. An explicit path must exist.
    pub fn from_yaml_and_env(yaml_path: Option<&Path>) -> Result<Self> {
        // 1. Load YAML config (or defaults if no file)
        let yaml = Self::load_yaml(yaml_path)?;
        let mut config = Self {
            dataset: yaml.dataset,
            analytics: yaml.analytics,
        };

        // 2. Env var overrides
        if let Ok(dir) = std::env::var("NETWORK_DATA_DIR") {
            config.dataset.data_dir = dir.into();
        }
        if let Ok(raw) = std::env::var("NETWORK_TOP_K") {
            config.analytics.top_k = parse_top_k(&raw)?;
        }
        if let Ok(raw) = std::env::var("NETWORK_CENTRALITY") {
            config.analytics.centrality = raw.parse::<CentralityKind>()?;
        }
        if let Ok(raw) = std::env::var("NETWORK_EIGEN_MAX_ITER") {
            config.analytics.eigenvector_max_iterations = raw
                .trim()
                .parse()
                .with_context(|| format!("NETWORK_EIGEN_MAX_ITER: invalid value {raw:?}"))?;
        }
        if let Ok(raw) = std::env::var("NETWORK_EIGEN_TOLERANCE") {
            config.analytics.eigenvector_tolerance = raw
                .trim()
                .parse()
                .with_context(|| format!("NETWORK_EIGEN_TOLERANCE: invalid value {raw:?}"))?;
        }
        if let Ok(raw) = std::env::var("NETWORK_BETWEENNESS_NORMALIZED") {
            config.analytics.normalized_betweenness =
                parse_flag(&raw).context("NETWORK_BETWEENNESS_NORMALIZED")?;
        }
        if let Ok(raw) = std::env::var("NETWORK_PARALLEL") {
            config.analytics.parallel = parse_flag(&raw).context("NETWORK_PARALLEL")?;
        }

        config.analytics.validate()?;
        Ok(config)
    }

    fn load_yaml(yaml_path: Option<&Path>) -> Result<YamlConfig> {
        let default_path = Path::new("config.yaml");
        let path = yaml_path.unwrap_or(default_path);

        match std::fs::read_to_string(path) {
            Ok(contents) => {
                let config = serde_yaml::from_str(&contents)
                    .with_context(|| format!("Failed to parse {}", path.display()))?;
                tracing::info!("Loaded config from {}", path.display());
                Ok(config)
            }
            Err(e) if yaml_path.is_some() => {
                Err(e).with_context(|| format!("Failed to read {}", path.display()))
            }
            Err(_) => {
                tracing::debug!(
                    "No config file at {}, using env vars / defaults",
                    path.display()
                );
                Ok(YamlConfig::default())
            }
        }
    }
}

fn parse_flag(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("expected a boolean, got {other:?}"),
    }
}

// ============================================================================
// Pipeline
// ============================================================================

/// Outcome of a full dataset → report run.
#[derive(Debug, Clone)]
pub struct AnalysisRun {
    pub build: BuildReport,
    pub report: NetworkReport,
}

/// Load the dataset, build the graph and compute the report.
pub fn run_analysis(config: &Config, selection: SubgraphSelection) -> Result<AnalysisRun> {
    let engine = GraphAnalyticsEngine::new(config.analytics.clone())?;
    let dataset = ingest::load_dataset(&config.dataset)?;

    let (graph, build) = dataset.build_graph();
    tracing::info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        skipped = build.skipped_relations.len(),
        "Graph built"
    );

    let report = engine.analyze(&graph, selection);
    Ok(AnalysisRun { build, report })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod config_tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_yaml_config_loading() {
        let yaml = r#"
dataset:
  data_dir: /srv/spy-agency
  relations: links.csv

analytics:
  top_k: 10
  centrality: betweenness
  eigenvector_max_iterations: 250
  normalized_betweenness: true
"#;

        let config: YamlConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.dataset.data_dir, Path::new("/srv/spy-agency"));
        assert_eq!(config.dataset.relations, "links.csv");
        // unspecified fields keep their defaults
        assert_eq!(config.dataset.agents, "agent.csv");
        assert_eq!(config.analytics.top_k, 10);
        assert_eq!(config.analytics.centrality, CentralityKind::Betweenness);
        assert_eq!(config.analytics.eigenvector_max_iterations, 250);
        assert!(config.analytics.normalized_betweenness);
        assert!(config.analytics.parallel);
    }

    #[test]
    fn test_yaml_defaults() {
        let config = YamlConfig::default();
        assert_eq!(config.dataset.data_dir, Path::new("data"));
        assert_eq!(config.dataset.affiliations, "affiliation.csv");
        assert_eq!(config.analytics, AnalyticsConfig::default());
    }

    #[test]
    fn test_yaml_rejects_unknown_centrality() {
        let yaml = "analytics:\n  centrality: pagerank\n";
        assert!(serde_yaml::from_str::<YamlConfig>(yaml).is_err());
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("TRUE").unwrap());
        assert!(!parse_flag("0").unwrap());
        assert!(parse_flag("maybe").is_err());
    }

    /// Combined test for YAML file loading and env var overrides.
    /// Runs as a single test to avoid parallel env var race conditions.
    #[test]
    fn test_yaml_and_env_lifecycle() {
        fn clear_env() {
            for var in &[
                "NETWORK_DATA_DIR",
                "NETWORK_TOP_K",
                "NETWORK_CENTRALITY",
                "NETWORK_EIGEN_MAX_ITER",
                "NETWORK_EIGEN_TOLERANCE",
                "NETWORK_BETWEENNESS_NORMALIZED",
                "NETWORK_PARALLEL",
            ] {
                std::env::remove_var(var);
            }
        }

        // --- Phase 1: YAML values loaded correctly ---
        let yaml = r#"
dataset:
  data_dir: /yaml/data
analytics:
  top_k: 8
  centrality: closeness
"#;
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("config.yaml");
        let mut file = std::fs::File::create(&file_path).unwrap();
        file.write_all(yaml.as_bytes()).unwrap();

        clear_env();

        let config = Config::from_yaml_and_env(Some(&file_path)).unwrap();
        assert_eq!(config.dataset.data_dir, Path::new("/yaml/data"));
        assert_eq!(config.analytics.top_k, 8);
        assert_eq!(config.analytics.centrality, CentralityKind::Closeness);

        // --- Phase 2: Env vars override YAML ---
        std::env::set_var("NETWORK_TOP_K", "3");
        std::env::set_var("NETWORK_CENTRALITY", "Eigenvector");
        std::env::set_var("NETWORK_PARALLEL", "false");

        let config = Config::from_yaml_and_env(Some(&file_path)).unwrap();
        assert_eq!(config.analytics.top_k, 3);
        assert_eq!(config.analytics.centrality, CentralityKind::Eigenvector);
        assert!(!config.analytics.parallel);
        // YAML value still used where no env override
        assert_eq!(config.dataset.data_dir, Path::new("/yaml/data"));

        // --- Phase 3: Invalid env values are rejected ---
        std::env::set_var("NETWORK_TOP_K", "-2");
        let err = Config::from_yaml_and_env(Some(&file_path)).unwrap_err();
        assert!(err.to_string().contains("top_k"), "{err}");
        std::env::remove_var("NETWORK_TOP_K");

        std::env::set_var("NETWORK_EIGEN_TOLERANCE", "-1e-6");
        assert!(Config::from_yaml_and_env(Some(&file_path)).is_err());

        clear_env();

        // --- Phase 4: Explicit but missing YAML file is an error ---
        let missing = dir.path().join("nope.yaml");
        assert!(Config::from_yaml_and_env(Some(&missing)).is_err());

        // --- Phase 5: No file at all, env vars over defaults ---
        std::env::set_var("NETWORK_DATA_DIR", "/env/data");
        std::env::set_var("NETWORK_EIGEN_MAX_ITER", "42");
        let config = Config::from_env().unwrap();
        assert_eq!(config.dataset.data_dir, Path::new("/env/data"));
        assert_eq!(config.dataset.agents, "agent.csv");
        assert_eq!(config.analytics.eigenvector_max_iterations, 42);
        assert_eq!(config.analytics.top_k, 5);

        clear_env();
    }
}
