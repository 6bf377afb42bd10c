//! Analytics engine: assembles a full network report.
//!
//! `GraphAnalyticsEngine` runs every analytics component over one immutable
//! [`GraphModel`]:
//!
//! 1. **Structure**: density, transitivity, assortativity, components, degree histogram
//! 2. **Centrality**: degree, eigenvector, closeness, betweenness → top-k rankings
//! 3. **Subgraph**: full graph or largest connected component
//!
//! Metric-level failures never abort the run; they show up as
//! [`MetricOutcome::Unavailable`] entries in the [`NetworkReport`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::str::FromStr;

use super::centrality::{compute_all, top_k, CentralityKind};
use super::components::largest_component;
use super::error::{AnalyticsError, Result};
use super::models::{
    AnalyticsConfig, DegreeHistogram, GraphDescription, GraphModel, MetricOutcome, RankedNode,
};
use super::structural::{
    component_count, degree_assortativity, degree_histogram, density, transitivity,
};

// ============================================================================
// Output types
// ============================================================================

/// Which graph is handed to the rendering sink.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubgraphSelection {
    #[default]
    Full,
    LargestComponent,
}

impl FromStr for SubgraphSelection {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" => Ok(Self::Full),
            "largest" | "largest_component" => Ok(Self::LargestComponent),
            other => Err(AnalyticsError::invalid(
                "subgraph",
                format!("unknown selection {other:?} (expected full or largest)"),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuralReport {
    pub density: f64,
    pub transitivity: f64,
    pub assortativity: MetricOutcome<f64>,
    pub component_count: usize,
    pub degree_histogram: MetricOutcome<DegreeHistogram>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CentralityRanking {
    pub measure: CentralityKind,
    pub ranking: MetricOutcome<Vec<RankedNode>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubgraphReport {
    pub selection: SubgraphSelection,
    pub node_count: usize,
    pub edge_count: usize,
    pub description: GraphDescription,
}

/// Complete result of an analytics run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkReport {
    pub node_count: usize,
    pub edge_count: usize,
    pub structure: StructuralReport,
    /// Measure highlighted by the caller
    pub selected: CentralityKind,
    /// One ranking per measure, in `CentralityKind::ALL` order
    pub rankings: Vec<CentralityRanking>,
    pub subgraph: MetricOutcome<SubgraphReport>,
    /// Computation time in milliseconds
    pub computation_ms: u64,
    pub computed_at: DateTime<Utc>,
}

impl NetworkReport {
    pub fn ranking(&self, kind: CentralityKind) -> Option<&MetricOutcome<Vec<RankedNode>>> {
        self.rankings
            .iter()
            .find(|r| r.measure == kind)
            .map(|r| &r.ranking)
    }

    /// Plain-text rendering: metrics, histogram, selected ranking, subgraph size.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let s = &self.structure;

        let _ = writeln!(out, "Structural metrics");
        let _ = writeln!(out, "  Nodes: {}  Edges: {}", self.node_count, self.edge_count);
        let _ = writeln!(out, "  Density: {:.4}", s.density);
        let _ = writeln!(out, "  Global clustering coefficient: {:.4}", s.transitivity);
        match &s.assortativity {
            MetricOutcome::Value { value } => {
                let _ = writeln!(out, "  Assortativity: {value:.4}");
            }
            MetricOutcome::Unavailable { reason } => {
                let _ = writeln!(out, "  Assortativity: unavailable ({reason})");
            }
        }
        let _ = writeln!(out, "  Connected components: {}", s.component_count);

        let _ = writeln!(out, "\nDegree distribution");
        match &s.degree_histogram {
            MetricOutcome::Value { value } => {
                for bin in &value.bins {
                    let _ = writeln!(out, "  {:>4}: {}", bin.degree, bin.frequency);
                }
                if value.isolated > 0 {
                    let _ = writeln!(out, "  isolated: {}", value.isolated);
                }
            }
            MetricOutcome::Unavailable { reason } => {
                let _ = writeln!(out, "  unavailable ({reason})");
            }
        }

        let _ = writeln!(out, "\nTop nodes by {} centrality", self.selected);
        match self.ranking(self.selected) {
            Some(MetricOutcome::Value { value }) => {
                for entry in value {
                    let _ = writeln!(out, "  {}: {:.4}", entry.id, entry.score);
                }
            }
            Some(MetricOutcome::Unavailable { reason }) => {
                let _ = writeln!(out, "  unavailable ({reason})");
            }
            None => {}
        }

        let _ = writeln!(out);
        match &self.subgraph {
            MetricOutcome::Value { value } => {
                let label = match value.selection {
                    SubgraphSelection::Full => "Full graph",
                    SubgraphSelection::LargestComponent => "Largest component",
                };
                let _ = writeln!(
                    out,
                    "{label}: {} nodes, {} edges",
                    value.node_count, value.edge_count
                );
            }
            MetricOutcome::Unavailable { reason } => {
                let _ = writeln!(out, "Subgraph unavailable ({reason})");
            }
        }
        out
    }
}

// ============================================================================
// Engine
// ============================================================================

/// Runs structural metrics, centrality rankings and subgraph extraction.
#[derive(Debug, Clone, Default)]
pub struct GraphAnalyticsEngine {
    config: AnalyticsConfig,
}

impl GraphAnalyticsEngine {
    /// Create an engine; rejects invalid configuration up front.
    pub fn new(config: AnalyticsConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    pub fn structure(&self, graph: &GraphModel) -> StructuralReport {
        StructuralReport {
            density: density(graph),
            transitivity: transitivity(graph),
            assortativity: degree_assortativity(graph).into(),
            component_count: component_count(graph),
            degree_histogram: degree_histogram(graph).into(),
        }
    }

    /// Top-k lists for all four measures.
    pub fn rankings(&self, graph: &GraphModel) -> Vec<CentralityRanking> {
        let results = compute_all(graph, &self.config);
        CentralityKind::ALL
            .into_iter()
            .map(|measure| {
                let ranking = match results.get(measure) {
                    Ok(scores) => MetricOutcome::Value {
                        value: top_k(scores, self.config.top_k),
                    },
                    Err(e) => MetricOutcome::Unavailable {
                        reason: e.to_string(),
                    },
                };
                CentralityRanking { measure, ranking }
            })
            .collect()
    }

    pub fn subgraph(&self, graph: &GraphModel, selection: SubgraphSelection) -> Result<SubgraphReport> {
        let extracted;
        let chosen = match selection {
            SubgraphSelection::Full => graph,
            SubgraphSelection::LargestComponent => {
                extracted = largest_component(graph)?;
                &extracted
            }
        };
        Ok(SubgraphReport {
            selection,
            node_count: chosen.node_count(),
            edge_count: chosen.edge_count(),
            description: chosen.describe(),
        })
    }

    /// Full pipeline over one graph.
    pub fn analyze(&self, graph: &GraphModel, selection: SubgraphSelection) -> NetworkReport {
        let start = std::time::Instant::now();

        let structure = self.structure(graph);
        let rankings = self.rankings(graph);
        let subgraph: MetricOutcome<SubgraphReport> = self.subgraph(graph, selection).into();

        let elapsed = start.elapsed();
        tracing::info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Network analytics computed"
        );

        NetworkReport {
            node_count: graph.node_count(),
            edge_count: graph.edge_count(),
            structure,
            selected: self.config.centrality,
            rankings,
            subgraph,
            computation_ms: elapsed.as_millis() as u64,
            computed_at: Utc::now(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::test_graphs::{disjoint_triangles, star, triangle};

    #[test]
    fn test_engine_rejects_invalid_config() {
        let config = AnalyticsConfig {
            eigenvector_max_iterations: 0,
            ..Default::default()
        };
        assert!(GraphAnalyticsEngine::new(config).is_err());
    }

    #[test]
    fn test_analyze_star() {
        let engine = GraphAnalyticsEngine::new(AnalyticsConfig {
            top_k: 3,
            centrality: CentralityKind::Betweenness,
            ..Default::default()
        })
        .unwrap();
        let report = engine.analyze(&star(5), SubgraphSelection::Full);

        assert_eq!(report.node_count, 6);
        assert_eq!(report.edge_count, 5);
        assert_eq!(report.structure.component_count, 1);
        assert_eq!(report.rankings.len(), 4);

        let top = report
            .ranking(CentralityKind::Betweenness)
            .and_then(|r| r.value())
            .unwrap();
        assert_eq!(top.len(), 3);
        assert_eq!(top[0].id, "center");
        // zero-score leaves tie; ascending id order
        assert_eq!(top[1].id, "leaf_0");
        assert_eq!(top[2].id, "leaf_1");
    }

    #[test]
    fn test_degenerate_metrics_do_not_abort() {
        let engine = GraphAnalyticsEngine::default();
        let report = engine.analyze(&triangle(), SubgraphSelection::Full);
        assert!(!report.structure.assortativity.is_available());
        assert!((report.structure.transitivity - 1.0).abs() < 1e-12);
        assert!(report.subgraph.is_available());
        assert!(report.render_text().contains("Assortativity: unavailable"));
    }

    #[test]
    fn test_empty_graph_produces_partial_report() {
        let engine = GraphAnalyticsEngine::default();
        let report = engine.analyze(&GraphModel::new(), SubgraphSelection::LargestComponent);
        assert_eq!(report.structure.density, 0.0);
        assert!(!report.structure.degree_histogram.is_available());
        assert!(!report.subgraph.is_available());
        assert!(!report
            .ranking(CentralityKind::Eigenvector)
            .unwrap()
            .is_available());
        assert_eq!(
            report.ranking(CentralityKind::Degree).unwrap().value(),
            Some(&vec![])
        );
    }

    #[test]
    fn test_largest_component_selection() {
        let engine = GraphAnalyticsEngine::default();
        let sub = engine
            .subgraph(&disjoint_triangles(), SubgraphSelection::LargestComponent)
            .unwrap();
        assert_eq!(sub.node_count, 3);
        assert_eq!(sub.edge_count, 3);
        assert_eq!(sub.description.nodes[0].id, "a1");
    }

    #[test]
    fn test_subgraph_selection_parsing() {
        assert_eq!(
            "largest".parse::<SubgraphSelection>().unwrap(),
            SubgraphSelection::LargestComponent
        );
        assert_eq!("FULL".parse::<SubgraphSelection>().unwrap(), SubgraphSelection::Full);
        assert!("half".parse::<SubgraphSelection>().is_err());
    }

    #[test]
    fn test_report_serializes() {
        let report = GraphAnalyticsEngine::default().analyze(&star(3), SubgraphSelection::Full);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["selected"], "degree");
        assert_eq!(json["structure"]["assortativity"]["status"], "value");
        assert_eq!(json["rankings"].as_array().unwrap().len(), 4);
        let back: NetworkReport = serde_json::from_value(json).unwrap();
        assert_eq!(back.node_count, 4);
    }
}
