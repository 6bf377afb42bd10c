//! Records → GraphModel construction.
//!
//! Agents and affiliations become nodes; relation records become edges only
//! when both endpoints exist. A relation that references a missing agent or
//! affiliation is skipped: it is logged and listed in the [`BuildReport`],
//! and the graph stays usable.

use serde::{Deserialize, Serialize};

use super::error::AnalyticsError;
use super::models::{
    AffiliationAttributes, AgentAttributes, Edge, EdgeInsertion, GraphModel, Node,
    AFFILIATION_PREFIX, AGENT_PREFIX,
};

// ============================================================================
// Input records
// ============================================================================

/// One row of `agent.csv`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentRecord {
    pub agent_id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub country: String,
    /// Blank or non-numeric values become `None`
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub salary: Option<f64>,
}

/// One row of `affiliation.csv`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffiliationRecord {
    pub affiliation_id: String,
    pub affiliation_name: String,
    #[serde(default)]
    pub description: String,
}

/// One row of `affiliationrel.csv`.
///
/// Blank endpoint ids read as `None`; the builder skips such rows instead of
/// failing the whole table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationRecord {
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub agent_id: Option<String>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub affiliation_id: Option<String>,
    pub affiliation_strength: f64,
}

impl RelationRecord {
    pub fn new(
        agent_id: impl Into<String>,
        affiliation_id: impl Into<String>,
        affiliation_strength: f64,
    ) -> Self {
        Self {
            agent_id: Some(agent_id.into()),
            affiliation_id: Some(affiliation_id.into()),
            affiliation_strength,
        }
    }
}

// ============================================================================
// Build report
// ============================================================================

/// A relation that was not turned into an edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedRelation {
    pub agent_id: Option<String>,
    pub affiliation_id: Option<String>,
    /// Node identifiers not present in the graph, or the column name
    /// (`agent_id` / `affiliation_id`) when the field was blank
    pub missing: Vec<String>,
}

/// What happened while building a graph from records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildReport {
    pub agents: usize,
    pub affiliations: usize,
    pub edges: usize,
    /// Node records whose identifier was already taken (first record wins)
    pub duplicate_nodes: usize,
    /// Node records with a blank identifier
    pub blank_ids: usize,
    /// Relations that re-linked an existing pair (last write wins)
    pub duplicate_relations: usize,
    pub skipped_relations: Vec<SkippedRelation>,
}

// ============================================================================
// Builder
// ============================================================================

/// Builds a [`GraphModel`] from the three record streams.
#[derive(Debug, Default, Clone, Copy)]
pub struct GraphBuilder;

impl GraphBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Build the graph, discarding the build report.
    pub fn build(
        &self,
        agents: &[AgentRecord],
        affiliations: &[AffiliationRecord],
        relations: &[RelationRecord],
    ) -> GraphModel {
        self.build_with_report(agents, affiliations, relations).0
    }

    pub fn build_with_report(
        &self,
        agents: &[AgentRecord],
        affiliations: &[AffiliationRecord],
        relations: &[RelationRecord],
    ) -> (GraphModel, BuildReport) {
        let mut graph =
            GraphModel::with_capacity(agents.len() + affiliations.len(), relations.len());
        let mut report = BuildReport::default();

        for record in agents {
            if record.agent_id.is_empty() {
                report.blank_ids += 1;
                continue;
            }
            let before = graph.node_count();
            graph.add_node(agent_node(record));
            if graph.node_count() > before {
                report.agents += 1;
            } else {
                report.duplicate_nodes += 1;
                tracing::debug!(agent_id = %record.agent_id, "Duplicate agent record ignored");
            }
        }

        for record in affiliations {
            if record.affiliation_id.is_empty() {
                report.blank_ids += 1;
                continue;
            }
            let before = graph.node_count();
            graph.add_node(affiliation_node(record));
            if graph.node_count() > before {
                report.affiliations += 1;
            } else {
                report.duplicate_nodes += 1;
                tracing::debug!(
                    affiliation_id = %record.affiliation_id,
                    "Duplicate affiliation record ignored"
                );
            }
        }

        for record in relations {
            let (agent_id, aff_id) = match (
                non_blank(&record.agent_id),
                non_blank(&record.affiliation_id),
            ) {
                (Some(agent), Some(aff)) => (
                    format!("{AGENT_PREFIX}{agent}"),
                    format!("{AFFILIATION_PREFIX}{aff}"),
                ),
                (agent, aff) => {
                    let mut missing = Vec::new();
                    if agent.is_none() {
                        missing.push("agent_id".to_string());
                    }
                    if aff.is_none() {
                        missing.push("affiliation_id".to_string());
                    }
                    report.skipped_relations.push(skipped(record, missing));
                    continue;
                }
            };
            let edge = Edge {
                affiliation_strength: record.affiliation_strength,
            };

            match graph.add_edge(&agent_id, &aff_id, edge) {
                Ok(EdgeInsertion::Inserted(_)) => report.edges += 1,
                Ok(EdgeInsertion::Replaced(_)) => report.duplicate_relations += 1,
                Err(AnalyticsError::ReferentialIntegrity { missing, .. }) => {
                    report.skipped_relations.push(skipped(record, missing));
                }
                // Agent and affiliation namespaces never collide, so no self-loop.
                Err(e) => tracing::debug!(error = %e, "Relation rejected"),
            }
        }

        if !report.skipped_relations.is_empty() {
            tracing::warn!(
                skipped = report.skipped_relations.len(),
                "Relations with blank or unknown agents or affiliations were skipped"
            );
        }
        tracing::debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "Graph built"
        );

        (graph, report)
    }
}

fn non_blank(id: &Option<String>) -> Option<&str> {
    id.as_deref().filter(|s| !s.is_empty())
}

fn skipped(record: &RelationRecord, missing: Vec<String>) -> SkippedRelation {
    SkippedRelation {
        agent_id: record.agent_id.clone(),
        affiliation_id: record.affiliation_id.clone(),
        missing,
    }
}

fn agent_node(record: &AgentRecord) -> Node {
    Node::agent(
        &record.agent_id,
        format!("{} {}", record.first_name, record.last_name),
        AgentAttributes {
            address: record.address.clone(),
            city: record.city.clone(),
            country: record.country.clone(),
            salary: record.salary,
        },
    )
}

fn affiliation_node(record: &AffiliationRecord) -> Node {
    Node::affiliation(
        &record.affiliation_id,
        record.affiliation_name.clone(),
        AffiliationAttributes {
            description: record.description.clone(),
        },
    )
}

// ============================================================================
// Tests
// ============================================================================
