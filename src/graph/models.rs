//! Graph data models.
//!
//! Defines the complete type system for the affiliation network:
//!
//! ## Input types (records → builder)
//! - [`NodeKind`] / [`NodeData`] / [`Node`]: agents and affiliations with typed attributes
//! - [`Edge`]: agent ↔ affiliation link carrying `affiliation_strength`
//! - [`GraphModel`]: petgraph wrapper with ID ↔ NodeIndex mapping
//!
//! ## Output types (analytics)
//! - [`MetricOutcome`]: value or "could not compute" marker
//! - [`DegreeHistogram`]: zero-filled degree distribution
//! - [`RankedNode`]: one entry of a top-k centrality list
//! - [`GraphDescription`]: node/edge listing handed to a rendering sink
//!
//! ## Configuration
//! - [`AnalyticsConfig`]: tuning parameters for the analytics algorithms

use petgraph::graph::{EdgeIndex, NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use super::centrality::CentralityKind;
use super::error::{AnalyticsError, Result};

/// Centrality scores keyed by node identifier.
pub type Scores = HashMap<String, f64>;

pub const AGENT_PREFIX: &str = "agent_";
pub const AFFILIATION_PREFIX: &str = "aff_";

// ============================================================================
// Nodes and edges
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Agent,
    Affiliation,
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Agent => write!(f, "agent"),
            Self::Affiliation => write!(f, "affiliation"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentAttributes {
    pub address: String,
    pub city: String,
    pub country: String,
    /// Missing in some source rows
    pub salary: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AffiliationAttributes {
    pub description: String,
}

/// Kind-specific attributes. The variant is the node's kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeData {
    Agent(AgentAttributes),
    Affiliation(AffiliationAttributes),
}

/// A vertex of the affiliation network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Namespaced identifier (`agent_<id>` or `aff_<id>`), immutable once inserted
    pub id: String,
    /// Display label (full name for agents, affiliation name otherwise)
    pub label: String,
    #[serde(flatten)]
    pub data: NodeData,
}

impl Node {
    pub fn agent(agent_id: impl std::fmt::Display, label: String, attrs: AgentAttributes) -> Self {
        Self {
            id: format!("{AGENT_PREFIX}{agent_id}"),
            label,
            data: NodeData::Agent(attrs),
        }
    }

    pub fn affiliation(
        affiliation_id: impl std::fmt::Display,
        label: String,
        attrs: AffiliationAttributes,
    ) -> Self {
        Self {
            id: format!("{AFFILIATION_PREFIX}{affiliation_id}"),
            label,
            data: NodeData::Affiliation(attrs),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self.data {
            NodeData::Agent(_) => NodeKind::Agent,
            NodeData::Affiliation(_) => NodeKind::Affiliation,
        }
    }
}

/// An undirected link between two nodes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub affiliation_strength: f64,
}

impl Default for Edge {
    fn default() -> Self {
        Self {
            affiliation_strength: 1.0,
        }
    }
}

/// What `GraphModel::add_edge` did with the pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeInsertion {
    Inserted(EdgeIndex),
    /// The pair was already linked; its weight was overwritten (last write wins).
    Replaced(EdgeIndex),
}

// ============================================================================
// GraphModel: petgraph wrapper with ID mapping
// ============================================================================

/// Undirected attributed graph with an `id → NodeIndex` map.
///
/// Nodes are never removed, so `NodeIndex::index()` is dense in
/// `0..node_count()` and the algorithms use it to index plain vectors.
/// Self-loops and parallel edges are never stored.
#[derive(Debug, Clone, Default)]
pub struct GraphModel {
    graph: UnGraph<Node, Edge>,
    id_to_index: HashMap<String, NodeIndex>,
}

impl GraphModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            graph: UnGraph::with_capacity(nodes, edges),
            id_to_index: HashMap::with_capacity(nodes),
        }
    }

    /// Add a node to the graph. Returns the NodeIndex.
    /// If a node with the same ID already exists, it is kept unchanged and
    /// its existing index is returned.
    pub fn add_node(&mut self, node: Node) -> NodeIndex {
        if let Some(&idx) = self.id_to_index.get(&node.id) {
            return idx;
        }
        let id = node.id.clone();
        let idx = self.graph.add_node(node);
        self.id_to_index.insert(id, idx);
        idx
    }

    /// Link two existing nodes.
    ///
    /// Fails with `ReferentialIntegrity` when either endpoint is missing and
    /// with `InvalidParameter` on a self-loop.
    pub fn add_edge(&mut self, a: &str, b: &str, edge: Edge) -> Result<EdgeInsertion> {
        let (ia, ib) = match (self.index_of(a), self.index_of(b)) {
            (Some(ia), Some(ib)) => (ia, ib),
            (ia, ib) => {
                let mut missing = Vec::new();
                if ia.is_none() {
                    missing.push(a.to_string());
                }
                if ib.is_none() {
                    missing.push(b.to_string());
                }
                return Err(AnalyticsError::ReferentialIntegrity {
                    source_id: a.to_string(),
                    target_id: b.to_string(),
                    missing,
                });
            }
        };
        if ia == ib {
            return Err(AnalyticsError::invalid(
                "edge",
                format!("self-loop on {a} is not allowed"),
            ));
        }
        match self.graph.find_edge(ia, ib) {
            Some(existing) => {
                self.graph[existing] = edge;
                Ok(EdgeInsertion::Replaced(existing))
            }
            None => Ok(EdgeInsertion::Inserted(self.graph.add_edge(ia, ib, edge))),
        }
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        let idx = self.id_to_index.get(id)?;
        self.graph.node_weight(*idx)
    }

    pub fn index_of(&self, id: &str) -> Option<NodeIndex> {
        self.id_to_index.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.id_to_index.contains_key(id)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Degree of a node; `None` if the node does not exist.
    pub fn degree(&self, id: &str) -> Option<usize> {
        let idx = self.index_of(id)?;
        Some(self.graph.neighbors(idx).count())
    }

    /// Neighbor identifiers in ascending order; `None` if the node does not exist.
    pub fn neighbors(&self, id: &str) -> Option<Vec<&str>> {
        let idx = self.index_of(id)?;
        let mut out: Vec<&str> = self
            .graph
            .neighbors(idx)
            .map(|n| self.graph[n].id.as_str())
            .collect();
        out.sort_unstable();
        Some(out)
    }

    /// Weight of the edge between `a` and `b`, in either orientation.
    pub fn edge_weight(&self, a: &str, b: &str) -> Option<f64> {
        let e = self.graph.find_edge(self.index_of(a)?, self.index_of(b)?)?;
        Some(self.graph[e].affiliation_strength)
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.graph.node_weights()
    }

    /// Node identifiers in ascending order (the canonical traversal order).
    pub fn sorted_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.graph.node_weights().map(|n| n.id.as_str()).collect();
        ids.sort_unstable();
        ids
    }

    // ------------------------------------------------------------------------
    // Dense views used by the algorithms
    // ------------------------------------------------------------------------

    /// Identifier of the node at dense position `i`.
    pub(crate) fn id_at(&self, i: usize) -> &str {
        &self.graph[NodeIndex::new(i)].id
    }

    /// Dense positions ordered by ascending identifier.
    pub(crate) fn canonical_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.node_count()).collect();
        order.sort_unstable_by(|&a, &b| self.id_at(a).cmp(self.id_at(b)));
        order
    }

    /// Adjacency lists by dense position, each list sorted ascending.
    pub(crate) fn adjacency(&self) -> Vec<Vec<usize>> {
        let mut adj: Vec<Vec<usize>> = vec![Vec::new(); self.node_count()];
        for edge in self.graph.edge_references() {
            let s = edge.source().index();
            let t = edge.target().index();
            adj[s].push(t);
            adj[t].push(s);
        }
        for list in adj.iter_mut() {
            list.sort_unstable();
        }
        adj
    }

    /// Map dense per-node values back to identifiers.
    pub(crate) fn scores_from(&self, values: &[f64]) -> Scores {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| (self.id_at(i).to_string(), *v))
            .collect()
    }

    // ------------------------------------------------------------------------
    // Derived graphs
    // ------------------------------------------------------------------------

    /// Subgraph on `ids` with every edge whose endpoints both lie in `ids`.
    /// Unknown identifiers are ignored.
    pub fn induced_subgraph<'a, I>(&self, ids: I) -> GraphModel
    where
        I: IntoIterator<Item = &'a str>,
    {
        let keep: HashSet<NodeIndex> = ids
            .into_iter()
            .filter_map(|id| self.index_of(id))
            .collect();

        let mut sub = GraphModel::with_capacity(keep.len(), keep.len());
        // Insertion order of the parent graph is preserved.
        for idx in self.graph.node_indices().filter(|i| keep.contains(i)) {
            sub.add_node(self.graph[idx].clone());
        }
        for edge in self.graph.edge_references() {
            if keep.contains(&edge.source()) && keep.contains(&edge.target()) {
                let a = &self.graph[edge.source()].id;
                let b = &self.graph[edge.target()].id;
                let _ = sub.add_edge(a, b, *edge.weight());
            }
        }
        sub
    }

    /// Serializable listing of nodes and edges, sorted by identifier.
    pub fn describe(&self) -> GraphDescription {
        let mut nodes: Vec<Node> = self.graph.node_weights().cloned().collect();
        nodes.sort_by(|a, b| a.id.cmp(&b.id));

        let mut edges: Vec<EdgeDescription> = self
            .graph
            .edge_references()
            .map(|e| {
                let a = self.graph[e.source()].id.clone();
                let b = self.graph[e.target()].id.clone();
                let (source, target) = if a <= b { (a, b) } else { (b, a) };
                EdgeDescription {
                    source,
                    target,
                    affiliation_strength: e.weight().affiliation_strength,
                }
            })
            .collect();
        edges.sort_by(|x, y| (&x.source, &x.target).cmp(&(&y.source, &y.target)));

        GraphDescription { nodes, edges }
    }
}

// ============================================================================
// Output types
// ============================================================================

/// Result of a metric that may be undefined for the given graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MetricOutcome<T> {
    Value { value: T },
    Unavailable { reason: String },
}

impl<T> MetricOutcome<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Value { value } => Some(value),
            Self::Unavailable { .. } => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Value { .. })
    }
}

impl<T> From<Result<T>> for MetricOutcome<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(value) => Self::Value { value },
            Err(e) => Self::Unavailable {
                reason: e.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DegreeBin {
    pub degree: usize,
    pub frequency: usize,
}

/// Degree distribution with one bin per degree in `1..=max_degree`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DegreeHistogram {
    pub bins: Vec<DegreeBin>,
    /// Nodes of degree 0 (not binned)
    pub isolated: usize,
    pub max_degree: usize,
}

/// One entry of a ranked centrality list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedNode {
    pub id: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeDescription {
    pub source: String,
    pub target: String,
    pub affiliation_strength: f64,
}

/// Node and edge listing consumed by a graph-rendering sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphDescription {
    pub nodes: Vec<Node>,
    pub edges: Vec<EdgeDescription>,
}

// ============================================================================
// Configuration
// ============================================================================

/// Tuning parameters for the analytics algorithms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Length of ranked centrality lists (default: 5)
    pub top_k: usize,
    /// Centrality ranked in the report (default: degree)
    pub centrality: CentralityKind,
    /// Eigenvector power iteration cap (default: 1000)
    pub eigenvector_max_iterations: usize,
    /// Eigenvector convergence tolerance per node (default: 1e-6)
    pub eigenvector_tolerance: f64,
    /// Scale betweenness by 2/((n-1)(n-2)) (default: false, raw counts)
    pub normalized_betweenness: bool,
    /// Compute the four centralities concurrently (default: true)
    pub parallel: bool,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            top_k: 5,
            centrality: CentralityKind::Degree,
            eigenvector_max_iterations: 1000,
            eigenvector_tolerance: 1e-6,
            normalized_betweenness: false,
            parallel: true,
        }
    }
}

impl AnalyticsConfig {
    pub fn validate(&self) -> Result<()> {
        if self.eigenvector_max_iterations == 0 {
            return Err(AnalyticsError::invalid(
                "eigenvector_max_iterations",
                "must be at least 1",
            ));
        }
        if !(self.eigenvector_tolerance.is_finite() && self.eigenvector_tolerance > 0.0) {
            return Err(AnalyticsError::invalid(
                "eigenvector_tolerance",
                format!("must be a positive number, got {}", self.eigenvector_tolerance),
            ));
        }
        Ok(())
    }
}

/// Parse a user-supplied top-k, rejecting negative values.
pub fn parse_top_k(raw: &str) -> Result<usize> {
    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|_| AnalyticsError::invalid("top_k", format!("not an integer: {raw:?}")))?;
    usize::try_from(value)
        .map_err(|_| AnalyticsError::invalid("top_k", format!("must not be negative, got {value}")))
}

// ============================================================================
// Tests
// ============================================================================
