//! Affiliation network analytics.
//!
//! Builds an undirected attributed graph of agents and affiliations and
//! computes structural metrics, centrality rankings and the largest connected
//! component. Every algorithm runs directly on the model's adjacency lists.
//!
//! ## Architecture
//!
//! ```text
//! records (ingest) ──► builder ──► GraphModel (immutable)
//!                                       │
//!                     ┌─────────────────┼──────────────────┐
//!                structural        centrality          components
//!                     └─────────────────┼──────────────────┘
//!                                       │
//!                          engine ──► NetworkReport
//! ```
//!
//! ## Modules
//!
//! - [`models`]: Node/Edge/GraphModel, output types, AnalyticsConfig
//! - [`builder`]: Input records and `GraphBuilder` (referential integrity on edges)
//! - [`structural`]: Density, transitivity, assortativity, components, degree histogram
//! - [`centrality`]: Degree, eigenvector, closeness, betweenness, top-k ranking
//! - [`components`]: Largest connected component as an induced subgraph
//! - [`engine`]: `GraphAnalyticsEngine` assembling a `NetworkReport`
//! - [`error`]: `AnalyticsError` taxonomy

pub mod builder;
pub mod centrality;
pub mod components;
pub mod engine;
pub mod error;
pub mod models;
pub mod structural;

#[cfg(test)]
pub(crate) mod test_graphs;

// Re-export primary types for convenience
pub use builder::{
    AffiliationRecord, AgentRecord, BuildReport, GraphBuilder, RelationRecord, SkippedRelation,
};
pub use centrality::{CentralityKind, CentralityResults};
pub use engine::{GraphAnalyticsEngine, NetworkReport, SubgraphSelection};
pub use error::{AnalyticsError, Result};
pub use models::{
    AnalyticsConfig, DegreeBin, DegreeHistogram, Edge, GraphDescription, GraphModel,
    MetricOutcome, Node, NodeData, NodeKind, RankedNode, Scores,
};
