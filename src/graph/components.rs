//! Largest connected component extraction.
//!
//! Reuses the canonical BFS of [`structural`](super::structural): components
//! are discovered from seeds in ascending identifier order, and the first
//! component of maximum size wins ties.

use super::error::{AnalyticsError, Result};
use super::models::GraphModel;
use super::structural::component_positions;

/// Induced subgraph of the largest connected component.
pub fn largest_component(graph: &GraphModel) -> Result<GraphModel> {
    if graph.is_empty() {
        return Err(AnalyticsError::EmptyGraph {
            operation: "largest_component",
        });
    }

    let mut best: Option<Vec<usize>> = None;
    for members in component_positions(graph) {
        // strictly greater keeps the earliest-discovered component on ties
        if best.as_ref().map_or(true, |b| members.len() > b.len()) {
            best = Some(members);
        }
    }
    let members = best.unwrap_or_default();

    tracing::debug!(
        nodes = members.len(),
        total = graph.node_count(),
        "Largest component selected"
    );
    Ok(graph.induced_subgraph(members.iter().map(|&i| graph.id_at(i))))
}
