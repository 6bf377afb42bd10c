//! Structural metrics.
//!
//! Pure functions of a [`GraphModel`]:
//! - **Density**: fraction of possible edges present
//! - **Transitivity**: global clustering coefficient (closed / connected triples)
//! - **Degree assortativity**: Pearson correlation of endpoint degrees
//! - **Connected components**: BFS in canonical (ascending id) order
//! - **Degree histogram**: zero-filled distribution over `1..=max_degree`

use std::collections::VecDeque;

use super::error::{AnalyticsError, Result};
use super::models::{DegreeBin, DegreeHistogram, GraphModel};

/// `2|E| / (|V|(|V|-1))`, or 0 for fewer than two nodes.
pub fn density(graph: &GraphModel) -> f64 {
    let n = graph.node_count();
    if n < 2 {
        return 0.0;
    }
    let possible = (n * (n - 1)) as f64;
    2.0 * graph.edge_count() as f64 / possible
}

/// Global clustering coefficient: `3 · triangles / connected triples`.
///
/// Every triangle is seen once from each of its three corners while scanning
/// neighbor pairs, so the closed-triple count already carries the factor 3.
pub fn transitivity(graph: &GraphModel) -> f64 {
    let adj = graph.adjacency();
    let mut closed = 0usize;
    let mut triples = 0usize;

    for neighbors in &adj {
        let k = neighbors.len();
        if k < 2 {
            continue;
        }
        triples += k * (k - 1) / 2;
        for (i, &a) in neighbors.iter().enumerate() {
            for &b in &neighbors[i + 1..] {
                // adjacency lists are sorted
                if adj[a].binary_search(&b).is_ok() {
                    closed += 1;
                }
            }
        }
    }

    if triples == 0 {
        0.0
    } else {
        closed as f64 / triples as f64
    }
}

/// Pearson correlation between the degrees at either end of each edge.
///
/// Each edge contributes both `(deg u, deg v)` and `(deg v, deg u)`, so both
/// marginals coincide and `r = cov / var`.
pub fn degree_assortativity(graph: &GraphModel) -> Result<f64> {
    if graph.edge_count() == 0 {
        return Err(AnalyticsError::DegenerateMetric {
            metric: "assortativity",
            reason: "graph has no edges".into(),
        });
    }

    let adj = graph.adjacency();
    let degrees: Vec<f64> = adj.iter().map(|n| n.len() as f64).collect();

    let mut count = 0.0;
    let mut sum = 0.0;
    let mut sum_sq = 0.0;
    let mut sum_xy = 0.0;
    for (u, neighbors) in adj.iter().enumerate() {
        for &v in neighbors {
            // Visits (u, v) and later (v, u): the symmetric pair set.
            let (x, y) = (degrees[u], degrees[v]);
            count += 1.0;
            sum += x;
            sum_sq += x * x;
            sum_xy += x * y;
        }
    }

    let mean = sum / count;
    let variance = sum_sq / count - mean * mean;
    if variance.abs() <= 1e-12 * (1.0 + mean * mean) {
        return Err(AnalyticsError::DegenerateMetric {
            metric: "assortativity",
            reason: "degree variance across edge endpoints is zero".into(),
        });
    }
    let covariance = sum_xy / count - mean * mean;
    Ok(covariance / variance)
}

/// Connected components as dense node positions.
///
/// Seeds are taken in ascending identifier order, so the component order
/// and each member list (sorted) are deterministic.
pub(crate) fn component_positions(graph: &GraphModel) -> Vec<Vec<usize>> {
    let adj = graph.adjacency();
    let mut seen = vec![false; adj.len()];
    let mut components = Vec::new();

    for start in graph.canonical_order() {
        if seen[start] {
            continue;
        }
        seen[start] = true;
        let mut members = vec![start];
        let mut queue = VecDeque::from([start]);

        while let Some(current) = queue.pop_front() {
            for &next in &adj[current] {
                if !seen[next] {
                    seen[next] = true;
                    members.push(next);
                    queue.push_back(next);
                }
            }
        }
        components.push(members);
    }
    components
}

/// Connected components as identifier lists (each sorted ascending), in
/// discovery order.
pub fn connected_components(graph: &GraphModel) -> Vec<Vec<String>> {
    component_positions(graph)
        .into_iter()
        .map(|members| {
            let mut ids: Vec<String> = members
                .into_iter()
                .map(|i| graph.id_at(i).to_string())
                .collect();
            ids.sort_unstable();
            ids
        })
        .collect()
}

pub fn component_count(graph: &GraphModel) -> usize {
    component_positions(graph).len()
}

/// Frequency of every degree in `1..=max_degree`, gaps zero-filled.
pub fn degree_histogram(graph: &GraphModel) -> Result<DegreeHistogram> {
    if graph.is_empty() {
        return Err(AnalyticsError::EmptyGraph {
            operation: "degree_histogram",
        });
    }

    let adj = graph.adjacency();
    let max_degree = adj.iter().map(Vec::len).max().unwrap_or(0);
    let mut counts = vec![0usize; max_degree + 1];
    for neighbors in &adj {
        counts[neighbors.len()] += 1;
    }

    let bins = (1..=max_degree)
        .map(|degree| DegreeBin {
            degree,
            frequency: counts[degree],
        })
        .collect();

    Ok(DegreeHistogram {
        bins,
        isolated: counts[0],
        max_degree,
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::test_graphs::{
        complete, disjoint_triangles, from_edges, path, star, triangle,
    };

    // --- Density ---

    #[test]
    fn test_density_path_of_four() {
        let g = path(4);
        assert_eq!(g.node_count(), 4);
        assert_eq!(g.edge_count(), 3);
        assert!((density(&g) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_density_small_graphs() {
        assert_eq!(density(&GraphModel::new()), 0.0);
        assert_eq!(density(&from_edges(&["a"], &[])), 0.0);
        assert!((density(&complete(5)) - 1.0).abs() < 1e-12);
    }

    // --- Transitivity ---

    #[test]
    fn test_transitivity_triangle_is_one() {
        assert!((transitivity(&triangle()) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_transitivity_open_path_is_zero() {
        assert_eq!(transitivity(&path(3)), 0.0);
    }

    #[test]
    fn test_transitivity_without_triples() {
        assert_eq!(transitivity(&GraphModel::new()), 0.0);
        assert_eq!(transitivity(&path(2)), 0.0);
    }

    #[test]
    fn test_transitivity_triangle_with_pendant() {
        // Triangle a-b-c plus c-d: 1 triangle, triples = 1 + 1 + 3 = 5
        let g = from_edges(
            &["a", "b", "c", "d"],
            &[("a", "b"), ("b", "c"), ("c", "a"), ("c", "d")],
        );
        assert!((transitivity(&g) - 3.0 / 5.0).abs() < 1e-12);
    }

    // --- Assortativity ---

    #[test]
    fn test_assortativity_star_is_perfectly_disassortative() {
        let r = degree_assortativity(&star(4)).unwrap();
        assert!((r + 1.0).abs() < 1e-9, "star assortativity should be -1, got {r}");
    }

    #[test]
    fn test_assortativity_regular_graph_is_degenerate() {
        let err = degree_assortativity(&triangle()).unwrap_err();
        assert!(matches!(
            err,
            AnalyticsError::DegenerateMetric { metric: "assortativity", .. }
        ));
    }

    #[test]
    fn test_assortativity_edgeless_is_degenerate() {
        assert!(degree_assortativity(&from_edges(&["a", "b"], &[])).is_err());
        assert!(degree_assortativity(&GraphModel::new()).is_err());
    }

    #[test]
    fn test_assortativity_matches_reference_value() {
        // Path a-b-c-d: pairs (1,2),(2,1),(2,2),(2,2),(2,1),(1,2) → r = -1/2
        let r = degree_assortativity(&path(4)).unwrap();
        assert!((r + 0.5).abs() < 1e-9, "got {r}");
    }

    // --- Components ---

    #[test]
    fn test_two_disjoint_triangles_have_two_components() {
        let g = disjoint_triangles();
        assert_eq!(component_count(&g), 2);
        let comps = connected_components(&g);
        assert_eq!(comps[0], vec!["a1", "a2", "a3"]);
        assert_eq!(comps[1], vec!["b1", "b2", "b3"]);
    }

    #[test]
    fn test_isolated_nodes_are_components() {
        let g = from_edges(&["x", "y", "z"], &[("x", "y")]);
        assert_eq!(component_count(&g), 2);
        assert_eq!(component_count(&GraphModel::new()), 0);
    }

    // --- Degree histogram ---

    #[test]
    fn test_degree_histogram_zero_fills_gaps() {
        // Star with 4 leaves: degrees 4,1,1,1,1 → bins 1..=4 = [4,0,0,1]
        let h = degree_histogram(&star(4)).unwrap();
        assert_eq!(h.max_degree, 4);
        let freqs: Vec<usize> = h.bins.iter().map(|b| b.frequency).collect();
        assert_eq!(freqs, vec![4, 0, 0, 1]);
        let degrees: Vec<usize> = h.bins.iter().map(|b| b.degree).collect();
        assert_eq!(degrees, vec![1, 2, 3, 4]);
        assert_eq!(h.isolated, 0);
    }

    #[test]
    fn test_degree_histogram_counts_isolated_separately() {
        let g = from_edges(&["a", "b", "c"], &[("a", "b")]);
        let h = degree_histogram(&g).unwrap();
        assert_eq!(h.isolated, 1);
        assert_eq!(h.bins, vec![DegreeBin { degree: 1, frequency: 2 }]);
    }

    #[test]
    fn test_degree_histogram_empty_graph() {
        assert!(matches!(
            degree_histogram(&GraphModel::new()),
            Err(AnalyticsError::EmptyGraph { .. })
        ));
    }
}
