//! Centrality measures and top-k ranking.
//!
//! All four measures map node identifier → score and are computed directly
//! on the adjacency lists of a [`GraphModel`]:
//! - **Degree**: `deg(v) / (n - 1)`
//! - **Eigenvector**: power iteration with L2 renormalization
//! - **Closeness**: BFS distances, Wasserman–Faust correction for disconnected graphs
//! - **Betweenness**: Brandes' algorithm (BFS + dependency back-propagation)
//!
//! The measures share nothing mutable, so [`compute_all`] can run them
//! concurrently with rayon.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::str::FromStr;

use super::error::{AnalyticsError, Result};
use super::models::{AnalyticsConfig, GraphModel, RankedNode, Scores};

// ============================================================================
// Measure selection
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CentralityKind {
    Degree,
    Eigenvector,
    Closeness,
    Betweenness,
}

impl CentralityKind {
    pub const ALL: [CentralityKind; 4] = [
        Self::Degree,
        Self::Eigenvector,
        Self::Closeness,
        Self::Betweenness,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Degree => "degree",
            Self::Eigenvector => "eigenvector",
            Self::Closeness => "closeness",
            Self::Betweenness => "betweenness",
        }
    }
}

impl std::fmt::Display for CentralityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CentralityKind {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                AnalyticsError::invalid(
                    "centrality",
                    format!("unknown measure {s:?} (expected degree, eigenvector, closeness or betweenness)"),
                )
            })
    }
}

// ============================================================================
// Degree
// ============================================================================

/// `deg(v) / (n - 1)`. A single-node graph scores 1.0, an empty graph
/// yields an empty map.
pub fn degree_centrality(graph: &GraphModel) -> Scores {
    let n = graph.node_count();
    if n <= 1 {
        return graph.nodes().map(|node| (node.id.clone(), 1.0)).collect();
    }
    let scale = 1.0 / (n - 1) as f64;
    let values: Vec<f64> = graph
        .adjacency()
        .iter()
        .map(|neighbors| neighbors.len() as f64 * scale)
        .collect();
    graph.scores_from(&values)
}

// ============================================================================
// Eigenvector (power iteration)
// ============================================================================

/// Principal eigenvector of the adjacency matrix by power iteration.
///
/// Each step multiplies by `A + I` rather than `A`: the eigenvectors are the
/// same, but bipartite graphs (agent/affiliation networks always are) no
/// longer oscillate between two states. Iteration stops when the summed
/// absolute change drops below `n · tolerance`.
pub fn eigenvector_centrality(
    graph: &GraphModel,
    max_iterations: usize,
    tolerance: f64,
) -> Result<Scores> {
    let n = graph.node_count();
    if n == 0 {
        return Err(AnalyticsError::EmptyGraph {
            operation: "eigenvector_centrality",
        });
    }
    if max_iterations == 0 {
        return Err(AnalyticsError::invalid(
            "eigenvector_max_iterations",
            "must be at least 1",
        ));
    }

    let adj = graph.adjacency();
    let mut x = vec![1.0 / n as f64; n];
    let mut residual = f64::INFINITY;

    for iteration in 1..=max_iterations {
        let last = x.clone();
        for (u, neighbors) in adj.iter().enumerate() {
            for &v in neighbors {
                x[v] += last[u];
            }
        }

        let norm = x.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for v in x.iter_mut() {
                *v /= norm;
            }
        }

        residual = x.iter().zip(&last).map(|(a, b)| (a - b).abs()).sum();
        if residual < n as f64 * tolerance {
            tracing::debug!(iteration, residual, "Eigenvector centrality converged");
            return Ok(graph.scores_from(&x));
        }
    }

    tracing::warn!(
        max_iterations,
        residual,
        "Eigenvector centrality hit the iteration cap"
    );
    Err(AnalyticsError::NonConvergence {
        iterations: max_iterations,
        residual,
        partial: graph.scores_from(&x),
    })
}

// ============================================================================
// Closeness
// ============================================================================

/// Hop distances from `source`; `None` for unreachable nodes.
fn bfs_distances(adj: &[Vec<usize>], source: usize) -> Vec<Option<usize>> {
    let mut dist = vec![None; adj.len()];
    dist[source] = Some(0);
    let mut queue = VecDeque::from([source]);
    while let Some(u) = queue.pop_front() {
        let du = dist[u].unwrap_or(0);
        for &v in &adj[u] {
            if dist[v].is_none() {
                dist[v] = Some(du + 1);
                queue.push_back(v);
            }
        }
    }
    dist
}

/// Wasserman–Faust closeness:
/// `((r - 1) / Σ d(v, u)) · ((r - 1) / (n - 1))`, where `r` counts the nodes
/// reachable from `v` including `v` itself. Isolated nodes score 0.
pub fn closeness_centrality(graph: &GraphModel) -> Scores {
    let n = graph.node_count();
    let adj = graph.adjacency();

    let values: Vec<f64> = (0..n)
        .map(|v| {
            let dist = bfs_distances(&adj, v);
            let (reachable, total) = dist
                .iter()
                .flatten()
                .fold((0usize, 0usize), |(r, t), d| (r + 1, t + d));
            if total == 0 || n <= 1 {
                return 0.0;
            }
            let others = (reachable - 1) as f64;
            (others / total as f64) * (others / (n - 1) as f64)
        })
        .collect();

    graph.scores_from(&values)
}

// ============================================================================
// Betweenness (Brandes)
// ============================================================================

/// Betweenness centrality by Brandes' algorithm.
///
/// Unnormalized scores count each unordered pair `{s, t}` once: a node on
/// every shortest path between `s` and `t` gains 1, a node on half of them
/// gains 0.5. With `normalized`, scores are multiplied by
/// `2 / ((n - 1)(n - 2))` so they fall in `[0, 1]` (only when `n > 2`).
pub fn betweenness_centrality(graph: &GraphModel, normalized: bool) -> Scores {
    let n = graph.node_count();
    let adj = graph.adjacency();
    let mut betweenness = vec![0.0_f64; n];

    let mut sigma = vec![0.0_f64; n];
    let mut dist: Vec<Option<usize>> = vec![None; n];
    let mut delta = vec![0.0_f64; n];
    let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut order: Vec<usize> = Vec::with_capacity(n);

    for s in 0..n {
        sigma.fill(0.0);
        dist.fill(None);
        delta.fill(0.0);
        predecessors.iter_mut().for_each(Vec::clear);
        order.clear();

        // Forward pass: shortest-path counts in BFS order
        sigma[s] = 1.0;
        dist[s] = Some(0);
        let mut queue = VecDeque::from([s]);
        while let Some(v) = queue.pop_front() {
            order.push(v);
            let dv = dist[v].unwrap_or(0);
            for &w in &adj[v] {
                if dist[w].is_none() {
                    dist[w] = Some(dv + 1);
                    queue.push_back(w);
                }
                if dist[w] == Some(dv + 1) {
                    sigma[w] += sigma[v];
                    predecessors[w].push(v);
                }
            }
        }

        // Backward pass: δ(v) += σ(v)/σ(w) · (1 + δ(w))
        for &w in order.iter().rev() {
            for &v in &predecessors[w] {
                delta[v] += sigma[v] / sigma[w] * (1.0 + delta[w]);
            }
            if w != s {
                betweenness[w] += delta[w];
            }
        }
    }

    // Every unordered pair was visited from both ends.
    let mut scale = 0.5;
    if normalized && n > 2 {
        scale *= 2.0 / ((n - 1) * (n - 2)) as f64;
    }
    for b in betweenness.iter_mut() {
        *b *= scale;
    }

    graph.scores_from(&betweenness)
}

// ============================================================================
// Dispatch
// ============================================================================

/// Compute one measure with the parameters from `config`.
pub fn compute(kind: CentralityKind, graph: &GraphModel, config: &AnalyticsConfig) -> Result<Scores> {
    match kind {
        CentralityKind::Degree => Ok(degree_centrality(graph)),
        CentralityKind::Eigenvector => eigenvector_centrality(
            graph,
            config.eigenvector_max_iterations,
            config.eigenvector_tolerance,
        ),
        CentralityKind::Closeness => Ok(closeness_centrality(graph)),
        CentralityKind::Betweenness => {
            Ok(betweenness_centrality(graph, config.normalized_betweenness))
        }
    }
}

/// Scores of all four measures over the same graph.
#[derive(Debug, Clone)]
pub struct CentralityResults {
    pub degree: Scores,
    pub eigenvector: Result<Scores>,
    pub closeness: Scores,
    pub betweenness: Scores,
}

impl CentralityResults {
    pub fn get(&self, kind: CentralityKind) -> std::result::Result<&Scores, &AnalyticsError> {
        match kind {
            CentralityKind::Degree => Ok(&self.degree),
            CentralityKind::Eigenvector => self.eigenvector.as_ref(),
            CentralityKind::Closeness => Ok(&self.closeness),
            CentralityKind::Betweenness => Ok(&self.betweenness),
        }
    }
}

/// Compute all four measures, concurrently when `config.parallel` is set.
pub fn compute_all(graph: &GraphModel, config: &AnalyticsConfig) -> CentralityResults {
    let degree = || degree_centrality(graph);
    let eigenvector = || {
        eigenvector_centrality(
            graph,
            config.eigenvector_max_iterations,
            config.eigenvector_tolerance,
        )
    };
    let closeness = || closeness_centrality(graph);
    let betweenness = || betweenness_centrality(graph, config.normalized_betweenness);

    let ((degree, eigenvector), (closeness, betweenness)) = if config.parallel {
        rayon::join(
            || rayon::join(degree, eigenvector),
            || rayon::join(closeness, betweenness),
        )
    } else {
        ((degree(), eigenvector()), (closeness(), betweenness()))
    };

    CentralityResults {
        degree,
        eigenvector,
        closeness,
        betweenness,
    }
}

// ============================================================================
// Ranking
// ============================================================================

/// The `k` highest scores, descending, ties broken by ascending identifier.
/// `k` larger than the map is clamped.
pub fn top_k(scores: &Scores, k: usize) -> Vec<RankedNode> {
    let mut ranked: Vec<RankedNode> = scores
        .iter()
        .map(|(id, score)| RankedNode {
            id: id.clone(),
            score: *score,
        })
        .collect();
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.id.cmp(&b.id)));
    ranked.truncate(k);
    ranked
}

// ============================================================================
// Tests
// ============================================================================
