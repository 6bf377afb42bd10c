//! Error taxonomy for graph construction and analytics.
//!
//! Metric-level failures (`DegenerateMetric`, `NonConvergence`, `EmptyGraph`)
//! are recoverable: the engine turns them into
//! [`MetricOutcome::Unavailable`](super::models::MetricOutcome) entries so a
//! partial report is still produced. `InvalidParameter` is rejected at the
//! call site.

use thiserror::Error;

use super::models::Scores;

/// Result alias used by the analytics core.
pub type Result<T> = std::result::Result<T, AnalyticsError>;

#[derive(Error, Debug, Clone)]
pub enum AnalyticsError {
    /// An edge references a node that is not in the graph.
    #[error("referential integrity violation: edge {source_id} -- {target_id} references missing node(s) {missing:?}")]
    ReferentialIntegrity {
        source_id: String,
        target_id: String,
        missing: Vec<String>,
    },

    /// A metric is mathematically undefined for this graph.
    #[error("degenerate metric {metric}: {reason}")]
    DegenerateMetric {
        metric: &'static str,
        reason: String,
    },

    /// Power iteration hit its cap before meeting the tolerance.
    ///
    /// `partial` holds the last iterate so callers may still surface it.
    #[error("eigenvector centrality did not converge after {iterations} iterations (residual {residual:e})")]
    NonConvergence {
        iterations: usize,
        residual: f64,
        partial: Scores,
    },

    /// The operation needs at least one node.
    #[error("{operation} requires a non-empty graph")]
    EmptyGraph { operation: &'static str },

    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

impl AnalyticsError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    /// Whether the error is a recoverable "could not compute" condition
    /// rather than a caller mistake.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::InvalidParameter { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_parameter_is_not_recoverable() {
        let err = AnalyticsError::invalid("top_k", "must not be negative");
        assert!(!err.is_recoverable());
        assert_eq!(
            err.to_string(),
            "invalid parameter top_k: must not be negative"
        );
    }

    #[test]
    fn test_metric_errors_are_recoverable() {
        let degenerate = AnalyticsError::DegenerateMetric {
            metric: "assortativity",
            reason: "zero degree variance".into(),
        };
        assert!(degenerate.is_recoverable());

        let empty = AnalyticsError::EmptyGraph {
            operation: "largest_component",
        };
        assert!(empty.is_recoverable());
        assert_eq!(
            empty.to_string(),
            "largest_component requires a non-empty graph"
        );
    }
}
