//! Store metrics collection.

use metrics::counter;

/// Metric name constants for consistency.
pub mod names {
    /// Total store operations by operation and outcome.
    pub const OPS_TOTAL: &str = "jobportal_store_ops_total";
}

/// Record a completed store operation.
pub fn record_op(operation: &str, outcome: &str) {
    counter!(
        names::OPS_TOTAL,
        "operation" => operation.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_names() {
        assert!(names::OPS_TOTAL.contains("store_ops"));
    }
}
