//! Metric names and recording helpers for the address validator.
//!
//! Recording goes through the `metrics` facade. Without an installed recorder
//! every call is a no-op.

use std::fmt;

/// Enum representing all metric names used in the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    // Lookup service
    LookupRequestsSuccess,
    LookupRequestsError,
    LookupRequestDuration,

    // Rows
    RowsResolved,
    RowsFailed,
    RowsSkipped,
    RowsWritten,
}

impl MetricName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::LookupRequestsSuccess => "av_lookup_requests_success_total",
            MetricName::LookupRequestsError => "av_lookup_requests_error_total",
            MetricName::LookupRequestDuration => "av_lookup_request_duration_seconds",
            MetricName::RowsResolved => "av_rows_resolved_total",
            MetricName::RowsFailed => "av_rows_failed_total",
            MetricName::RowsSkipped => "av_rows_skipped_total",
            MetricName::RowsWritten => "av_rows_written_total",
        }
    }

    pub fn all_metrics() -> impl Iterator<Item = MetricName> {
        [
            MetricName::LookupRequestsSuccess,
            MetricName::LookupRequestsError,
            MetricName::LookupRequestDuration,
            MetricName::RowsResolved,
            MetricName::RowsFailed,
            MetricName::RowsSkipped,
            MetricName::RowsWritten,
        ]
        .into_iter()
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Lookup Metrics
// ============================================================================

pub mod lookup {
    use super::MetricName;

    pub fn request_success() {
        ::metrics::counter!(MetricName::LookupRequestsSuccess.as_str()).increment(1);
    }

    /// Record a failed lookup, labelled by failure kind
    pub fn request_error(kind: &'static str) {
        ::metrics::counter!(MetricName::LookupRequestsError.as_str(), "kind" => kind).increment(1);
    }

    pub fn request_duration(secs: f64) {
        ::metrics::histogram!(MetricName::LookupRequestDuration.as_str()).record(secs);
    }
}

// ============================================================================
// Row Metrics
// ============================================================================

pub mod rows {
    use super::MetricName;

    pub fn resolved() {
        ::metrics::counter!(MetricName::RowsResolved.as_str()).increment(1);
    }

    pub fn failed() {
        ::metrics::counter!(MetricName::RowsFailed.as_str()).increment(1);
    }

    pub fn skipped(count: u64) {
        ::metrics::counter!(MetricName::RowsSkipped.as_str()).increment(count);
    }

    pub fn written(count: u64) {
        ::metrics::counter!(MetricName::RowsWritten.as_str()).increment(count);
    }
}
