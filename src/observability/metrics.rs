//! Dispatch metrics.
//!
//! # Metrics
//! - `api_dispatch_total` (counter): completed dispatches by method, status
//! - `api_dispatch_duration_seconds` (histogram): latency by method
//! - `api_dispatch_failures_total` (counter): failed dispatches by method, error kind
//!
//! # Design Decisions
//! - A non-2xx status is a completed dispatch, not a failure
//! - Labels stay low-cardinality: no paths or route keys

use std::time::Instant;

use crate::contract::Method;

/// Describe every metric on the installed recorder.
pub fn register_dispatch_metrics() {
    ::metrics::describe_counter!("api_dispatch_total", "Completed dispatches by method and status");
    ::metrics::describe_histogram!(
        "api_dispatch_duration_seconds",
        ::metrics::Unit::Seconds,
        "Dispatch latency including the transport call"
    );
    ::metrics::describe_counter!(
        "api_dispatch_failures_total",
        "Dispatches that returned an error, by kind"
    );
}

/// Record one dispatch that produced a status.
pub fn record_dispatch(method: Method, status: u16, started: Instant) {
    ::metrics::counter!(
        "api_dispatch_total",
        "method" => method.as_str(),
        "status" => status.to_string()
    )
    .increment(1);

    ::metrics::histogram!("api_dispatch_duration_seconds", "method" => method.as_str())
        .record(started.elapsed().as_secs_f64());
}

/// Record one dispatch that failed before a status was produced.
pub fn record_failure(method: Method, kind: &'static str) {
    ::metrics::counter!(
        "api_dispatch_failures_total",
        "method" => method.as_str(),
        "kind" => kind
    )
    .increment(1);
}
