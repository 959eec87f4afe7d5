use lazy_static::lazy_static;
use prometheus::{
    Counter, CounterVec, Gauge, Histogram, register_counter, register_counter_vec,
    register_gauge, register_histogram,
};

lazy_static! {
    pub static ref SCAN_REQUESTS: Counter =
        register_counter!("scan_requests_total", "Total number of scan requests").unwrap();
    pub static ref RATE_LIMITED: Counter =
        register_counter!("scan_rate_limited_total", "Scan requests rejected by the rate limiter")
            .unwrap();
    pub static ref VALIDATION_FAILURES: Counter =
        register_counter!("scan_validation_failures_total", "Scan requests rejected as invalid")
            .unwrap();
    pub static ref UPSTREAM_ERRORS: CounterVec = register_counter_vec!(
        "scan_upstream_errors_total",
        "Failed upstream calls by kind",
        &["kind"]
    )
    .unwrap();
    pub static ref PARSE_FALLBACKS: Counter = register_counter!(
        "scan_parse_fallbacks_total",
        "Upstream replies that could not be parsed and fell back to the default result"
    )
    .unwrap();
    pub static ref UPSTREAM_LATENCY: Histogram = register_histogram!(
        "scan_upstream_latency_seconds",
        "Gemini call latency in seconds"
    )
    .unwrap();
    pub static ref RATE_LIMIT_ENTRIES: Gauge =
        register_gauge!("scan_rate_limit_entries", "Clients currently tracked by the rate limiter")
            .unwrap();
}
