use axum::{http::StatusCode, response::IntoResponse, routing::get, Router};
use lazy_static::lazy_static;
use prometheus::{
    CounterVec, Encoder, Gauge, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
};
use std::time::Duration;

/// Metric name prefix for all tunechat metrics
const PREFIX: &str = "tunechat";

lazy_static! {
    // Global Prometheus registry
    pub static ref REGISTRY: Registry = Registry::new();

    // HTTP Request Metrics
    pub static ref HTTP_REQUESTS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_http_requests_total"), "Total number of HTTP requests"),
        &["method", "path", "status"]
    ).expect("Failed to create http_requests_total metric");

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            format!("{PREFIX}_http_request_duration_seconds"),
            "HTTP request duration in seconds"
        )
        .buckets(vec![0.001, 0.01, 0.05, 0.1, 0.5, 1.0, 2.0, 5.0, 10.0]),
        &["method", "path"]
    ).expect("Failed to create http_request_duration_seconds metric");

    // Chat Metrics
    pub static ref CHAT_REQUESTS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_chat_requests_total"), "Chat queries by classified intent"),
        &["intent"]
    ).expect("Failed to create chat_requests_total metric");

    pub static ref CHAT_ERRORS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_chat_errors_total"), "Chat responses carrying an error"),
        &["intent"]
    ).expect("Failed to create chat_errors_total metric");

    // Recommendation Metrics
    pub static ref MATCHER_CANDIDATES_TOTAL: CounterVec = CounterVec::new(
        Opts::new(
            format!("{PREFIX}_matcher_candidates_total"),
            "Song matcher candidates by outcome"
        ),
        &["outcome"]
    ).expect("Failed to create matcher_candidates_total metric");

    pub static ref LYRICS_CACHE_LOOKUPS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(
            format!("{PREFIX}_lyrics_cache_lookups_total"),
            "Lyrics/mood cache lookups by result"
        ),
        &["result"]
    ).expect("Failed to create lyrics_cache_lookups_total metric");

    // AI Metrics
    pub static ref AI_REQUEST_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            format!("{PREFIX}_ai_request_duration_seconds"),
            "LLM request duration in seconds"
        )
        .buckets(vec![0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0, 60.0]),
        &["operation"]
    ).expect("Failed to create ai_request_duration_seconds metric");

    // Process Metrics
    pub static ref PROCESS_MEMORY_BYTES: Gauge = Gauge::new(
        format!("{PREFIX}_process_memory_bytes"),
        "Process memory usage in bytes"
    ).expect("Failed to create process_memory_bytes metric");
}

/// Initialize all metrics and register them with the Prometheus registry
pub fn init_metrics() {
    // Register all metrics - ignore errors if already registered (for tests)
    let _ = REGISTRY.register(Box::new(HTTP_REQUESTS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(HTTP_REQUEST_DURATION_SECONDS.clone()));
    let _ = REGISTRY.register(Box::new(CHAT_REQUESTS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(CHAT_ERRORS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(MATCHER_CANDIDATES_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(LYRICS_CACHE_LOOKUPS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(AI_REQUEST_DURATION_SECONDS.clone()));
    let _ = REGISTRY.register(Box::new(PROCESS_MEMORY_BYTES.clone()));

    tracing::info!("Metrics system initialized successfully");
}

/// Record an HTTP request
pub fn record_http_request(method: &str, path: &str, status: u16, duration: Duration) {
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, path, &status.to_string()])
        .inc();

    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[method, path])
        .observe(duration.as_secs_f64());
}

pub fn record_chat_request(intent: &str) {
    CHAT_REQUESTS_TOTAL.with_label_values(&[intent]).inc();
}

pub fn record_chat_error(intent: &str) {
    CHAT_ERRORS_TOTAL.with_label_values(&[intent]).inc();
}

/// Record the outcome of one song matcher run
pub fn record_matcher_outcomes(matched: usize, below_threshold: usize, skipped: usize) {
    MATCHER_CANDIDATES_TOTAL
        .with_label_values(&["matched"])
        .inc_by(matched as f64);
    MATCHER_CANDIDATES_TOTAL
        .with_label_values(&["below_threshold"])
        .inc_by(below_threshold as f64);
    MATCHER_CANDIDATES_TOTAL
        .with_label_values(&["skipped"])
        .inc_by(skipped as f64);
}

/// `result` is either "hit" or "miss"
pub fn record_lyrics_cache_lookup(result: &str) {
    LYRICS_CACHE_LOOKUPS_TOTAL.with_label_values(&[result]).inc();
}

pub fn record_ai_request(operation: &str, duration: Duration) {
    AI_REQUEST_DURATION_SECONDS
        .with_label_values(&[operation])
        .observe(duration.as_secs_f64());
}

/// Update process memory usage
pub fn update_memory_usage() {
    #[cfg(target_os = "linux")]
    {
        if let Ok(status) = std::fs::read_to_string("/proc/self/status") {
            let rss_kb = status
                .lines()
                .find(|line| line.starts_with("VmRSS:"))
                .and_then(|line| line.split_whitespace().nth(1))
                .and_then(|kb| kb.parse::<f64>().ok());
            if let Some(kb) = rss_kb {
                PROCESS_MEMORY_BYTES.set(kb * 1024.0);
            }
        }
    }
}

/// Handler for the /metrics endpoint
pub async fn metrics_handler() -> impl IntoResponse {
    update_memory_usage();

    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();

    let mut buffer = vec![];
    match encoder.encode(&metric_families, &mut buffer) {
        Ok(()) => {
            let response = String::from_utf8(buffer).unwrap_or_default();
            (StatusCode::OK, response)
        }
        Err(e) => {
            tracing::error!("Failed to encode metrics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to encode metrics: {}", e),
            )
        }
    }
}

pub fn make_metrics_app() -> Router {
    Router::new().route("/metrics", get(metrics_handler))
}
