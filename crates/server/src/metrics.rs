use once_cell::sync::Lazy;
use prometheus::{register_histogram_vec, register_int_counter_vec, Encoder, HistogramTimer, HistogramVec, IntCounterVec, TextEncoder};
use tonic::{Response, Status};

// Prometheus metrics (default registry)
pub static RPC_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "catalog_rpc_requests_total",
        "Total gRPC calls handled by the catalog",
        &["method"]
    )
    .expect("register rpc_requests_total")
});

pub static RPC_ERRORS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "catalog_rpc_errors_total",
        "Total gRPC calls that returned a non-OK status",
        &["method", "code"]
    )
    .expect("register rpc_errors_total")
});

pub static RPC_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "catalog_rpc_duration_seconds",
        "gRPC call duration in seconds",
        &["method"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    )
    .expect("register rpc_duration")
});

/// Counts a call on start and records its duration and outcome on finish.
pub struct RpcTimer {
    method: &'static str,
    timer: HistogramTimer,
}

impl RpcTimer {
    pub fn start(method: &'static str) -> Self {
        RPC_REQUESTS_TOTAL.with_label_values(&[method]).inc();
        Self { method, timer: RPC_DURATION.with_label_values(&[method]).start_timer() }
    }

    pub fn finish<T>(self, result: Result<T, Status>) -> Result<Response<T>, Status> {
        self.timer.observe_duration();
        if let Err(status) = &result {
            let code = format!("{:?}", status.code());
            RPC_ERRORS_TOTAL.with_label_values(&[self.method, code.as_str()]).inc();
        }
        result.map(Response::new)
    }
}

pub fn encode_metrics() -> (axum::http::StatusCode, String) {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            format!("metrics encode error: {e}"),
        );
    }
    (
        axum::http::StatusCode::OK,
        String::from_utf8(buffer).unwrap_or_default(),
    )
}
