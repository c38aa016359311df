//! Prometheus metrics for the video platform API.
//!
//! Exposes request collectors and an HTTP handler for the `/metrics` endpoint.

use actix_web::HttpResponse;
use lazy_static::lazy_static;
use prometheus::{register_int_counter_vec, Encoder, IntCounterVec, TextEncoder};

lazy_static! {
    /// Read endpoints served, segmented by operation.
    pub static ref READS: IntCounterVec = register_int_counter_vec!(
        "vidtube_reads_total",
        "Read requests served segmented by operation",
        &["operation"]
    )
    .expect("failed to register vidtube_reads_total");

    /// Mutating endpoints served, segmented by operation.
    pub static ref MUTATIONS: IntCounterVec = register_int_counter_vec!(
        "vidtube_mutations_total",
        "Mutating requests served segmented by operation",
        &["operation"]
    )
    .expect("failed to register vidtube_mutations_total");

    /// Toggle outcomes for likes and subscriptions (on/off).
    pub static ref TOGGLES: IntCounterVec = register_int_counter_vec!(
        "vidtube_toggles_total",
        "Toggle operations segmented by kind and resulting state",
        &["kind", "state"]
    )
    .expect("failed to register vidtube_toggles_total");
}

/// Actix handler that renders Prometheus metrics in text format.
pub async fn serve_metrics() -> HttpResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    if let Err(err) = encoder.encode(&metric_families, &mut buffer) {
        return HttpResponse::InternalServerError().body(err.to_string());
    }

    HttpResponse::Ok()
        .content_type(encoder.format_type())
        .body(buffer)
}
