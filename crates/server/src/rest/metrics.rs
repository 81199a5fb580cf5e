use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use std::sync::Arc;

use crate::metrics::exposition::render_prometheus;
use crate::metrics::server_metrics::ServerMetrics;

pub async fn metrics(State(m): State<Arc<ServerMetrics>>) -> impl IntoResponse {
    let body = render_prometheus(&m);
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        body,
    )
}
