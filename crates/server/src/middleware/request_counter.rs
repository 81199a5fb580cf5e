use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use std::sync::Arc;

use crate::metrics::server_metrics::ServerMetrics;

pub async fn count_requests(
    State(metrics): State<Arc<ServerMetrics>>,
    request: Request,
    next: Next,
) -> Response {
    metrics.inc_rest_requests();
    next.run(request).await
}
