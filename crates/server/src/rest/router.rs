use axum::extract::FromRef;
use axum::middleware;
use axum::routing::{get, patch};
use axum::Router;
use std::sync::Arc;

use super::{health, metrics, rules};
use crate::metrics::server_metrics::ServerMetrics;
use crate::middleware::{count_requests, require_principal};
use crate::service::AlertRuleService;
use crate::store::AlertRuleStore;

#[derive(Clone)]
pub struct AppState {
    pub rules: AlertRuleService,
    pub metrics: Arc<ServerMetrics>,
    pub jwt_secret: Vec<u8>,
}

impl AppState {
    pub fn new(store: Arc<dyn AlertRuleStore>, jwt_secret: Vec<u8>) -> Self {
        let metrics = ServerMetrics::new();
        Self {
            rules: AlertRuleService::new(store, metrics.clone()),
            metrics,
            jwt_secret,
        }
    }
}

impl FromRef<AppState> for Arc<ServerMetrics> {
    fn from_ref(state: &AppState) -> Self {
        state.metrics.clone()
    }
}

pub fn router(state: AppState) -> Router {
    let alert_rules = Router::new()
        .route(
            "/alert-rules",
            get(rules::list_rules).post(rules::create_rule),
        )
        .route(
            "/alert-rules/{rule_id}",
            get(rules::get_rule)
                .put(rules::update_rule)
                .delete(rules::delete_rule),
        )
        .route("/alert-rules/{rule_id}/toggle", patch(rules::toggle_rule))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_principal,
        ));

    Router::new()
        .route("/healthz", get(health::healthz))
        .route("/ready", get(health::ready))
        .route("/metrics", get(metrics::metrics))
        .merge(alert_rules)
        .layer(middleware::from_fn_with_state(
            state.metrics.clone(),
            count_requests,
        ))
        .with_state(state)
}
