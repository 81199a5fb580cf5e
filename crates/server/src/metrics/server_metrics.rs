use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Debug, Default)]
pub struct ServerMetrics {
    rest_requests_total: AtomicU64,
    rules_created_total: AtomicU64,
    rules_updated_total: AtomicU64,
    rules_deleted_total: AtomicU64,
    rules_toggled_total: AtomicU64,
    not_found_total: AtomicU64,
    store_errors_total: AtomicU64,
    auth_failures_total: AtomicU64,
}

impl ServerMetrics {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn inc_rest_requests(&self) {
        self.rest_requests_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_rules_created(&self) {
        self.rules_created_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_rules_updated(&self) {
        self.rules_updated_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_rules_deleted(&self) {
        self.rules_deleted_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_rules_toggled(&self) {
        self.rules_toggled_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_not_found(&self) {
        self.not_found_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_store_errors(&self) {
        self.store_errors_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_auth_failures(&self) {
        self.auth_failures_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn rest_requests_total(&self) -> u64 {
        self.rest_requests_total.load(Ordering::Relaxed)
    }

    pub fn rules_created_total(&self) -> u64 {
        self.rules_created_total.load(Ordering::Relaxed)
    }

    pub fn rules_updated_total(&self) -> u64 {
        self.rules_updated_total.load(Ordering::Relaxed)
    }

    pub fn rules_deleted_total(&self) -> u64 {
        self.rules_deleted_total.load(Ordering::Relaxed)
    }

    pub fn rules_toggled_total(&self) -> u64 {
        self.rules_toggled_total.load(Ordering::Relaxed)
    }

    pub fn not_found_total(&self) -> u64 {
        self.not_found_total.load(Ordering::Relaxed)
    }

    pub fn store_errors_total(&self) -> u64 {
        self.store_errors_total.load(Ordering::Relaxed)
    }

    pub fn auth_failures_total(&self) -> u64 {
        self.auth_failures_total.load(Ordering::Relaxed)
    }
}
