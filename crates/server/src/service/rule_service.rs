use std::sync::Arc;

use crate::auth::Principal;
use crate::metrics::server_metrics::ServerMetrics;
use crate::store::{AlertRule, AlertRuleStore, NewAlertRule, RuleFilter, RulePatch, StoreError};

use super::error::ServiceError;
use super::policy::{scope_for, Operation};

/// Fields a caller supplies when creating a rule. Ownership and the enabled
/// flag are never taken from the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateRuleInput {
    pub name: String,
    pub rule_type: String,
    pub threshold: f64,
    pub vehicles: Vec<String>,
    pub notifications: serde_json::Value,
}

/// Access-controlled operations over the alert rule store.
#[derive(Clone)]
pub struct AlertRuleService {
    store: Arc<dyn AlertRuleStore>,
    metrics: Arc<ServerMetrics>,
}

impl AlertRuleService {
    pub fn new(store: Arc<dyn AlertRuleStore>, metrics: Arc<ServerMetrics>) -> Self {
        Self { store, metrics }
    }

    pub fn metrics(&self) -> &Arc<ServerMetrics> {
        &self.metrics
    }

    pub async fn check_store(&self) -> Result<(), StoreError> {
        self.store.ping().await
    }

    pub async fn list(&self, principal: &Principal) -> Result<Vec<AlertRule>, ServiceError> {
        let op = Operation::List;
        let scope = scope_for(principal, op);
        tracing::debug!(principal = %principal.id, role = %principal.role, %scope, "listing alert rules");

        self.store
            .find_all(&scope.restrict(RuleFilter::all()))
            .await
            .map_err(|e| self.store_fault(op, e))
    }

    pub async fn get(&self, principal: &Principal, rule_id: &str) -> Result<AlertRule, ServiceError> {
        let op = Operation::Get;
        let scope = scope_for(principal, op);
        tracing::debug!(principal = %principal.id, %rule_id, %scope, "fetching alert rule");

        self.store
            .find_one(&scope.restrict(RuleFilter::by_id(rule_id)))
            .await
            .map_err(|e| self.store_fault(op, e))?
            .ok_or_else(|| self.not_found(op, principal, rule_id))
    }

    pub async fn create(
        &self,
        principal: &Principal,
        input: CreateRuleInput,
    ) -> Result<AlertRule, ServiceError> {
        let op = Operation::Create;
        let record = NewAlertRule {
            name: input.name,
            rule_type: input.rule_type,
            threshold: input.threshold,
            vehicles: input.vehicles,
            notifications: input.notifications,
            created_by: principal.id.clone(),
            enabled: true,
        };

        let rule = self
            .store
            .insert(record)
            .await
            .map_err(|e| self.store_fault(op, e))?;

        self.metrics.inc_rules_created();
        tracing::info!(principal = %principal.id, rule_id = %rule.id, rule_type = %rule.rule_type, "alert rule created");
        Ok(rule)
    }

    pub async fn update(
        &self,
        principal: &Principal,
        rule_id: &str,
        patch: RulePatch,
    ) -> Result<AlertRule, ServiceError> {
        let op = Operation::Update;
        let scope = scope_for(principal, op);
        tracing::debug!(principal = %principal.id, %rule_id, %scope, empty_patch = patch.is_empty(), "updating alert rule");

        let rule = self
            .store
            .update_one(&scope.restrict(RuleFilter::by_id(rule_id)), patch)
            .await
            .map_err(|e| self.store_fault(op, e))?
            .ok_or_else(|| self.not_found(op, principal, rule_id))?;

        self.metrics.inc_rules_updated();
        tracing::info!(principal = %principal.id, %rule_id, "alert rule updated");
        Ok(rule)
    }

    pub async fn delete(&self, principal: &Principal, rule_id: &str) -> Result<(), ServiceError> {
        let op = Operation::Delete;
        let scope = scope_for(principal, op);
        tracing::debug!(principal = %principal.id, %rule_id, %scope, "deleting alert rule");

        let deleted = self
            .store
            .delete_one(&scope.restrict(RuleFilter::by_id(rule_id)))
            .await
            .map_err(|e| self.store_fault(op, e))?;

        if deleted == 0 {
            return Err(self.not_found(op, principal, rule_id));
        }

        self.metrics.inc_rules_deleted();
        tracing::info!(principal = %principal.id, %rule_id, "alert rule deleted");
        Ok(())
    }

    /// Flips `enabled`. Read-modify-write: a concurrent toggle or update of
    /// the same rule can be lost (last write wins).
    pub async fn toggle(&self, principal: &Principal, rule_id: &str) -> Result<AlertRule, ServiceError> {
        let op = Operation::Toggle;
        let scope = scope_for(principal, op);
        let filter = scope.restrict(RuleFilter::by_id(rule_id));
        tracing::debug!(principal = %principal.id, %rule_id, %scope, "toggling alert rule");

        let current = self
            .store
            .find_one(&filter)
            .await
            .map_err(|e| self.store_fault(op, e))?
            .ok_or_else(|| self.not_found(op, principal, rule_id))?;

        let rule = self
            .store
            .update_one(&filter, RulePatch::set_enabled(!current.enabled))
            .await
            .map_err(|e| self.store_fault(op, e))?
            .ok_or_else(|| self.not_found(op, principal, rule_id))?;

        self.metrics.inc_rules_toggled();
        tracing::info!(principal = %principal.id, %rule_id, enabled = rule.enabled, "alert rule toggled");
        Ok(rule)
    }

    fn not_found(&self, op: Operation, principal: &Principal, rule_id: &str) -> ServiceError {
        self.metrics.inc_not_found();
        tracing::warn!(%op, principal = %principal.id, role = %principal.role, %rule_id, "alert rule not in scope");
        ServiceError::NotFound
    }

    fn store_fault(&self, op: Operation, err: StoreError) -> ServiceError {
        self.metrics.inc_store_errors();
        tracing::error!(%op, error = %err, "alert rule store failure");
        ServiceError::from_store(op, err)
    }
}
