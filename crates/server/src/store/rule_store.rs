use async_trait::async_trait;

use super::rule_filter::{RuleFilter, RulePatch};
use super::rule_record::{AlertRule, NewAlertRule};

/// Persistence seam for alert rules. Implementations own id assignment and
/// single-record atomicity; the service layer adds no locking of its own.
#[async_trait]
pub trait AlertRuleStore: Send + Sync {
    async fn find_all(&self, filter: &RuleFilter) -> Result<Vec<AlertRule>, StoreError>;

    async fn find_one(&self, filter: &RuleFilter) -> Result<Option<AlertRule>, StoreError>;

    async fn insert(&self, rule: NewAlertRule) -> Result<AlertRule, StoreError>;

    /// Applies `patch` to the first rule matching `filter` and returns it
    /// post-update, or `None` when nothing matched.
    async fn update_one(
        &self,
        filter: &RuleFilter,
        patch: RulePatch,
    ) -> Result<Option<AlertRule>, StoreError>;

    /// Returns the number of rules removed (0 or 1).
    async fn delete_one(&self, filter: &RuleFilter) -> Result<u64, StoreError>;

    /// Cheap reachability probe used by the readiness endpoint.
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreError {
    pub message: Option<String>,
}

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }

    /// A fault that carries no diagnostic text.
    pub fn opaque() -> Self {
        Self { message: None }
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.message {
            Some(msg) => write!(f, "store: {msg}"),
            None => write!(f, "store: unknown failure"),
        }
    }
}

impl std::error::Error for StoreError {}
