use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;

use super::rule_filter::{RuleFilter, RulePatch};
use super::rule_record::{AlertRule, NewAlertRule};
use super::rule_store::{AlertRuleStore, StoreError};

#[derive(Clone)]
pub struct InMemoryRuleStore {
    rules: Arc<DashMap<String, AlertRule>>,
}

impl Default for InMemoryRuleStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRuleStore {
    pub fn new() -> Self {
        Self {
            rules: Arc::new(DashMap::new()),
        }
    }

    #[cfg(test)]
    fn count(&self) -> usize {
        self.rules.len()
    }

    fn first_match_id(&self, filter: &RuleFilter) -> Option<String> {
        match &filter.id {
            Some(id) => self
                .rules
                .get(id)
                .filter(|r| filter.matches(r.value()))
                .map(|r| r.key().clone()),
            None => self
                .rules
                .iter()
                .find(|r| filter.matches(r.value()))
                .map(|r| r.key().clone()),
        }
    }
}

#[async_trait]
impl AlertRuleStore for InMemoryRuleStore {
    async fn find_all(&self, filter: &RuleFilter) -> Result<Vec<AlertRule>, StoreError> {
        Ok(self
            .rules
            .iter()
            .filter(|r| filter.matches(r.value()))
            .map(|r| r.value().clone())
            .collect())
    }

    async fn find_one(&self, filter: &RuleFilter) -> Result<Option<AlertRule>, StoreError> {
        Ok(self
            .first_match_id(filter)
            .and_then(|id| self.rules.get(&id).map(|r| r.value().clone())))
    }

    async fn insert(&self, rule: NewAlertRule) -> Result<AlertRule, StoreError> {
        let id = uuid::Uuid::new_v4().to_string();
        match self.rules.entry(id.clone()) {
            Entry::Occupied(_) => Err(StoreError::new(format!("duplicate id {id}"))),
            Entry::Vacant(slot) => {
                let record = rule.with_id(id);
                slot.insert(record.clone());
                Ok(record)
            }
        }
    }

    async fn update_one(
        &self,
        filter: &RuleFilter,
        patch: RulePatch,
    ) -> Result<Option<AlertRule>, StoreError> {
        let Some(id) = self.first_match_id(filter) else {
            return Ok(None);
        };
        let Some(mut entry) = self.rules.get_mut(&id) else {
            return Ok(None);
        };
        // re-check under the shard lock: the rule may have changed or gone
        if !filter.matches(entry.value()) {
            return Ok(None);
        }
        patch.apply(entry.value_mut());
        Ok(Some(entry.value().clone()))
    }

    async fn delete_one(&self, filter: &RuleFilter) -> Result<u64, StoreError> {
        let Some(id) = self.first_match_id(filter) else {
            return Ok(0);
        };
        let removed = self.rules.remove_if(&id, |_, rule| filter.matches(rule));
        Ok(u64::from(removed.is_some()))
    }
}
