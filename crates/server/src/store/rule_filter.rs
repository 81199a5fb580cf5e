use super::rule_record::AlertRule;

/// Conjunction of equality constraints; `None` fields match anything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleFilter {
    pub id: Option<String>,
    pub created_by: Option<String>,
}

impl RuleFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn by_id(id: &str) -> Self {
        Self {
            id: Some(id.to_string()),
            created_by: None,
        }
    }

    pub fn owned_by(mut self, owner: &str) -> Self {
        self.created_by = Some(owner.to_string());
        self
    }

    pub fn matches(&self, rule: &AlertRule) -> bool {
        self.id.as_deref().map_or(true, |id| id == rule.id)
            && self
                .created_by
                .as_deref()
                .map_or(true, |owner| owner == rule.created_by)
    }
}

/// Field-wise update. `id` and `createdBy` are deliberately absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RulePatch {
    pub name: Option<String>,
    pub rule_type: Option<String>,
    pub threshold: Option<f64>,
    pub vehicles: Option<Vec<String>>,
    pub notifications: Option<serde_json::Value>,
    pub enabled: Option<bool>,
}

impl RulePatch {
    pub fn set_enabled(enabled: bool) -> Self {
        Self {
            enabled: Some(enabled),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply(self, rule: &mut AlertRule) {
        if let Some(name) = self.name {
            rule.name = name;
        }
        if let Some(rule_type) = self.rule_type {
            rule.rule_type = rule_type;
        }
        if let Some(threshold) = self.threshold {
            rule.threshold = threshold;
        }
        if let Some(vehicles) = self.vehicles {
            rule.vehicles = vehicles;
        }
        if let Some(notifications) = self.notifications {
            rule.notifications = notifications;
        }
        if let Some(enabled) = self.enabled {
            rule.enabled = enabled;
        }
    }
}
