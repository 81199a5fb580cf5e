use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertRule {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub rule_type: String,
    pub threshold: f64,
    pub vehicles: Vec<String>,
    pub notifications: serde_json::Value,
    pub created_by: String,
    pub enabled: bool,
}

/// A rule as handed to the store before it has been assigned an id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAlertRule {
    pub name: String,
    pub rule_type: String,
    pub threshold: f64,
    pub vehicles: Vec<String>,
    pub notifications: serde_json::Value,
    pub created_by: String,
    pub enabled: bool,
}

impl NewAlertRule {
    pub fn with_id(self, id: String) -> AlertRule {
        AlertRule {
            id,
            name: self.name,
            rule_type: self.rule_type,
            threshold: self.threshold,
            vehicles: self.vehicles,
            notifications: self.notifications,
            created_by: self.created_by,
            enabled: self.enabled,
        }
    }
}
