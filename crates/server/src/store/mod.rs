mod in_memory;
mod rule_filter;
pub mod rule_record;
mod rule_store;

pub use in_memory::InMemoryRuleStore;
pub use rule_filter::{RuleFilter, RulePatch};
pub use rule_record::{AlertRule, NewAlertRule};
pub use rule_store::{AlertRuleStore, StoreError};
