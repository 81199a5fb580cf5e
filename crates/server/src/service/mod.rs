mod error;
mod policy;
mod rule_service;

pub use error::{ServiceError, NOT_FOUND_MESSAGE};
pub use policy::{scope_for, Operation, Scope};
pub use rule_service::{AlertRuleService, CreateRuleInput};
