use crate::store::StoreError;

use super::policy::Operation;

pub const NOT_FOUND_MESSAGE: &str = "Alert rule not found";

#[derive(Debug, Clone, PartialEq)]
pub enum ServiceError {
    /// Absent, or outside the caller's scope. The two are not distinguished.
    NotFound,
    Store(String),
}

impl ServiceError {
    pub(crate) fn from_store(op: Operation, err: StoreError) -> Self {
        let message = err
            .message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| op.failure_message().to_string());
        Self::Store(message)
    }

    pub fn message(&self) -> &str {
        match self {
            Self::NotFound => NOT_FOUND_MESSAGE,
            Self::Store(msg) => msg,
        }
    }
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => write!(f, "not found"),
            Self::Store(msg) => write!(f, "store: {msg}"),
        }
    }
}

impl std::error::Error for ServiceError {}
