use crate::auth::Principal;
use crate::store::RuleFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Get,
    Create,
    Update,
    Delete,
    Toggle,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Get => "get",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Toggle => "toggle",
        }
    }

    /// Whether a privileged role may act on rules it does not own.
    ///
    /// Update and Toggle are owner-only for every role. The admin bypass is
    /// limited to reads and deletes.
    pub fn privileged_bypass(&self) -> bool {
        match self {
            Self::List | Self::Get | Self::Delete => true,
            Self::Create | Self::Update | Self::Toggle => false,
        }
    }

    pub(crate) fn failure_message(&self) -> &'static str {
        match self {
            Self::List => "Failed to fetch alert rules",
            Self::Get => "Failed to get alert rule",
            Self::Create => "Failed to create alert rule",
            Self::Update => "Failed to update alert rule",
            Self::Delete => "Failed to delete alert rule",
            Self::Toggle => "Failed to toggle alert rule",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The set of rules a principal may see or touch for one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    Unrestricted,
    OwnedBy(String),
}

impl Scope {
    pub fn restrict(&self, filter: RuleFilter) -> RuleFilter {
        match self {
            Self::Unrestricted => filter,
            Self::OwnedBy(owner) => filter.owned_by(owner),
        }
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unrestricted => f.write_str("unrestricted"),
            Self::OwnedBy(owner) => write!(f, "owned_by:{owner}"),
        }
    }
}

pub fn scope_for(principal: &Principal, op: Operation) -> Scope {
    if principal.role.is_privileged() && op.privileged_bypass() {
        Scope::Unrestricted
    } else {
        Scope::OwnedBy(principal.id.clone())
    }
}
