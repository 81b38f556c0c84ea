use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::network::node::NodeId;

/// Sign of an access rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Access {
    Allow,
    Deny,
}

impl Access {
    pub fn from_marker(marker: char) -> Option<Self> {
        match marker {
            '+' => Some(Access::Allow),
            '-' => Some(Access::Deny),
            _ => None,
        }
    }
}

impl Display for Access {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Access::Allow => write!(f, "allow"),
            Access::Deny => write!(f, "deny"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRule {
    pub access: Access,
    pub target: NodeId,
    /// 1-based line in the connectivity input
    pub line: usize,
}

/// Outbound `>` link to another router.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouterLink {
    pub target: NodeId,
    pub line: usize,
}

/// Connectivity record of one router: its outbound links and its access rules,
/// both in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouterBlock {
    pub router: NodeId,
    /// Label of the input the block was read from, used in error messages.
    pub origin: String,
    /// Line of the `<router>:` header
    pub line: usize,
    pub links: Vec<RouterLink>,
    pub rules: Vec<AccessRule>,
}

impl RouterBlock {
    pub fn new(router: impl Into<NodeId>, origin: impl Into<String>, line: usize) -> Self {
        Self {
            router: router.into(),
            origin: origin.into(),
            line,
            links: Vec::new(),
            rules: Vec::new(),
        }
    }

    pub fn linked_routers(&self) -> impl Iterator<Item = &str> {
        self.links.iter().map(|link| link.target.as_str())
    }

    pub fn rules_with(&self, access: Access) -> impl Iterator<Item = &AccessRule> {
        self.rules.iter().filter(move |rule| rule.access == access)
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty() && self.rules.is_empty()
    }
}
