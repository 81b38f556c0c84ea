use std::{collections::BTreeSet, fmt::Display};

use serde::{Deserialize, Serialize};

use crate::network::node::NodeId;

/// Where a directed edge came from in the connectivity input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeOrigin {
    /// `>` line: router to router link
    RouterLink,
    /// `+` line: allowed access from a router to a node
    Allow,
}

/// Directed edge between two nodes of the attack graph.
///
/// A `>X` and a `+X` line in the same router block describe the same edge, so
/// instead of parallel edges the edge keeps the set of origins it was seen with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
    pub origins: BTreeSet<EdgeOrigin>,
}

impl Edge {
    pub fn new(source: impl Into<NodeId>, target: impl Into<NodeId>, origin: EdgeOrigin) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            origins: BTreeSet::from([origin]),
        }
    }

    pub fn endpoints(&self) -> (&str, &str) {
        (&self.source, &self.target)
    }

    pub fn is_allowed_access(&self) -> bool {
        self.origins.contains(&EdgeOrigin::Allow)
    }
}

impl Display for Edge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.source, self.target)
    }
}

/// An explicit `deny` rule. Never turned into an edge, kept for audit.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Denial {
    pub router: NodeId,
    pub target: NodeId,
}

impl Denial {
    pub fn new(router: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self {
            router: router.into(),
            target: target.into(),
        }
    }
}

impl Display for Denial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -x {}", self.router, self.target)
    }
}
