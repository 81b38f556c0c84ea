use std::fmt::Display;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a node as written in the input files, usually an IP address.
pub type NodeId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeRole {
    Host,
    /// The node opened at least one block in the connectivity input.
    Router,
}

/// Represents a node in the attack graph.
///
/// Nodes declared in the topology input carry their vulnerability list. Nodes that
/// only show up as an edge endpoint are created with an empty list and
/// `declared == false`, so they can be audited later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub vulnerabilities: Vec<String>,
    pub declared: bool,
    pub role: NodeRole,
}

impl Node {
    pub fn declared(id: impl Into<NodeId>, vulnerabilities: Vec<String>) -> Self {
        Self {
            id: id.into(),
            vulnerabilities,
            declared: true,
            role: NodeRole::Host,
        }
    }

    pub fn undeclared(id: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            vulnerabilities: Vec::new(),
            declared: false,
            role: NodeRole::Host,
        }
    }

    pub fn is_undeclared(&self) -> bool {
        !self.declared
    }

    pub fn is_router(&self) -> bool {
        self.role == NodeRole::Router
    }

    /// Stable UUID derived from the identifier, for consumers that key nodes by UUID.
    pub fn to_uuidv5(&self) -> Uuid {
        Uuid::new_v5(&Uuid::NAMESPACE_OID, self.id.as_bytes())
    }
}

impl Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)?;
        if !self.vulnerabilities.is_empty() {
            write!(f, " [{}]", self.vulnerabilities.join(", "))?;
        }
        if self.is_undeclared() {
            write!(f, " (undeclared)")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uuid_is_stable_per_identifier() {
        let a = Node::declared("10.0.0.1", vec!["CVE-1".into()]);
        let b = Node::undeclared("10.0.0.1");
        assert_eq!(a.to_uuidv5(), b.to_uuidv5());
        assert_ne!(a.to_uuidv5(), Node::undeclared("10.0.0.2").to_uuidv5());
    }

    #[test]
    fn test_display_marks_undeclared() {
        let node = Node::undeclared("10.0.0.3");
        assert_eq!(node.to_string(), "10.0.0.3 (undeclared)");

        let node = Node::declared("10.0.0.1", vec!["CVE-1".into(), "CVE-2".into()]);
        assert_eq!(node.to_string(), "10.0.0.1 [CVE-1, CVE-2]");
    }
}
