/*!
Parser for the vulnerability inventory.

Every non-blank line has the form `<identifier> : <vuln1>, <vuln2>, ...`.
*/

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    error::{GraphError, GraphResult},
    network::node::NodeId,
    parsers::{content_lines, ContentLine, InputParser},
};

pub const SEPARATOR: &str = " : ";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Host {
    pub id: NodeId,
    /// Trimmed, in declaration order
    pub vulnerabilities: Vec<String>,
    pub line: usize,
}

/// Hosts keyed by identifier. Iteration is sorted by identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopologyMap {
    hosts: BTreeMap<NodeId, Host>,
}

impl TopologyMap {
    /// Insert or overwrite a host. Returns the previous declaration, if any.
    pub fn insert(&mut self, host: Host) -> Option<Host> {
        self.hosts.insert(host.id.clone(), host)
    }

    pub fn get(&self, id: &str) -> Option<&Host> {
        self.hosts.get(id)
    }

    pub fn vulnerabilities(&self, id: &str) -> Option<&[String]> {
        self.hosts.get(id).map(|host| host.vulnerabilities.as_slice())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.hosts.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.hosts.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Host> {
        self.hosts.values()
    }

    pub fn into_hosts(self) -> impl Iterator<Item = Host> {
        self.hosts.into_values()
    }
}

/// Parses the topology input. A host declared twice keeps its last declaration.
#[derive(Debug, Clone)]
pub struct TopologyParser {
    origin: String,
}

impl Default for TopologyParser {
    fn default() -> Self {
        Self {
            origin: "topology".to_string(),
        }
    }
}

impl TopologyParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// `origin` names the input in error messages, usually the file path.
    pub fn with_origin(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
        }
    }

    fn parse_line(&self, line: &ContentLine<'_>) -> GraphResult<Host> {
        let mut parts = line.trimmed.split(SEPARATOR);
        let (Some(id), Some(vulnerabilities), None) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(self.malformed(line, "expected exactly one ' : ' separator"));
        };

        let id = id.trim();
        if id.is_empty() {
            return Err(self.malformed(line, "empty host identifier"));
        }

        let vulnerabilities = vulnerabilities
            .split(',')
            .map(str::trim)
            .filter(|vuln| !vuln.is_empty())
            .map(String::from)
            .collect();

        Ok(Host {
            id: id.to_string(),
            vulnerabilities,
            line: line.number,
        })
    }

    fn malformed(&self, line: &ContentLine<'_>, reason: &'static str) -> GraphError {
        GraphError::MalformedTopologyLine {
            origin: self.origin.clone(),
            line: line.number,
            text: line.raw.to_string(),
            reason,
        }
    }
}

impl InputParser for TopologyParser {
    type Output = TopologyMap;

    fn parse(&self, text: &str) -> GraphResult<TopologyMap> {
        let mut map = TopologyMap::default();
        for line in content_lines(text) {
            let host = self.parse_line(&line)?;
            if let Some(previous) = map.insert(host) {
                warn!(
                    origin = %self.origin,
                    host = %previous.id,
                    first_line = previous.line,
                    line = line.number,
                    "host declared twice, keeping the later declaration"
                );
            }
        }
        debug!(origin = %self.origin, hosts = map.len(), "parsed topology");
        Ok(map)
    }
}

/// Parses topology text with the default origin label.
pub fn parse_topology(text: &str) -> GraphResult<TopologyMap> {
    TopologyParser::new().parse(text)
}
