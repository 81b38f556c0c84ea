/*!
Enumeration of a finished `GraphModel` as a terminal report or a JSON document.
*/

use std::fmt::{Display, Write};

use colored::{ColoredString, Colorize};
use serde::Serialize;
use uuid::Uuid;

use crate::network::{
    edge::{Denial, EdgeOrigin},
    network_graph::GraphModel,
    node::{Node, NodeRole},
};

/// Plain text listing of nodes, edges and denials.
pub struct TextReport<'a> {
    model: &'a GraphModel,
    color: bool,
}

impl<'a> TextReport<'a> {
    pub fn new(model: &'a GraphModel) -> Self {
        Self { model, color: false }
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    fn paint(&self, text: &str, style: fn(&str) -> ColoredString) -> String {
        if self.color {
            style(text).to_string()
        } else {
            text.to_string()
        }
    }

    fn write_node(&self, out: &mut String, node: &Node) -> std::fmt::Result {
        let role = match node.role {
            NodeRole::Router => "router",
            NodeRole::Host => "host",
        };
        let vulnerabilities = if node.vulnerabilities.is_empty() {
            "-".to_string()
        } else {
            self.paint(&node.vulnerabilities.join(", "), |s| s.yellow())
        };
        write!(out, "  {:<18} {:<6} {}", node.id, role, vulnerabilities)?;
        if node.is_undeclared() {
            write!(out, " {}", self.paint("(undeclared)", |s| s.dimmed()))?;
        }
        writeln!(out)
    }
}

impl Display for TextReport<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut out = String::new();

        writeln!(out, "{} ({})", self.paint("nodes", |s| s.green().bold()), self.model.node_count())?;
        for node in self.model.nodes() {
            self.write_node(&mut out, node)?;
        }

        writeln!(out, "{} ({})", self.paint("edges", |s| s.green().bold()), self.model.edge_count())?;
        for edge in self.model.edges() {
            let origins: Vec<_> = edge.origins.iter().map(origin_label).collect();
            writeln!(out, "  {} -> {} [{}]", edge.source, edge.target, origins.join(", "))?;
        }

        writeln!(out, "{} ({})", self.paint("denials", |s| s.red().bold()), self.model.denial_count())?;
        for denial in self.model.denials() {
            writeln!(out, "  {}", denial)?;
        }

        let contested: Vec<_> = self.model.contested().collect();
        if !contested.is_empty() {
            writeln!(out, "{} ({})", self.paint("contested", |s| s.yellow().bold()), contested.len())?;
            for denial in contested {
                writeln!(out, "  {} -> {} (allowed and denied)", denial.router, denial.target)?;
            }
        }

        f.write_str(&out)
    }
}

fn origin_label(origin: &EdgeOrigin) -> &'static str {
    match origin {
        EdgeOrigin::RouterLink => "link",
        EdgeOrigin::Allow => "allow",
    }
}

#[derive(Debug, Serialize)]
struct NodeEntry<'a> {
    uuid: Uuid,
    id: &'a str,
    role: NodeRole,
    declared: bool,
    vulnerabilities: &'a [String],
}

#[derive(Debug, Serialize)]
struct EdgeEntry<'a> {
    source: &'a str,
    target: &'a str,
    origins: Vec<EdgeOrigin>,
}

#[derive(Debug, Serialize)]
struct ReportDocument<'a> {
    nodes: Vec<NodeEntry<'a>>,
    edges: Vec<EdgeEntry<'a>>,
    denials: Vec<&'a Denial>,
    contested: Vec<&'a Denial>,
}

impl<'a> From<&'a GraphModel> for ReportDocument<'a> {
    fn from(model: &'a GraphModel) -> Self {
        Self {
            nodes: model
                .nodes()
                .map(|node| NodeEntry {
                    uuid: node.to_uuidv5(),
                    id: &node.id,
                    role: node.role,
                    declared: node.declared,
                    vulnerabilities: &node.vulnerabilities,
                })
                .collect(),
            edges: model
                .edges()
                .into_iter()
                .map(|edge| EdgeEntry {
                    source: &edge.source,
                    target: &edge.target,
                    origins: edge.origins.iter().copied().collect(),
                })
                .collect(),
            denials: model.denials().collect(),
            contested: model.contested().collect(),
        }
    }
}

/// Pretty-printed JSON document `{nodes, edges, denials, contested}`.
pub fn to_json(model: &GraphModel) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&ReportDocument::from(model))
}
