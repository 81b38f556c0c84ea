use std::collections::{BTreeMap, BTreeSet};

use petgraph::{
    Directed,
    stable_graph::{NodeIndex, StableGraph},
};
use tracing::{debug, warn};

use crate::{
    error::{GraphError, GraphResult},
    network::{
        edge::{Denial, Edge, EdgeOrigin},
        node::{Node, NodeId, NodeRole},
        router::{Access, RouterBlock},
    },
    parsers::topology::TopologyMap,
};

pub type AttackGraph = StableGraph<Node, Edge, Directed>;

/// The finished attack graph.
///
/// Read-only once built: nodes with their attributes, directed edges without
/// parallels or self-loops, and the record of denied accesses.
/// Enumeration is sorted by identifier so output is reproducible.
#[derive(Debug, Clone)]
pub struct GraphModel {
    graph: AttackGraph,
    node_id_to_index_map: BTreeMap<NodeId, NodeIndex>,
    denials: BTreeSet<Denial>,
}

impl GraphModel {
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.node_id_to_index_map
            .values()
            .map(|&index| &self.graph[index])
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.node_id_to_index_map
            .get(id)
            .map(|&index| &self.graph[index])
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node_id_to_index_map.contains_key(id)
    }

    /// Edges sorted by (source, target).
    pub fn edges(&self) -> Vec<&Edge> {
        let mut edges: Vec<&Edge> = self
            .graph
            .edge_indices()
            .filter_map(|index| self.graph.edge_weight(index))
            .collect();
        edges.sort_by(|a, b| a.endpoints().cmp(&b.endpoints()));
        edges
    }

    pub fn edge(&self, source: &str, target: &str) -> Option<&Edge> {
        let source = *self.node_id_to_index_map.get(source)?;
        let target = *self.node_id_to_index_map.get(target)?;
        self.graph
            .find_edge(source, target)
            .and_then(|index| self.graph.edge_weight(index))
    }

    pub fn has_edge(&self, source: &str, target: &str) -> bool {
        self.edge(source, target).is_some()
    }

    pub fn denials(&self) -> impl Iterator<Item = &Denial> {
        self.denials.iter()
    }

    /// Nodes that only appear as an edge endpoint.
    pub fn undeclared(&self) -> impl Iterator<Item = &Node> {
        self.nodes().filter(|node| node.is_undeclared())
    }

    /// Denials whose (router, target) pair is also allowed by a `+` rule.
    pub fn contested(&self) -> impl Iterator<Item = &Denial> {
        self.denials.iter().filter(|denial| {
            self.edge(&denial.router, &denial.target)
                .is_some_and(Edge::is_allowed_access)
        })
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn denial_count(&self) -> usize {
        self.denials.len()
    }

    /// Read-only petgraph view for renderers and analyzers.
    pub fn graph(&self) -> &AttackGraph {
        &self.graph
    }

    pub fn index_of(&self, id: &str) -> Option<NodeIndex> {
        self.node_id_to_index_map.get(id).copied()
    }
}

/// Merges the parsed topology and connectivity into a `GraphModel`.
///
/// Hosts become declared nodes first. Every `>` link and every `+` rule then adds
/// a directed edge from the block's router, creating undeclared nodes for unknown
/// endpoints. `-` rules only go to the denial record.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    graph: AttackGraph,
    node_id_to_index_map: BTreeMap<NodeId, NodeIndex>,
    denials: BTreeSet<Denial>,
    routers: BTreeSet<NodeId>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the graph in one go. Fails on the first self-loop; no partial model is returned.
    pub fn build(topology: TopologyMap, blocks: Vec<RouterBlock>) -> GraphResult<GraphModel> {
        let mut builder = Self::new();
        for host in topology.into_hosts() {
            builder.add_host(host.id, host.vulnerabilities);
        }
        for block in &blocks {
            builder.add_block(block)?;
        }
        Ok(builder.finish())
    }

    pub fn add_host(&mut self, id: NodeId, vulnerabilities: Vec<String>) {
        if let Some(&index) = self.node_id_to_index_map.get(&id) {
            self.graph[index] = Node::declared(id, vulnerabilities);
            return;
        }
        let index = self.graph.add_node(Node::declared(id.clone(), vulnerabilities));
        self.node_id_to_index_map.insert(id, index);
    }

    /// Adds the edges and denials of one router block.
    /// The block is checked for self-loops first, so a rejected block leaves the builder untouched.
    pub fn add_block(&mut self, block: &RouterBlock) -> GraphResult<()> {
        Self::check_self_loops(block)?;
        self.routers.insert(block.router.clone());

        for link in &block.links {
            self.add_edge(block, &link.target, EdgeOrigin::RouterLink);
        }

        for rule in &block.rules {
            match rule.access {
                Access::Allow => self.add_edge(block, &rule.target, EdgeOrigin::Allow),
                Access::Deny => {
                    self.denials.insert(Denial::new(block.router.as_str(), rule.target.as_str()));
                }
            }
        }
        Ok(())
    }

    fn check_self_loops(block: &RouterBlock) -> GraphResult<()> {
        let edge_lines = block.links.iter().map(|link| (link.target.as_str(), link.line)).chain(
            block
                .rules_with(Access::Allow)
                .map(|rule| (rule.target.as_str(), rule.line)),
        );
        let first_loop = edge_lines
            .filter(|(target, _)| *target == block.router)
            .map(|(_, line)| line)
            .min();
        match first_loop {
            Some(line) => Err(GraphError::SelfLoop {
                origin: block.origin.clone(),
                line,
                router: block.router.clone(),
            }),
            None => Ok(()),
        }
    }

    fn add_edge(&mut self, block: &RouterBlock, target: &str, origin: EdgeOrigin) {
        let source_index = self.ensure_node(&block.router);
        let target_index = self.ensure_node(target);

        match self.graph.find_edge(source_index, target_index) {
            Some(edge_index) => {
                self.graph[edge_index].origins.insert(origin);
            }
            None => {
                let edge = Edge::new(block.router.as_str(), target, origin);
                self.graph.add_edge(source_index, target_index, edge);
            }
        }
    }

    /// Index of `id`, creating an undeclared node when it was never seen.
    fn ensure_node(&mut self, id: &str) -> NodeIndex {
        if let Some(&index) = self.node_id_to_index_map.get(id) {
            return index;
        }
        let index = self.graph.add_node(Node::undeclared(id));
        self.node_id_to_index_map.insert(id.to_string(), index);
        index
    }

    pub fn finish(mut self) -> GraphModel {
        for router in &self.routers {
            if let Some(&index) = self.node_id_to_index_map.get(router) {
                self.graph[index].role = NodeRole::Router;
            }
        }

        let model = GraphModel {
            graph: self.graph,
            node_id_to_index_map: self.node_id_to_index_map,
            denials: self.denials,
        };

        for denial in model.contested() {
            warn!(
                router = %denial.router,
                target = %denial.target,
                "access is both allowed and denied, keeping the edge and the denial"
            );
        }
        debug!(
            nodes = model.node_count(),
            edges = model.edge_count(),
            denials = model.denial_count(),
            undeclared = model.undeclared().count(),
            "built attack graph"
        );
        model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::{connectivity::parse_connectivity, topology::parse_topology};

    fn build(topology: &str, connections: &str) -> GraphResult<GraphModel> {
        GraphBuilder::build(
            parse_topology(topology).unwrap(),
            parse_connectivity(connections).unwrap(),
        )
    }

    fn edge_pairs(model: &GraphModel) -> Vec<(String, String)> {
        model
            .edges()
            .into_iter()
            .map(|e| (e.source.clone(), e.target.clone()))
            .collect()
    }

    fn denial_pairs(model: &GraphModel) -> Vec<(String, String)> {
        model
            .denials()
            .map(|d| (d.router.clone(), d.target.clone()))
            .collect()
    }

    fn pair(a: &str, b: &str) -> (String, String) {
        (a.to_string(), b.to_string())
    }

    #[test]
    fn test_reference_scenario() {
        let model = build(
            "10.0.0.1 : CVE-1, CVE-2\n10.0.0.2 : CVE-3\n",
            "10.0.0.1:\n>10.0.0.2\n+10.0.0.3\n-10.0.0.4\n",
        )
        .unwrap();

        let ids: Vec<_> = model.nodes().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, ["10.0.0.1", "10.0.0.2", "10.0.0.3"]);
        assert_eq!(model.node("10.0.0.1").unwrap().vulnerabilities, ["CVE-1", "CVE-2"]);
        assert_eq!(model.node("10.0.0.2").unwrap().vulnerabilities, ["CVE-3"]);

        let undeclared = model.node("10.0.0.3").unwrap();
        assert!(undeclared.vulnerabilities.is_empty());
        assert!(undeclared.is_undeclared());

        assert_eq!(
            edge_pairs(&model),
            [pair("10.0.0.1", "10.0.0.2"), pair("10.0.0.1", "10.0.0.3")]
        );
        assert_eq!(denial_pairs(&model), [pair("10.0.0.1", "10.0.0.4")]);
        assert!(!model.contains_node("10.0.0.4"));
    }

    #[test]
    fn test_fixture_graph() {
        let model = build(
            include_str!("../../test_data/topology.txt"),
            include_str!("../../test_data/connections.txt"),
        )
        .unwrap();

        assert_eq!(model.node_count(), 7);
        assert_eq!(model.edge_count(), 7);
        assert_eq!(model.denial_count(), 3);

        let undeclared: Vec<_> = model.undeclared().map(|n| n.id.as_str()).collect();
        assert_eq!(undeclared, ["10.10.0.2"]);
        assert!(!model.contains_node("192.168.134.99"));

        let routers: Vec<_> = model.nodes().filter(|n| n.is_router()).map(|n| n.id.as_str()).collect();
        assert_eq!(routers, ["10.10.0.1", "10.10.0.2", "192.168.134.3"]);
        assert_eq!(model.contested().count(), 0);
    }

    #[test]
    fn test_allow_always_yields_edge() {
        let model = build("", "r1:\n+h1\n+h2\n").unwrap();
        assert!(model.has_edge("r1", "h1"));
        assert!(model.has_edge("r1", "h2"));
        assert!(model.edge("r1", "h1").unwrap().is_allowed_access());
    }

    #[test]
    fn test_deny_never_yields_edge() {
        let model = build("h1 : CVE-1\n", "r1:\n-h1\n-h2\n").unwrap();
        assert_eq!(model.edge_count(), 0);
        assert_eq!(denial_pairs(&model), [pair("r1", "h1"), pair("r1", "h2")]);
        // A router with only denials is not an edge endpoint
        assert!(!model.contains_node("r1"));
        assert!(!model.contains_node("h2"));
        assert!(model.contains_node("h1"));
    }

    #[test]
    fn test_router_links_are_not_reciprocal() {
        let model = build("", "r1:\n>r2\n").unwrap();
        assert!(model.has_edge("r1", "r2"));
        assert!(!model.has_edge("r2", "r1"));
    }

    #[test]
    fn test_undeclared_router_source_is_created() {
        let model = build("h1 : CVE-1\n", "r1:\n+h1\n").unwrap();
        let router = model.node("r1").unwrap();
        assert!(router.is_undeclared());
        assert!(router.is_router());
        assert_eq!(model.node("h1").unwrap().role, NodeRole::Host);
    }

    #[test]
    fn test_declared_router_keeps_vulnerabilities() {
        let model = build("r1 : CVE-9\n", "r1:\n>r2\n").unwrap();
        let router = model.node("r1").unwrap();
        assert!(router.declared);
        assert!(router.is_router());
        assert_eq!(router.vulnerabilities, ["CVE-9"]);
    }

    #[test]
    fn test_link_and_allow_collapse_into_one_edge() {
        let model = build("", "r1:\n>r2\n+r2\n+r2\n").unwrap();
        assert_eq!(model.edge_count(), 1);
        let edge = model.edge("r1", "r2").unwrap();
        assert_eq!(
            edge.origins,
            BTreeSet::from([EdgeOrigin::RouterLink, EdgeOrigin::Allow])
        );
    }

    #[test]
    fn test_repeated_router_blocks_are_merged() {
        let model = build("", "r1:\n+h1\nr2:\n+h2\nr1:\n+h3\n-h4\n").unwrap();
        assert!(model.has_edge("r1", "h1"));
        assert!(model.has_edge("r1", "h3"));
        assert_eq!(denial_pairs(&model), [pair("r1", "h4")]);
    }

    #[test]
    fn test_self_loop_is_rejected() {
        for connections in ["r1:\n>r1\n", "r1:\n+h1\n+r1\n"] {
            let err = build("", connections).unwrap_err();
            match err {
                GraphError::SelfLoop { router, line, .. } => {
                    assert_eq!(router, "r1");
                    assert_eq!(line, connections.lines().count());
                }
                other => panic!("unexpected error: {other:?}"),
            }
        }
    }

    #[test]
    fn test_self_denial_is_recorded() {
        let model = build("", "r1:\n-r1\n").unwrap();
        assert_eq!(denial_pairs(&model), [pair("r1", "r1")]);
        assert_eq!(model.edge_count(), 0);
    }

    #[test]
    fn test_contested_access() {
        let model = build("", "r1:\n+h1\n-h1\n>r2\nr3:\n-r2\n").unwrap();
        assert!(model.has_edge("r1", "h1"));
        let contested: Vec<_> = model.contested().collect();
        assert_eq!(contested, [&Denial::new("r1", "h1")]);
    }

    #[test]
    fn test_build_is_deterministic_across_line_order() {
        let topology = "10.0.0.1 : CVE-1\n10.0.0.2 : CVE-2\n";
        let a = build(topology, "10.0.0.1:\n>10.0.0.2\n+10.0.0.3\n-10.0.0.4\n+10.0.0.5\n").unwrap();
        let b = build(topology, "10.0.0.1:\n+10.0.0.5\n-10.0.0.4\n+10.0.0.3\n>10.0.0.2\n").unwrap();

        let nodes_a: Vec<_> = a.nodes().cloned().collect();
        let nodes_b: Vec<_> = b.nodes().cloned().collect();
        assert_eq!(nodes_a, nodes_b);
        assert_eq!(a.edges(), b.edges());
        assert_eq!(denial_pairs(&a), denial_pairs(&b));

        let again = build(topology, "10.0.0.1:\n>10.0.0.2\n+10.0.0.3\n-10.0.0.4\n+10.0.0.5\n").unwrap();
        assert_eq!(format!("{:?}", a.edges()), format!("{:?}", again.edges()));
    }

    #[test]
    fn test_rejected_block_leaves_builder_untouched() {
        let blocks = parse_connectivity("r0:\n+h0\nr1:\n>r2\n+h1\n-h3\n>r1\n").unwrap();
        let mut builder = GraphBuilder::new();
        builder.add_block(&blocks[0]).unwrap();

        let err = builder.add_block(&blocks[1]).unwrap_err();
        assert!(matches!(err, GraphError::SelfLoop { line: 7, .. }));

        let model = builder.finish();
        assert_eq!(edge_pairs(&model), [pair("r0", "h0")]);
        assert_eq!(model.denial_count(), 0);
        assert!(!model.contains_node("r1"));
        assert!(!model.contains_node("r2"));
    }

    #[test]
    fn test_every_edge_endpoint_is_a_node() {
        let model = build(
            include_str!("../../test_data/topology.txt"),
            include_str!("../../test_data/connections.txt"),
        )
        .unwrap();
        for edge in model.edges() {
            assert!(model.contains_node(&edge.source), "missing {}", edge.source);
            assert!(model.contains_node(&edge.target), "missing {}", edge.target);
        }
    }
}
