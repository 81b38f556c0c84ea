/*
 * This module defines the attack graph: nodes annotated with vulnerabilities,
 * directed edges, router blocks and the denial record.
 * The builder merges parsed inputs into an immutable GraphModel.
 */

pub mod edge;
pub mod network_graph;
pub mod node;
pub mod router;
