/*!
Loader module

Glues input acquisition, parsing and graph construction together.

Structure:
- `source`: the `InputSource` trait with file and in-memory implementations.

`load_model` reads both inputs, parses them with the origin of each source
and hands the results to `GraphBuilder`. Any failure aborts the whole load.
*/

pub mod source;

use std::path::Path;

use tracing::info;

use crate::{
    error::GraphResult,
    network::network_graph::{GraphBuilder, GraphModel},
    parsers::{ConnectivityParser, InputParser, TopologyParser},
};

pub use source::{FileSource, InputSource, TextSource};

pub fn load_model(
    topology: &dyn InputSource,
    connectivity: &dyn InputSource,
) -> GraphResult<GraphModel> {
    let hosts = TopologyParser::with_origin(topology.origin()).parse(&topology.read_text()?)?;
    let blocks =
        ConnectivityParser::with_origin(connectivity.origin()).parse(&connectivity.read_text()?)?;

    let model = GraphBuilder::build(hosts, blocks)?;
    info!(
        topology = %topology.origin(),
        connectivity = %connectivity.origin(),
        nodes = model.node_count(),
        edges = model.edge_count(),
        denials = model.denial_count(),
        "loaded attack graph"
    );
    Ok(model)
}

pub fn load_files(
    topology: impl AsRef<Path>,
    connectivity: impl AsRef<Path>,
) -> GraphResult<GraphModel> {
    load_model(
        &FileSource::new(topology.as_ref()),
        &FileSource::new(connectivity.as_ref()),
    )
}
