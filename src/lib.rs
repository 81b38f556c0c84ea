pub mod error;
pub mod loader;
pub mod network;
pub mod parsers;
pub mod render;
pub mod report;

pub use error::{GraphError, GraphResult};
pub use loader::{load_files, load_model};
pub use network::network_graph::{GraphBuilder, GraphModel};
