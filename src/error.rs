/*!
Error taxonomy shared by the parsers, the graph builder and the renderers.

Parsing and building are all-or-nothing: any of these errors aborts the whole
construction and no partial `GraphModel` is handed out.
*/

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GraphError {
    /// The input could not be opened or read. Covers missing files as well as
    /// unreadable ones; nothing is retried.
    #[error("Cannot read {path}: {source}")]
    FileNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{origin}:{line}: malformed topology line '{text}' ({reason})")]
    MalformedTopologyLine {
        origin: String,
        line: usize,
        text: String,
        reason: &'static str,
    },
    #[error("{origin}:{line}: malformed connectivity line '{text}' ({reason})")]
    MalformedConnectivityLine {
        origin: String,
        line: usize,
        text: String,
        reason: &'static str,
    },
    #[error("{origin}:{line}: '{text}' appears before any router header")]
    UndefinedRouterContext {
        origin: String,
        line: usize,
        text: String,
    },
    #[error("{origin}:{line}: router {router} cannot have an edge to itself")]
    SelfLoop {
        origin: String,
        line: usize,
        router: String,
    },
    #[error("Cannot write {path}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Render error: {0}")]
    Render(String),
}

impl GraphError {
    /// 1-based line number of the offending input line, for parse and build errors.
    pub fn line(&self) -> Option<usize> {
        match self {
            GraphError::MalformedTopologyLine { line, .. }
            | GraphError::MalformedConnectivityLine { line, .. }
            | GraphError::UndefinedRouterContext { line, .. }
            | GraphError::SelfLoop { line, .. } => Some(*line),
            _ => None,
        }
    }
}

pub type GraphResult<T> = Result<T, GraphError>;
