/*
Parsers for the two line-oriented input formats.

Both work on plain text only, file access lives in the loader module:

--- loader module ---
topology file / connections file
|
| raw text
v
--- parsers module ---
TopologyMap (hosts with vulnerabilities), Vec<RouterBlock>
|
v
--- network module ---
GraphBuilder -> GraphModel
*/

use crate::error::GraphResult;

pub mod connectivity;
pub mod topology;

pub use connectivity::ConnectivityParser;
pub use topology::{Host, TopologyMap, TopologyParser};

/// A parser from one input text to an intermediate structure consumed by the graph builder.
pub trait InputParser {
    type Output;

    fn parse(&self, text: &str) -> GraphResult<Self::Output>;
}

/// Iterates over trimmed, non-blank lines together with their 1-based line number.
/// `raw` keeps the untrimmed text for error messages.
pub(crate) fn content_lines(text: &str) -> impl Iterator<Item = ContentLine<'_>> {
    text.lines().enumerate().filter_map(|(index, raw)| {
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then_some(ContentLine {
            number: index + 1,
            raw,
            trimmed,
        })
    })
}

pub(crate) struct ContentLine<'a> {
    pub number: usize,
    pub raw: &'a str,
    pub trimmed: &'a str,
}
