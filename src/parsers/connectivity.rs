/*!
Parser for the router connectivity map.

The input is a sequence of blocks:

```text
<routerId>:
><outboundRouterId>
+<allowedNodeId>
-<deniedNodeId>
```

Body lines attach to the most recent header. Blank lines are ignored and
blocks do not nest.

A line is read as a body line whenever it starts with a marker, even if it
also ends in `:`. Only unmarked lines can be headers, so `+fe80::` is an allow
rule for an IPv6 target. Older tooling for this format tested the `:` suffix
first and would have opened a block named `+fe80:` instead.
*/

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::{
    error::{GraphError, GraphResult},
    network::router::{Access, AccessRule, RouterBlock, RouterLink},
    parsers::{content_lines, ContentLine, InputParser},
};

/// Classified connectivity line. Markers are checked before the header suffix,
/// so a body line whose target ends in `:` (e.g. an IPv6 prefix) stays a body line.
#[derive(Debug, PartialEq, Eq)]
enum LineKind<'a> {
    Header(&'a str),
    Link(&'a str),
    Rule(Access, &'a str),
    Unknown,
}

impl<'a> LineKind<'a> {
    fn classify(line: &'a str) -> Self {
        let mut chars = line.chars();
        match chars.next() {
            Some('>') => LineKind::Link(chars.as_str().trim()),
            Some(marker @ ('+' | '-')) => match Access::from_marker(marker) {
                Some(access) => LineKind::Rule(access, chars.as_str().trim()),
                None => LineKind::Unknown,
            },
            _ => match line.strip_suffix(':') {
                Some(router) => LineKind::Header(router.trim()),
                None => LineKind::Unknown,
            },
        }
    }
}

/// Parses the connectivity input into router blocks, in input order.
///
/// A router that opens more than one block yields one `RouterBlock` per header;
/// the graph builder merges them.
#[derive(Debug, Clone)]
pub struct ConnectivityParser {
    origin: String,
}

impl Default for ConnectivityParser {
    fn default() -> Self {
        Self {
            origin: "connections".to_string(),
        }
    }
}

impl ConnectivityParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_origin(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
        }
    }

    fn malformed(&self, line: &ContentLine<'_>, reason: &'static str) -> GraphError {
        GraphError::MalformedConnectivityLine {
            origin: self.origin.clone(),
            line: line.number,
            text: line.raw.to_string(),
            reason,
        }
    }

    fn current<'b>(
        &self,
        current: &'b mut Option<RouterBlock>,
        line: &ContentLine<'_>,
    ) -> GraphResult<&'b mut RouterBlock> {
        current.as_mut().ok_or_else(|| GraphError::UndefinedRouterContext {
            origin: self.origin.clone(),
            line: line.number,
            text: line.raw.to_string(),
        })
    }
}

impl InputParser for ConnectivityParser {
    type Output = Vec<RouterBlock>;

    fn parse(&self, text: &str) -> GraphResult<Vec<RouterBlock>> {
        let mut blocks = Vec::new();
        let mut current: Option<RouterBlock> = None;

        for line in content_lines(text) {
            match LineKind::classify(line.trimmed) {
                LineKind::Header(router) => {
                    if router.is_empty() {
                        return Err(self.malformed(&line, "empty router identifier"));
                    }
                    let block = RouterBlock::new(router, self.origin.as_str(), line.number);
                    if let Some(finished) = current.replace(block) {
                        blocks.push(finished);
                    }
                }
                LineKind::Link(target) => {
                    let block = self.current(&mut current, &line)?;
                    if target.is_empty() {
                        return Err(self.malformed(&line, "missing router after '>'"));
                    }
                    block.links.push(RouterLink {
                        target: target.to_string(),
                        line: line.number,
                    });
                }
                LineKind::Rule(access, target) => {
                    let block = self.current(&mut current, &line)?;
                    if target.is_empty() {
                        return Err(self.malformed(&line, "missing node after access marker"));
                    }
                    block.rules.push(AccessRule {
                        access,
                        target: target.to_string(),
                        line: line.number,
                    });
                }
                LineKind::Unknown => {
                    return Err(self.malformed(&line, "expected '<router>:', '>', '+' or '-'"));
                }
            }
        }
        blocks.extend(current);

        let mut seen: HashMap<&str, usize> = HashMap::new();
        for block in &blocks {
            if let Some(first_line) = seen.insert(block.router.as_str(), block.line) {
                warn!(
                    origin = %self.origin,
                    router = %block.router,
                    first_line,
                    line = block.line,
                    "router block opened more than once, blocks will be merged"
                );
            }
        }
        debug!(origin = %self.origin, blocks = blocks.len(), "parsed connectivity");
        Ok(blocks)
    }
}

/// Parses connectivity text with the default origin label.
pub fn parse_connectivity(text: &str) -> GraphResult<Vec<RouterBlock>> {
    ConnectivityParser::new().parse(text)
}
