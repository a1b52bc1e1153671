//! Critical-path report parser.
//!
//! A report is a sequence of blocks emitted by a statistical timing tool:
//!
//! ```text
//! # Path 0 (delay: 41.27)
//! #node        delay    sigma
//! #--------------------------
//! G0           0.000    0.000
//! G14          12.31    1.020
//! G8           27.02    1.870
//! #--------------------------
//! ```
//!
//! Only the header and the first token of every line between the two `#-`
//! separators are used. Anything else is ignored.

use std::mem;

use log::{debug, trace};
use winnow::{
    Parser as _,
    ascii::{digit1, space0, space1},
    error::{ContextError, ModalResult},
    token::{literal, take_while},
};

use gateview_core::identifier::Id;

use crate::{
    error::{Diagnostic, ErrorCode},
    span::Span,
};

type IResult<O> = ModalResult<O, ContextError>;

const SEPARATOR_PREFIX: &str = "#-";
const COLUMN_HEADER_PREFIX: &str = "#node";

/// One reported critical path.
#[derive(Debug, Clone, PartialEq)]
pub struct CriticalPath {
    index: u32,
    delay: f64,
    nodes: Vec<Id>,
}

impl CriticalPath {
    /// Creates a path with no nodes yet.
    pub fn new(index: u32, delay: f64) -> Self {
        Self {
            index,
            delay,
            nodes: Vec::new(),
        }
    }

    /// Creates a path with the given node sequence.
    pub fn with_nodes(mut self, nodes: impl IntoIterator<Item = Id>) -> Self {
        self.nodes.extend(nodes);
        self
    }

    /// Returns the index from the block header.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Returns the reported delay, in the tool's unit.
    pub fn delay(&self) -> f64 {
        self.delay
    }

    /// Returns the nodes in signal propagation order.
    pub fn nodes(&self) -> &[Id] {
        &self.nodes
    }

    /// Returns `true` if the block listed no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Result of parsing a report: every path block in file order.
#[derive(Debug, Default)]
pub struct ParsedReport {
    paths: Vec<CriticalPath>,
    diagnostics: Vec<Diagnostic>,
}

impl ParsedReport {
    /// Returns the parsed paths, in file order. May include empty paths.
    pub fn paths(&self) -> &[CriticalPath] {
        &self.paths
    }

    /// Returns [`ErrorCode::W010`] when the report held no usable path.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Returns `true` if at least one path lists a node.
    pub fn has_paths(&self) -> bool {
        self.paths.iter().any(|path| !path.is_empty())
    }

    /// Consumes the report and returns its paths.
    pub fn into_paths(self) -> Vec<CriticalPath> {
        self.paths
    }
}

/// `# Path <index> (delay: <float>)`, anything after the closing paren is ignored.
fn header(input: &mut &str) -> IResult<(u32, f64)> {
    (literal("#"), space0, literal("Path"), space1).parse_next(input)?;
    let index = digit1.try_map(str::parse::<u32>).parse_next(input)?;
    (space0, '(', space0, literal("delay:"), space0).parse_next(input)?;
    let delay = take_while(1.., |c: char| {
        c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-')
    })
    .try_map(str::parse::<f64>)
    .parse_next(input)?;
    (space0, ')').parse_next(input)?;
    Ok((index, delay))
}

fn parse_header(line: &str) -> Option<(u32, f64)> {
    let mut input = line;
    header.parse_next(&mut input).ok()
}

#[derive(Debug)]
enum State {
    Idle,
    HeaderSeen(CriticalPath),
    ReadingNodes(CriticalPath),
}

impl State {
    fn into_open_path(self) -> Option<CriticalPath> {
        match self {
            State::Idle => None,
            State::HeaderSeen(path) | State::ReadingNodes(path) => Some(path),
        }
    }
}

/// Parses a critical-path report.
///
/// Parsing never fails. A header opens a new path, flushing any path still
/// open; the first `#-` separator starts the node list and the second one
/// closes it. A path whose list is never closed is emitted at the next
/// header or at end of input.
///
/// ```
/// let report = gateview_parser::parse_report(
///     "# Path 0 (delay: 1.5)\n#----\nG1 0.1\nG2 0.3\n#----\n",
/// );
///
/// assert_eq!(report.paths().len(), 1);
/// assert_eq!(report.paths()[0].nodes().len(), 2);
/// ```
pub fn parse_report(source: &str) -> ParsedReport {
    let mut paths = Vec::new();
    let mut state = State::Idle;

    for raw_line in source.lines() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some((index, delay)) = parse_header(line) {
            trace!(index = index, delay = delay; "Path header");
            paths.extend(mem::replace(&mut state, State::Idle).into_open_path());
            state = State::HeaderSeen(CriticalPath::new(index, delay));
            continue;
        }

        if line.starts_with(COLUMN_HEADER_PREFIX) {
            continue;
        }

        state = match mem::replace(&mut state, State::Idle) {
            State::Idle => State::Idle,
            State::HeaderSeen(path) if line.starts_with(SEPARATOR_PREFIX) => {
                State::ReadingNodes(path)
            }
            State::HeaderSeen(path) => State::HeaderSeen(path),
            State::ReadingNodes(path) if line.starts_with(SEPARATOR_PREFIX) => {
                paths.push(path);
                State::Idle
            }
            State::ReadingNodes(mut path) => {
                if let Some(token) = line.split_whitespace().next() {
                    path.nodes.push(Id::new(token));
                }
                State::ReadingNodes(path)
            }
        };
    }
    paths.extend(state.into_open_path());

    let mut report = ParsedReport {
        paths,
        diagnostics: Vec::new(),
    };

    if !report.has_paths() {
        report.diagnostics.push(
            Diagnostic::warning("no critical paths found")
                .with_code(ErrorCode::W010)
                .with_label(Span::new(0..source.len()), "report")
                .with_help("expected blocks starting with `# Path <n> (delay: <d>)`"),
        );
    }

    debug!(
        paths = report.paths.len(),
        usable = report.paths.iter().filter(|path| !path.is_empty()).count();
        "Report parsed"
    );

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node_names(path: &CriticalPath) -> Vec<String> {
        path.nodes().iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_header() {
        assert_eq!(parse_header("# Path 3 (delay: 12.5)"), Some((3, 12.5)));
        assert_eq!(parse_header("# Path 0  (delay:   1e-3) extra"), Some((0, 0.001)));
        assert_eq!(parse_header("# Path x (delay: 1.0)"), None);
        assert_eq!(parse_header("# Path 1 (delay: 1.2.3)"), None);
        assert_eq!(parse_header("# Paths 1 (delay: 1.0)"), None);
    }

    #[test]
    fn test_two_blocks() {
        let source = "\
# Path 0 (delay: 1.5)
#-----
nodeA 0.5
nodeB 1.0
#-----

# Path 1 (delay: 2.25)
#-----
nodeC
#-----
";
        let report = parse_report(source);

        assert!(report.diagnostics().is_empty());
        let paths = report.paths();
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[0].index(), 0);
        assert_eq!(paths[0].delay(), 1.5);
        assert_eq!(node_names(&paths[0]), vec!["nodeA", "nodeB"]);
        assert_eq!(paths[1].delay(), 2.25);
        assert_eq!(node_names(&paths[1]), vec!["nodeC"]);
    }

    #[test]
    fn test_column_header_is_skipped() {
        let source = "# Path 0 (delay: 4)\n#node delay\n#---\n#node again\nG1\n#---\n";
        let report = parse_report(source);

        assert_eq!(node_names(&report.paths()[0]), vec!["G1"]);
    }

    #[test]
    fn test_unterminated_block_is_emitted_at_end() {
        let report = parse_report("# Path 7 (delay: 3.0)\n#---\nG1\nG2\n");

        assert_eq!(report.paths().len(), 1);
        assert_eq!(report.paths()[0].index(), 7);
        assert_eq!(node_names(&report.paths()[0]), vec!["G1", "G2"]);
    }

    #[test]
    fn test_new_header_flushes_open_path() {
        let source = "# Path 0 (delay: 1)\n#---\nG1\n# Path 1 (delay: 2)\n#---\nG2\n#---\n";
        let report = parse_report(source);

        assert_eq!(report.paths().len(), 2);
        assert_eq!(node_names(&report.paths()[0]), vec!["G1"]);
        assert_eq!(node_names(&report.paths()[1]), vec!["G2"]);
    }

    #[test]
    fn test_lines_outside_blocks_are_ignored() {
        let source = "\
nhssta 1.2
#-----
stray
# Path 0 (delay: 1)
not inside the list
#-----
G1
#-----
trailing G9
";
        let report = parse_report(source);

        assert_eq!(report.paths().len(), 1);
        assert_eq!(node_names(&report.paths()[0]), vec!["G1"]);
    }

    #[test]
    fn test_header_only_path_is_kept_but_empty() {
        let report = parse_report("# Path 0 (delay: 1)\n");

        assert_eq!(report.paths().len(), 1);
        assert!(report.paths()[0].is_empty());
        assert!(!report.has_paths());
        assert_eq!(report.diagnostics()[0].code(), Some(ErrorCode::W010));
    }

    #[test]
    fn test_empty_report_warns() {
        let report = parse_report("");

        assert!(report.paths().is_empty());
        assert_eq!(report.diagnostics().len(), 1);
        assert!(report.diagnostics()[0].severity().is_warning());
    }
}
