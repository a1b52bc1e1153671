//! Line parser for `.bench` netlists.
//!
//! Each non-blank, non-comment line holds one declaration:
//!
//! ```text
//! INPUT(G0)
//! OUTPUT(G17)
//! G5 = DFF(G10)
//! G14 = NOT(G0)
//! G8 = AND(G14, G6)
//! ```
//!
//! Lines that match none of these shapes are skipped and reported with
//! [`ErrorCode::W001`]. A trailing `# comment` after a declaration is allowed.

use log::{debug, trace};
use winnow::{
    Parser as _,
    ascii::space0,
    combinator::{alt, delimited, eof, opt, separated, terminated},
    error::{ContextError, ModalResult},
    token::{literal, rest, take_while},
};

use gateview_core::{
    identifier::Id,
    netlist::{Declaration, Graph},
};

use crate::{
    error::{Diagnostic, ErrorCode},
    span::Span,
};

type IResult<O> = ModalResult<O, ContextError>;

const FLIP_FLOP_TYPE: &str = "DFF";

/// Result of parsing a netlist: the graph plus any skipped-line warnings.
#[derive(Debug)]
pub struct ParsedNetlist {
    graph: Graph,
    diagnostics: Vec<Diagnostic>,
}

impl ParsedNetlist {
    /// Returns the constructed graph.
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Returns the warnings collected while parsing.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Splits the result into the graph and its diagnostics.
    pub fn into_parts(self) -> (Graph, Vec<Diagnostic>) {
        (self.graph, self.diagnostics)
    }
}

/// Signal and gate-type names: `[A-Za-z0-9_]+`.
fn name<'a>(input: &mut &'a str) -> IResult<&'a str> {
    take_while(1.., |c: char| c.is_alphanumeric() || c == '_').parse_next(input)
}

/// `( a , b , c )` with at least one signal.
fn argument_list<'a>(input: &mut &'a str) -> IResult<Vec<&'a str>> {
    delimited(
        ('(', space0),
        separated(1.., name, (space0, ',', space0)),
        (space0, ')'),
    )
    .parse_next(input)
}

/// `INPUT(x)` or `OUTPUT(x)`.
fn port(input: &mut &str) -> IResult<Declaration> {
    let keyword = alt((literal("INPUT"), literal("OUTPUT"))).parse_next(input)?;
    let signal = delimited((space0, '(', space0), name, (space0, ')')).parse_next(input)?;

    let id = Id::new(signal);
    Ok(if keyword == "INPUT" {
        Declaration::Input(id)
    } else {
        Declaration::Output(id)
    })
}

/// `y = TYPE(a, b, ...)`, where `DFF` with a single input declares a flip-flop.
fn assignment(input: &mut &str) -> IResult<Declaration> {
    let output = name.parse_next(input)?;
    (space0, '=', space0).parse_next(input)?;
    let gate_type = name.parse_next(input)?;
    space0.parse_next(input)?;
    let inputs = argument_list.parse_next(input)?;

    let output = Id::new(output);
    if gate_type == FLIP_FLOP_TYPE && inputs.len() == 1 {
        return Ok(Declaration::FlipFlop {
            output,
            data: Id::new(inputs[0]),
        });
    }

    Ok(Declaration::Gate {
        output,
        gate_type: Id::new(gate_type),
        inputs: inputs.into_iter().map(Id::new).collect(),
    })
}

/// A whole trimmed line, optionally followed by a `#` comment.
fn declaration(input: &mut &str) -> IResult<Declaration> {
    terminated(alt((port, assignment)), (space0, opt(('#', rest)), eof)).parse_next(input)
}

/// Parses netlist source text into a [`Graph`].
///
/// Parsing never fails. Blank lines and lines starting with `#` are ignored;
/// any other line that is not a declaration is skipped with a
/// [`ErrorCode::W001`] warning.
///
/// ```
/// # use gateview_core::{identifier::Id, netlist::NodeKind};
/// let parsed = gateview_parser::parse_netlist("INPUT(a)\nOUTPUT(b)\nb = AND(a, a)\n");
///
/// assert!(parsed.diagnostics().is_empty());
/// assert_eq!(parsed.graph().classify(Id::new("b")), NodeKind::Output);
/// ```
pub fn parse_netlist(source: &str) -> ParsedNetlist {
    let mut declarations = Vec::new();
    let mut diagnostics = Vec::new();
    let mut offset = 0;

    for (index, raw_line) in source.split_inclusive('\n').enumerate() {
        let line_start = offset;
        offset += raw_line.len();

        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut input = line;
        match declaration.parse_next(&mut input) {
            Ok(decl) => {
                trace!(line = index + 1, declaration:? = decl; "Parsed declaration");
                declarations.push(decl);
            }
            Err(_) => {
                let start = line_start + (raw_line.len() - raw_line.trim_start().len());
                let span = Span::new(start..start + line.len());
                debug!(line = index + 1, text = line; "Skipping malformed netlist line");
                diagnostics.push(
                    Diagnostic::warning(format!("skipped malformed netlist line {}", index + 1))
                        .with_code(ErrorCode::W001)
                        .with_label(span, "not a declaration")
                        .with_help("expected `INPUT(x)`, `OUTPUT(x)`, `y = DFF(x)` or `y = TYPE(a, b, ...)`"),
                );
            }
        }
    }

    debug!(
        declarations = declarations.len(),
        skipped = diagnostics.len();
        "Netlist parsed"
    );

    ParsedNetlist {
        graph: Graph::from_declarations(declarations),
        diagnostics,
    }
}
