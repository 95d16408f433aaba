//! Syntax tree produced by the reader.
//!
//! Every node remembers the byte range of source text it was read from, so
//! runtime diagnostics can point back at the offending expression.

use serde::{Deserialize, Serialize};

/// Half-open byte range into the source text a node was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    /// Offset of the first byte
    pub start: usize,
    /// Offset one past the last byte
    pub end: usize,
}

impl Span {
    /// Create a span covering `start..end`
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    /// The source text this span covers, or `""` if it is out of range
    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        source.get(self.start..self.end).unwrap_or("")
    }
}

/// A single node of the syntax forest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// What kind of expression this is, with its payload
    pub kind: NodeKind,
    /// Where in the source it was read from
    pub span: Span,
}

/// The closed set of expression shapes the reader can produce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    /// Integer literal, e.g. `42`
    Int(i64),
    /// Float literal, e.g. `2.5`
    Float(f64),
    /// String literal with escapes already decoded, e.g. `"hi"`
    Str(String),
    /// Bare name to be resolved at evaluation time, e.g. `declare`
    Symbol(String),
    /// Parenthesized call expression holding its children in order
    Call(Vec<Node>),
}

impl Node {
    /// Create a node with an explicit source span
    pub fn new(kind: NodeKind, span: Span) -> Self {
        Node { kind, span }
    }

    /// Create a node with an empty span, for code built at runtime rather
    /// than read from source
    pub(crate) fn synthetic(kind: NodeKind) -> Self {
        Node {
            kind,
            span: Span::default(),
        }
    }

    /// The symbol text if this node is a symbol
    pub fn as_symbol(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Symbol(name) => Some(name),
            _ => None,
        }
    }

    /// Short name of the node's kind, for error messages
    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            NodeKind::Int(_) => "int",
            NodeKind::Float(_) => "float",
            NodeKind::Str(_) => "string",
            NodeKind::Symbol(_) => "symbol",
            NodeKind::Call(_) => "call expression",
        }
    }
}
