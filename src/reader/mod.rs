//! Lexical reader for Glint source text
//!
//! Converts source text directly into a forest of syntax nodes in a single
//! pass. There is no intermediate token stream: parenthesized structure,
//! string literals, and atoms come out of the same scan.

mod node;
mod scan;

pub use node::{Node, NodeKind, Span};
pub use scan::read;
