use super::node::{Node, NodeKind, Span};
use crate::error::{Error, Result};

/// Reads source text into a forest of syntax nodes.
///
/// There is no separate token stream: delimiters, string literals, and atoms
/// are recognized and assembled into the tree in a single left-to-right pass.
/// Nesting is tracked with an explicit stack of open lists, so arbitrarily
/// deep input never recurses.
pub fn read(source: &str) -> Result<Vec<Node>> {
    Reader::new(source).read_forest()
}

/// Cursor over the source text
struct Reader<'a> {
    /// Source code being read
    source: &'a str,
    /// Byte offset of the next character
    pos: usize,
}

/// A `(` that has been opened but not yet closed
struct OpenList {
    /// Byte offset of the opening parenthesis
    open: usize,
    /// Children read so far
    children: Vec<Node>,
}

impl<'a> Reader<'a> {
    fn new(source: &'a str) -> Self {
        Reader { source, pos: 0 }
    }

    fn read_forest(&mut self) -> Result<Vec<Node>> {
        let mut frames: Vec<OpenList> = Vec::new();
        let mut forest: Vec<Node> = Vec::new();

        loop {
            self.skip_whitespace();
            let start = self.pos;
            let Some(c) = self.peek() else { break };

            let node = match c {
                '(' => {
                    self.advance();
                    frames.push(OpenList {
                        open: start,
                        children: Vec::new(),
                    });
                    continue;
                }
                ')' => {
                    self.advance();
                    let Some(frame) = frames.pop() else {
                        return Err(Error::syntax(start, "unmatched `)`"));
                    };
                    Node::new(
                        NodeKind::Call(frame.children),
                        Span::new(frame.open, self.pos),
                    )
                }
                '"' => self.read_string(start)?,
                _ => self.read_atom(start),
            };

            match frames.last_mut() {
                Some(frame) => frame.children.push(node),
                None => forest.push(node),
            }
        }

        if let Some(frame) = frames.last() {
            return Err(Error::syntax(frame.open, "unclosed `(`"));
        }
        Ok(forest)
    }

    /// Reads a `"`-delimited literal, decoding escapes into the value.
    /// `start` is the offset of the opening quote.
    fn read_string(&mut self, start: usize) -> Result<Node> {
        self.advance();
        let mut text = String::new();

        loop {
            let Some(c) = self.advance() else {
                return Err(Error::syntax(start, "unterminated string literal"));
            };
            match c {
                '"' => break,
                '\\' => {
                    let Some(escaped) = self.advance() else {
                        return Err(Error::syntax(start, "unterminated string literal"));
                    };
                    match escaped {
                        '"' => text.push('"'),
                        '\\' => text.push('\\'),
                        'n' => text.push('\n'),
                        't' => text.push('\t'),
                        'r' => text.push('\r'),
                        other => {
                            return Err(Error::syntax(
                                self.pos - other.len_utf8(),
                                format!("invalid escape sequence `\\{other}`"),
                            ));
                        }
                    }
                }
                other => text.push(other),
            }
        }

        Ok(Node::new(NodeKind::Str(text), Span::new(start, self.pos)))
    }

    /// Reads a maximal run of non-delimiter characters and classifies it:
    /// integer first, then float, and a symbol if neither parse accepts it.
    fn read_atom(&mut self, start: usize) -> Node {
        while let Some(c) = self.peek() {
            if c.is_whitespace() || matches!(c, '(' | ')' | '"') {
                break;
            }
            self.pos += c.len_utf8();
        }

        let text = &self.source[start..self.pos];
        let span = Span::new(start, self.pos);

        if let Ok(value) = text.parse::<i64>() {
            return Node::new(NodeKind::Int(value), span);
        }
        if let Ok(value) = text.parse::<f64>() {
            return Node::new(NodeKind::Float(value), span);
        }
        Node::new(NodeKind::Symbol(text.to_string()), span)
    }

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.pos += c.len_utf8();
        }
    }
}
