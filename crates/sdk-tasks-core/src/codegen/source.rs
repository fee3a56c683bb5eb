//! Canonical client source and its declaration tree
//!
//! The canonical client is split into a flat, ordered list of nodes. Each node
//! keeps its original text (line terminators included) so that rendering the
//! untouched tree gives back the input byte-for-byte. Rewrite rules are scoped
//! to a node kind, so a rule for method signatures can never touch an import
//! line or a docstring.

use crate::error::{TaskError, TaskResult};
use std::fmt;
use std::path::Path;
use tokio::fs;

/// The single authored client definition all variants derive from
#[derive(Debug, Clone)]
pub struct CanonicalSource {
    text: String,
}

impl CanonicalSource {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Read the canonical source from disk
    pub async fn load(path: &Path) -> TaskResult<Self> {
        let text = fs::read_to_string(path)
            .await
            .map_err(|source| TaskError::MissingInput {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self::new(text))
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// What a node of the canonical source represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Module-level `from ... import ...` or `import ...`
    Import,
    /// Module-level `class ...:` header
    ClassHeader,
    /// `def`/`async def` declaration up to its closing `:`
    Signature,
    /// A `return self.api_call(` line
    ApiCallReturn,
    /// Anything else, docstrings included
    Text,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Import => "import",
            NodeKind::ClassHeader => "class header",
            NodeKind::Signature => "signature",
            NodeKind::ApiCallReturn => "api call",
            NodeKind::Text => "text",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    pub text: String,
}

impl Node {
    fn new(kind: NodeKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// Ordered declaration tree of a canonical source
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceTree {
    nodes: Vec<Node>,
}

const API_CALL_RETURN: &str = "return self.api_call(";

impl SourceTree {
    pub fn parse(text: &str) -> Self {
        let lines: Vec<&str> = text.split_inclusive('\n').collect();
        let mut tree = SourceTree::default();
        let mut docstring: Option<&'static str> = None;
        let mut in_class = false;
        let mut i = 0;

        while i < lines.len() {
            let line = lines[i];

            if docstring.is_some() {
                docstring = scan_line(line, docstring).open_triple;
                tree.push_text(line);
                i += 1;
                continue;
            }

            let trimmed = line.trim_start();
            let top_level = trimmed.len() == line.len();

            let kind = if top_level && (trimmed.starts_with("from ") || trimmed.starts_with("import ")) {
                Some(NodeKind::Import)
            } else if top_level && trimmed.starts_with("class ") {
                in_class = true;
                Some(NodeKind::ClassHeader)
            } else if top_level {
                // Any other column-0 code ends the class body
                if !trimmed.starts_with('#') {
                    in_class = false;
                }
                None
            } else if in_class && (trimmed.starts_with("def ") || trimmed.starts_with("async def ")) {
                Some(NodeKind::Signature)
            } else if trimmed.starts_with(API_CALL_RETURN) {
                Some(NodeKind::ApiCallReturn)
            } else {
                None
            };

            match kind {
                Some(NodeKind::ApiCallReturn) => {
                    tree.nodes.push(Node::new(NodeKind::ApiCallReturn, line));
                    i += 1;
                }
                Some(kind) => {
                    // Declarations may span lines until their brackets close
                    let mut text = String::from(line);
                    let mut depth = scan_line(line, None).depth;
                    i += 1;
                    while depth > 0 && i < lines.len() {
                        text.push_str(lines[i]);
                        depth += scan_line(lines[i], None).depth;
                        i += 1;
                    }
                    tree.nodes.push(Node::new(kind, text));
                }
                None => {
                    docstring = scan_line(line, None).open_triple;
                    tree.push_text(line);
                    i += 1;
                }
            }
        }

        tree
    }

    fn push_text(&mut self, line: &str) {
        match self.nodes.last_mut() {
            Some(last) if last.kind == NodeKind::Text => last.text.push_str(line),
            _ => self.nodes.push(Node::new(NodeKind::Text, line)),
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn nodes_mut(&mut self) -> &mut [Node] {
        &mut self.nodes
    }

    pub fn count(&self, kind: NodeKind) -> usize {
        self.nodes.iter().filter(|n| n.kind == kind).count()
    }

    /// Concatenate node texts; nodes rewritten to nothing disappear
    pub fn render(&self) -> String {
        self.nodes.iter().map(|n| n.text.as_str()).collect()
    }
}

const TRIPLE_DOUBLE: &str = "\"\"\"";
const TRIPLE_SINGLE: &str = "'''";

/// Lexical state left behind by one line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LineScan {
    /// Net change in bracket depth outside strings and comments
    depth: i32,
    /// Delimiter of a triple-quoted string still open at the end of the line
    open_triple: Option<&'static str>,
}

/// Scan one line, starting inside the triple-quoted string `open_triple` if any
///
/// Quotes inside ordinary string literals and after `#` never open or close a
/// triple-quoted string.
fn scan_line(line: &str, mut open_triple: Option<&'static str>) -> LineScan {
    let mut depth = 0;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut chars = line.char_indices();

    while let Some((i, c)) = chars.next() {
        if escaped {
            escaped = false;
            continue;
        }
        if let Some(delim) = open_triple {
            if c == '\\' {
                escaped = true;
            } else if line[i..].starts_with(delim) {
                open_triple = None;
                chars.nth(1);
            }
            continue;
        }
        if let Some(q) = quote {
            if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => {
                let triple = if c == '"' { TRIPLE_DOUBLE } else { TRIPLE_SINGLE };
                if line[i..].starts_with(triple) {
                    open_triple = Some(triple);
                    chars.nth(1);
                } else {
                    quote = Some(c);
                }
            }
            '#' => break,
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth -= 1,
            _ => {}
        }
    }

    LineScan { depth, open_triple }
}
