//! Configuration content exchanged with the runner.
//!
//! A [`BodySchema`] tells the runner which attributes and nested blocks to
//! materialize; the runner answers with [`BodyContent`] holding only those.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeSchema {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockSchema {
    pub block_type: String,
    pub body: BodySchema,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BodySchema {
    pub attributes: Vec<AttributeSchema>,
    pub blocks: Vec<BlockSchema>,
}

impl BodySchema {
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.blocks.is_empty()
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeSchema> {
        self.attributes.iter().find(|a| a.name == name)
    }

    pub fn block(&self, block_type: &str) -> Option<&BlockSchema> {
        self.blocks.iter().find(|b| b.block_type == block_type)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BodyContent {
    pub attributes: HashMap<String, Attribute>,
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Block {
    pub block_type: String,
    pub labels: Vec<String>,
    pub body: Option<BodyContent>,
    /// Range of the block header, e.g. `resource "type" "name"`.
    pub def_range: Range,
}

impl Block {
    /// Declared name of a two-label block such as a resource.
    pub fn name(&self) -> Option<&str> {
        self.labels.get(1).map(String::as_str)
    }
}

/// A value the host already evaluated.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    /// Depends on something only known after apply.
    Unknown,
    Known(hcl::Value),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: String,
    /// `None` when the host sent no pre-evaluated value.
    pub value: Option<Value>,
    pub expr: Option<hcl::Expression>,
    pub range: Range,
}

impl Attribute {
    pub fn from_value(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            value: Some(value),
            expr: None,
            range: Range::default(),
        }
    }

    pub fn from_expr(name: impl Into<String>, expr: hcl::Expression) -> Self {
        Self {
            name: name.into(),
            value: None,
            expr: Some(expr),
            range: Range::default(),
        }
    }

    pub fn with_range(mut self, range: Range) -> Self {
        self.range = range;
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Pos {
    pub line: usize,
    pub column: usize,
    pub byte: usize,
}

impl Pos {
    /// Line and column (both 1-based) of byte offset `byte` in `src`.
    pub fn at(src: &str, byte: usize) -> Self {
        let byte = byte.min(src.len());
        let before = src.get(..byte).unwrap_or(src);
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let column = before[line_start..].chars().count() + 1;
        Self { line, column, byte }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Range {
    pub filename: String,
    pub start: Pos,
    pub end: Pos,
}

impl Range {
    pub fn new(filename: impl Into<String>, src: &str, span: std::ops::Range<usize>) -> Self {
        Self {
            filename: filename.into(),
            start: Pos::at(src, span.start),
            end: Pos::at(src, span.end),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "<unknown>");
        }
        if self.start.line == self.end.line {
            write!(
                f,
                "{}:{},{}-{}",
                self.filename, self.start.line, self.start.column, self.end.column
            )
        } else {
            write!(
                f,
                "{}:{},{}-{},{}",
                self.filename, self.start.line, self.start.column, self.end.line, self.end.column
            )
        }
    }
}
