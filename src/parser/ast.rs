use serde::{Deserialize, Serialize};
use std::fmt;

/// Labels every AST node carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// Root: `[Module, Entry, Block+, End]`
    Program,
    /// Module header holding metadata children
    Module,
    /// `Target:` metadata line
    Target,
    /// `Version:` metadata line
    Version,
    /// `Subject:` metadata line
    Subject,
    /// `Address:` metadata line
    Address,
    /// Entry point; value is the function name
    Entry,
    /// Executable unit: `[Equation, Above, Below]`
    Block,
    /// `lhs = rhs`
    Equation,
    /// Upper mirrored directive
    Above,
    /// Lower mirrored directive (authoritative)
    Below,
    /// Return code
    End,
    /// Call to a keyword found in the domain command table
    Command,
    /// Call to a keyword the command table does not know
    Call,
    /// Positional call argument
    Argument,
}

impl NodeKind {
    /// Stable string label used in serialized output
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Program => "Program",
            NodeKind::Module => "Module",
            NodeKind::Target => "Target",
            NodeKind::Version => "Version",
            NodeKind::Subject => "Subject",
            NodeKind::Address => "Address",
            NodeKind::Entry => "Entry",
            NodeKind::Block => "Block",
            NodeKind::Equation => "Equation",
            NodeKind::Above => "Above",
            NodeKind::Below => "Below",
            NodeKind::End => "End",
            NodeKind::Command => "Command",
            NodeKind::Call => "Call",
            NodeKind::Argument => "Argument",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional payload of a node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeValue {
    /// Single text payload (entry name, return code, argument text)
    Text(String),
    /// Key/value payload (metadata, equation, directives)
    Pair(String, String),
}

impl NodeValue {
    /// First component of a pair, or the text itself
    pub fn first(&self) -> &str {
        match self {
            NodeValue::Text(text) => text,
            NodeValue::Pair(first, _) => first,
        }
    }

    /// Second component of a pair, or the text itself
    pub fn second(&self) -> &str {
        match self {
            NodeValue::Text(text) => text,
            NodeValue::Pair(_, second) => second,
        }
    }
}

/// Universal AST node. Ownership is strictly tree-shaped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Node label
    pub kind: NodeKind,
    /// Optional payload
    pub value: Option<NodeValue>,
    /// Ordered children
    pub children: Vec<Node>,
}

impl Node {
    /// Node without payload or children
    pub fn new(kind: NodeKind) -> Self {
        Node {
            kind,
            value: None,
            children: Vec::new(),
        }
    }

    /// Node carrying a text payload
    pub fn text(kind: NodeKind, text: impl Into<String>) -> Self {
        Node {
            kind,
            value: Some(NodeValue::Text(text.into())),
            children: Vec::new(),
        }
    }

    /// Node carrying a pair payload
    pub fn pair(kind: NodeKind, first: impl Into<String>, second: impl Into<String>) -> Self {
        Node {
            kind,
            value: Some(NodeValue::Pair(first.into(), second.into())),
            children: Vec::new(),
        }
    }

    /// Builder-style child list
    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    /// Text of a `Text` payload or the first half of a `Pair`
    pub fn value_str(&self) -> Option<&str> {
        self.value.as_ref().map(NodeValue::first)
    }

    /// First child with the given kind
    pub fn child(&self, kind: NodeKind) -> Option<&Node> {
        self.children.iter().find(|c| c.kind == kind)
    }

    /// All children with the given kind, in order
    pub fn children_of(&self, kind: NodeKind) -> impl Iterator<Item = &Node> {
        self.children.iter().filter(move |c| c.kind == kind)
    }

    /// True for `Command` and `Call` nodes
    pub fn is_call(&self) -> bool {
        matches!(self.kind, NodeKind::Command | NodeKind::Call)
    }
}
