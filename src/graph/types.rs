use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Display color given to products dropped from the palette.
pub const DEFAULT_PRODUCT_COLOR: &str = "#e0e0e0";

/// The kinds of node a production line is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Machine,
    Queue,
    /// Palette entry only. Products live inside queues, never as standalone nodes.
    #[serde(rename = "Productt", alias = "Product")]
    Product,
}

impl NodeKind {
    /// The node type name used by the canvas.
    pub fn type_name(self) -> &'static str {
        match self {
            NodeKind::Machine => "Machine",
            NodeKind::Queue => "Queue",
            NodeKind::Product => "Productt",
        }
    }

    /// Parses a canvas node type name. Accepts both spellings of the product entry.
    pub fn from_type_name(name: &str) -> Option<Self> {
        match name {
            "Machine" => Some(NodeKind::Machine),
            "Queue" => Some(NodeKind::Queue),
            "Productt" | "Product" => Some(NodeKind::Product),
            _ => None,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Machine => write!(f, "Machine"),
            NodeKind::Queue => write!(f, "Queue"),
            NodeKind::Product => write!(f, "Product"),
        }
    }
}

/// String identifier of a node, unique within its store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Canvas coordinates of a node's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A unit of work-in-progress.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Product {
    pub color: String,
}

impl Product {
    pub fn new(color: impl Into<String>) -> Self {
        Self {
            color: color.into(),
        }
    }
}

impl Default for Product {
    fn default() -> Self {
        Self::new(DEFAULT_PRODUCT_COLOR)
    }
}

/// Kind-specific payload of a node.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NodeData {
    pub label: String,
    /// For queues, index 0 is the head. Machines carry the item they are working on, if any.
    pub products: Vec<Product>,
}

/// A node on the production-line canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    /// Numeric sequence number assigned by the id generator. `None` for nodes
    /// imported from documents that only carry string ids.
    pub seq: Option<u64>,
    pub kind: NodeKind,
    pub position: Position,
    pub data: NodeData,
}

impl Node {
    pub fn new(id: impl Into<NodeId>, kind: NodeKind, position: Position) -> Self {
        Self {
            id: id.into(),
            seq: None,
            kind,
            position,
            data: NodeData {
                label: kind.to_string(),
                products: Vec::new(),
            },
        }
    }

    pub fn with_seq(mut self, seq: u64) -> Self {
        self.seq = Some(seq);
        self
    }

    pub fn with_products(mut self, products: Vec<Product>) -> Self {
        self.data.products = products;
        self
    }

    pub fn is(&self, kind: NodeKind) -> bool {
        self.kind == kind
    }
}

/// The only edge kind: a directed link between a machine and a queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EdgeKind {
    #[default]
    Link,
}

/// A directed connection between two nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub id: String,
    pub source: NodeId,
    pub target: NodeId,
    pub kind: EdgeKind,
}

impl Edge {
    /// Creates a link using the canvas' edge id convention.
    pub fn link(source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        let source = source.into();
        let target = target.into();
        Self {
            id: format!("xy-edge__{}-{}", source, target),
            source,
            target,
            kind: EdgeKind::Link,
        }
    }
}
