use crate::error::GraphConversionError;
use crate::graph::{Edge, GraphStore, IntoGraph, Node, NodeData, NodeKind, Position, Product};
use serde::{Deserialize, Serialize};

/// Node payload as stored by the canvas
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UiNodeData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub products: Vec<Product>,
}

/// Canvas node with id, type and position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiNode {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub data: UiNodeData,
}

/// Canvas edge connecting two nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiEdge {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub source: String,
    pub target: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub edge_type: Option<String>,
}

/// Complete canvas document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UiGraph {
    pub nodes: Vec<UiNode>,
    #[serde(default)]
    pub edges: Vec<UiEdge>,
}

impl UiGraph {
    pub fn from_json(json: &str) -> Result<Self, GraphConversionError> {
        serde_json::from_str(json).map_err(|e| GraphConversionError::JsonParse(e.to_string()))
    }
}

impl TryFrom<UiNode> for Node {
    type Error = GraphConversionError;

    fn try_from(raw: UiNode) -> Result<Self, Self::Error> {
        let kind = NodeKind::from_type_name(&raw.node_type).ok_or_else(|| {
            GraphConversionError::UnknownNodeType {
                node_id: raw.id.clone(),
                type_name: raw.node_type.clone(),
            }
        })?;
        Ok(Node {
            data: NodeData {
                label: raw.data.label.unwrap_or_else(|| kind.to_string()),
                products: raw.data.products,
            },
            ..Node::new(raw.id, kind, raw.position)
        })
    }
}

impl From<&Node> for UiNode {
    fn from(node: &Node) -> Self {
        UiNode {
            id: node.id.to_string(),
            node_type: node.kind.type_name().to_string(),
            position: node.position,
            data: UiNodeData {
                label: Some(node.data.label.clone()),
                products: node.data.products.clone(),
            },
        }
    }
}

impl From<&Edge> for UiEdge {
    fn from(edge: &Edge) -> Self {
        UiEdge {
            id: Some(edge.id.clone()),
            source: edge.source.to_string(),
            target: edge.target.to_string(),
            edge_type: Some("Link".to_string()),
        }
    }
}

impl From<&GraphStore> for UiGraph {
    fn from(store: &GraphStore) -> Self {
        UiGraph {
            nodes: store.nodes().iter().map(UiNode::from).collect(),
            edges: store.edges().iter().map(UiEdge::from).collect(),
        }
    }
}

/// Converts a list of canvas nodes, e.g. a live snapshot, into graph nodes.
pub fn nodes_from_ui(nodes: Vec<UiNode>) -> Result<Vec<Node>, GraphConversionError> {
    nodes.into_iter().map(Node::try_from).collect()
}

impl IntoGraph for UiGraph {
    fn into_graph(self) -> Result<GraphStore, GraphConversionError> {
        let nodes = nodes_from_ui(self.nodes)?;
        let edges = self
            .edges
            .into_iter()
            .map(|raw| {
                let mut edge = Edge::link(raw.source, raw.target);
                if let Some(id) = raw.id {
                    edge.id = id;
                }
                edge
            })
            .collect();
        Ok(GraphStore::from_parts(nodes, edges))
    }
}
