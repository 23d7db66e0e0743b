use super::ids::NodeIdGenerator;
use super::placement::ProductPlacementResolver;
use super::types::{Edge, Node, NodeId, NodeKind, Position, Product};
use super::validator::ConnectionValidator;
use crate::error::{ConnectionRejected, GraphError};
use tracing::{debug, warn};

/// Owns the node and edge collections of one canvas.
///
/// All mutation goes through explicit operations so that connection rules and
/// id uniqueness hold for the lifetime of the store.
#[derive(Debug, Clone, Default)]
pub struct GraphStore {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    ids: NodeIdGenerator,
    validator: ConnectionValidator,
    placement: ProductPlacementResolver,
}

impl GraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a custom id generator, e.g. one with a different prefix.
    pub fn with_id_generator(mut self, ids: NodeIdGenerator) -> Self {
        self.ids = ids;
        self
    }

    pub fn with_placement(mut self, placement: ProductPlacementResolver) -> Self {
        self.placement = placement;
        self
    }

    /// Builds a store from existing collections.
    ///
    /// Node sequence numbers are recovered from ids when missing, the id generator is
    /// moved past every number seen, and each edge is admitted through the
    /// `ConnectionValidator`. Rejected edges and nodes repeating an earlier id are
    /// dropped.
    pub fn from_parts(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        let mut store = Self::default();
        store.install_nodes(nodes);
        for edge in edges {
            match store.validator.validate(
                &store.nodes,
                edge.source.as_str(),
                edge.target.as_str(),
                &store.edges,
            ) {
                Ok(kind) => store.edges.push(Edge { kind, ..edge }),
                Err(reason) => warn!(edge = %edge.id, %reason, "dropping invalid edge"),
            }
        }
        store
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id.as_str() == id)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn id_generator(&self) -> &NodeIdGenerator {
        &self.ids
    }

    pub fn placement(&self) -> &ProductPlacementResolver {
        &self.placement
    }

    pub fn add_machine(&mut self, position: Position) -> NodeId {
        self.add_node(NodeKind::Machine, position)
    }

    pub fn add_queue(&mut self, position: Position) -> NodeId {
        self.add_node(NodeKind::Queue, position)
    }

    /// Handles an item dropped from the palette.
    ///
    /// Machines and queues become new nodes. A product is appended to the queue under
    /// `point`, or discarded when it misses every queue.
    pub fn drop_item(&mut self, kind: NodeKind, point: Position) -> Option<NodeId> {
        match kind {
            NodeKind::Product => self.drop_product(point),
            _ => Some(self.add_node(kind, point)),
        }
    }

    fn add_node(&mut self, kind: NodeKind, position: Position) -> NodeId {
        let (id, seq) = self.ids.next_id();
        debug!(%id, %kind, "adding node");
        self.nodes
            .push(Node::new(id.clone(), kind, position).with_seq(seq));
        id
    }

    /// Validates and inserts a link. Identical pairs are not deduplicated.
    pub fn connect(&mut self, source: &str, target: &str) -> Result<&Edge, ConnectionRejected> {
        let kind = self
            .validator
            .validate(&self.nodes, source, target, &self.edges)
            .inspect_err(|reason| warn!(source, target, %reason, "connection rejected"))?;
        let edge = Edge {
            kind,
            ..Edge::link(source, target)
        };
        self.edges.push(edge);
        Ok(&self.edges[self.edges.len() - 1])
    }

    /// Removes a node together with every edge touching it.
    pub fn remove_node(&mut self, id: &str) -> Result<Node, GraphError> {
        let index = self.index_of(id)?;
        self.edges
            .retain(|e| e.source.as_str() != id && e.target.as_str() != id);
        Ok(self.nodes.remove(index))
    }

    pub fn remove_edge(&mut self, edge_id: &str) -> Option<Edge> {
        let index = self.edges.iter().position(|e| e.id == edge_id)?;
        Some(self.edges.remove(index))
    }

    pub fn move_node(&mut self, id: &str, position: Position) -> Result<(), GraphError> {
        let index = self.index_of(id)?;
        self.nodes[index].position = position;
        Ok(())
    }

    /// Replaces a queue's product sequence.
    pub fn set_queue_products(&mut self, id: &str, products: Vec<Product>) -> Result<(), GraphError> {
        let index = self.index_of(id)?;
        let node = &mut self.nodes[index];
        if !node.is(NodeKind::Queue) {
            return Err(GraphError::NotAQueue {
                node_id: id.to_string(),
                kind: node.kind,
            });
        }
        node.data.products = products;
        Ok(())
    }

    /// Appends a default product to the queue under `point`.
    ///
    /// The queue receives a freshly built sequence; clones taken earlier keep the
    /// old contents. Returns the id of the queue hit, or `None` if the drop missed.
    pub fn drop_product(&mut self, point: Position) -> Option<NodeId> {
        let id = self.placement.resolve(point, &self.nodes)?.id.clone();
        let index = self.index_of(id.as_str()).ok()?;
        let products = &self.nodes[index].data.products;
        let next: Vec<Product> = products
            .iter()
            .cloned()
            .chain(std::iter::once(Product::default()))
            .collect();
        self.nodes[index].data.products = next;
        debug!(queue = %id, "product dropped");
        Some(id)
    }

    /// Empties the canvas and restarts id generation.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
        self.ids.reset();
    }

    /// Replaces the node collection wholesale with a live snapshot from the engine.
    ///
    /// Edges between nodes that survive the swap are kept, edges touching a node the
    /// snapshot no longer contains are removed. Ids stay unique because the generator
    /// skips past the snapshot and repeated ids are dropped.
    pub fn replace_nodes(&mut self, snapshot: Vec<Node>) {
        self.nodes.clear();
        self.install_nodes(snapshot);

        let before = self.edges.len();
        let nodes = &self.nodes;
        self.edges.retain(|e| {
            nodes.iter().any(|n| n.id == e.source) && nodes.iter().any(|n| n.id == e.target)
        });
        if self.edges.len() != before {
            debug!(removed = before - self.edges.len(), "dropped edges left dangling by snapshot");
        }
    }

    pub(crate) fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id.as_str() == id)
    }

    fn install_nodes(&mut self, nodes: Vec<Node>) {
        for mut node in nodes {
            if self.nodes.iter().any(|n| n.id == node.id) {
                warn!(node = %node.id, "dropping node with duplicate id");
                continue;
            }
            if node.seq.is_none() {
                node.seq = self.ids.parse(node.id.as_str());
            }
            if let Some(seq) = node.seq {
                self.ids.advance_past(seq);
            }
            self.nodes.push(node);
        }
    }

    fn index_of(&self, id: &str) -> Result<usize, GraphError> {
        self.nodes
            .iter()
            .position(|n| n.id.as_str() == id)
            .ok_or_else(|| GraphError::NodeNotFound(id.to_string()))
    }
}
