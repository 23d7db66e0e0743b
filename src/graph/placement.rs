use super::types::{Node, NodeKind, Position};

/// Axis-aligned rectangle in canvas coordinates. Edges are inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn contains(&self, point: Position) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }
}

/// Finds the queue a dropped product lands in.
///
/// A queue is drawn as a fixed-width box whose height grows with the number of
/// products it holds: `count * unit_height + base_height`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProductPlacementResolver {
    pub queue_width: f64,
    pub unit_height: f64,
    pub base_height: f64,
}

impl Default for ProductPlacementResolver {
    fn default() -> Self {
        Self {
            queue_width: 90.0,
            unit_height: 20.0,
            base_height: 50.0,
        }
    }
}

impl ProductPlacementResolver {
    /// The rectangle a node occupies, or `None` for anything that is not a queue.
    pub fn bounds(&self, node: &Node) -> Option<Bounds> {
        if !node.is(NodeKind::Queue) {
            return None;
        }
        Some(Bounds {
            x: node.position.x,
            y: node.position.y,
            width: self.queue_width,
            height: node.data.products.len() as f64 * self.unit_height + self.base_height,
        })
    }

    /// Returns the first queue, in iteration order, whose rectangle contains `point`.
    pub fn resolve<'a>(&self, point: Position, nodes: &'a [Node]) -> Option<&'a Node> {
        nodes
            .iter()
            .find(|node| self.bounds(node).is_some_and(|b| b.contains(point)))
    }
}
