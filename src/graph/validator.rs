use super::types::{Edge, EdgeKind, Node, NodeKind};
use crate::error::ConnectionRejected;

/// Decides whether a proposed edge may enter the graph.
///
/// Rules are checked in order:
/// 1. both endpoints must exist,
/// 2. endpoints must be of different kinds,
/// 3. a machine may have at most one outgoing link.
///
/// Queues may feed any number of machines and a machine may read from any number of
/// queues. The validator never mutates anything; the caller inserts accepted edges.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConnectionValidator;

impl ConnectionValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validates `source -> target` against the current nodes and edges.
    ///
    /// On success returns the kind the new edge must be tagged with.
    pub fn validate(
        &self,
        nodes: &[Node],
        source: &str,
        target: &str,
        edges: &[Edge],
    ) -> Result<EdgeKind, ConnectionRejected> {
        let source_node = find(nodes, source)?;
        let target_node = find(nodes, target)?;

        if source_node.kind == target_node.kind {
            return Err(ConnectionRejected::SameKind {
                kind: source_node.kind,
            });
        }

        if source_node.is(NodeKind::Machine) && edges.iter().any(|e| e.source.as_str() == source) {
            return Err(ConnectionRejected::MachineAlreadyHasOutput {
                machine_id: source.to_string(),
            });
        }

        Ok(EdgeKind::Link)
    }
}

fn find<'a>(nodes: &'a [Node], id: &str) -> Result<&'a Node, ConnectionRejected> {
    nodes
        .iter()
        .find(|n| n.id.as_str() == id)
        .ok_or_else(|| ConnectionRejected::UnknownEndpoint {
            node_id: id.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Position;

    fn nodes() -> Vec<Node> {
        vec![
            Node::new("m0", NodeKind::Machine, Position::default()),
            Node::new("q1", NodeKind::Queue, Position::default()),
            Node::new("q2", NodeKind::Queue, Position::default()),
            Node::new("m3", NodeKind::Machine, Position::default()),
        ]
    }

    #[test]
    fn accepts_machine_queue_pairs_both_ways() {
        let v = ConnectionValidator::new();
        assert_eq!(v.validate(&nodes(), "m0", "q1", &[]), Ok(EdgeKind::Link));
        assert_eq!(v.validate(&nodes(), "q1", "m0", &[]), Ok(EdgeKind::Link));
    }

    #[test]
    fn rejects_dangling_endpoint_first() {
        let v = ConnectionValidator::new();
        let err = v.validate(&nodes(), "m0", "ghost", &[]).unwrap_err();
        assert_eq!(
            err,
            ConnectionRejected::UnknownEndpoint {
                node_id: "ghost".to_string()
            }
        );
    }

    #[test]
    fn rejects_same_kind() {
        let v = ConnectionValidator::new();
        let err = v.validate(&nodes(), "q1", "q2", &[]).unwrap_err();
        assert!(err.to_string().contains("same-kind connection"));
        assert!(v.validate(&nodes(), "m0", "m3", &[]).is_err());
    }

    #[test]
    fn machine_has_single_output_but_queue_fans_out() {
        let v = ConnectionValidator::new();
        let edges = vec![Edge::link("m0", "q1"), Edge::link("q1", "m3")];

        let err = v.validate(&nodes(), "m0", "q2", &edges).unwrap_err();
        assert!(err.to_string().contains("machine already has an output"));

        assert!(v.validate(&nodes(), "q1", "m0", &edges).is_ok());
        assert!(v.validate(&nodes(), "q2", "m3", &edges).is_ok());
    }
}
