use crate::factory::CanonicalId;
use crate::graph::{DEFAULT_ID_PREFIX, Node, NodeIdGenerator};

/// Defines the contract for deriving a node's canonical integer id.
///
/// Returning `None` excludes the node from the compiled structure.
pub trait IdResolver: Send + Sync {
    fn name(&self) -> &str;
    fn resolve(&self, node: &Node) -> Option<CanonicalId>;
}

/// Strips the generator prefix from the string id and parses the remainder.
///
/// This is the convention the canvas has always used, so it is the default.
pub struct PrefixStripping {
    ids: NodeIdGenerator,
}

impl PrefixStripping {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            ids: NodeIdGenerator::new(prefix),
        }
    }
}

impl Default for PrefixStripping {
    fn default() -> Self {
        Self::new(DEFAULT_ID_PREFIX)
    }
}

impl IdResolver for PrefixStripping {
    fn name(&self) -> &str {
        "prefix"
    }

    fn resolve(&self, node: &Node) -> Option<CanonicalId> {
        self.ids.parse(node.id.as_str())
    }
}

/// Uses the numeric sequence number carried on the node itself.
#[derive(Default)]
pub struct SequenceField;

impl IdResolver for SequenceField {
    fn name(&self) -> &str {
        "sequence"
    }

    fn resolve(&self, node: &Node) -> Option<CanonicalId> {
        node.seq
    }
}

/// Prefers the sequence field and falls back to prefix stripping.
#[derive(Default)]
pub struct SequenceOrPrefix {
    prefix: PrefixStripping,
}

impl IdResolver for SequenceOrPrefix {
    fn name(&self) -> &str {
        "sequence-or-prefix"
    }

    fn resolve(&self, node: &Node) -> Option<CanonicalId> {
        node.seq.or_else(|| self.prefix.resolve(node))
    }
}

/// Creates a built-in resolver from its name.
pub fn create_resolver_by_name(name: &str) -> Option<Box<dyn IdResolver>> {
    match name {
        "prefix" => Some(Box::new(PrefixStripping::default())),
        "sequence" => Some(Box::new(SequenceField)),
        "sequence-or-prefix" => Some(Box::new(SequenceOrPrefix::default())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{NodeKind, Position};

    #[test]
    fn prefix_stripping_ignores_seq_field() {
        let node = Node::new("dndnode_7", NodeKind::Queue, Position::default()).with_seq(99);
        assert_eq!(PrefixStripping::default().resolve(&node), Some(7));
        assert_eq!(SequenceField.resolve(&node), Some(99));
    }

    #[test]
    fn fallback_uses_prefix_when_seq_missing() {
        let node = Node::new("dndnode_3", NodeKind::Machine, Position::default());
        assert_eq!(SequenceOrPrefix::default().resolve(&node), Some(3));
        assert_eq!(SequenceField.resolve(&node), None);
    }

    #[test]
    fn resolvers_by_name() {
        assert_eq!(create_resolver_by_name("sequence").unwrap().name(), "sequence");
        assert!(create_resolver_by_name("uuid").is_none());
    }
}
