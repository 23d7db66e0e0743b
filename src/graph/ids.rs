use super::types::NodeId;

/// Prefix the canvas puts in front of every generated node id.
pub const DEFAULT_ID_PREFIX: &str = "dndnode_";

/// Hands out unique, monotonically increasing node ids.
///
/// Each id is returned together with its numeric sequence number so callers never
/// need to recover the number by parsing the string.
#[derive(Debug, Clone)]
pub struct NodeIdGenerator {
    prefix: String,
    next: u64,
}

impl Default for NodeIdGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_ID_PREFIX)
    }
}

impl NodeIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 0,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The sequence number the next call to `next_id` will use.
    pub fn peek(&self) -> u64 {
        self.next
    }

    pub fn next_id(&mut self) -> (NodeId, u64) {
        let seq = self.next;
        self.next += 1;
        (NodeId::new(format!("{}{}", self.prefix, seq)), seq)
    }

    /// Makes sure future ids are strictly greater than `seq`.
    pub fn advance_past(&mut self, seq: u64) {
        self.next = self.next.max(seq.saturating_add(1));
    }

    pub fn reset(&mut self) {
        self.next = 0;
    }

    /// Recovers the sequence number from an id in this generator's format.
    ///
    /// Surrounding whitespace is tolerated since older canvases emitted ids with a
    /// leading space.
    pub fn parse(&self, id: &str) -> Option<u64> {
        id.trim()
            .strip_prefix(self.prefix.as_str())
            .and_then(|rest| rest.trim().parse().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_monotonic_ids() {
        let mut ids = NodeIdGenerator::default();
        assert_eq!(ids.next_id(), (NodeId::new("dndnode_0"), 0));
        assert_eq!(ids.next_id(), (NodeId::new("dndnode_1"), 1));
        ids.advance_past(7);
        assert_eq!(ids.next_id().1, 8);
        ids.advance_past(2);
        assert_eq!(ids.peek(), 9);
    }

    #[test]
    fn parses_own_format_only() {
        let ids = NodeIdGenerator::default();
        assert_eq!(ids.parse("dndnode_12"), Some(12));
        assert_eq!(ids.parse(" dndnode_3"), Some(3));
        assert_eq!(ids.parse("node_3"), None);
        assert_eq!(ids.parse("dndnode_x"), None);
    }
}
