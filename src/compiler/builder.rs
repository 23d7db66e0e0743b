use crate::compiler::ids::IdResolver;
use crate::factory::{CanonicalId, FactoryStructure, MachineRecord, QueueRecord};
use crate::graph::{Edge, Node, NodeKind};
use ahash::{AHashMap, AHashSet};
use tracing::{debug, warn};

/// Builds a `FactoryStructure` from one snapshot of nodes and edges.
///
/// Lives only for the duration of a single compilation and never outlives the
/// slices it was given.
pub(super) struct StructureBuilder<'a> {
    resolver: &'a dyn IdResolver,
    // Key: node id string, Value: (kind, canonical id)
    canonical: AHashMap<&'a str, (NodeKind, CanonicalId)>,
    // Key: canonical machine id, Value: index into `machines`
    machine_index: AHashMap<CanonicalId, usize>,
    machines: Vec<MachineRecord>,
    queues: Vec<QueueRecord>,
}

impl<'a> StructureBuilder<'a> {
    pub(super) fn new(resolver: &'a dyn IdResolver) -> Self {
        Self {
            resolver,
            canonical: AHashMap::new(),
            machine_index: AHashMap::new(),
            machines: Vec::new(),
            queues: Vec::new(),
        }
    }

    /// Emits one record per machine and queue, in node order.
    pub(super) fn add_nodes(&mut self, nodes: &'a [Node]) {
        let mut taken: AHashSet<CanonicalId> = AHashSet::new();

        for node in nodes {
            if node.is(NodeKind::Product) {
                continue;
            }
            let Some(id) = self.resolver.resolve(node) else {
                warn!(node = %node.id, resolver = self.resolver.name(), "excluding node with unresolvable id");
                continue;
            };
            if !taken.insert(id) {
                warn!(node = %node.id, id, "excluding node whose canonical id is already taken");
                continue;
            }

            self.canonical.insert(node.id.as_str(), (node.kind, id));
            match node.kind {
                NodeKind::Machine => {
                    self.machine_index.insert(id, self.machines.len());
                    self.machines
                        .push(MachineRecord::new(id, node.data.products.clone()));
                }
                NodeKind::Queue => self.queues.push(QueueRecord {
                    id,
                    products: node.data.products.clone(),
                }),
                NodeKind::Product => {}
            }
        }
    }

    /// Wires queue ids into machines, first-seen edge wins.
    pub(super) fn link_edges(&mut self, edges: &[Edge]) {
        for edge in edges {
            let endpoints = (
                self.canonical.get(edge.source.as_str()).copied(),
                self.canonical.get(edge.target.as_str()).copied(),
            );
            let (Some(source), Some(target)) = endpoints else {
                debug!(edge = %edge.id, "skipping edge with excluded endpoint");
                continue;
            };

            match (source, target) {
                ((NodeKind::Machine, machine), (NodeKind::Queue, queue)) => {
                    if let Some(record) = self.machine_mut(machine) {
                        push_unique(&mut record.output_queue_ids, queue);
                    }
                }
                ((NodeKind::Queue, queue), (NodeKind::Machine, machine)) => {
                    if let Some(record) = self.machine_mut(machine) {
                        push_unique(&mut record.input_queue_ids, queue);
                    }
                }
                ((source_kind, _), (target_kind, _)) => {
                    debug!(edge = %edge.id, %source_kind, %target_kind, "ignoring edge between incompatible kinds");
                }
            }
        }
    }

    pub(super) fn finish(self) -> FactoryStructure {
        FactoryStructure {
            machines: self.machines,
            queues: self.queues,
            items_number: 0,
        }
    }

    fn machine_mut(&mut self, id: CanonicalId) -> Option<&mut MachineRecord> {
        let index = *self.machine_index.get(&id)?;
        self.machines.get_mut(index)
    }
}

fn push_unique(ids: &mut Vec<CanonicalId>, id: CanonicalId) {
    if !ids.contains(&id) {
        ids.push(id);
    }
}
