use super::protocol::{MoveEvent, UpdatePayload};
use crate::compiler::GraphCompiler;
use crate::error::GraphConversionError;
use crate::factory::CanonicalId;
use crate::graph::{GraphStore, NodeId, NodeKind, Product};
use crate::ui::nodes_from_ui;
use tracing::{debug, warn};

/// Merges live engine data into the displayed graph.
///
/// Snapshots replace the node collection. Move events are resolved through the
/// compiler's canonical ids. Returns whether the store changed.
pub fn apply_update(
    store: &mut GraphStore,
    payload: UpdatePayload,
    compiler: &GraphCompiler,
) -> Result<bool, GraphConversionError> {
    match payload {
        UpdatePayload::Snapshot(nodes) => {
            let nodes = nodes_from_ui(nodes)?;
            debug!(nodes = nodes.len(), "applying snapshot");
            store.replace_nodes(nodes);
            Ok(true)
        }
        UpdatePayload::Move(event) => Ok(apply_move(store, event, compiler)),
    }
}

fn apply_move(store: &mut GraphStore, event: MoveEvent, compiler: &GraphCompiler) -> bool {
    let (Some(from), Some(to)) = (
        find_canonical(store, compiler, event.from),
        find_canonical(store, compiler, event.to),
    ) else {
        warn!(from = event.from, to = event.to, "move event references unknown nodes");
        return false;
    };

    let mut moved: Option<Product> = None;
    if let Some(source) = store.node_mut(from.as_str()) {
        let products = std::mem::take(&mut source.data.products);
        match source.kind {
            NodeKind::Queue => {
                let mut rest = products.into_iter();
                moved = rest.next();
                source.data.products = rest.collect();
            }
            _ => moved = products.into_iter().next(),
        }
    }

    let item = event.item.or(moved).unwrap_or_default();
    if let Some(target) = store.node_mut(to.as_str()) {
        match target.kind {
            NodeKind::Queue => {
                let mut next = target.data.products.clone();
                next.push(item);
                target.data.products = next;
            }
            _ => target.data.products = vec![item],
        }
    }
    true
}

fn find_canonical(store: &GraphStore, compiler: &GraphCompiler, id: CanonicalId) -> Option<NodeId> {
    store
        .nodes()
        .iter()
        .find(|n| !n.is(NodeKind::Product) && compiler.canonical_id(n) == Some(id))
        .map(|n| n.id.clone())
}
