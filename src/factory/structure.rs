use crate::graph::Product;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical integer id of a compiled machine or queue.
pub type CanonicalId = u64;

/// A machine in the compiled structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineRecord {
    pub id: CanonicalId,
    /// Queues feeding this machine, in first-seen edge order. Never contains duplicates.
    pub input_queue_ids: Vec<CanonicalId>,
    /// Queues this machine writes to, in first-seen edge order. Never contains duplicates.
    pub output_queue_ids: Vec<CanonicalId>,
    #[serde(default)]
    pub products: Vec<Product>,
}

impl MachineRecord {
    pub fn new(id: CanonicalId, products: Vec<Product>) -> Self {
        Self {
            id,
            input_queue_ids: Vec::new(),
            output_queue_ids: Vec::new(),
            products,
        }
    }
}

/// A queue in the compiled structure. `products[0]` is the head.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueRecord {
    pub id: CanonicalId,
    #[serde(default)]
    pub products: Vec<Product>,
}

/// The wire-level description of a factory, uploaded to the simulation engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactoryStructure {
    pub machines: Vec<MachineRecord>,
    pub queues: Vec<QueueRecord>,
    /// Reserved for the engine; always 0 when compiled.
    #[serde(default)]
    pub items_number: u64,
}

impl FactoryStructure {
    pub fn machine(&self, id: CanonicalId) -> Option<&MachineRecord> {
        self.machines.iter().find(|m| m.id == id)
    }

    pub fn queue(&self, id: CanonicalId) -> Option<&QueueRecord> {
        self.queues.iter().find(|q| q.id == id)
    }

    pub fn product_count(&self) -> usize {
        self.queues.iter().map(|q| q.products.len()).sum::<usize>()
            + self.machines.iter().map(|m| m.products.len()).sum::<usize>()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for FactoryStructure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for machine in &self.machines {
            writeln!(
                f,
                "M{} [{}] -> [{}]",
                machine.id,
                machine.input_queue_ids.iter().map(|q| format!("Q{q}")).join(", "),
                machine.output_queue_ids.iter().map(|q| format!("Q{q}")).join(", "),
            )?;
        }
        for queue in &self.queues {
            writeln!(f, "Q{} ({} products)", queue.id, queue.products.len())?;
        }
        Ok(())
    }
}
