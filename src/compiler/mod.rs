use crate::factory::{CanonicalId, FactoryStructure};
use crate::graph::{Edge, GraphStore, Node};
use tracing::debug;

mod builder;
pub mod ids;

use builder::StructureBuilder;
pub use ids::*;

/// Compiles a drawn production line into the `FactoryStructure` the engine expects.
///
/// Compilation is a pure function of the nodes and edges passed in: compiling the
/// same graph twice yields equal structures, and nothing is retained afterwards.
/// Malformed input never fails compilation. Nodes whose id cannot be resolved are
/// excluded and edges touching them or joining incompatible kinds are skipped.
pub struct GraphCompiler {
    resolver: Box<dyn IdResolver>,
}

pub struct GraphCompilerBuilder {
    resolver: Box<dyn IdResolver>,
}

impl Default for GraphCompilerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphCompilerBuilder {
    pub fn new() -> Self {
        Self {
            resolver: Box::new(PrefixStripping::default()),
        }
    }

    /// Strips a different prefix from node ids.
    pub fn with_id_prefix(mut self, prefix: &str) -> Self {
        self.resolver = Box::new(PrefixStripping::new(prefix));
        self
    }

    /// Selects a built-in resolver by name; unknown names keep the current one.
    pub fn with_resolver_named(mut self, name: &str) -> Self {
        if let Some(resolver) = create_resolver_by_name(name) {
            self.resolver = resolver;
        }
        self
    }

    pub fn with_custom_resolver(mut self, resolver: Box<dyn IdResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn build(self) -> GraphCompiler {
        GraphCompiler {
            resolver: self.resolver,
        }
    }
}

impl Default for GraphCompiler {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl GraphCompiler {
    pub fn builder() -> GraphCompilerBuilder {
        GraphCompilerBuilder::new()
    }

    pub fn resolver(&self) -> &dyn IdResolver {
        self.resolver.as_ref()
    }

    /// Canonical id of a single node under this compiler's resolver.
    pub fn canonical_id(&self, node: &Node) -> Option<CanonicalId> {
        self.resolver.resolve(node)
    }

    pub fn compile(&self, nodes: &[Node], edges: &[Edge]) -> FactoryStructure {
        let mut builder = StructureBuilder::new(self.resolver.as_ref());
        builder.add_nodes(nodes);
        builder.link_edges(edges);
        let structure = builder.finish();
        debug!(
            machines = structure.machines.len(),
            queues = structure.queues.len(),
            "compiled factory structure"
        );
        structure
    }

    pub fn compile_store(&self, store: &GraphStore) -> FactoryStructure {
        self.compile(store.nodes(), store.edges())
    }
}
