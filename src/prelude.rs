//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the flowline crate.
//! Import this module to get access to the core functionality without having to import
//! each type individually.
//!
//! # Example
//!
//! ```rust,no_run
//! use flowline::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let canvas_json = std::fs::read_to_string("path/to/canvas.json")?;
//! let store = UiGraph::from_json(&canvas_json)?.into_graph()?;
//!
//! let structure = GraphCompiler::default().compile_store(&store);
//! println!("{}", structure);
//! # Ok(())
//! # }
//! ```

// Graph editing
pub use crate::graph::{
    ConnectionValidator, Edge, EdgeKind, GraphStore, IntoGraph, Node, NodeData, NodeId,
    NodeIdGenerator, NodeKind, Position, Product, ProductPlacementResolver,
};
pub use crate::ui::{UiEdge, UiGraph, UiNode};

// Compilation
pub use crate::compiler::{GraphCompiler, IdResolver};
pub use crate::factory::{FactoryStructure, MachineRecord, QueueRecord};

// Session protocol
pub use crate::config::SessionConfig;
pub use crate::session::{
    Channel, Command, Connector, Inbound, MessageLog, MessageSink, SessionController,
    SessionEvent, SessionState, StartOutcome, StatusAction, TracingSink, UpdatePayload,
    UploadVerdict,
};
pub use crate::workbench::Workbench;

// Error types
pub use crate::error::{
    ConfigError, ConnectionRejected, GraphConversionError, GraphError, SessionError,
    TransportError,
};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
