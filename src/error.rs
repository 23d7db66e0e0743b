use crate::graph::NodeKind;
use thiserror::Error;

/// Reasons a proposed connection is refused before it reaches the store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectionRejected {
    #[error("Node '{node_id}' does not exist, the connection would dangle")]
    UnknownEndpoint { node_id: String },

    #[error("Invalid same-kind connection: {kind} to {kind}")]
    SameKind { kind: NodeKind },

    #[error("Invalid connection: machine already has an output ('{machine_id}')")]
    MachineAlreadyHasOutput { machine_id: String },
}

/// Errors raised by explicit `GraphStore` mutations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Node '{0}' not found in the graph")]
    NodeNotFound(String),

    #[error("Node '{node_id}' is a {kind}, but only queues can hold products")]
    NotAQueue { node_id: String, kind: NodeKind },

    #[error(transparent)]
    Rejected(#[from] ConnectionRejected),
}

/// Errors that can occur when converting an editor document into a `GraphStore`.
#[derive(Error, Debug, Clone)]
pub enum GraphConversionError {
    #[error("Failed to parse graph JSON: {0}")]
    JsonParse(String),

    #[error("Node '{node_id}' has an unknown type: '{type_name}'")]
    UnknownNodeType { node_id: String, type_name: String },

    #[error("Invalid graph data: {0}")]
    Validation(String),
}

/// Failures of the network adapters (HTTP upload, message channel).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Server responded with status {code}")]
    Status { code: u16 },

    #[error("WebSocket error: {0}")]
    WebSocket(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Channel is closed")]
    Closed,

    #[error("I/O error: {0}")]
    Io(String),
}

/// Errors surfaced by the `SessionController`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Uploading the factory structure failed: {0}")]
    Upload(#[source] TransportError),

    #[error("Simulation channel failed: {0}")]
    Channel(#[source] TransportError),

    #[error("No simulation channel is open")]
    NotConnected,
}

/// Errors raised while loading a `SessionConfig`.
#[derive(Error, Debug, Clone)]
pub enum ConfigError {
    #[error("Could not read config file '{path}': {message}")]
    Io { path: String, message: String },

    #[error("Failed to parse config: {0}")]
    Parse(String),
}
