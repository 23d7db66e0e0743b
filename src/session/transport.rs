use super::protocol::{Command, Inbound, UploadVerdict};
use crate::error::TransportError;
use crate::factory::FactoryStructure;
use async_trait::async_trait;

/// Reaches the simulation engine: uploads structures and opens message channels.
///
/// Injected into the `SessionController` so the protocol state machine can be driven
/// without a live server.
#[async_trait]
pub trait Connector: Send {
    type Channel: Channel;

    /// Sends the structure to the engine's upload endpoint.
    async fn upload(&mut self, structure: &FactoryStructure) -> Result<UploadVerdict, TransportError>;

    /// Opens the bidirectional channel and subscribes to both inbound topics.
    ///
    /// Resolves only once the engine acknowledged the connection.
    async fn open(&mut self) -> Result<Self::Channel, TransportError>;
}

/// An open, ordered, bidirectional message channel.
#[async_trait]
pub trait Channel: Send {
    /// Publishes a command. Commands are delivered in send order.
    async fn send(&mut self, command: Command) -> Result<(), TransportError>;

    /// Waits for the next inbound message. `Ok(None)` means the remote closed cleanly.
    async fn recv(&mut self) -> Result<Option<Inbound>, TransportError>;

    /// Closes the channel. Calling it on a closed channel is a no-op.
    async fn close(&mut self) -> Result<(), TransportError>;
}
