use super::protocol::{Command, INVALID_GRAPH, Inbound, StatusMessage, UpdatePayload, UploadVerdict};
use super::sink::MessageSink;
use super::state::{SessionState, StatusAction};
use super::transport::{Channel, Connector};
use crate::error::{SessionError, TransportError};
use crate::factory::FactoryStructure;
use tracing::{debug, info, warn};

/// Result of a start attempt that did not fail at the transport level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// The structure was accepted and `start` was sent.
    Started,
    /// The engine answered "Invalid Graph". No channel was opened.
    Rejected,
}

/// What a received message meant for the session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// A recognized status action moved the session to a new state.
    StateChanged(SessionState),
    /// An unrecognized status was forwarded to the message sink.
    Message(String),
    /// Live data for the graph store.
    Update(UpdatePayload),
    /// An inbound message could not be decoded and was dropped.
    Malformed { topic: &'static str, error: String },
    /// The channel is gone and the controller is back to `Idle`.
    Closed { error: Option<TransportError> },
}

/// Client side of the simulation session protocol.
///
/// Uploads the structure, owns the single channel handle, sends commands and turns
/// inbound messages into state transitions and typed events. Command senders never
/// check the local state: the engine is the authority and local state only follows
/// the status topic.
pub struct SessionController<C: Connector> {
    connector: C,
    channel: Option<C::Channel>,
    state: SessionState,
    structure: Option<FactoryStructure>,
    sink: Box<dyn MessageSink>,
}

impl<C: Connector> SessionController<C> {
    pub fn new(connector: C, sink: impl MessageSink + 'static) -> Self {
        Self {
            connector,
            channel: None,
            state: SessionState::Idle,
            structure: None,
            sink: Box::new(sink),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.channel.is_some()
    }

    /// The most recently accepted structure.
    pub fn structure(&self) -> Option<&FactoryStructure> {
        self.structure.as_ref()
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    /// Uploads `structure` and, once accepted, makes sure a channel is open and sends `start`.
    ///
    /// A rejected or failed upload leaves any existing channel untouched and restores
    /// the state held before the attempt.
    pub async fn start_simulation(
        &mut self,
        structure: FactoryStructure,
    ) -> Result<StartOutcome, SessionError> {
        let before = self.state;
        self.transition(SessionState::Uploading);

        let verdict = match self.connector.upload(&structure).await {
            Ok(verdict) => verdict,
            Err(error) => {
                self.transition(before);
                self.notify(&format!("Upload failed: {}", error));
                return Err(SessionError::Upload(error));
            }
        };

        if verdict == UploadVerdict::Rejected {
            self.transition(before);
            self.notify(INVALID_GRAPH);
            return Ok(StartOutcome::Rejected);
        }
        self.structure = Some(structure);

        if self.channel.is_none() {
            self.transition(SessionState::Connecting);
            match self.connector.open().await {
                Ok(channel) => {
                    self.channel = Some(channel);
                    self.transition(SessionState::Connected);
                }
                Err(error) => {
                    self.transition(SessionState::Idle);
                    self.notify(&format!("Could not connect to the simulation: {}", error));
                    return Err(SessionError::Channel(error));
                }
            }
        } else {
            self.transition(before);
        }

        self.send(Command::Start).await?;
        Ok(StartOutcome::Started)
    }

    pub async fn pause_simulation(&mut self) -> Result<(), SessionError> {
        self.send(Command::Pause).await
    }

    pub async fn resume_simulation(&mut self) -> Result<(), SessionError> {
        self.send(Command::Resume).await
    }

    pub async fn replay_simulation(&mut self) -> Result<(), SessionError> {
        self.send(Command::Replay).await
    }

    /// Asks the engine to terminate the run. The channel stays open until `close`.
    pub async fn end_simulation(&mut self) -> Result<(), SessionError> {
        self.send(Command::Terminate).await
    }

    /// Sends a command, failing fast when no channel is open.
    pub async fn send(&mut self, command: Command) -> Result<(), SessionError> {
        let channel = self.channel.as_mut().ok_or(SessionError::NotConnected)?;
        match channel.send(command).await {
            Ok(()) => {
                debug!(%command, "sent command");
                Ok(())
            }
            Err(error) => {
                warn!(%command, %error, "sending command failed, dropping channel");
                self.release();
                Err(SessionError::Channel(error))
            }
        }
    }

    /// Waits for the next inbound message and applies it.
    ///
    /// Returns `None` when no channel is open.
    pub async fn next_event(&mut self) -> Option<SessionEvent> {
        let channel = self.channel.as_mut()?;
        match channel.recv().await {
            Ok(Some(inbound)) => Some(self.handle_inbound(inbound)),
            Ok(None) => {
                info!("simulation channel closed by remote");
                self.release();
                Some(SessionEvent::Closed { error: None })
            }
            Err(error) => {
                warn!(%error, "simulation channel failed");
                self.notify(&format!("Connection lost: {}", error));
                self.release();
                Some(SessionEvent::Closed { error: Some(error) })
            }
        }
    }

    /// Routes one inbound message to its reaction.
    pub fn handle_inbound(&mut self, inbound: Inbound) -> SessionEvent {
        match inbound {
            Inbound::Status(body) => self.handle_status(&body),
            Inbound::Update(body) => match UpdatePayload::parse(&body) {
                Ok(payload) => SessionEvent::Update(payload),
                Err(error) => {
                    warn!(%error, "dropping malformed update");
                    SessionEvent::Malformed {
                        topic: "update",
                        error: error.to_string(),
                    }
                }
            },
        }
    }

    fn handle_status(&mut self, body: &str) -> SessionEvent {
        let action = match serde_json::from_str::<StatusMessage>(body) {
            Ok(message) => StatusAction::parse(&message.action),
            Err(error) => {
                warn!(%error, body, "status message is not an action object");
                StatusAction::Other(body.to_string())
            }
        };

        self.notify(action.message());
        match action {
            StatusAction::Other(raw) => SessionEvent::Message(raw),
            recognized => {
                let next = self.state.on_status(&recognized);
                self.transition(next);
                SessionEvent::StateChanged(next)
            }
        }
    }

    /// Tears the channel down and returns to `Idle`. Safe to call at any time.
    pub async fn close(&mut self) {
        if let Some(mut channel) = self.channel.take() {
            if let Err(error) = channel.close().await {
                debug!(%error, "error while closing channel");
            }
        }
        self.transition(SessionState::Idle);
    }

    fn release(&mut self) {
        self.channel = None;
        self.transition(SessionState::Idle);
    }

    fn notify(&mut self, text: &str) {
        self.sink.message(text);
    }

    fn transition(&mut self, next: SessionState) {
        if self.state != next {
            info!(from = %self.state, to = %next, "session state");
            self.state = next;
        }
    }
}
