use crate::factory::CanonicalId;
use crate::graph::Product;
use crate::ui::UiNode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Literal upload response body signalling that the engine refused the structure.
pub const INVALID_GRAPH: &str = "Invalid Graph";

/// Commands sent to the engine on the command destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Start,
    Pause,
    Resume,
    Replay,
    Terminate,
}

impl Command {
    pub fn as_str(self) -> &'static str {
        match self {
            Command::Start => "start",
            Command::Pause => "pause",
            Command::Resume => "resume",
            Command::Replay => "replay",
            Command::Terminate => "terminate",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the engine answered an upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadVerdict {
    Accepted,
    Rejected,
}

impl UploadVerdict {
    /// Interprets the body of a successful upload response.
    pub fn from_body(body: &str) -> Self {
        if body == INVALID_GRAPH {
            UploadVerdict::Rejected
        } else {
            UploadVerdict::Accepted
        }
    }
}

/// A raw message received on one of the two inbound topics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    Status(String),
    Update(String),
}

/// Body of a status topic message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusMessage {
    pub action: String,
}

/// A single item moving between a queue and a machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveEvent {
    #[serde(alias = "fromId")]
    pub from: CanonicalId,
    #[serde(alias = "toId")]
    pub to: CanonicalId,
    #[serde(default = "default_move_action")]
    pub action: String,
    #[serde(default)]
    pub item: Option<Product>,
}

fn default_move_action() -> String {
    "move".to_string()
}

/// Body of an update topic message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UpdatePayload {
    /// The full node collection, replacing what is displayed.
    Snapshot(Vec<UiNode>),
    /// One product moved.
    Move(MoveEvent),
}

impl UpdatePayload {
    pub fn parse(body: &str) -> serde_json::Result<Self> {
        serde_json::from_str(body)
    }
}
