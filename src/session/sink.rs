use std::sync::{Arc, Mutex};
use tracing::{debug, info};

/// Receives the user-visible messages a session produces.
pub trait MessageSink: Send {
    fn message(&mut self, text: &str);
}

/// Forwards every message to the `tracing` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl MessageSink for TracingSink {
    fn message(&mut self, text: &str) {
        info!(target: "flowline::messages", "{}", text);
    }
}

/// Collects messages in memory. Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct MessageLog {
    messages: Arc<Mutex<Vec<String>>>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .map(|m| m.clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.messages.lock().map(|m| m.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl MessageSink for MessageLog {
    fn message(&mut self, text: &str) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(text.to_string());
        }
    }
}

/// Sends each message to a tokio channel, e.g. for a UI task to display.
impl MessageSink for tokio::sync::mpsc::UnboundedSender<String> {
    fn message(&mut self, text: &str) {
        if let Err(error) = self.send(text.to_string()) {
            debug!(message = %error.0, "message receiver dropped, discarding message");
        }
    }
}
