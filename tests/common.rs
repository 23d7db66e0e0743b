//! Common test utilities for building graphs and scripting a simulation engine.
use async_trait::async_trait;
use flowline::prelude::*;
use std::collections::VecDeque;
use std::result::Result;
use std::sync::{Arc, Mutex};

/// Builds a node the way a loaded canvas would carry it.
#[allow(dead_code)]
pub fn node(id: &str, kind: NodeKind) -> Node {
    Node::new(id, kind, Position::default())
}

#[allow(dead_code)]
pub fn queue_with(id: &str, colors: &[&str]) -> Node {
    node(id, NodeKind::Queue).with_products(colors.iter().map(|c| Product::new(*c)).collect())
}

/// One machine `dndnode_0` fed by queue `dndnode_1`, which holds one default product.
#[allow(dead_code)]
pub fn create_scenario_graph() -> (Vec<Node>, Vec<Edge>) {
    let nodes = vec![
        node("dndnode_0", NodeKind::Machine),
        node("dndnode_1", NodeKind::Queue).with_products(vec![Product::default()]),
    ];
    let edges = vec![Edge::link("dndnode_1", "dndnode_0")];
    (nodes, edges)
}

/// Queue -> machine -> queue, built through the store's own operations.
#[allow(dead_code)]
pub fn create_simple_line() -> (GraphStore, NodeId, NodeId, NodeId) {
    let mut store = GraphStore::new();
    let input = store.add_queue(Position::new(0.0, 0.0));
    let machine = store.add_machine(Position::new(200.0, 0.0));
    let output = store.add_queue(Position::new(400.0, 0.0));
    store
        .connect(input.as_str(), machine.as_str())
        .expect("queue -> machine is legal");
    store
        .connect(machine.as_str(), output.as_str())
        .expect("machine -> queue is legal");
    (store, input, machine, output)
}

/// Inbound messages as the engine would publish them.
#[allow(dead_code)]
pub fn status(action: &str) -> Result<Option<Inbound>, TransportError> {
    Ok(Some(Inbound::Status(format!(r#"{{"action":"{}"}}"#, action))))
}

#[allow(dead_code)]
pub fn update(body: &str) -> Result<Option<Inbound>, TransportError> {
    Ok(Some(Inbound::Update(body.to_string())))
}

/// Everything the scripted engine observed, shared with the test body.
#[allow(dead_code)]
#[derive(Debug, Default)]
pub struct EngineLog {
    pub uploads: Vec<FactoryStructure>,
    pub opens: usize,
    pub sent: Vec<Command>,
    pub closes: usize,
}

/// A `Connector` whose answers are scripted up front.
#[allow(dead_code)]
pub struct ScriptedEngine {
    pub log: Arc<Mutex<EngineLog>>,
    upload_results: VecDeque<Result<UploadVerdict, TransportError>>,
    open_error: Option<TransportError>,
    inbound: Arc<Mutex<VecDeque<Result<Option<Inbound>, TransportError>>>>,
    send_error: Option<TransportError>,
}

#[allow(dead_code)]
impl ScriptedEngine {
    /// Accepts every upload; the channel yields `inbound` and then reports a clean close.
    pub fn accepting(inbound: Vec<Result<Option<Inbound>, TransportError>>) -> Self {
        Self {
            log: Arc::default(),
            upload_results: VecDeque::new(),
            open_error: None,
            inbound: Arc::new(Mutex::new(inbound.into())),
            send_error: None,
        }
    }

    pub fn with_upload_results(
        mut self,
        results: Vec<Result<UploadVerdict, TransportError>>,
    ) -> Self {
        self.upload_results = results.into();
        self
    }

    pub fn failing_open(mut self, error: TransportError) -> Self {
        self.open_error = Some(error);
        self
    }

    pub fn failing_send(mut self, error: TransportError) -> Self {
        self.send_error = Some(error);
        self
    }

    /// Queues more inbound messages after the session was started.
    pub fn push_inbound(&self, message: Result<Option<Inbound>, TransportError>) {
        self.inbound.lock().unwrap().push_back(message);
    }

    pub fn log(&self) -> Arc<Mutex<EngineLog>> {
        Arc::clone(&self.log)
    }
}

#[async_trait]
impl Connector for ScriptedEngine {
    type Channel = ScriptedChannel;

    async fn upload(&mut self, structure: &FactoryStructure) -> Result<UploadVerdict, TransportError> {
        self.log.lock().unwrap().uploads.push(structure.clone());
        self.upload_results
            .pop_front()
            .unwrap_or(Ok(UploadVerdict::Accepted))
    }

    async fn open(&mut self) -> Result<ScriptedChannel, TransportError> {
        self.log.lock().unwrap().opens += 1;
        if let Some(error) = self.open_error.clone() {
            return Err(error);
        }
        Ok(ScriptedChannel {
            log: Arc::clone(&self.log),
            inbound: Arc::clone(&self.inbound),
            send_error: self.send_error.clone(),
        })
    }
}

#[allow(dead_code)]
pub struct ScriptedChannel {
    log: Arc<Mutex<EngineLog>>,
    inbound: Arc<Mutex<VecDeque<Result<Option<Inbound>, TransportError>>>>,
    send_error: Option<TransportError>,
}

#[async_trait]
impl Channel for ScriptedChannel {
    async fn send(&mut self, command: Command) -> Result<(), TransportError> {
        if let Some(error) = self.send_error.clone() {
            return Err(error);
        }
        self.log.lock().unwrap().sent.push(command);
        Ok(())
    }

    async fn recv(&mut self) -> Result<Option<Inbound>, TransportError> {
        self.inbound.lock().unwrap().pop_front().unwrap_or(Ok(None))
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        self.log.lock().unwrap().closes += 1;
        Ok(())
    }
}
