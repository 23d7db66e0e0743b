use crate::compiler::GraphCompiler;
use crate::error::SessionError;
use crate::factory::FactoryStructure;
use crate::graph::GraphStore;
use crate::session::{
    Connector, MessageSink, SessionController, SessionEvent, SessionState, StartOutcome,
    apply_update,
};
use tracing::warn;

/// Top-level coordinator of one editor view.
///
/// Owns the graph store exclusively and feeds it to the compiler and the session,
/// applying live updates from the engine back onto the store.
pub struct Workbench<C: Connector> {
    store: GraphStore,
    compiler: GraphCompiler,
    session: SessionController<C>,
}

impl<C: Connector> Workbench<C> {
    pub fn new(connector: C, sink: impl MessageSink + 'static) -> Self {
        Self::with_store(GraphStore::new(), connector, sink)
    }

    pub fn with_store(store: GraphStore, connector: C, sink: impl MessageSink + 'static) -> Self {
        Self {
            store,
            compiler: GraphCompiler::default(),
            session: SessionController::new(connector, sink),
        }
    }

    pub fn with_compiler(mut self, compiler: GraphCompiler) -> Self {
        self.compiler = compiler;
        self
    }

    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut GraphStore {
        &mut self.store
    }

    pub fn session(&self) -> &SessionController<C> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SessionController<C> {
        &mut self.session
    }

    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    pub fn compile(&self) -> FactoryStructure {
        self.compiler.compile_store(&self.store)
    }

    /// Compiles the current graph and starts a simulation run with it.
    pub async fn simulate(&mut self) -> Result<StartOutcome, SessionError> {
        let structure = self.compile();
        self.session.start_simulation(structure).await
    }

    pub async fn pause(&mut self) -> Result<(), SessionError> {
        self.session.pause_simulation().await
    }

    pub async fn resume(&mut self) -> Result<(), SessionError> {
        self.session.resume_simulation().await
    }

    pub async fn replay(&mut self) -> Result<(), SessionError> {
        self.session.replay_simulation().await
    }

    pub async fn end(&mut self) -> Result<(), SessionError> {
        self.session.end_simulation().await
    }

    /// Closes the session channel, e.g. when the view is left.
    pub async fn leave(&mut self) {
        self.session.close().await;
    }

    /// Handles the next inbound message, merging live updates into the store.
    pub async fn pump(&mut self) -> Option<SessionEvent> {
        let event = self.session.next_event().await?;
        if let SessionEvent::Update(payload) = &event {
            if let Err(error) = apply_update(&mut self.store, payload.clone(), &self.compiler) {
                warn!(%error, "could not apply live update");
            }
        }
        Some(event)
    }
}
