//! # Flowline - Production-Line Graph Compiler and Simulation Client
//!
//! **Flowline** turns a production line drawn as a node/edge graph (machines, queues
//! and the products waiting in them) into the canonical factory description a
//! simulation engine understands, and drives a remote simulation of it through a
//! persistent session protocol.
//!
//! ## Core Workflow
//!
//! 1.  **Draw**: Build a `GraphStore`, either through its mutation operations or by
//!     loading a canvas document with the `IntoGraph` trait. Every connection passes
//!     the `ConnectionValidator`, so machine-to-machine and queue-to-queue links never
//!     enter the store and a machine never gets a second output.
//! 2.  **Compile**: `GraphCompiler` snapshots the store into a `FactoryStructure` with
//!     stable integer ids, FIFO queue contents and deduplicated queue references.
//! 3.  **Simulate**: `SessionController` uploads the structure, opens the message
//!     channel, sends commands and turns status messages into `SessionState`
//!     transitions. Live node updates are merged back into the store.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use flowline::prelude::*;
//! use flowline::net::StompConnector;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<()> {
//!     // 1. Draw a queue feeding a machine that writes into a second queue.
//!     let mut store = GraphStore::new();
//!     let input = store.add_queue(Position::new(0.0, 0.0));
//!     let machine = store.add_machine(Position::new(200.0, 0.0));
//!     let output = store.add_queue(Position::new(400.0, 0.0));
//!     store.connect(input.as_str(), machine.as_str())?;
//!     store.connect(machine.as_str(), output.as_str())?;
//!
//!     // Drop a product onto the input queue.
//!     store.drop_product(Position::new(10.0, 10.0));
//!
//!     // 2. Compile it.
//!     let structure = GraphCompiler::default().compile_store(&store);
//!     println!("{}", structure.to_json_pretty()?);
//!
//!     // 3. Run it against a local engine.
//!     let connector = StompConnector::new(SessionConfig::default())?;
//!     let mut workbench = Workbench::with_store(store, connector, TracingSink);
//!     if workbench.simulate().await? == StartOutcome::Started {
//!         while let Some(event) = workbench.pump().await {
//!             if matches!(event, SessionEvent::StateChanged(SessionState::Ended)) {
//!                 break;
//!             }
//!         }
//!     }
//!     workbench.leave().await;
//!     Ok(())
//! }
//! ```

pub mod compiler;
pub mod config;
pub mod error;
pub mod factory;
pub mod graph;
pub mod net;
pub mod prelude;
pub mod session;
pub mod ui;
pub mod workbench;
