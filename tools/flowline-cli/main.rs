use clap::{Parser, Subcommand, ValueEnum};
use flowline::net::{DirectSimulation, StompConnector};
use flowline::prelude::*;
use std::fs;
use std::time::Instant;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

/// Define a CLI-specific enum for clap to parse.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ResolverCli {
    Prefix,
    Sequence,
    SequenceOrPrefix,
}

impl ResolverCli {
    fn name(self) -> &'static str {
        match self {
            ResolverCli::Prefix => "prefix",
            ResolverCli::Sequence => "sequence",
            ResolverCli::SequenceOrPrefix => "sequence-or-prefix",
        }
    }
}

/// Production-line graph compiler and simulation client
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Optional TOML file with engine endpoints and topics
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Override the engine's HTTP base URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Override the engine's STOMP WebSocket URL
    #[arg(long, global = true)]
    ws_url: Option<String>,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand, Debug)]
enum CliCommand {
    /// Compile a canvas JSON file and print the factory structure
    Compile {
        /// Path to the canvas JSON file
        graph_path: String,
        /// How canonical ids are derived from nodes
        #[arg(short, long, value_enum, default_value = "prefix")]
        resolver: ResolverCli,
        /// Print a one-line-per-record summary instead of JSON
        #[arg(short, long)]
        summary: bool,
    },
    /// Upload a canvas and run a simulation session
    Simulate {
        /// Path to the canvas JSON file
        graph_path: String,
        /// Run in interactive mode and read commands from stdin
        #[arg(short = 'i', long, help = "Run in interactive 'human' mode")]
        human: bool,
    },
    /// Run the raw-socket variant: post the canvas and stream snapshots
    Direct {
        /// Path to the canvas JSON file
        graph_path: String,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("flowline=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli);

    match cli.command {
        CliCommand::Compile {
            graph_path,
            resolver,
            summary,
        } => run_compile(&graph_path, resolver, summary),
        CliCommand::Simulate { graph_path, human } => {
            run_simulation(&graph_path, config, human).await
        }
        CliCommand::Direct { graph_path } => run_direct(&graph_path, config).await,
    }
}

fn load_config(cli: &Cli) -> SessionConfig {
    let mut config = match &cli.config {
        Some(path) => SessionConfig::from_file(path)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to load config: {}", e))),
        None => SessionConfig::default(),
    };
    if let Some(base_url) = &cli.base_url {
        config.base_url = base_url.clone();
    }
    if let Some(ws_url) = &cli.ws_url {
        config.ws_url = ws_url.clone();
    }
    config
}

fn load_graph(path: &str) -> GraphStore {
    let json = fs::read_to_string(path)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to read graph file '{}': {}", path, e)));
    UiGraph::from_json(&json)
        .and_then(IntoGraph::into_graph)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to load graph: {}", e)))
}

fn run_compile(graph_path: &str, resolver: ResolverCli, summary: bool) {
    let store = load_graph(graph_path);

    let compile_start = Instant::now();
    let compiler = GraphCompiler::builder()
        .with_resolver_named(resolver.name())
        .build();
    let structure = compiler.compile_store(&store);
    let compile_duration = compile_start.elapsed();

    if summary {
        print!("{}", structure);
    } else {
        let json = structure
            .to_json_pretty()
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to serialize structure: {}", e)));
        println!("{}", json);
    }

    eprintln!("\n--- Compilation Summary ---");
    eprintln!("Nodes:       {}", store.nodes().len());
    eprintln!("Edges:       {}", store.edges().len());
    eprintln!("Machines:    {}", structure.machines.len());
    eprintln!("Queues:      {}", structure.queues.len());
    eprintln!("Products:    {}", structure.product_count());
    eprintln!("Compiled in: {:?}", compile_duration);
}

async fn run_simulation(graph_path: &str, config: SessionConfig, human: bool) {
    let store = load_graph(graph_path);
    let connector = StompConnector::new(config)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to create connector: {}", e)));
    let mut workbench = Workbench::with_store(store, connector, TracingSink);

    match workbench.simulate().await {
        Ok(StartOutcome::Started) => println!("Simulation requested, waiting for the engine..."),
        Ok(StartOutcome::Rejected) => exit_with_error("The engine rejected the graph"),
        Err(e) => exit_with_error(&e.to_string()),
    }

    if human {
        println!("Commands: pause | resume | replay | end | quit");
        run_interactive(&mut workbench).await;
    } else {
        while let Some(event) = workbench.pump().await {
            if report(&event) {
                break;
            }
        }
    }

    workbench.leave().await;
    println!("Session closed.");
}

/// Reads commands from stdin while events keep arriving.
async fn run_interactive(workbench: &mut Workbench<StompConnector>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Ok(Some(line)) = line else { break };
                let result = match line.trim() {
                    "pause" => workbench.pause().await,
                    "resume" => workbench.resume().await,
                    "replay" => workbench.replay().await,
                    "end" => workbench.end().await,
                    "quit" | "exit" => break,
                    "" => Ok(()),
                    other => {
                        println!("Unknown command '{}'", other);
                        Ok(())
                    }
                };
                if let Err(e) = result {
                    println!("Error: {}", e);
                }
            }
            event = workbench.pump() => {
                match event {
                    Some(event) => {
                        report(&event);
                    }
                    None => break,
                }
            }
        }
    }
}

/// Prints an event. Returns true once the session is over.
fn report(event: &SessionEvent) -> bool {
    match event {
        SessionEvent::StateChanged(state) => {
            println!("  -> state: {}", state);
            *state == SessionState::Ended
        }
        SessionEvent::Message(message) => {
            println!("  -> {}", message);
            false
        }
        SessionEvent::Update(UpdatePayload::Snapshot(nodes)) => {
            println!("  -> snapshot of {} nodes", nodes.len());
            false
        }
        SessionEvent::Update(UpdatePayload::Move(event)) => {
            println!("  -> item moved {} -> {}", event.from, event.to);
            false
        }
        SessionEvent::Malformed { topic, error } => {
            println!("  -> malformed {} message: {}", topic, error);
            false
        }
        SessionEvent::Closed { error } => {
            match error {
                Some(e) => println!("  -> connection lost: {}", e),
                None => println!("  -> connection closed"),
            }
            true
        }
    }
}

async fn run_direct(graph_path: &str, config: SessionConfig) {
    let store = load_graph(graph_path);
    let graph = UiGraph::from(&store);

    let mut simulation = DirectSimulation::start(&config, &graph)
        .await
        .unwrap_or_else(|e| exit_with_error(&format!("Simulation failed to start: {}", e)));

    let mut snapshots = 0usize;
    loop {
        match simulation.next_snapshot().await {
            Ok(Some(nodes)) => {
                snapshots += 1;
                println!("Snapshot {}: {} nodes", snapshots, nodes.len());
            }
            Ok(None) => break,
            Err(e) => {
                println!("Stream error: {}", e);
                break;
            }
        }
    }
    let _ = simulation.close().await;
    println!("Simulation completed after {} snapshots.", snapshots);
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
