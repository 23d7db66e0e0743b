use clap::Parser;
use flowline::prelude::*;
use rand::Rng;
use rand::rngs::ThreadRng;
use std::fs;

const PALETTE: &[&str] = &["#e0e0e0", "#f44336", "#4caf50", "#2196f3", "#ffeb3b", "#9c27b0"];

/// A CLI tool to generate random, valid production lines for the flowline compiler
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to write the generated canvas JSON file to
    #[arg(short, long, default_value = "generated_graph.json")]
    output: String,

    /// Number of machine stages between the first and the last queue
    #[arg(long, default_value_t = 3)]
    stages: usize,

    /// Maximum number of parallel machines per stage
    #[arg(long, default_value_t = 3)]
    max_parallel: usize,

    /// Maximum number of products seeded into the first queue
    #[arg(long, default_value_t = 10)]
    max_products: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut rng = rand::rng();

    if cli.stages == 0 || cli.max_parallel == 0 {
        eprintln!("Error: --stages and --max-parallel must both be at least 1");
        std::process::exit(1);
    }

    println!(
        "Generating a line with {} stages (up to {} machines each)...",
        cli.stages, cli.max_parallel
    );

    let store = generate_line(&mut rng, &cli)?;
    let structure = GraphCompiler::default().compile_store(&store);
    println!(
        "-> {} machines, {} queues, {} products",
        structure.machines.len(),
        structure.queues.len(),
        structure.product_count()
    );

    let json_output = serde_json::to_string_pretty(&UiGraph::from(&store))?;
    fs::write(&cli.output, json_output)?;

    println!("Successfully generated and saved graph to '{}'", cli.output);

    Ok(())
}

/// Builds queue -> machines -> queue stages. Every link goes through the store's
/// validator, so the result is always a legal line.
fn generate_line(rng: &mut ThreadRng, cli: &Cli) -> Result<GraphStore> {
    let mut store = GraphStore::new();
    let mut x = 0.0;
    let mut upstream = store.add_queue(Position::new(x, 0.0));

    let seeded = random_products(rng, cli.max_products);
    store.set_queue_products(upstream.as_str(), seeded)?;

    for _ in 0..cli.stages {
        x += 200.0;
        let downstream = store.add_queue(Position::new(x + 200.0, 0.0));
        let parallel = rng.random_range(1..=cli.max_parallel);
        for row in 0..parallel {
            let machine = store.add_machine(Position::new(x, row as f64 * 120.0));
            store.connect(upstream.as_str(), machine.as_str())?;
            store.connect(machine.as_str(), downstream.as_str())?;
        }
        x += 200.0;
        upstream = downstream;
    }

    Ok(store)
}

fn random_products(rng: &mut ThreadRng, max: usize) -> Vec<Product> {
    let count = rng.random_range(0..=max);
    (0..count)
        .map(|_| Product::new(PALETTE[rng.random_range(0..PALETTE.len())]))
        .collect()
}
