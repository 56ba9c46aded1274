//! Hypermatch CLI
//!
//! Loads iGraph files into an in-memory store and answers `build` / `search`
//! commands, either from `--execute` arguments or line by line from standard
//! input.

#[global_allocator]
/// Global allocator using jemalloc for better performance in parallel workloads.
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

mod args;
mod session;

use std::io::Cursor;

use clap::Parser;
use hypermatch_store::{IGraphImporter, Importer, MemoryStore};
use tracing::info;

use args::Args;
use session::Session;

/// Executes the matcher.
///
/// This function:
/// 1. Initializes logging
/// 2. Parses command-line arguments
/// 3. Loads every graph file into one store
/// 4. Runs the command loop
fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_thread_ids(true)
        .init();

    let args = Args::parse();
    let config = args.to_config();

    let mut store = MemoryStore::new();
    for path in &args.graph_paths {
        let graphs = IGraphImporter.import(&mut store, path)?;
        info!("{}: {:?}", path.display(), graphs);
    }
    info!(
        "store holds {} nodes and {} edges",
        store.node_count(),
        store.edge_count()
    );

    let mut session = Session::new(store, config)
        .persist(args.persist)
        .json(args.json);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if args.commands.is_empty() {
        session.run(std::io::stdin().lock(), &mut out)?;
    } else {
        session.run(Cursor::new(args.commands.join("\n")), &mut out)?;
    }
    Ok(())
}
