//! In-memory graph store and ingestion for hypermatch.
//!
//! [`MemoryStore`] implements the adjacency-provider and writer contracts the
//! matcher consumes. [`GraphBuilder`] adds nodes and edges while maintaining
//! the `profile_<label>` counters, and [`IGraphImporter`] reads the iGraph text
//! format used by the labeled benchmark graphs.

mod builder;
mod igraph;
mod memory;

pub use builder::GraphBuilder;
pub use igraph::{IGraphImporter, Importer};
pub use memory::MemoryStore;
