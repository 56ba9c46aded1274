//! Reader for the iGraph text format.
//!
//! ```text
//! t # 0          start graph 0 (membership label "<file stem>_0")
//! v 0 A          vertex 0 with content label A
//! v 1 B C        vertex 1 with content labels B and C
//! e 0 1 knows    undirected edge between vertices 0 and 1
//! ```
//!
//! Vertex ids are local to the graph they appear in. Every edge updates the
//! profile counters of both endpoints.

use std::io::BufRead;
use std::path::Path;

use hypermatch_common::*;

use crate::builder::GraphBuilder;
use crate::memory::MemoryStore;

/// Something that can load graphs from a file into a [`MemoryStore`].
pub trait Importer {
    /// Loads `path` into `store`, returning the membership labels created.
    ///
    /// # Errors
    /// I/O and parse failures.
    fn import(&self, store: &mut MemoryStore, path: &Path) -> Result<Vec<Label>, StoreError>;
}

/// Importer for iGraph files.
#[derive(Clone, Debug, Default)]
pub struct IGraphImporter;

impl Importer for IGraphImporter {
    fn import(&self, store: &mut MemoryStore, path: &Path) -> Result<Vec<Label>, StoreError> {
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .and_then(|s| s.split('.').next())
            .unwrap_or("graph")
            .to_owned();
        let file = std::fs::File::open(path)?;
        let labels = self.read(store, &name, std::io::BufReader::new(file))?;
        tracing::info!(
            "loaded {} graph(s) from {}",
            labels.len(),
            path.display()
        );
        Ok(labels)
    }
}

impl IGraphImporter {
    /// Reads iGraph text from any buffered reader; graphs are named `<name>_<id>`.
    ///
    /// # Errors
    /// I/O and parse failures.
    pub fn read<R: BufRead>(
        &self,
        store: &mut MemoryStore,
        name: &str,
        reader: R,
    ) -> Result<Vec<Label>, StoreError> {
        let mut graphs: Vec<Label> = Vec::new();
        let mut vertices: HashMap<String, NodeId> = HashMap::new();

        for (line_no, line) in reader.lines().enumerate() {
            let line = line?;
            let line_no = line_no + 1;
            let parts: Vec<&str> = line.split_whitespace().collect();
            let Some(&kind) = parts.first() else {
                continue;
            };

            match kind {
                "t" => {
                    let id = parts.get(2).ok_or_else(|| parse_error(line_no, "graph header needs an id"))?;
                    graphs.push(Label::new(format!("{name}_{id}")));
                    vertices.clear();
                }
                "v" => {
                    let graph = graphs
                        .last()
                        .ok_or_else(|| parse_error(line_no, "vertex before graph header"))?;
                    let vid = parts
                        .get(1)
                        .ok_or_else(|| parse_error(line_no, "vertex needs an id"))?;
                    let mut builder = GraphBuilder::new(store, graph.clone());
                    let node = builder.add_node(parts[2..].iter().copied());
                    vertices.insert((*vid).to_owned(), node);
                }
                "e" => {
                    let graph = graphs
                        .last()
                        .ok_or_else(|| parse_error(line_no, "edge before graph header"))?;
                    let (Some(a), Some(b)) = (parts.get(1), parts.get(2)) else {
                        return Err(parse_error(line_no, "edge needs two endpoints"));
                    };
                    let a = *vertices
                        .get(*a)
                        .ok_or_else(|| parse_error(line_no, &format!("unknown vertex {a}")))?;
                    let b = *vertices
                        .get(*b)
                        .ok_or_else(|| parse_error(line_no, &format!("unknown vertex {b}")))?;
                    let rel = parts.get(3).copied().unwrap_or("");
                    GraphBuilder::new(store, graph.clone()).add_edge(a, b, rel)?;
                }
                k if k.starts_with('#') => {}
                other => {
                    return Err(parse_error(line_no, &format!("unknown record '{other}'")));
                }
            }
        }

        Ok(graphs)
    }
}

fn parse_error(line: usize, message: &str) -> StoreError {
    StoreError::Parse {
        line,
        message: message.to_owned(),
    }
}
