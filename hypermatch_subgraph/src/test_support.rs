//! Fixture helpers shared by unit and integration tests.
#![allow(dead_code)]

use std::sync::Once;

use hypermatch_common::*;
use hypermatch_store::{GraphBuilder, MemoryStore};

static INIT: Once = Once::new();

/// Configures logging for the test runner.
pub fn setup_test_logging() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// A store holding any number of named graphs built from name tables.
#[derive(Default)]
pub struct StoreFixture {
    /// The backing store.
    pub store: MemoryStore,
    ids: HashMap<(String, String), NodeId>,
}

impl StoreFixture {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a graph. Nodes are `(name, "Label Label ...")`, edges are name pairs.
    ///
    /// # Panics
    /// When an edge names an unknown node.
    pub fn graph(mut self, membership: &str, nodes: &[(&str, &str)], edges: &[(&str, &str)]) -> Self {
        let mut builder = GraphBuilder::new(&mut self.store, membership);
        let mut local: HashMap<&str, NodeId> = HashMap::new();
        for (name, labels) in nodes {
            let id = builder.add_node(labels.split_whitespace());
            local.insert(*name, id);
        }
        for (a, b) in edges {
            builder
                .add_edge(local[a], local[b], "edge")
                .expect("fixture edge endpoints exist");
        }
        for (name, id) in local {
            self.ids.insert((membership.to_owned(), name.to_owned()), id);
        }
        self
    }

    /// Store id of a named node.
    ///
    /// # Panics
    /// When the node is unknown.
    pub fn id(&self, graph: &str, name: &str) -> NodeId {
        self.ids[&(graph.to_owned(), name.to_owned())]
    }

    /// Name of a store id, if it was created by this fixture.
    pub fn name_of(&self, id: NodeId) -> Option<&str> {
        self.ids
            .iter()
            .find(|(_, v)| **v == id)
            .map(|((_, name), _)| name.as_str())
    }

    /// Builds the index of one graph.
    ///
    /// # Panics
    /// Never for an in-memory store.
    pub fn index(&self, graph: &str) -> GraphIndex {
        GraphIndex::build(&self.store, &Label::new(graph)).expect("memory store cannot fail")
    }
}

/// One graph named `T` with its index and name lookup.
pub struct GraphFixture {
    /// Backing store.
    pub fixture: StoreFixture,
    /// Index over graph `T`.
    pub index: GraphIndex,
}

impl GraphFixture {
    /// Local index of a named node.
    ///
    /// # Panics
    /// When the node is unknown.
    pub fn idx(&self, name: &str) -> NodeIdx {
        self.index
            .resolve(self.fixture.id("T", name))
            .expect("fixture node is a member")
    }
}

/// Builds graph `T` from name tables.
pub fn fixture(nodes: &[(&str, &str)], edges: &[(&str, &str)]) -> GraphFixture {
    let fixture = StoreFixture::new().graph("T", nodes, edges);
    let index = fixture.index("T");
    GraphFixture { fixture, index }
}

/// Builds graph `T` with `n` nodes labeled `A` and edges taken modulo `n`.
pub fn random_fixture(n: usize, edges: &[(u8, u8)]) -> GraphFixture {
    let names: Vec<String> = (0..n).map(|i| format!("v{i}")).collect();
    let nodes: Vec<(&str, &str)> = names.iter().map(|s| (s.as_str(), "A")).collect();
    let edge_names: Vec<(&str, &str)> = edges
        .iter()
        .map(|&(a, b)| {
            (
                names[a as usize % n].as_str(),
                names[b as usize % n].as_str(),
            )
        })
        .collect();
    fixture(&nodes, &edge_names)
}
