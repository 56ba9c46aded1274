//! Contracts between the matcher and the backing graph store.
//!
//! The matcher never walks the store during a search: it reads one labeled
//! graph through [`AdjacencyProvider`] into a [`crate::GraphIndex`] and works on
//! that snapshot. [`GraphWriter`] is only needed to persist compression results.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use thiserror::Error;

use crate::ids::NodeId;
use crate::label::Label;
use crate::property::PropertyValue;

/// Relation type of persisted structural-containment edges.
pub const SC_RELATION: &str = "hyper_SC";
/// Property marking a node merged into another node's equivalence class.
pub const HIDDEN_PROPERTY: &str = "hyper_isHidden";
/// Property marking a representative that absorbed at least one twin.
pub const CLIQUE_PROPERTY: &str = "hyper_isClique";
/// Property listing the twins a representative stands for.
pub const SEC_PROPERTY: &str = "hyper_SEC";

/// Relation type carried by an edge. Matching only looks at adjacency;
/// the type matters for the reserved [`SC_RELATION`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RelationType(String);

impl RelationType {
    /// Creates a relation type from its name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The relation used for persisted containment edges.
    pub fn structural_containment() -> Self {
        Self::new(SC_RELATION)
    }

    /// The relation type name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for the reserved containment relation.
    pub fn is_structural_containment(&self) -> bool {
        self.0 == SC_RELATION
    }
}

impl fmt::Display for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Failures raised by a graph store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store does not know the node.
    #[error("Unknown node: {0}")]
    UnknownNode(NodeId),
    /// Underlying I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Input could not be parsed.
    #[error("Parse error at line {line}: {message}")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// What went wrong.
        message: String,
    },
}

/// Read access to a labeled property multigraph.
pub trait AdjacencyProvider {
    /// All nodes carrying `label`, in a stable store order.
    fn find_nodes_by_label(&self, label: &Label) -> Result<Vec<NodeId>, StoreError>;

    /// The labels carried by a node.
    fn labels(&self, node: NodeId) -> Result<BTreeSet<Label>, StoreError>;

    /// The property map of a node.
    fn properties(&self, node: NodeId) -> Result<HashMap<String, PropertyValue>, StoreError>;

    /// Incident edges as (other endpoint, relation type), one entry per edge.
    fn neighbors(&self, node: NodeId) -> Result<Vec<(NodeId, RelationType)>, StoreError>;

    /// Targets of edges of type `rel` created *from* `node`, in creation order.
    fn outgoing(&self, node: NodeId, rel: &RelationType) -> Result<Vec<NodeId>, StoreError>;

    /// Number of incident edges.
    fn degree(&self, node: NodeId) -> Result<usize, StoreError> {
        Ok(self.neighbors(node)?.len())
    }
}

/// Write access used to persist compression results back to the store.
pub trait GraphWriter {
    /// Creates an edge between two existing nodes.
    fn create_edge(&mut self, a: NodeId, b: NodeId, rel: RelationType) -> Result<(), StoreError>;

    /// Sets (or overwrites) a node property.
    fn set_property(
        &mut self,
        node: NodeId,
        key: &str,
        value: PropertyValue,
    ) -> Result<(), StoreError>;

    /// Removes a node property, returning whether it existed.
    fn remove_property(&mut self, node: NodeId, key: &str) -> Result<bool, StoreError>;

    /// Removes every edge of type `rel` incident to `node`, returning how many went.
    fn remove_edges(&mut self, node: NodeId, rel: &RelationType) -> Result<usize, StoreError>;
}
