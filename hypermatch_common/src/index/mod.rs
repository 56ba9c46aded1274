//! Graph indexing and adjacency analysis.
//!
//! Provides the dense, read-only snapshot of one labeled graph that all
//! matching stages work on: node table, content labels, properties and
//! deduplicated undirected adjacency restricted to the graph's members.

mod adjacency;
mod node_registry;

pub use adjacency::Adjacency;
pub use node_registry::NodeRegistry;

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use crate::ids::{NodeId, NodeIdx};
use crate::label::Label;
use crate::property::PropertyValue;
use crate::store::{AdjacencyProvider, StoreError};

/// An index over one labeled graph providing fast access to adjacency and node data.
#[derive(Clone, Debug)]
pub struct GraphIndex {
    membership: Label,
    registry: NodeRegistry,
    adjacency: Adjacency,
}

impl GraphIndex {
    /// Builds a new `GraphIndex` for every node carrying `membership`.
    ///
    /// Edges to nodes outside the graph, self loops and persisted
    /// structural-containment edges are not part of the adjacency.
    ///
    /// # Errors
    /// Propagates any store failure.
    pub fn build<P>(provider: &P, membership: &Label) -> Result<Self, StoreError>
    where
        P: AdjacencyProvider + ?Sized,
    {
        let start = std::time::Instant::now();

        let mut registry = NodeRegistry::default();
        let member_ids = provider.find_nodes_by_label(membership)?;
        for &id in &member_ids {
            let mut labels = provider.labels(id)?;
            labels.remove(membership);
            registry.push(id, labels, provider.properties(id)?);
        }

        let mut raw_edges = Vec::new();
        for (local, &id) in member_ids.iter().enumerate() {
            for (other, rel) in provider.neighbors(id)? {
                if rel.is_structural_containment() {
                    continue;
                }
                if let Some(other_idx) = registry.resolve(other) {
                    raw_edges.push((NodeIdx::from(local), other_idx));
                }
            }
        }
        let adjacency = Adjacency::build(registry.len(), raw_edges);

        tracing::debug!(
            "graph index for {} built in {:?}: {} nodes, {} edges",
            membership,
            start.elapsed(),
            registry.len(),
            adjacency.edge_count()
        );

        Ok(Self {
            membership: membership.clone(),
            registry,
            adjacency,
        })
    }

    /// The membership label this index was built for.
    #[must_use]
    pub const fn membership(&self) -> &Label {
        &self.membership
    }

    /// Returns the total number of nodes in the index.
    #[must_use]
    pub const fn num_nodes(&self) -> usize {
        self.registry.len()
    }

    /// True when the graph has no nodes.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Iterates all local indices in store order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeIdx> + use<> {
        (0..self.registry.len()).map(NodeIdx::from)
    }

    /// Resolves a local index to its store id.
    #[must_use]
    pub fn node_id(&self, idx: NodeIdx) -> NodeId {
        self.registry.node_id(idx)
    }

    /// Resolves a store id to its local index, if the node is a member.
    #[must_use]
    pub fn resolve(&self, id: NodeId) -> Option<NodeIdx> {
        self.registry.resolve(id)
    }

    /// Labels of a node, excluding the membership label.
    #[must_use]
    pub fn content_labels(&self, idx: NodeIdx) -> &BTreeSet<Label> {
        self.registry.content_labels(idx)
    }

    /// Whether the node carries a content label.
    #[must_use]
    pub fn has_label(&self, idx: NodeIdx, label: &Label) -> bool {
        self.registry.content_labels(idx).contains(label)
    }

    /// Whether the node carries any of the given labels.
    #[must_use]
    pub fn has_any_label(&self, idx: NodeIdx, labels: &HashSet<Label>) -> bool {
        self.registry
            .content_labels(idx)
            .iter()
            .any(|l| labels.contains(l))
    }

    /// Property map of a node.
    #[must_use]
    pub fn properties(&self, idx: NodeIdx) -> &HashMap<String, PropertyValue> {
        self.registry.properties(idx)
    }

    /// A single property of a node.
    #[must_use]
    pub fn property(&self, idx: NodeIdx, key: &str) -> Option<&PropertyValue> {
        self.registry.properties(idx).get(key)
    }

    /// Nodes carrying a content label, ascending.
    #[must_use]
    pub fn nodes_with_label(&self, label: &Label) -> &[NodeIdx] {
        self.registry.nodes_with_label(label)
    }

    /// Sorted distinct neighbors of a node.
    #[must_use]
    pub fn neighbors(&self, idx: NodeIdx) -> &[NodeIdx] {
        self.adjacency.neighbors(idx)
    }

    /// Neighbor set of a node.
    #[must_use]
    pub fn neighbor_set(&self, idx: NodeIdx) -> &HashSet<NodeIdx> {
        self.adjacency.neighbor_set(idx)
    }

    /// Number of distinct neighbors.
    #[must_use]
    pub fn degree(&self, idx: NodeIdx) -> usize {
        self.adjacency.degree(idx)
    }

    /// Whether an edge joins `a` and `b`.
    #[must_use]
    pub fn has_edge(&self, a: NodeIdx, b: NodeIdx) -> bool {
        self.adjacency.has_edge(a, b)
    }

    /// Number of distinct undirected edges.
    #[must_use]
    pub fn num_edges(&self) -> usize {
        self.adjacency.edge_count()
    }

    /// Nodes carrying `label` exactly two hops from `idx`: reachable through
    /// one intermediate node, not adjacent to `idx` and not `idx` itself.
    /// Ascending and distinct.
    #[must_use]
    pub fn two_hop_same_label(&self, idx: NodeIdx, label: &Label) -> Vec<NodeIdx> {
        let direct = self.neighbor_set(idx);
        let mut found: BTreeSet<NodeIdx> = BTreeSet::new();
        for &mid in self.neighbors(idx) {
            for &far in self.neighbors(mid) {
                if far != idx && !direct.contains(&far) && self.has_label(far, label) {
                    found.insert(far);
                }
            }
        }
        found.into_iter().collect()
    }

    /// Breadth-first walk from `start` following `next`, yielding every
    /// reachable node (excluding `start`) with its path length, in ascending
    /// path-length order. `max_depth` bounds the walk.
    pub fn bounded_bfs<'a, F, I>(start: NodeIdx, max_depth: usize, mut next: F) -> Vec<(NodeIdx, usize)>
    where
        F: FnMut(NodeIdx) -> I,
        I: IntoIterator<Item = &'a NodeIdx>,
    {
        let mut seen: HashSet<NodeIdx> = HashSet::from([start]);
        let mut queue: VecDeque<(NodeIdx, usize)> = VecDeque::from([(start, 0)]);
        let mut out = Vec::new();
        while let Some((node, depth)) = queue.pop_front() {
            if depth == max_depth {
                continue;
            }
            for &child in next(node) {
                if seen.insert(child) {
                    out.push((child, depth + 1));
                    queue.push_back((child, depth + 1));
                }
            }
        }
        out
    }
}
