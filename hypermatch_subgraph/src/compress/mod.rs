//! Target-graph compression.
//!
//! Twins (structurally equivalent nodes with the same content label) are
//! collapsed into one visible representative whose SEC lists the hidden
//! members. Among the remaining visible nodes a structural-containment (SC)
//! forest records which node's role subsumes which.
//!
//! The result is an immutable [`CompressedGraph`] over the local indices of
//! one [`GraphIndex`]; it can be written back to a store and reloaded.

mod builder;
mod persist;

pub use builder::AdaptedGraphBuilder;

use std::sync::Arc;

use dashmap::DashMap;
use hypermatch_common::{GraphIndex, Label, NodeIdx};

/// Compression snapshot of one labeled target graph.
#[derive(Clone, Debug)]
pub struct CompressedGraph {
    membership: Label,
    hidden: Vec<bool>,
    clique: Vec<bool>,
    sec: Vec<Vec<NodeIdx>>,
    sc_children: Vec<Vec<NodeIdx>>,
    /// Representative of every hidden node.
    owner: Vec<Option<NodeIdx>>,
    /// Memoized SC-descendant walks, shared between parallel readers.
    descendants: Arc<DashMap<NodeIdx, Arc<[NodeIdx]>>>,
}

impl CompressedGraph {
    /// A snapshot where every node is visible and nothing is grouped.
    #[must_use]
    pub fn identity(index: &GraphIndex) -> Self {
        let n = index.num_nodes();
        Self::from_parts(
            index.membership().clone(),
            vec![false; n],
            vec![false; n],
            vec![Vec::new(); n],
            vec![Vec::new(); n],
        )
    }

    fn from_parts(
        membership: Label,
        hidden: Vec<bool>,
        clique: Vec<bool>,
        sec: Vec<Vec<NodeIdx>>,
        sc_children: Vec<Vec<NodeIdx>>,
    ) -> Self {
        let mut owner = vec![None; hidden.len()];
        for (rep, members) in sec.iter().enumerate() {
            for &m in members {
                owner[m.as_usize()] = Some(NodeIdx::from(rep));
            }
        }
        Self {
            membership,
            hidden,
            clique,
            sec,
            sc_children,
            owner,
            descendants: Arc::new(DashMap::new()),
        }
    }

    /// Membership label of the compressed graph.
    #[must_use]
    pub const fn membership(&self) -> &Label {
        &self.membership
    }

    /// Number of nodes covered, hidden included.
    #[must_use]
    pub fn num_nodes(&self) -> usize {
        self.hidden.len()
    }

    /// Whether the node was merged into another node's SEC.
    #[must_use]
    pub fn is_hidden(&self, n: NodeIdx) -> bool {
        self.hidden[n.as_usize()]
    }

    /// Whether the node absorbed an adjacent twin.
    #[must_use]
    pub fn is_clique(&self, n: NodeIdx) -> bool {
        self.clique[n.as_usize()]
    }

    /// Hidden twins represented by `n`.
    #[must_use]
    pub fn sec(&self, n: NodeIdx) -> &[NodeIdx] {
        &self.sec[n.as_usize()]
    }

    /// The visible node standing for `n`; `n` itself unless hidden.
    #[must_use]
    pub fn representative(&self, n: NodeIdx) -> NodeIdx {
        self.owner[n.as_usize()].unwrap_or(n)
    }

    /// Every member of `n`'s twin class, representative first, `n` included.
    #[must_use]
    pub fn twin_class(&self, n: NodeIdx) -> Vec<NodeIdx> {
        let rep = self.representative(n);
        let mut class = Vec::with_capacity(self.sec(rep).len() + 1);
        class.push(rep);
        class.extend_from_slice(self.sec(rep));
        class
    }

    /// Direct SC children of `n`.
    #[must_use]
    pub fn sc_children(&self, n: NodeIdx) -> &[NodeIdx] {
        &self.sc_children[n.as_usize()]
    }

    /// Visible nodes, ascending.
    pub fn visible_nodes(&self) -> impl Iterator<Item = NodeIdx> + '_ {
        self.hidden
            .iter()
            .enumerate()
            .filter(|(_, h)| !**h)
            .map(|(i, _)| NodeIdx::from(i))
    }

    /// Number of hidden nodes.
    #[must_use]
    pub fn hidden_count(&self) -> usize {
        self.hidden.iter().filter(|h| **h).count()
    }

    /// Number of SC edges in the forest.
    #[must_use]
    pub fn sc_edge_count(&self) -> usize {
        self.sc_children.iter().map(Vec::len).sum()
    }

    /// Visible nodes reachable from `n` through SC edges, in ascending path
    /// length. Cached per node.
    pub fn sc_descendants(&self, n: NodeIdx) -> Arc<[NodeIdx]> {
        if let Some(hit) = self.descendants.get(&n) {
            return hit.clone();
        }
        self.descendants
            .entry(n)
            .or_insert_with(|| {
                GraphIndex::bounded_bfs(n, usize::MAX, |m| self.sc_children(m))
                    .into_iter()
                    .map(|(d, _)| d)
                    .filter(|&d| !self.is_hidden(d))
                    .collect()
            })
            .clone()
    }
}

impl PartialEq for CompressedGraph {
    fn eq(&self, other: &Self) -> bool {
        self.membership == other.membership
            && self.hidden == other.hidden
            && self.clique == other.clique
            && self.sec == other.sec
            && self.sc_children == other.sc_children
    }
}

impl Eq for CompressedGraph {}
