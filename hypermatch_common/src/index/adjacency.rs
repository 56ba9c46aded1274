use std::collections::HashSet;

use crate::ids::NodeIdx;

/// Undirected, deduplicated adjacency of one labeled graph.
#[derive(Clone, Debug, Default)]
pub struct Adjacency {
    /// Sorted, deduplicated neighbor lists
    neighbors: Vec<Vec<NodeIdx>>,
    /// Precomputed neighbor sets for fast edge queries
    neighbor_sets: Vec<HashSet<NodeIdx>>,
}

impl Adjacency {
    /// Builds adjacency from raw (possibly repeated, possibly one-sided) edge
    /// lists. Parallel edges collapse and every edge is made symmetric.
    #[must_use]
    pub fn build(node_count: usize, raw_edges: impl IntoIterator<Item = (NodeIdx, NodeIdx)>) -> Self {
        let mut neighbors: Vec<Vec<NodeIdx>> = vec![Vec::new(); node_count];
        for (a, b) in raw_edges {
            if a == b {
                continue;
            }
            neighbors[a.as_usize()].push(b);
            neighbors[b.as_usize()].push(a);
        }
        for list in &mut neighbors {
            list.sort_unstable();
            list.dedup();
        }
        let neighbor_sets = Self::precompute_sets(&neighbors);

        Self {
            neighbors,
            neighbor_sets,
        }
    }

    fn precompute_sets(neighbors: &[Vec<NodeIdx>]) -> Vec<HashSet<NodeIdx>> {
        neighbors
            .iter()
            .map(|list| list.iter().copied().collect())
            .collect()
    }

    #[must_use]
    pub fn neighbors(&self, idx: NodeIdx) -> &[NodeIdx] {
        &self.neighbors[idx.as_usize()]
    }

    #[must_use]
    pub fn neighbor_set(&self, idx: NodeIdx) -> &HashSet<NodeIdx> {
        &self.neighbor_sets[idx.as_usize()]
    }

    #[must_use]
    pub fn degree(&self, idx: NodeIdx) -> usize {
        self.neighbors[idx.as_usize()].len()
    }

    #[must_use]
    pub fn has_edge(&self, a: NodeIdx, b: NodeIdx) -> bool {
        self.neighbor_sets[a.as_usize()].contains(&b)
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.neighbors.iter().map(Vec::len).sum::<usize>() / 2
    }
}
