use hypermatch_common::{GraphIndex, HashSet, NodeIdx};

use super::solution::Embedding;

/// Partial assignment of query nodes to target nodes.
pub(crate) struct State {
    // Query node -> target node
    mapping: Vec<Option<NodeIdx>>,
    used: HashSet<NodeIdx>,
    mapped: usize,
}

impl State {
    pub(crate) fn new(query_nodes: usize) -> Self {
        Self {
            mapping: vec![None; query_nodes],
            used: HashSet::new(),
            mapped: 0,
        }
    }

    pub(crate) fn is_mapped(&self, q: NodeIdx) -> bool {
        self.mapping[q.as_usize()].is_some()
    }

    pub(crate) fn mapped_to(&self, q: NodeIdx) -> Option<NodeIdx> {
        self.mapping[q.as_usize()]
    }

    pub(crate) fn is_used(&self, t: NodeIdx) -> bool {
        self.used.contains(&t)
    }

    #[contracts::debug_requires(!self.is_mapped(q))]
    #[contracts::debug_requires(!self.is_used(t))]
    #[contracts::debug_ensures(self.is_mapped(q) && self.is_used(t))]
    pub(crate) fn map(&mut self, q: NodeIdx, t: NodeIdx) {
        self.mapping[q.as_usize()] = Some(t);
        self.used.insert(t);
        self.mapped += 1;
    }

    #[contracts::debug_requires(self.mapped_to(q) == Some(t))]
    #[contracts::debug_ensures(!self.is_mapped(q) && !self.is_used(t))]
    pub(crate) fn unmap(&mut self, q: NodeIdx, t: NodeIdx) {
        self.mapping[q.as_usize()] = None;
        self.used.remove(&t);
        self.mapped -= 1;
    }

    /// Runs `f` with `q -> t` assigned, restoring the state afterwards.
    pub(crate) fn with_mapping<R>(&mut self, q: NodeIdx, t: NodeIdx, f: impl FnOnce(&mut Self) -> R) -> R {
        self.map(q, t);
        let ret = f(self);
        self.unmap(q, t);
        ret
    }

    pub(crate) fn done(&self) -> bool {
        self.mapped == self.mapping.len()
    }

    /// The complete assignment as store ids.
    #[contracts::debug_requires(self.done())]
    #[contracts::debug_ensures(ret.len() == self.mapping.len())]
    pub(crate) fn to_embedding(&self, query: &GraphIndex, target: &GraphIndex) -> Embedding {
        let mut pairs: Embedding = self
            .mapping
            .iter()
            .enumerate()
            .filter_map(|(q, t)| t.map(|t| (query.node_id(NodeIdx::from(q)), target.node_id(t))))
            .collect();
        pairs.sort_unstable();
        pairs
    }
}
