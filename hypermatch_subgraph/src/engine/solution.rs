use std::ops::ControlFlow;

use hypermatch_common::{HashSet, NodeId};

/// One embedding: `(query node, target node)` pairs sorted by query node.
pub type Embedding = Vec<(NodeId, NodeId)>;

/// Signals that the solution cap was hit and the search must stop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CapReached;

/// Capped, append-only accumulator of distinct embeddings.
#[derive(Clone, Debug)]
pub struct SolutionSet {
    cap: usize,
    embeddings: Vec<Embedding>,
    seen: HashSet<Embedding>,
    cap_reached: bool,
}

impl SolutionSet {
    /// An empty set holding at most `cap` embeddings.
    #[must_use]
    pub fn new(cap: usize) -> Self {
        Self {
            cap,
            embeddings: Vec::new(),
            seen: HashSet::new(),
            cap_reached: false,
        }
    }

    /// Appends an embedding unless it is already present.
    ///
    /// Breaks once the set is full, including when this push filled it.
    #[contracts::debug_ensures(self.embeddings.len() <= self.cap)]
    #[contracts::debug_ensures(ret.is_break() == self.cap_reached)]
    pub fn try_push(&mut self, embedding: Embedding) -> ControlFlow<CapReached> {
        if self.embeddings.len() >= self.cap {
            self.cap_reached = true;
            return ControlFlow::Break(CapReached);
        }
        if self.seen.insert(embedding.clone()) {
            self.embeddings.push(embedding);
        }
        if self.embeddings.len() >= self.cap {
            self.cap_reached = true;
            ControlFlow::Break(CapReached)
        } else {
            ControlFlow::Continue(())
        }
    }

    /// The configured cap.
    #[must_use]
    pub const fn cap(&self) -> usize {
        self.cap
    }

    /// Whether the search stopped at the cap; the set may be incomplete.
    #[must_use]
    pub const fn cap_reached(&self) -> bool {
        self.cap_reached
    }

    /// Number of embeddings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.embeddings.len()
    }

    /// True when nothing was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.embeddings.is_empty()
    }

    /// Embeddings in discovery order.
    #[must_use]
    pub fn embeddings(&self) -> &[Embedding] {
        &self.embeddings
    }

    /// Iterates the embeddings in discovery order.
    pub fn iter(&self) -> std::slice::Iter<'_, Embedding> {
        self.embeddings.iter()
    }

    /// Takes the embeddings out.
    #[must_use]
    pub fn into_embeddings(self) -> Vec<Embedding> {
        self.embeddings
    }
}

impl<'a> IntoIterator for &'a SolutionSet {
    type Item = &'a Embedding;
    type IntoIter = std::slice::Iter<'a, Embedding>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
