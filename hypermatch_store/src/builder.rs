use hypermatch_common::*;

use crate::memory::MemoryStore;

/// Adds one labeled graph to a [`MemoryStore`], keeping every node's
/// `profile_<label>` counters equal to the number of distinct neighbors
/// carrying `<label>`. Self loops and repeated edges between the same pair
/// are stored but not counted. The membership label is not profiled.
pub struct GraphBuilder<'s> {
    store: &'s mut MemoryStore,
    membership: Label,
}

impl<'s> GraphBuilder<'s> {
    /// Starts adding nodes to the graph named `membership`.
    pub fn new(store: &'s mut MemoryStore, membership: impl Into<Label>) -> Self {
        Self {
            store,
            membership: membership.into(),
        }
    }

    /// The graph's membership label.
    #[must_use]
    pub const fn membership(&self) -> &Label {
        &self.membership
    }

    /// Adds a node carrying the membership label plus `content_labels`.
    pub fn add_node<I, L>(&mut self, content_labels: I) -> NodeId
    where
        I: IntoIterator<Item = L>,
        L: Into<Label>,
    {
        let labels = std::iter::once(self.membership.clone())
            .chain(content_labels.into_iter().map(Into::into));
        self.store.create_node(labels)
    }

    /// Adds an edge; a new neighbor pair bumps both endpoints' profile counters.
    ///
    /// # Errors
    /// Fails when either endpoint is unknown.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId, rel: &str) -> Result<(), StoreError> {
        let new_pair = a != b && !self.adjacent(a, b)?;
        self.store.create_edge(a, b, RelationType::new(rel))?;
        if new_pair {
            self.bump_profiles(b, a)?;
            self.bump_profiles(a, b)?;
        }
        Ok(())
    }

    /// Whether a non-containment edge already joins `a` and `b`.
    fn adjacent(&self, a: NodeId, b: NodeId) -> Result<bool, StoreError> {
        Ok(self
            .store
            .neighbors(a)?
            .iter()
            .any(|(other, rel)| *other == b && !rel.is_structural_containment()))
    }

    /// Increments `target`'s counter for every content label of `source`.
    fn bump_profiles(&mut self, target: NodeId, source: NodeId) -> Result<(), StoreError> {
        let labels = self.store.labels(source)?;
        for label in labels.iter().filter(|l| **l != self.membership) {
            let key = label.profile_key();
            let current = self
                .store
                .property(target, &key)?
                .and_then(PropertyValue::as_int)
                .unwrap_or(0);
            self.store
                .set_property(target, &key, PropertyValue::Int(current + 1))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_update_profiles_on_both_ends() {
        let mut store = MemoryStore::new();
        let mut g = GraphBuilder::new(&mut store, "G");
        let a = g.add_node(["A"]);
        let b1 = g.add_node(["B"]);
        let b2 = g.add_node(["B"]);
        g.add_edge(a, b1, "r").unwrap();
        g.add_edge(a, b2, "r").unwrap();

        assert_eq!(
            store.property(a, "profile_B").unwrap(),
            Some(&PropertyValue::Int(2))
        );
        assert_eq!(
            store.property(b1, "profile_A").unwrap(),
            Some(&PropertyValue::Int(1))
        );
        assert_eq!(store.property(a, "profile_G").unwrap(), None);
    }

    #[test]
    fn repeated_edges_and_loops_count_once() {
        let mut store = MemoryStore::new();
        let mut g = GraphBuilder::new(&mut store, "G");
        let a = g.add_node(["A"]);
        let b = g.add_node(["B"]);
        g.add_edge(a, b, "r").unwrap();
        g.add_edge(b, a, "s").unwrap();
        g.add_edge(a, a, "r").unwrap();

        assert_eq!(store.edge_count(), 3);
        assert_eq!(
            store.property(a, "profile_B").unwrap(),
            Some(&PropertyValue::Int(1))
        );
        assert_eq!(
            store.property(b, "profile_A").unwrap(),
            Some(&PropertyValue::Int(1))
        );
        assert_eq!(store.property(a, "profile_A").unwrap(), None);
    }
}
