//! Writing a compression snapshot back to the store and reading it again.

use hypermatch_common::{
    AdjacencyProvider, CLIQUE_PROPERTY, GraphIndex, GraphWriter, HIDDEN_PROPERTY, NodeIdx,
    PropertyValue, RelationType, SEC_PROPERTY,
};
use tracing::{debug, info};

use super::CompressedGraph;
use crate::error::MatchError;

impl CompressedGraph {
    /// Stores the flags, SEC lists and SC edges of every node of `index`.
    ///
    /// Existing SC edges at those nodes are removed first, so persisting a
    /// rebuilt snapshot never stacks two forests.
    ///
    /// # Errors
    /// Propagates store failures.
    pub fn persist<W>(&self, index: &GraphIndex, writer: &mut W) -> Result<(), MatchError>
    where
        W: GraphWriter + ?Sized,
    {
        let sc = RelationType::structural_containment();
        let mut cleared = 0;
        for n in index.nodes() {
            let id = index.node_id(n);
            cleared += writer.remove_edges(id, &sc)?;
            writer.set_property(id, HIDDEN_PROPERTY, PropertyValue::Bool(self.is_hidden(n)))?;
            writer.set_property(id, CLIQUE_PROPERTY, PropertyValue::Bool(self.is_clique(n)))?;
            if self.sec(n).is_empty() {
                writer.remove_property(id, SEC_PROPERTY)?;
            } else {
                let ids = self.sec(n).iter().map(|&m| index.node_id(m)).collect();
                writer.set_property(id, SEC_PROPERTY, PropertyValue::Ids(ids))?;
            }
        }
        if cleared > 0 {
            debug!("cleared {} stale SC edges", cleared);
        }

        for n in index.nodes() {
            for &child in self.sc_children(n) {
                writer.create_edge(index.node_id(n), index.node_id(child), sc.clone())?;
            }
        }
        info!(
            "persisted compression of {}: {} hidden, {} SC edges",
            self.membership,
            self.hidden_count(),
            self.sc_edge_count()
        );
        Ok(())
    }

    /// Reloads a persisted snapshot. `index` must have been built after the
    /// snapshot was persisted so it sees the stored flags.
    ///
    /// Nodes without stored flags come back visible and ungrouped.
    ///
    /// # Errors
    /// Propagates store failures.
    pub fn restore<P>(index: &GraphIndex, provider: &P) -> Result<Self, MatchError>
    where
        P: AdjacencyProvider + ?Sized,
    {
        let sc = RelationType::structural_containment();
        let flag = |n: NodeIdx, key: &str| {
            index
                .property(n, key)
                .and_then(PropertyValue::as_bool)
                .unwrap_or(false)
        };

        let mut hidden = Vec::with_capacity(index.num_nodes());
        let mut clique = Vec::with_capacity(index.num_nodes());
        let mut sec = Vec::with_capacity(index.num_nodes());
        let mut sc_children = Vec::with_capacity(index.num_nodes());
        for n in index.nodes() {
            hidden.push(flag(n, HIDDEN_PROPERTY));
            clique.push(flag(n, CLIQUE_PROPERTY));
            sec.push(
                index
                    .property(n, SEC_PROPERTY)
                    .and_then(PropertyValue::as_ids)
                    .map(|ids| ids.iter().filter_map(|&id| index.resolve(id)).collect())
                    .unwrap_or_default(),
            );
            sc_children.push(
                provider
                    .outgoing(index.node_id(n), &sc)?
                    .into_iter()
                    .filter_map(|id| index.resolve(id))
                    .collect(),
            );
        }

        let restored = Self::from_parts(index.membership().clone(), hidden, clique, sec, sc_children);
        info!(
            "restored compression of {}: {} hidden, {} SC edges",
            restored.membership,
            restored.hidden_count(),
            restored.sc_edge_count()
        );
        Ok(restored)
    }
}
