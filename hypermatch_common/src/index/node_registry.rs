use std::collections::{BTreeSet, HashMap};

use crate::ids::{NodeId, NodeIdx};
use crate::label::Label;
use crate::property::PropertyValue;

/// Dense node table of one labeled graph.
#[derive(Clone, Debug, Default)]
pub struct NodeRegistry {
    /// Store ids in store order; position is the `NodeIdx`
    node_ids: Vec<NodeId>,
    /// Maps store id back to the local index
    id_map: HashMap<NodeId, NodeIdx>,
    /// Labels of each node minus the membership label
    content_labels: Vec<BTreeSet<Label>>,
    /// Property map of each node
    properties: Vec<HashMap<String, PropertyValue>>,
    /// Content label -> nodes carrying it, ascending
    label_index: HashMap<Label, Vec<NodeIdx>>,
}

impl NodeRegistry {
    /// Registers a node and returns its local index.
    pub(crate) fn push(
        &mut self,
        id: NodeId,
        content_labels: BTreeSet<Label>,
        properties: HashMap<String, PropertyValue>,
    ) -> NodeIdx {
        let idx = NodeIdx::from(self.node_ids.len());
        for label in &content_labels {
            self.label_index.entry(label.clone()).or_default().push(idx);
        }
        self.node_ids.push(id);
        self.id_map.insert(id, idx);
        self.content_labels.push(content_labels);
        self.properties.push(properties);
        idx
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.node_ids.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.node_ids.is_empty()
    }

    #[must_use]
    pub fn node_id(&self, idx: NodeIdx) -> NodeId {
        self.node_ids[idx.as_usize()]
    }

    #[must_use]
    pub fn resolve(&self, id: NodeId) -> Option<NodeIdx> {
        self.id_map.get(&id).copied()
    }

    #[must_use]
    pub fn content_labels(&self, idx: NodeIdx) -> &BTreeSet<Label> {
        &self.content_labels[idx.as_usize()]
    }

    #[must_use]
    pub fn properties(&self, idx: NodeIdx) -> &HashMap<String, PropertyValue> {
        &self.properties[idx.as_usize()]
    }

    #[must_use]
    pub fn nodes_with_label(&self, label: &Label) -> &[NodeIdx] {
        self.label_index
            .get(label)
            .map_or(&[], std::vec::Vec::as_slice)
    }
}
