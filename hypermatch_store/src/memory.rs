use hypermatch_common::*;

/// One node of the in-memory store.
#[derive(Clone, Debug, Default)]
struct StoredNode {
    labels: BTreeSet<Label>,
    properties: HashMap<String, PropertyValue>,
    /// Incident edge ids, in creation order
    edges: Vec<usize>,
}

/// One edge of the in-memory store. Removed edges leave a tombstone so edge
/// ids stay stable.
#[derive(Clone, Debug)]
struct StoredEdge {
    a: NodeId,
    b: NodeId,
    rel: RelationType,
    live: bool,
}

impl StoredEdge {
    fn other(&self, node: NodeId) -> NodeId {
        if self.a == node { self.b } else { self.a }
    }
}

/// A labeled property multigraph held in memory.
///
/// Node ids are assigned densely in creation order.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    nodes: Vec<StoredNode>,
    edges: Vec<StoredEdge>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a node with the given labels and no properties.
    pub fn create_node<I, L>(&mut self, labels: I) -> NodeId
    where
        I: IntoIterator<Item = L>,
        L: Into<Label>,
    {
        let id = NodeId::new(self.nodes.len() as u64);
        self.nodes.push(StoredNode {
            labels: labels.into_iter().map(Into::into).collect(),
            ..StoredNode::default()
        });
        id
    }

    /// Adds a label to an existing node.
    ///
    /// # Errors
    /// Fails for unknown nodes.
    pub fn add_label(&mut self, node: NodeId, label: impl Into<Label>) -> Result<(), StoreError> {
        self.node_mut(node)?.labels.insert(label.into());
        Ok(())
    }

    /// Number of nodes ever created.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of live edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.iter().filter(|e| e.live).count()
    }

    /// Reads one property.
    ///
    /// # Errors
    /// Fails for unknown nodes.
    pub fn property(&self, node: NodeId, key: &str) -> Result<Option<&PropertyValue>, StoreError> {
        Ok(self.node(node)?.properties.get(key))
    }

    /// Every distinct label used in the store.
    #[must_use]
    pub fn all_labels(&self) -> BTreeSet<Label> {
        self.nodes
            .iter()
            .flat_map(|n| n.labels.iter().cloned())
            .collect()
    }

    fn node(&self, id: NodeId) -> Result<&StoredNode, StoreError> {
        self.nodes
            .get(id.raw() as usize)
            .ok_or(StoreError::UnknownNode(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut StoredNode, StoreError> {
        self.nodes
            .get_mut(id.raw() as usize)
            .ok_or(StoreError::UnknownNode(id))
    }
}

impl AdjacencyProvider for MemoryStore {
    fn find_nodes_by_label(&self, label: &Label) -> Result<Vec<NodeId>, StoreError> {
        Ok(self
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.labels.contains(label))
            .map(|(i, _)| NodeId::new(i as u64))
            .collect())
    }

    fn labels(&self, node: NodeId) -> Result<BTreeSet<Label>, StoreError> {
        Ok(self.node(node)?.labels.clone())
    }

    fn properties(&self, node: NodeId) -> Result<HashMap<String, PropertyValue>, StoreError> {
        Ok(self.node(node)?.properties.clone())
    }

    fn neighbors(&self, node: NodeId) -> Result<Vec<(NodeId, RelationType)>, StoreError> {
        Ok(self
            .node(node)?
            .edges
            .iter()
            .map(|&e| &self.edges[e])
            .filter(|e| e.live)
            .map(|e| (e.other(node), e.rel.clone()))
            .collect())
    }

    fn outgoing(&self, node: NodeId, rel: &RelationType) -> Result<Vec<NodeId>, StoreError> {
        Ok(self
            .node(node)?
            .edges
            .iter()
            .map(|&e| &self.edges[e])
            .filter(|e| e.live && e.a == node && &e.rel == rel)
            .map(|e| e.b)
            .collect())
    }
}

impl GraphWriter for MemoryStore {
    fn create_edge(&mut self, a: NodeId, b: NodeId, rel: RelationType) -> Result<(), StoreError> {
        self.node(a)?;
        self.node(b)?;
        let edge_id = self.edges.len();
        self.edges.push(StoredEdge {
            a,
            b,
            rel,
            live: true,
        });
        self.node_mut(a)?.edges.push(edge_id);
        if a != b {
            self.node_mut(b)?.edges.push(edge_id);
        }
        Ok(())
    }

    fn set_property(
        &mut self,
        node: NodeId,
        key: &str,
        value: PropertyValue,
    ) -> Result<(), StoreError> {
        self.node_mut(node)?.properties.insert(key.to_owned(), value);
        Ok(())
    }

    fn remove_property(&mut self, node: NodeId, key: &str) -> Result<bool, StoreError> {
        Ok(self.node_mut(node)?.properties.remove(key).is_some())
    }

    fn remove_edges(&mut self, node: NodeId, rel: &RelationType) -> Result<usize, StoreError> {
        let incident: Vec<usize> = self.node(node)?.edges.clone();
        let mut removed = 0;
        for e in incident {
            let edge = &mut self.edges[e];
            if edge.live && &edge.rel == rel {
                edge.live = false;
                removed += 1;
            }
        }
        if removed > 0 {
            tracing::trace!("removed {} {} edges at node {}", removed, rel, node);
        }
        Ok(removed)
    }
}
