//! Domain relation tables.
//!
//! For one query node the candidates are compared among themselves on the
//! target graph, looking only at neighbors whose content labels the query
//! node's own neighbors carry. Equivalent candidates collapse into a group
//! behind their first member; the survivors are linked by containment into
//! a dominance DAG.

use std::time::Instant;

use hypermatch_common::{GraphIndex, HashMap, HashSet, Label, NodeIdx};
use tracing::debug;

use crate::domain::CandidateDomains;
use crate::equivalence::{NeighborScope, containment, equivalence};

/// Relations among the candidates of one query node.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DomainRelations {
    active: Vec<NodeIdx>,
    groups: HashMap<NodeIdx, Vec<NodeIdx>>,
    dominates: HashMap<NodeIdx, Vec<NodeIdx>>,
    parents: HashMap<NodeIdx, usize>,
}

impl DomainRelations {
    /// Group leaders in domain order.
    #[must_use]
    pub fn active(&self) -> &[NodeIdx] {
        &self.active
    }

    /// Candidates folded into `leader`'s group.
    #[must_use]
    pub fn followers(&self, leader: NodeIdx) -> &[NodeIdx] {
        self.groups.get(&leader).map(Vec::as_slice).unwrap_or_default()
    }

    /// Active candidates that `n` dominates.
    #[must_use]
    pub fn dominated_by(&self, n: NodeIdx) -> &[NodeIdx] {
        self.dominates.get(&n).map(Vec::as_slice).unwrap_or_default()
    }

    /// Number of active candidates dominating `n`.
    #[must_use]
    pub fn parent_count(&self, n: NodeIdx) -> usize {
        self.parents.get(&n).copied().unwrap_or(0)
    }

    /// Active candidates ordered by parent count, roots first, stable.
    #[must_use]
    pub fn roots_first(&self) -> Vec<NodeIdx> {
        let mut ordered = self.active.clone();
        ordered.sort_by_key(|&n| self.parent_count(n));
        ordered
    }
}

/// One [`DomainRelations`] per query node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DomainRelationTable {
    relations: Vec<DomainRelations>,
}

impl DomainRelationTable {
    /// Builds the table for every query node's domain.
    #[must_use]
    pub fn build(query: &GraphIndex, target: &GraphIndex, domains: &CandidateDomains) -> Self {
        let start = Instant::now();
        let relations: Vec<DomainRelations> = query
            .nodes()
            .map(|q| {
                let relevant = relevant_labels(query, q);
                relate(target, domains.get(q), NeighborScope::Labels(&relevant))
            })
            .collect();
        debug!(
            "domain relations built in {:?}: {} of {} candidates active",
            start.elapsed(),
            relations.iter().map(|r| r.active.len()).sum::<usize>(),
            domains.total()
        );
        Self { relations }
    }

    /// Relations among the candidates of query node `q`.
    #[must_use]
    pub fn get(&self, q: NodeIdx) -> &DomainRelations {
        &self.relations[q.as_usize()]
    }
}

/// Content labels carried by the neighbors of `q`.
fn relevant_labels(query: &GraphIndex, q: NodeIdx) -> HashSet<Label> {
    query
        .neighbors(q)
        .iter()
        .flat_map(|&n| query.content_labels(n).iter().cloned())
        .collect()
}

fn relate(target: &GraphIndex, candidates: &[NodeIdx], scope: NeighborScope<'_>) -> DomainRelations {
    let mut rel = DomainRelations {
        active: candidates.to_vec(),
        ..DomainRelations::default()
    };

    let mut i = 0;
    while i < rel.active.len() {
        let leader = rel.active[i];
        let mut j = i + 1;
        while j < rel.active.len() {
            if equivalence(target, leader, rel.active[j], scope) {
                let follower = rel.active.remove(j);
                rel.groups.entry(leader).or_default().push(follower);
            } else {
                j += 1;
            }
        }
        i += 1;
    }

    for (i, &a) in rel.active.iter().enumerate() {
        for &b in &rel.active[i + 1..] {
            let edge = if containment(target, a, b, scope) {
                Some((a, b))
            } else if containment(target, b, a, scope) {
                Some((b, a))
            } else {
                None
            };
            if let Some((parent, child)) = edge {
                rel.dominates.entry(parent).or_default().push(child);
                *rel.parents.entry(child).or_default() += 1;
            }
        }
    }
    rel
}
