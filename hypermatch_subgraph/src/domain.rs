//! Candidate domains: which target nodes each query node may map to.

use std::time::Instant;

use hypermatch_common::{DomainPolicy, GraphIndex, HashSet, NodeIdx, PropertyValue, is_profile_key};
use tracing::debug;

use crate::compress::CompressedGraph;
use crate::error::MatchError;

/// Per query node, the ordered and duplicate-free list of target candidates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CandidateDomains {
    domains: Vec<Vec<NodeIdx>>,
}

impl CandidateDomains {
    /// Computes every query node's domain under `policy`.
    ///
    /// The base set is the union, over the query node's content labels, of
    /// the target nodes carrying that label. Profile dominance then keeps a
    /// candidate only if each of its `profile_*` counters is at least the
    /// query node's. Hidden nodes of `compressed` never become candidates.
    ///
    /// # Errors
    /// [`MatchError::InvalidProfile`] when a profile counter is not an integer.
    pub fn build(
        query: &GraphIndex,
        target: &GraphIndex,
        policy: DomainPolicy,
        compressed: Option<&CompressedGraph>,
    ) -> Result<Self, MatchError> {
        let start = Instant::now();
        let mut domains = Vec::with_capacity(query.num_nodes());
        for q in query.nodes() {
            let mut domain = label_union(query, target, q);
            if let Some(cg) = compressed {
                domain.retain(|&t| !cg.is_hidden(t));
            }
            if policy == DomainPolicy::ProfileDominance {
                let required = required_profile(query, q)?;
                let mut kept = Vec::with_capacity(domain.len());
                for t in domain {
                    if dominates(target, t, &required)? {
                        kept.push(t);
                    }
                }
                domain = kept;
            }
            debug!("domain of {} has {} candidates", query.node_id(q), domain.len());
            domains.push(domain);
        }
        debug!("{:?} domains built in {:?}", policy, start.elapsed());
        Ok(Self { domains })
    }

    /// Candidates of query node `q`.
    #[must_use]
    pub fn get(&self, q: NodeIdx) -> &[NodeIdx] {
        &self.domains[q.as_usize()]
    }

    /// Number of candidates of `q`.
    #[must_use]
    pub fn size(&self, q: NodeIdx) -> usize {
        self.domains[q.as_usize()].len()
    }

    /// First query node whose domain is empty.
    #[must_use]
    pub fn first_empty(&self) -> Option<NodeIdx> {
        self.domains
            .iter()
            .position(Vec::is_empty)
            .map(NodeIdx::from)
    }

    /// Sum of all domain sizes.
    #[must_use]
    pub fn total(&self) -> usize {
        self.domains.iter().map(Vec::len).sum()
    }
}

fn label_union(query: &GraphIndex, target: &GraphIndex, q: NodeIdx) -> Vec<NodeIdx> {
    let mut seen = HashSet::new();
    query
        .content_labels(q)
        .iter()
        .flat_map(|label| target.nodes_with_label(label).iter().copied())
        .filter(|t| seen.insert(*t))
        .collect()
}

fn profile_int(
    index: &GraphIndex,
    node: NodeIdx,
    key: &str,
    value: &PropertyValue,
) -> Result<i64, MatchError> {
    value.as_int().ok_or_else(|| MatchError::InvalidProfile {
        node: index.node_id(node),
        key: key.to_owned(),
        kind: value.kind(),
    })
}

/// Profile counters of `q`, sorted by key.
fn required_profile(query: &GraphIndex, q: NodeIdx) -> Result<Vec<(&str, i64)>, MatchError> {
    let mut required = Vec::new();
    for (key, value) in query.properties(q) {
        if is_profile_key(key) {
            required.push((key.as_str(), profile_int(query, q, key, value)?));
        }
    }
    required.sort_unstable();
    Ok(required)
}

fn dominates(target: &GraphIndex, t: NodeIdx, required: &[(&str, i64)]) -> Result<bool, MatchError> {
    for &(key, need) in required {
        let have = match target.property(t, key) {
            Some(value) => profile_int(target, t, key, value)?,
            None => 0,
        };
        if have < need {
            return Ok(false);
        }
    }
    Ok(true)
}
