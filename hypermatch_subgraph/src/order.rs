//! Visiting order of the query nodes.
//!
//! Components are started from the query node with the smallest domain and
//! grown by a priority-driven pseudo-BFS keyed by
//! `|domain| * 2^-reduce_factor`. Under profile dominance a node's reduce
//! factor grows each time an already ordered node discovers it, so nodes
//! tied to several ordered neighbors come up sooner.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use hypermatch_common::{DomainPolicy, GraphIndex, NodeIdx};
use tracing::debug;

use crate::domain::CandidateDomains;

/// Every query node exactly once, in search order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchOrder {
    order: Vec<NodeIdx>,
    position: Vec<usize>,
}

#[derive(Clone, Copy, Debug)]
struct Entry {
    key: f64,
    seq: usize,
    node: NodeIdx,
    reduce: u32,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    // Reversed: BinaryHeap is a max-heap and we pop the smallest key first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .key
            .total_cmp(&self.key)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl MatchOrder {
    /// Plans the order for `query` given its candidate domains.
    #[must_use]
    pub fn plan(query: &GraphIndex, domains: &CandidateDomains, policy: DomainPolicy) -> Self {
        let n = query.num_nodes();
        let mut seeds: Vec<NodeIdx> = query.nodes().collect();
        seeds.sort_by_key(|&q| domains.size(q));

        let mut ordered = vec![false; n];
        let mut discovery: Vec<Option<usize>> = vec![None; n];
        let mut reduce = vec![0u32; n];
        let mut next_seq = 0;
        let mut order = Vec::with_capacity(n);

        let key = |q: NodeIdx, rf: u32| domains.size(q) as f64 * 0.5f64.powi(rf as i32);

        for seed in seeds {
            if ordered[seed.as_usize()] {
                continue;
            }
            let mut heap = BinaryHeap::new();
            discovery[seed.as_usize()] = Some(next_seq);
            heap.push(Entry {
                key: key(seed, 0),
                seq: next_seq,
                node: seed,
                reduce: 0,
            });
            next_seq += 1;

            while let Some(entry) = heap.pop() {
                let node = entry.node;
                if ordered[node.as_usize()] || entry.reduce != reduce[node.as_usize()] {
                    continue;
                }
                ordered[node.as_usize()] = true;
                order.push(node);

                for &m in query.neighbors(node) {
                    let mi = m.as_usize();
                    if ordered[mi] {
                        continue;
                    }
                    let first_seen = discovery[mi].is_none();
                    if policy == DomainPolicy::ProfileDominance {
                        reduce[mi] += 1;
                    } else if !first_seen {
                        continue;
                    }
                    let seq = *discovery[mi].get_or_insert_with(|| {
                        next_seq += 1;
                        next_seq - 1
                    });
                    heap.push(Entry {
                        key: key(m, reduce[mi]),
                        seq,
                        node: m,
                        reduce: reduce[mi],
                    });
                }
            }
        }

        debug!("match order: {:?}", order);
        let mut position = vec![0; n];
        for (pos, q) in order.iter().enumerate() {
            position[q.as_usize()] = pos;
        }
        Self { order, position }
    }

    /// Query nodes in search order.
    #[must_use]
    pub fn as_slice(&self) -> &[NodeIdx] {
        &self.order
    }

    /// Number of positions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True for an empty query.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Query node at a position.
    #[must_use]
    pub fn at(&self, pos: usize) -> NodeIdx {
        self.order[pos]
    }

    /// Position of a query node.
    #[must_use]
    pub fn position_of(&self, q: NodeIdx) -> usize {
        self.position[q.as_usize()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::StoreFixture;

    fn order_names(f: &StoreFixture, policy: DomainPolicy) -> Vec<String> {
        let (q, t) = (f.index("Q"), f.index("T"));
        let domains = CandidateDomains::build(&q, &t, DomainPolicy::LabelUnion, None).unwrap();
        MatchOrder::plan(&q, &domains, policy)
            .as_slice()
            .iter()
            .map(|&n| f.name_of(q.node_id(n)).unwrap_or("?").to_owned())
            .collect()
    }

    #[test]
    fn smallest_domain_seeds_and_neighbors_follow() {
        // Domains: a=3, b=1, c=2. Path a-b-c.
        let f = StoreFixture::new()
            .graph("Q", &[("a", "A"), ("b", "B"), ("c", "C")], &[("a", "b"), ("b", "c")])
            .graph(
                "T",
                &[
                    ("a1", "A"),
                    ("a2", "A"),
                    ("a3", "A"),
                    ("b1", "B"),
                    ("c1", "C"),
                    ("c2", "C"),
                ],
                &[],
            );
        assert_eq!(order_names(&f, DomainPolicy::LabelUnion), vec!["b", "c", "a"]);
    }

    #[test]
    fn components_are_ordered_one_after_another() {
        let f = StoreFixture::new()
            .graph(
                "Q",
                &[("a", "A"), ("b", "B"), ("c", "C"), ("d", "D")],
                &[("a", "c"), ("b", "d")],
            )
            .graph(
                "T",
                &[
                    ("a1", "A"),
                    ("b1", "B"),
                    ("b2", "B"),
                    ("c1", "C"),
                    ("c2", "C"),
                    ("c3", "C"),
                    ("d1", "D"),
                    ("d2", "D"),
                    ("d3", "D"),
                    ("d4", "D"),
                ],
                &[],
            );
        assert_eq!(order_names(&f, DomainPolicy::LabelUnion), vec!["a", "c", "b", "d"]);
    }

    #[test]
    fn profile_policy_prefers_twice_discovered_nodes() {
        // Domains: h=1, x=2, w=3, y=4. After h, x comes first; x discovers
        // y a second time, halving its key again to 1 < w's 1.5.
        let f = StoreFixture::new()
            .graph(
                "Q",
                &[("h", "H"), ("x", "X"), ("y", "Y"), ("w", "W")],
                &[("h", "x"), ("h", "y"), ("h", "w"), ("x", "y")],
            )
            .graph(
                "T",
                &[
                    ("h1", "H"),
                    ("x1", "X"),
                    ("x2", "X"),
                    ("y1", "Y"),
                    ("y2", "Y"),
                    ("y3", "Y"),
                    ("y4", "Y"),
                    ("w1", "W"),
                    ("w2", "W"),
                    ("w3", "W"),
                ],
                &[],
            );
        assert_eq!(order_names(&f, DomainPolicy::LabelUnion), vec!["h", "x", "w", "y"]);
        assert_eq!(
            order_names(&f, DomainPolicy::ProfileDominance),
            vec!["h", "x", "y", "w"]
        );
    }
}
