use std::cmp::Reverse;
use std::mem;
use std::time::Instant;

use hypermatch_common::{Config, GraphIndex, HashSet, Label, NodeIdx};
use tracing::{debug, info, warn};

use super::CompressedGraph;
use crate::equivalence::{NeighborScope, containment, equivalence};
use crate::error::MatchError;

/// Single pass over a target graph producing its [`CompressedGraph`].
pub struct AdaptedGraphBuilder<'a> {
    index: &'a GraphIndex,
    config: &'a Config,
    hidden: Vec<bool>,
    clique: Vec<bool>,
    sec: Vec<Vec<NodeIdx>>,
    sc_children: Vec<Vec<NodeIdx>>,
    /// Unordered pairs already joined by an SC edge.
    sc_linked: HashSet<(NodeIdx, NodeIdx)>,
}

impl<'a> AdaptedGraphBuilder<'a> {
    /// Prepares a builder over `index`.
    #[must_use]
    pub fn new(index: &'a GraphIndex, config: &'a Config) -> Self {
        let n = index.num_nodes();
        Self {
            index,
            config,
            hidden: vec![false; n],
            clique: vec![false; n],
            sec: vec![Vec::new(); n],
            sc_children: vec![Vec::new(); n],
            sc_linked: HashSet::new(),
        }
    }

    /// Runs the compression pass.
    ///
    /// # Errors
    /// [`MatchError::MultipleContentLabels`] under strict label checking.
    pub fn build(mut self) -> Result<CompressedGraph, MatchError> {
        let start = Instant::now();
        info!(
            "compressing {} ({} nodes)",
            self.index.membership(),
            self.index.num_nodes()
        );

        for v in self.index.nodes() {
            if self.hidden[v.as_usize()] {
                continue;
            }
            let Some(label) = self.content_label(v)? else {
                continue;
            };
            self.compress_node(v, &label);
        }

        let compressed = CompressedGraph::from_parts(
            self.index.membership().clone(),
            self.hidden,
            self.clique,
            self.sec,
            self.sc_children,
        );
        info!(
            "compressed {}: {} hidden, {} SC edges",
            compressed.membership,
            compressed.hidden_count(),
            compressed.sc_edge_count()
        );
        debug!("compression finished in {:?}", start.elapsed());
        Ok(compressed)
    }

    fn content_label(&self, v: NodeIdx) -> Result<Option<Label>, MatchError> {
        let labels = self.index.content_labels(v);
        match labels.len() {
            0 => Ok(None),
            1 => Ok(labels.iter().next().cloned()),
            _ if self.config.strict_labels => Err(MatchError::MultipleContentLabels {
                node: self.index.node_id(v),
                labels: labels.iter().cloned().collect(),
            }),
            _ => {
                let first = labels.iter().next().cloned();
                warn!(
                    "node {} carries {} content labels, compressing as {:?}",
                    self.index.node_id(v),
                    labels.len(),
                    first
                );
                Ok(first)
            }
        }
    }

    fn compress_node(&mut self, v: NodeIdx, label: &Label) {
        let index = self.index;
        let mut sc_candidates = Vec::new();

        for &other in index.neighbors(v) {
            if self.is_peer(other, label) {
                if equivalence(index, v, other, NeighborScope::All) {
                    self.absorb(v, other);
                    self.clique[v.as_usize()] = true;
                } else if containment(index, v, other, NeighborScope::All) {
                    sc_candidates.push(other);
                }
            }
        }

        if !self.clique[v.as_usize()] {
            for other in index.two_hop_same_label(v, label) {
                if self.is_peer(other, label) {
                    if equivalence(index, v, other, NeighborScope::All) {
                        self.absorb(v, other);
                    } else if containment(index, v, other, NeighborScope::All) {
                        sc_candidates.push(other);
                    }
                }
            }
        }

        // A candidate absorbed later in this pass no longer needs an edge.
        sc_candidates.retain(|c| !self.hidden[c.as_usize()]);
        self.reduce(v, sc_candidates);
    }

    fn is_peer(&self, other: NodeIdx, label: &Label) -> bool {
        !self.hidden[other.as_usize()] && self.index.has_label(other, label)
    }

    /// Hides `twin` under `rep`, taking over whatever `twin` already represented.
    fn absorb(&mut self, rep: NodeIdx, twin: NodeIdx) {
        self.hidden[twin.as_usize()] = true;
        let inherited = mem::take(&mut self.sec[twin.as_usize()]);
        let slot = &mut self.sec[rep.as_usize()];
        slot.push(twin);
        slot.extend(inherited);

        for child in mem::take(&mut self.sc_children[twin.as_usize()]) {
            if child != rep && !self.linked(rep, child) {
                self.link(rep, child);
            }
        }
    }

    /// Greedy local transitive reduction of `v`'s containment candidates.
    fn reduce(&mut self, v: NodeIdx, mut candidates: Vec<NodeIdx>) {
        let index = self.index;
        candidates.sort_by_key(|n| Reverse(index.degree(*n)));

        let mut tails: Vec<NodeIdx> = Vec::new();
        for n in candidates {
            let accepting = tails
                .iter()
                .position(|&p| !self.linked(p, n) && containment(index, p, n, NeighborScope::All));
            match accepting {
                Some(pos) => {
                    let p = tails.remove(pos);
                    self.link(p, n);
                    tails.push(n);
                }
                None => {
                    if !self.linked(v, n) {
                        self.link(v, n);
                    }
                    tails.push(n);
                }
            }
        }
    }

    fn linked(&self, a: NodeIdx, b: NodeIdx) -> bool {
        self.sc_linked.contains(&(a.min(b), a.max(b)))
    }

    fn link(&mut self, parent: NodeIdx, child: NodeIdx) {
        self.sc_children[parent.as_usize()].push(child);
        self.sc_linked.insert((parent.min(child), parent.max(child)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{GraphFixture, fixture, setup_test_logging};

    fn compress(f: &GraphFixture) -> CompressedGraph {
        setup_test_logging();
        let config = Config::default();
        AdaptedGraphBuilder::new(&f.index, &config).build().unwrap()
    }

    #[test]
    fn adjacent_twins_collapse() {
        let f = fixture(
            &[("x", "A"), ("y", "A"), ("z", "B")],
            &[("x", "y"), ("x", "z"), ("y", "z")],
        );
        let cg = compress(&f);
        assert!(!cg.is_hidden(f.idx("x")));
        assert!(cg.is_hidden(f.idx("y")));
        assert_eq!(cg.sec(f.idx("x")), &[f.idx("y")]);
        assert!(cg.is_clique(f.idx("x")));
    }

    #[test]
    fn distant_twins_collapse_without_clique() {
        // Two leaves of a star are twins two hops apart.
        let f = fixture(
            &[("c", "B"), ("l1", "A"), ("l2", "A"), ("l3", "A")],
            &[("c", "l1"), ("c", "l2"), ("c", "l3")],
        );
        let cg = compress(&f);
        assert_eq!(cg.sec(f.idx("l1")), &[f.idx("l2"), f.idx("l3")]);
        assert!(!cg.is_clique(f.idx("l1")));
        assert_eq!(cg.visible_nodes().count(), 2);
    }

    #[test]
    fn containment_builds_chain() {
        // hub sees everything, mid sees a subset, leaf sees less.
        let f = fixture(
            &[
                ("hub", "A"),
                ("mid", "A"),
                ("leaf", "A"),
                ("p", "P"),
                ("q", "Q"),
                ("r", "R"),
            ],
            &[
                ("hub", "p"),
                ("hub", "q"),
                ("hub", "r"),
                ("mid", "p"),
                ("mid", "q"),
                ("leaf", "p"),
            ],
        );
        let cg = compress(&f);
        let (hub, mid, leaf) = (f.idx("hub"), f.idx("mid"), f.idx("leaf"));
        assert_eq!(cg.sc_children(hub), &[mid]);
        assert_eq!(cg.sc_children(mid), &[leaf]);
        assert_eq!(&*cg.sc_descendants(hub), &[mid, leaf]);
        assert_eq!(cg.hidden_count(), 0);
    }

    #[test]
    fn unlabeled_nodes_are_skipped() {
        let f = fixture(&[("a", ""), ("b", "")], &[]);
        let cg = compress(&f);
        assert_eq!(cg.hidden_count(), 0);
    }

    #[test]
    fn strict_labels_reject_multi_label_nodes() {
        let f = fixture(&[("a", "A B")], &[]);
        let config = Config::builder().strict_labels(true).build();
        let err = AdaptedGraphBuilder::new(&f.index, &config).build().unwrap_err();
        match err {
            MatchError::MultipleContentLabels { node, labels } => {
                assert_eq!(node, f.fixture.id("T", "a"));
                assert_eq!(labels.len(), 2);
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn lenient_labels_use_first() {
        let f = fixture(
            &[("a", "B A"), ("b", "A"), ("z", "Z")],
            &[("a", "z"), ("b", "z")],
        );
        let cg = compress(&f);
        assert_eq!(cg.sec(f.idx("a")), &[f.idx("b")]);
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use crate::test_support::random_fixture;
    use quickcheck::quickcheck;

    quickcheck! {
        fn prop_sec_members_are_hidden_twins(edges: Vec<(u8, u8)>) -> bool {
            let f = random_fixture(8, &edges);
            let config = Config::default();
            let Ok(cg) = AdaptedGraphBuilder::new(&f.index, &config).build() else {
                return false;
            };
            let ok = cg.visible_nodes().all(|v| {
                cg.sec(v).iter().all(|&m| {
                    cg.is_hidden(m) && equivalence(&f.index, v, m, NeighborScope::All)
                })
            });
            ok
        }

        fn prop_every_hidden_node_has_one_owner(edges: Vec<(u8, u8)>) -> bool {
            let f = random_fixture(8, &edges);
            let config = Config::default();
            let Ok(cg) = AdaptedGraphBuilder::new(&f.index, &config).build() else {
                return false;
            };
            let ok = f.index.nodes().filter(|&n| cg.is_hidden(n)).all(|h| {
                cg.visible_nodes().filter(|&v| cg.sec(v).contains(&h)).count() == 1
            });
            ok
        }
    }
}
