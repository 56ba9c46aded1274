//! Structural containment and equivalence between two nodes of one graph.
//!
//! `containment(u, v)` holds when `N(v) \ {u} ⊆ N(u) \ {v}`: every role `v`
//! plays is also played by `u`. Equivalence is containment both ways, i.e. the
//! two nodes are twins apart from a possible edge between them.
//!
//! Both tests first compare the sizes of the two adjusted neighborhoods, so
//! the short-circuit never depends on argument order.

use hypermatch_common::{GraphIndex, HashSet, Label, NodeIdx};

/// Which neighbors take part in a comparison.
#[derive(Clone, Copy, Debug)]
pub enum NeighborScope<'a> {
    /// Every neighbor.
    All,
    /// Only neighbors carrying at least one of these content labels.
    Labels(&'a HashSet<Label>),
}

impl NeighborScope<'_> {
    fn admits(&self, index: &GraphIndex, n: NodeIdx) -> bool {
        match self {
            NeighborScope::All => true,
            NeighborScope::Labels(labels) => index.has_any_label(n, labels),
        }
    }
}

/// Size of `N(node) \ {other}` within `scope`.
fn adjusted_size(index: &GraphIndex, node: NodeIdx, other: NodeIdx, scope: NeighborScope<'_>) -> usize {
    let size = match scope {
        NeighborScope::All => index.degree(node),
        NeighborScope::Labels(_) => index
            .neighbors(node)
            .iter()
            .filter(|&&n| scope.admits(index, n))
            .count(),
    };
    if index.has_edge(node, other) && scope.admits(index, other) {
        size - 1
    } else {
        size
    }
}

/// True iff every in-scope neighbor of `v` other than `u` is also a neighbor of `u`.
pub fn containment(index: &GraphIndex, u: NodeIdx, v: NodeIdx, scope: NeighborScope<'_>) -> bool {
    if u == v {
        return true;
    }
    if adjusted_size(index, v, u, scope) > adjusted_size(index, u, v, scope) {
        return false;
    }
    subset_holds(index, u, v, scope)
}

/// True iff `u` and `v` have the same in-scope neighborhoods apart from each other.
pub fn equivalence(index: &GraphIndex, u: NodeIdx, v: NodeIdx, scope: NeighborScope<'_>) -> bool {
    if u == v {
        return true;
    }
    if adjusted_size(index, v, u, scope) != adjusted_size(index, u, v, scope) {
        return false;
    }
    // Equal sizes: one inclusion implies equality.
    subset_holds(index, u, v, scope)
}

fn subset_holds(index: &GraphIndex, u: NodeIdx, v: NodeIdx, scope: NeighborScope<'_>) -> bool {
    let u_set = index.neighbor_set(u);
    index
        .neighbors(v)
        .iter()
        .filter(|&&n| n != u && scope.admits(index, n))
        .all(|n| u_set.contains(n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{GraphFixture, fixture};

    /// x, y twins joined to each other and to z; w hangs off z.
    fn twins() -> GraphFixture {
        fixture(
            &[("x", "A"), ("y", "A"), ("z", "B"), ("w", "C")],
            &[("x", "y"), ("x", "z"), ("y", "z"), ("z", "w")],
        )
    }

    #[test]
    fn adjacent_twins_are_equivalent() {
        let f = twins();
        assert!(equivalence(&f.index, f.idx("x"), f.idx("y"), NeighborScope::All));
        assert!(equivalence(&f.index, f.idx("y"), f.idx("x"), NeighborScope::All));
    }

    #[test]
    fn containment_respects_roles() {
        let f = twins();
        // N(w) \ {z} = {} is inside everything, N(z) \ {w} = {x, y} is not inside N(w).
        assert!(containment(&f.index, f.idx("z"), f.idx("w"), NeighborScope::All));
        assert!(!containment(&f.index, f.idx("w"), f.idx("z"), NeighborScope::All));
        assert!(!equivalence(&f.index, f.idx("z"), f.idx("w"), NeighborScope::All));
    }

    #[test]
    fn label_scope_ignores_other_neighbors() {
        let f = fixture(
            &[("a", "A"), ("b", "A"), ("p", "P"), ("q", "Q")],
            &[("a", "p"), ("b", "p"), ("a", "q")],
        );
        let only_p: HashSet<Label> = HashSet::from([Label::new("P")]);
        assert!(!equivalence(&f.index, f.idx("a"), f.idx("b"), NeighborScope::All));
        assert!(equivalence(
            &f.index,
            f.idx("a"),
            f.idx("b"),
            NeighborScope::Labels(&only_p)
        ));
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use crate::test_support::random_fixture;
    use quickcheck::quickcheck;

    quickcheck! {
        fn prop_equivalence_is_symmetric(edges: Vec<(u8, u8)>) -> bool {
            let f = random_fixture(8, &edges);
            f.index.nodes().all(|u| {
                f.index.nodes().all(|v| {
                    equivalence(&f.index, u, v, NeighborScope::All)
                        == equivalence(&f.index, v, u, NeighborScope::All)
                })
            })
        }

        fn prop_containment_matches_definition(edges: Vec<(u8, u8)>) -> bool {
            let f = random_fixture(8, &edges);
            f.index.nodes().all(|u| {
                f.index.nodes().filter(|&v| v != u).all(|v| {
                    let expected = f.index.neighbors(v).iter().filter(|&&n| n != u)
                        .all(|n| *n != v && f.index.has_edge(u, *n));
                    containment(&f.index, u, v, NeighborScope::All) == expected
                })
            })
        }

        fn prop_equivalence_is_mutual_containment(edges: Vec<(u8, u8)>) -> bool {
            let f = random_fixture(8, &edges);
            f.index.nodes().all(|u| {
                f.index.nodes().all(|v| {
                    equivalence(&f.index, u, v, NeighborScope::All)
                        == (containment(&f.index, u, v, NeighborScope::All)
                            && containment(&f.index, v, u, NeighborScope::All))
                })
            })
        }
    }
}
