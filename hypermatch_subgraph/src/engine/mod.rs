//! Bounded backtracking search over a planned order.
//!
//! One recursive skeleton serves every [`SearchPolicy`]; a [`Strategy`]
//! supplies the policy-specific hooks (initial domains, worklist release
//! after each candidate, expansion after each committed solution).

mod explode;
mod solution;
mod state;
mod strategy;

pub use solution::{CapReached, Embedding, SolutionSet};

use std::collections::VecDeque;
use std::ops::ControlFlow;
use std::time::Instant;

use hypermatch_common::{Config, GraphIndex, HashSet, NodeId, NodeIdx, SearchPolicy};
use tracing::{debug, info, trace};

use crate::compress::CompressedGraph;
use crate::domain::CandidateDomains;
use crate::error::MatchError;
use crate::order::MatchOrder;
use state::State;
use strategy::{Boost, Explode, Plain, Strategy};

/// Why a request produced nothing without searching.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoSolutionReason {
    /// The query graph has no nodes.
    EmptyQuery,
    /// A query node has no feasible candidate.
    EmptyDomain {
        /// The query node with the empty domain.
        query_node: NodeId,
    },
}

/// Result of a match request.
#[derive(Clone, Debug)]
pub enum MatchOutcome {
    /// The search ran; the set may be empty or cut at the cap.
    Solutions(SolutionSet),
    /// The search was skipped.
    NoSolutions(NoSolutionReason),
}

impl MatchOutcome {
    /// Found embeddings, empty when the search was skipped.
    #[must_use]
    pub fn embeddings(&self) -> &[Embedding] {
        match self {
            Self::Solutions(set) => set.embeddings(),
            Self::NoSolutions(_) => &[],
        }
    }

    /// Number of found embeddings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.embeddings().len()
    }

    /// True when nothing was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.embeddings().is_empty()
    }

    /// Whether the solution cap cut the search short.
    #[must_use]
    pub fn cap_reached(&self) -> bool {
        matches!(self, Self::Solutions(set) if set.cap_reached())
    }
}

/// Read-only inputs shared by the skeleton and the strategies.
pub(crate) struct SearchContext<'a> {
    pub query: &'a GraphIndex,
    pub target: &'a GraphIndex,
    pub order: &'a MatchOrder,
    pub config: &'a Config,
    /// Per position, the earlier positions whose query nodes are adjacent to it.
    earlier_adjacent: Vec<Vec<usize>>,
}

impl<'a> SearchContext<'a> {
    fn new(query: &'a GraphIndex, target: &'a GraphIndex, order: &'a MatchOrder, config: &'a Config) -> Self {
        let earlier_adjacent = order
            .as_slice()
            .iter()
            .enumerate()
            .map(|(pos, &q)| {
                query
                    .neighbors(q)
                    .iter()
                    .map(|&n| order.position_of(n))
                    .filter(|&p| p < pos)
                    .collect()
            })
            .collect();
        Self {
            query,
            target,
            order,
            config,
            earlier_adjacent,
        }
    }

    /// Every query edge between `pos` and an earlier position maps onto a
    /// target edge when `pos` takes `candidate`.
    fn consistent(&self, state: &State, pos: usize, candidate: NodeIdx) -> bool {
        self.earlier_adjacent[pos].iter().all(|&p| {
            state
                .mapped_to(self.order.at(p))
                .is_some_and(|t| self.target.has_edge(t, candidate))
        })
    }

    /// Whether a positional tuple maps every query edge onto a target edge.
    pub(crate) fn preserves_edges(&self, tuple: &[NodeIdx]) -> bool {
        self.earlier_adjacent.iter().enumerate().all(|(pos, earlier)| {
            earlier
                .iter()
                .all(|&p| self.target.has_edge(tuple[p], tuple[pos]))
        })
    }

    /// A positional tuple as store ids sorted by query node.
    pub(crate) fn embedding_of(&self, tuple: &[NodeIdx]) -> Embedding {
        let mut pairs: Embedding = tuple
            .iter()
            .enumerate()
            .map(|(pos, &t)| (self.query.node_id(self.order.at(pos)), self.target.node_id(t)))
            .collect();
        pairs.sort_unstable();
        pairs
    }
}

/// What happened to one candidate at one position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum CandidateOutcome {
    /// Already assigned to an earlier position.
    Used,
    /// Misses a required target edge.
    Inconsistent,
    /// Assigned, but nothing below it completed.
    Exhausted,
    /// At least one solution was committed below it.
    Found,
}

struct Search<'a, S> {
    ctx: SearchContext<'a>,
    strategy: S,
    domains: Vec<Vec<NodeIdx>>,
    solutions: SolutionSet,
}

impl<'a, S: Strategy> Search<'a, S> {
    fn new(ctx: SearchContext<'a>, mut strategy: S, domains: &CandidateDomains) -> Self {
        let domains = strategy.reduce_domains(&ctx, domains);
        let solutions = SolutionSet::new(ctx.config.solution_cap);
        Self {
            ctx,
            strategy,
            domains,
            solutions,
        }
    }

    fn run(mut self) -> SolutionSet {
        let mut state = State::new(self.ctx.query.num_nodes());
        match self.descend(0, &mut state) {
            ControlFlow::Break(CapReached) => trace!("stopped at the cap of {}", self.solutions.cap()),
            ControlFlow::Continue(found) => trace!("search space exhausted, found anything: {}", found),
        }
        self.solutions
    }

    /// Returns whether any solution was committed in this subtree.
    fn descend(&mut self, pos: usize, state: &mut State) -> ControlFlow<CapReached, bool> {
        if pos == self.ctx.order.len() {
            let embedding = state.to_embedding(self.ctx.query, self.ctx.target);
            trace!("solution {:?}", embedding);
            self.solutions.try_push(embedding)?;
            self.strategy.expand(&self.ctx, state, &mut self.solutions)?;
            return ControlFlow::Continue(true);
        }

        let q = self.ctx.order.at(pos);
        let mut worklist: VecDeque<NodeIdx> = self.domains[pos].iter().copied().collect();
        let mut tried: HashSet<NodeIdx> = HashSet::new();
        let mut found_any = false;

        while let Some(candidate) = worklist.pop_front() {
            if !tried.insert(candidate) {
                continue;
            }
            let outcome = if state.is_used(candidate) {
                CandidateOutcome::Used
            } else if !self.ctx.consistent(state, pos, candidate) {
                CandidateOutcome::Inconsistent
            } else {
                trace!("depth {}: {} -> {}", pos, q, candidate);
                let found = state.with_mapping(q, candidate, |s| self.descend(pos + 1, s))?;
                if found {
                    CandidateOutcome::Found
                } else {
                    CandidateOutcome::Exhausted
                }
            };
            found_any |= outcome == CandidateOutcome::Found;
            self.strategy
                .release(&self.ctx, state, pos, candidate, outcome, &mut worklist);
        }
        ControlFlow::Continue(found_any)
    }
}

/// Runs one match request on prepared indices.
///
/// `compressed` is required by the explode and boost policies; without it
/// they fall back to an identity compression, which makes them behave like
/// plain search.
///
/// # Errors
/// Domain construction failures, see [`CandidateDomains::build`].
pub fn search(
    query: &GraphIndex,
    target: &GraphIndex,
    config: &Config,
    compressed: Option<&CompressedGraph>,
) -> Result<MatchOutcome, MatchError> {
    let start = Instant::now();
    info!(
        "matching {} ({} nodes) against {} ({} nodes), {:?}/{:?}, cap {}",
        query.membership(),
        query.num_nodes(),
        target.membership(),
        target.num_nodes(),
        config.domain_policy,
        config.search_policy,
        config.solution_cap
    );

    if query.is_empty() {
        info!("query graph {} is empty", query.membership());
        return Ok(MatchOutcome::NoSolutions(NoSolutionReason::EmptyQuery));
    }

    let identity;
    let compressed = match (config.needs_compression(), compressed) {
        (false, _) => None,
        (true, Some(cg)) => Some(cg),
        (true, None) => {
            identity = CompressedGraph::identity(target);
            Some(&identity)
        }
    };

    let domains = CandidateDomains::build(query, target, config.domain_policy, compressed)?;
    if let Some(q) = domains.first_empty() {
        let query_node = query.node_id(q);
        info!("query node {} has no candidates", query_node);
        return Ok(MatchOutcome::NoSolutions(NoSolutionReason::EmptyDomain {
            query_node,
        }));
    }

    let order = MatchOrder::plan(query, &domains, config.domain_policy);
    let ctx = SearchContext::new(query, target, &order, config);
    let solutions = match (config.search_policy, compressed) {
        (SearchPolicy::ExplodeEquivalents, Some(cg)) => Search::new(ctx, Explode::new(cg), &domains).run(),
        (SearchPolicy::Boost, Some(cg)) => {
            let boost = Boost::new(query, target, &domains, cg);
            Search::new(ctx, boost, &domains).run()
        }
        _ => Search::new(ctx, Plain, &domains).run(),
    };

    info!(
        "found {} embeddings{} in {:?}",
        solutions.len(),
        if solutions.cap_reached() { " (cap reached)" } else { "" },
        start.elapsed()
    );
    debug!("{} candidates over {} positions", domains.total(), order.len());
    Ok(MatchOutcome::Solutions(solutions))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{StoreFixture, setup_test_logging};

    fn triangle_pair() -> StoreFixture {
        StoreFixture::new()
            .graph(
                "Q",
                &[("a", "A"), ("b", "B"), ("c", "C")],
                &[("a", "b"), ("b", "c"), ("c", "a")],
            )
            .graph(
                "T",
                &[("x", "A"), ("y", "B"), ("z", "C"), ("w", "C")],
                &[("x", "y"), ("y", "z"), ("z", "x"), ("y", "w")],
            )
    }

    #[test]
    fn triangle_has_one_embedding() {
        setup_test_logging();
        let f = triangle_pair();
        let (q, t) = (f.index("Q"), f.index("T"));
        let outcome = search(&q, &t, &Config::default(), None).unwrap();
        assert_eq!(outcome.len(), 1);
        let expected = vec![
            (f.id("Q", "a"), f.id("T", "x")),
            (f.id("Q", "b"), f.id("T", "y")),
            (f.id("Q", "c"), f.id("T", "z")),
        ];
        assert_eq!(outcome.embeddings()[0], expected);
        assert!(!outcome.cap_reached());
    }

    #[test]
    fn empty_query_is_reported() {
        let f = triangle_pair();
        let (q, t) = (f.index("Nothing"), f.index("T"));
        let outcome = search(&q, &t, &Config::default(), None).unwrap();
        assert!(matches!(outcome, MatchOutcome::NoSolutions(NoSolutionReason::EmptyQuery)));
    }

    #[test]
    fn edges_are_required_but_non_edges_are_free() {
        // Path query a-b maps into the triangle too (monomorphism).
        let f = StoreFixture::new()
            .graph("Q", &[("a", "A"), ("b", "A")], &[("a", "b")])
            .graph(
                "T",
                &[("x", "A"), ("y", "A"), ("z", "A")],
                &[("x", "y"), ("y", "z"), ("z", "x")],
            );
        let (q, t) = (f.index("Q"), f.index("T"));
        let outcome = search(&q, &t, &Config::default(), None).unwrap();
        assert_eq!(outcome.len(), 6);
    }

    #[test]
    fn cap_stops_search() {
        let f = StoreFixture::new()
            .graph("Q", &[("a", "A"), ("b", "A")], &[("a", "b")])
            .graph(
                "T",
                &[("x", "A"), ("y", "A"), ("z", "A")],
                &[("x", "y"), ("y", "z"), ("z", "x")],
            );
        let (q, t) = (f.index("Q"), f.index("T"));
        let config = Config::builder().solution_cap(4).build();
        let outcome = search(&q, &t, &config, None).unwrap();
        assert_eq!(outcome.len(), 4);
        assert!(outcome.cap_reached());
    }
}
