use std::collections::VecDeque;
use std::ops::ControlFlow;

use hypermatch_common::{GraphIndex, HashSet, NodeIdx};
use tracing::trace;

use super::explode::explode;
use super::solution::{CapReached, SolutionSet};
use super::state::State;
use super::{CandidateOutcome, SearchContext};
use crate::compress::CompressedGraph;
use crate::domain::CandidateDomains;
use crate::drt::DomainRelationTable;
use crate::equivalence::{NeighborScope, containment};

/// Policy hooks around the shared backtracking skeleton.
pub(crate) trait Strategy {
    /// Initial candidate list of every position, called once before searching.
    fn reduce_domains(&mut self, ctx: &SearchContext<'_>, domains: &CandidateDomains) -> Vec<Vec<NodeIdx>> {
        ctx.order
            .as_slice()
            .iter()
            .map(|&q| domains.get(q).to_vec())
            .collect()
    }

    /// Called after each candidate at `pos`; may feed more candidates to the position.
    fn release(
        &self,
        _ctx: &SearchContext<'_>,
        _state: &State,
        _pos: usize,
        _candidate: NodeIdx,
        _outcome: CandidateOutcome,
        _worklist: &mut VecDeque<NodeIdx>,
    ) {
    }

    /// Called after each committed solution, with the assignment still in place.
    fn expand(
        &self,
        _ctx: &SearchContext<'_>,
        _state: &State,
        _solutions: &mut SolutionSet,
    ) -> ControlFlow<CapReached> {
        ControlFlow::Continue(())
    }
}

/// Plain depth-first enumeration.
pub(crate) struct Plain;

impl Strategy for Plain {}

/// Searches representatives only and re-expands every solution over the
/// twin classes of its nodes.
pub(crate) struct Explode<'a> {
    compressed: &'a CompressedGraph,
}

impl<'a> Explode<'a> {
    pub(crate) const fn new(compressed: &'a CompressedGraph) -> Self {
        Self { compressed }
    }
}

impl Strategy for Explode<'_> {
    /// A representative taken by an earlier position hands the position to
    /// its hidden twins.
    fn release(
        &self,
        _ctx: &SearchContext<'_>,
        _state: &State,
        _pos: usize,
        candidate: NodeIdx,
        outcome: CandidateOutcome,
        worklist: &mut VecDeque<NodeIdx>,
    ) {
        if outcome == CandidateOutcome::Used {
            worklist.extend(self.compressed.sec(candidate));
        }
    }

    fn expand(
        &self,
        ctx: &SearchContext<'_>,
        state: &State,
        solutions: &mut SolutionSet,
    ) -> ControlFlow<CapReached> {
        explode(ctx, state, solutions, |_, v| self.compressed.twin_class(v))
    }
}

/// Searches DRT group leaders first, holds back candidates that sit below
/// another candidate in the SC forest until that ancestor has been tried, and
/// expands solutions over twins and group followers.
pub(crate) struct Boost<'a> {
    compressed: &'a CompressedGraph,
    drt: DomainRelationTable,
    /// Per position, candidates waiting for an SC ancestor.
    deferred: Vec<HashSet<NodeIdx>>,
}

impl<'a> Boost<'a> {
    pub(crate) fn new(
        query: &GraphIndex,
        target: &GraphIndex,
        domains: &CandidateDomains,
        compressed: &'a CompressedGraph,
    ) -> Self {
        Self {
            compressed,
            drt: DomainRelationTable::build(query, target, domains),
            deferred: Vec::new(),
        }
    }
}

impl Strategy for Boost<'_> {
    fn reduce_domains(&mut self, ctx: &SearchContext<'_>, _domains: &CandidateDomains) -> Vec<Vec<NodeIdx>> {
        let mut initial = Vec::with_capacity(ctx.order.len());
        self.deferred.clear();
        for &q in ctx.order.as_slice() {
            let active: Vec<NodeIdx> = self
                .drt
                .get(q)
                .roots_first()
                .into_iter()
                .filter(|&c| !self.compressed.is_hidden(c))
                .collect();
            let members: HashSet<NodeIdx> = active.iter().copied().collect();
            let mut held: HashSet<NodeIdx> = HashSet::new();
            // Held candidates hold nothing themselves; every chain of
            // holders ends at a candidate that is searched.
            for &c in &active {
                if held.contains(&c) {
                    continue;
                }
                held.extend(
                    self.compressed
                        .sc_descendants(c)
                        .iter()
                        .filter(|&&d| d != c && members.contains(&d)),
                );
            }
            trace!("{}: {} active, {} deferred", q, active.len(), held.len());
            initial.push(active.into_iter().filter(|c| !held.contains(c)).collect());
            self.deferred.push(held);
        }
        initial
    }

    /// Followers and SC descendants come after the candidate they hang off.
    /// After an inconsistent candidate only the ones that may still fit are
    /// released: anything already used, and descendants it does not contain.
    fn release(
        &self,
        ctx: &SearchContext<'_>,
        state: &State,
        pos: usize,
        candidate: NodeIdx,
        outcome: CandidateOutcome,
        worklist: &mut VecDeque<NodeIdx>,
    ) {
        let relations = self.drt.get(ctx.order.at(pos));
        let tried = outcome != CandidateOutcome::Inconsistent;

        if outcome == CandidateOutcome::Used {
            worklist.extend(self.compressed.sec(candidate));
        }
        worklist.extend(
            relations
                .followers(candidate)
                .iter()
                .filter(|&&f| tried || state.is_used(f)),
        );

        let held = &self.deferred[pos];
        for &d in self.compressed.sc_descendants(candidate).iter() {
            if !held.contains(&d) {
                continue;
            }
            if tried || state.is_used(d) || !containment(ctx.target, candidate, d, NeighborScope::All) {
                worklist.push_back(d);
            } else {
                worklist.extend(relations.followers(d).iter().filter(|&&f| state.is_used(f)));
            }
        }
    }

    fn expand(
        &self,
        ctx: &SearchContext<'_>,
        state: &State,
        solutions: &mut SolutionSet,
    ) -> ControlFlow<CapReached> {
        explode(ctx, state, solutions, |pos, v| {
            let relations = self.drt.get(ctx.order.at(pos));
            let mut alternatives = self.compressed.twin_class(v);
            for &f in relations.followers(v) {
                alternatives.extend(self.compressed.twin_class(f));
            }
            alternatives
        })
    }
}
