//! Expansion of one committed solution into its interchangeable variants.

use std::ops::ControlFlow;

use hypermatch_common::{HashSet, NodeIdx};
use itertools::Itertools;
#[cfg(feature = "rayon")]
use rayon::prelude::*;
use tracing::trace;

use super::SearchContext;
use super::solution::{CapReached, SolutionSet};
use super::state::State;

/// Commits every variant of the complete assignment in `state` obtained by
/// swapping each position's node for one of its `alternatives`.
///
/// Per position the replacement set is the assigned node followed by those
/// alternatives carrying one of the query node's content labels. The
/// identity tuple is skipped, as are tuples that reuse a node or break a
/// query edge.
pub(crate) fn explode<F>(
    ctx: &SearchContext<'_>,
    state: &State,
    solutions: &mut SolutionSet,
    alternatives: F,
) -> ControlFlow<CapReached>
where
    F: Fn(usize, NodeIdx) -> Vec<NodeIdx> + Sync + Send,
{
    let assigned: Vec<NodeIdx> = ctx
        .order
        .as_slice()
        .iter()
        .filter_map(|&q| state.mapped_to(q))
        .collect();

    let sets = map_positions(assigned.len(), ctx.config.parallel, |pos| {
        let current = assigned[pos];
        let labels = ctx.query.content_labels(ctx.order.at(pos));
        let mut set = vec![current];
        for alt in alternatives(pos, current) {
            if !set.contains(&alt) && labels.iter().any(|l| ctx.target.has_label(alt, l)) {
                set.push(alt);
            }
        }
        set
    });
    if sets.iter().all(|s| s.len() == 1) {
        return ControlFlow::Continue(());
    }
    trace!(
        "exploding solution over {} variants",
        sets.iter().map(Vec::len).product::<usize>() - 1
    );

    for tuple in sets.into_iter().multi_cartesian_product() {
        if tuple == assigned {
            continue;
        }
        let mut distinct = HashSet::with_capacity(tuple.len());
        if !tuple.iter().all(|t| distinct.insert(*t)) {
            continue;
        }
        if !ctx.preserves_edges(&tuple) {
            continue;
        }
        solutions.try_push(ctx.embedding_of(&tuple))?;
    }
    ControlFlow::Continue(())
}

#[cfg(feature = "rayon")]
fn map_positions<F>(n: usize, parallel: bool, f: F) -> Vec<Vec<NodeIdx>>
where
    F: Fn(usize) -> Vec<NodeIdx> + Sync + Send,
{
    if parallel {
        (0..n).into_par_iter().map(f).collect()
    } else {
        (0..n).map(f).collect()
    }
}

#[cfg(not(feature = "rayon"))]
fn map_positions<F>(n: usize, _parallel: bool, f: F) -> Vec<Vec<NodeIdx>>
where
    F: Fn(usize) -> Vec<NodeIdx> + Sync + Send,
{
    (0..n).map(f).collect()
}
