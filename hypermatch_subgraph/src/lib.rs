//! Subgraph monomorphism search over labeled property graphs.
//!
//! A request matches the graph named by a query membership label against
//! the graph named by a target membership label:
//!
//! 1. both graphs are snapshotted into [`GraphIndex`]es,
//! 2. each query node gets a [`CandidateDomains`] entry,
//! 3. [`MatchOrder`] fixes the visiting order,
//! 4. the backtracking engine enumerates embeddings up to the solution cap.
//!
//! The explode and boost policies additionally rely on a [`CompressedGraph`]
//! of the target, built by [`build_adapted_graph`] and reusable across
//! requests; boost also builds a [`DomainRelationTable`] per request.

mod compress;
mod domain;
mod drt;
mod engine;
mod equivalence;
mod error;
mod order;

#[doc(hidden)]
pub mod test_support;

pub use compress::{AdaptedGraphBuilder, CompressedGraph};
pub use domain::CandidateDomains;
pub use drt::{DomainRelationTable, DomainRelations};
pub use engine::{CapReached, Embedding, MatchOutcome, NoSolutionReason, SolutionSet, search};
pub use equivalence::{NeighborScope, containment, equivalence};
pub use error::MatchError;
pub use order::MatchOrder;

use hypermatch_common::{AdjacencyProvider, Config, GraphIndex, Label};
use tracing::{info, warn};

/// Compresses the graph named `label` into a reusable snapshot.
///
/// # Errors
/// Store failures, or [`MatchError::MultipleContentLabels`] under strict
/// label checking.
pub fn build_adapted_graph<P>(provider: &P, label: &Label, config: &Config) -> Result<CompressedGraph, MatchError>
where
    P: AdjacencyProvider + ?Sized,
{
    let index = GraphIndex::build(provider, label)?;
    AdaptedGraphBuilder::new(&index, config).build()
}

/// Matches the graph named `query_label` against the graph named `target_label`.
///
/// When the search policy needs a compressed target and `compressed` is
/// absent (or belongs to another graph), one is built for this request.
///
/// # Errors
/// Store failures, invalid profile counters, or strict-label violations.
pub fn match_graphs<P>(
    provider: &P,
    query_label: &Label,
    target_label: &Label,
    config: &Config,
    compressed: Option<&CompressedGraph>,
) -> Result<MatchOutcome, MatchError>
where
    P: AdjacencyProvider + ?Sized,
{
    let query = GraphIndex::build(provider, query_label)?;
    let target = GraphIndex::build(provider, target_label)?;

    if !config.needs_compression() {
        return search(&query, &target, config, None);
    }

    let fits = |cg: &&CompressedGraph| cg.membership() == target_label && cg.num_nodes() == target.num_nodes();
    match compressed.filter(fits) {
        Some(cg) => search(&query, &target, config, Some(cg)),
        None => {
            if compressed.is_some() {
                warn!("supplied compression does not describe {}, rebuilding", target_label);
            } else {
                info!("no compression supplied for {}, building one", target_label);
            }
            let built = AdaptedGraphBuilder::new(&target, config).build()?;
            search(&query, &target, config, Some(&built))
        }
    }
}
