//! Configuration for the subgraph matching search.
//!
//! This module exposes a minimal, stable surface for consumers (for example,
//! the `hypermatch_cli` crate) to parameterize how matching should behave.
//!
//! The main concepts are:
//! - domain_policy: how the initial candidate domain of each query node is
//!   computed (label union only, or label union filtered by profile counters).
//! - search_policy: what the backtracking search does around each committed
//!   solution (nothing, explode structural twins, or the boost strategy with
//!   domain relation tables and containment re-expansion).
//! - solution_cap: the soft bound on how many embeddings are enumerated.
//!
//! Quick examples
//!
//! Naive matching (label domains, plain backtracking), the default:
//! ```
//! use hypermatch_common::Config;
//! let cfg = Config::default();
//! assert_eq!(cfg.solution_cap, 1000);
//! ```
//!
//! GraphQL-style profile filtering with twin explosion and a smaller cap:
//! ```
//! use hypermatch_common::{Config, DomainPolicy, SearchPolicy};
//! let cfg = Config::builder()
//!     .profile_dominance()
//!     .explode_equivalents()
//!     .solution_cap(50)
//!     .build();
//! assert_eq!(cfg.domain_policy, DomainPolicy::ProfileDominance);
//! assert_eq!(cfg.search_policy, SearchPolicy::ExplodeEquivalents);
//! ```

use serde::{Deserialize, Serialize};

/// Default bound on the number of enumerated embeddings.
pub const DEFAULT_SOLUTION_CAP: usize = 1000;

/// Global search configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Maximum number of embeddings to enumerate before stopping.
    pub solution_cap: usize,
    /// How initial candidate domains are computed.
    pub domain_policy: DomainPolicy,
    /// How the search treats committed solutions.
    pub search_policy: SearchPolicy,
    /// Fail instead of warn when a target node carries more than one content label.
    pub strict_labels: bool,
    /// Allow data-parallel work where the search permits it.
    pub parallel: bool,
}

impl Config {
    /// Starts a builder seeded with the default configuration.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Whether this configuration needs a compressed target graph.
    pub const fn needs_compression(&self) -> bool {
        !matches!(self.search_policy, SearchPolicy::Plain)
    }
}

impl Default for Config {
    /// Default configuration mirrors the naive matcher:
    /// label-union domains, plain backtracking, cap of 1000.
    fn default() -> Self {
        Self {
            solution_cap: DEFAULT_SOLUTION_CAP,
            domain_policy: DomainPolicy::LabelUnion,
            search_policy: SearchPolicy::Plain,
            strict_labels: false,
            parallel: true,
        }
    }
}

/// Control how candidate domains are built.
///
/// - LabelUnion:
///     A target node is a candidate for a query node if it carries at least
///     one of the query node's content labels.
/// - ProfileDominance:
///     LabelUnion, additionally requiring every profile counter of the query
///     node to be dominated by the candidate's counter for the same label.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DomainPolicy {
    /// Candidates share at least one content label.
    LabelUnion,
    /// Label union filtered by profile counters.
    ProfileDominance,
}

/// Control what the search does around committed solutions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SearchPolicy {
    /// Plain depth-first backtracking.
    Plain,
    /// Expand each solution through the structurally equivalent classes
    /// of the compressed target graph.
    ExplodeEquivalents,
    /// Domain relation tables plus dynamic re-expansion along the
    /// structural containment forest.
    Boost,
}

/// Builder for [`Config`].
#[derive(Clone, Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Sets the solution cap.
    pub const fn solution_cap(mut self, cap: usize) -> Self {
        self.config.solution_cap = cap;
        self
    }

    /// Sets the domain policy.
    pub const fn domain_policy(mut self, policy: DomainPolicy) -> Self {
        self.config.domain_policy = policy;
        self
    }

    /// Label-union domains.
    pub const fn label_union(self) -> Self {
        self.domain_policy(DomainPolicy::LabelUnion)
    }

    /// Profile-dominance domains.
    pub const fn profile_dominance(self) -> Self {
        self.domain_policy(DomainPolicy::ProfileDominance)
    }

    /// Sets the search policy.
    pub const fn search_policy(mut self, policy: SearchPolicy) -> Self {
        self.config.search_policy = policy;
        self
    }

    /// Plain backtracking.
    pub const fn plain(self) -> Self {
        self.search_policy(SearchPolicy::Plain)
    }

    /// Equivalence-class explosion of every solution.
    pub const fn explode_equivalents(self) -> Self {
        self.search_policy(SearchPolicy::ExplodeEquivalents)
    }

    /// Boost search.
    pub const fn boost(self) -> Self {
        self.search_policy(SearchPolicy::Boost)
    }

    /// Fail on nodes carrying several content labels.
    pub const fn strict_labels(mut self, strict: bool) -> Self {
        self.config.strict_labels = strict;
        self
    }

    /// Enables or disables data-parallel work.
    pub const fn parallel(mut self, parallel: bool) -> Self {
        self.config.parallel = parallel;
        self
    }

    /// Finishes the builder.
    pub fn build(self) -> Config {
        self.config
    }
}
