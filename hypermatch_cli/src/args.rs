use std::path::PathBuf;

use clap::Parser;
use hypermatch_common::*;

/// Hypermatch - subgraph matching over labeled graphs
#[derive(Parser, Debug)]
#[command(name = "hypermatch")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// iGraph files to load; each `t # <id>` block becomes graph `<stem>_<id>`
    #[arg(short = 'f', long = "graph", required = true, num_args = 1..)]
    pub graph_paths: Vec<PathBuf>,

    /// Stop after this many embeddings
    #[arg(short = 'c', long, default_value_t = DEFAULT_SOLUTION_CAP)]
    pub cap: usize,

    /// Domain policy used when a search command does not name one
    #[arg(long, value_enum, default_value = "naive")]
    pub domain: DomainArg,

    /// Search policy used when a search command does not name one
    #[arg(long, value_enum, default_value = "plain")]
    pub policy: PolicyArg,

    /// Reject target nodes carrying several content labels
    #[arg(long, default_value_t = false)]
    pub strict_labels: bool,

    /// Enable parallel execution
    #[arg(short = 'p', long, default_value_t = true)]
    pub parallel: bool,

    /// Print results as JSON lines
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Write built compressions back into the store
    #[arg(long, default_value_t = false)]
    pub persist: bool,

    /// Commands to run instead of reading standard input
    #[arg(short = 'e', long = "execute")]
    pub commands: Vec<String>,
}

impl Args {
    /// Convert command-line arguments into internal configuration
    pub fn to_config(&self) -> Config {
        Config::builder()
            .solution_cap(self.cap)
            .domain_policy(self.domain.into())
            .search_policy(self.policy.into())
            .strict_labels(self.strict_labels)
            .parallel(self.parallel)
            .build()
    }
}

/// Command-line wrapper for DomainPolicy
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum DomainArg {
    /// Label-union domains
    #[value(name = "naive")]
    Naive,
    /// Label union filtered by profile counters
    #[value(name = "graphql")]
    GraphQl,
}

impl From<DomainArg> for DomainPolicy {
    fn from(arg: DomainArg) -> Self {
        match arg {
            DomainArg::Naive => DomainPolicy::LabelUnion,
            DomainArg::GraphQl => DomainPolicy::ProfileDominance,
        }
    }
}

/// Command-line wrapper for SearchPolicy
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum PolicyArg {
    /// Plain backtracking
    #[value(name = "plain")]
    Plain,
    /// Explode solutions over structurally equivalent twins
    #[value(name = "sh")]
    Sh,
    /// Domain relation tables with containment re-expansion
    #[value(name = "boost")]
    Boost,
}

impl From<PolicyArg> for SearchPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Plain => SearchPolicy::Plain,
            PolicyArg::Sh => SearchPolicy::ExplodeEquivalents,
            PolicyArg::Boost => SearchPolicy::Boost,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_map_onto_config() {
        let args = Args::try_parse_from([
            "hypermatch", "-f", "a.igraph", "-c", "7", "--domain", "graphql", "--policy", "boost",
            "--strict-labels",
        ])
        .unwrap();
        let config = args.to_config();
        assert_eq!(config.solution_cap, 7);
        assert_eq!(config.domain_policy, DomainPolicy::ProfileDominance);
        assert_eq!(config.search_policy, SearchPolicy::Boost);
        assert!(config.strict_labels);
    }

    #[test]
    fn defaults_are_naive() {
        let args = Args::try_parse_from(["hypermatch", "-f", "a.igraph"]).unwrap();
        assert_eq!(args.to_config(), Config::default());
        assert!(args.commands.is_empty());
    }

    #[test]
    fn graph_file_is_required() {
        assert!(Args::try_parse_from(["hypermatch"]).is_err());
    }
}
