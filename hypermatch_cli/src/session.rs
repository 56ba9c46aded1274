//! The interactive command loop.
//!
//! ```text
//! build <graph>
//! search <naive|graphql> <query> <target> [plain|sh|boost]
//! exit
//! ```

use std::io::{BufRead, Write};

use clap::ValueEnum;
use hypermatch_common::*;
use hypermatch_store::MemoryStore;
use hypermatch_subgraph::{AdaptedGraphBuilder, CompressedGraph, MatchError, MatchOutcome, match_graphs};
use thiserror::Error;
use tracing::{error, info};

use crate::args::{DomainArg, PolicyArg};

/// Failures of a single command; the loop reports them and carries on.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The first word is not a command.
    #[error("unknown command '{0}'")]
    Unknown(String),
    /// Wrong arity or an unknown policy name.
    #[error("usage: {0}")]
    Usage(&'static str),
    /// No node carries the membership label.
    #[error("no graph named {0}")]
    UnknownGraph(Label),
    /// Compression or search failed.
    #[error(transparent)]
    Match(#[from] MatchError),
    /// The store rejected a read or a persisted write.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// Writing to the output failed; this one ends the loop.
    #[error(transparent)]
    Output(#[from] std::io::Error),
    /// A JSON record could not be serialized.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

const BUILD_USAGE: &str = "build <graph>";
const SEARCH_USAGE: &str = "search <naive|graphql> <query> <target> [plain|sh|boost]";

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Compress a target graph and keep it for later searches.
    Build(Label),
    /// Match `query` against `target`.
    Search {
        domain: DomainPolicy,
        query: Label,
        target: Label,
        policy: Option<SearchPolicy>,
    },
    /// End the session.
    Exit,
}

impl Command {
    /// Parses one line; blank lines and `#` comments give `None`.
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some(&head) = parts.first() else {
            return Ok(None);
        };
        let command = match head {
            k if k.starts_with('#') => return Ok(None),
            "build" => match parts.as_slice() {
                [_, graph] => Self::Build(Label::new(graph)),
                _ => return Err(CommandError::Usage(BUILD_USAGE)),
            },
            "search" => {
                let (domain, query, target, policy) = match parts.as_slice() {
                    [_, d, q, t] => (d, q, t, None),
                    [_, d, q, t, p] => (d, q, t, Some(p)),
                    _ => return Err(CommandError::Usage(SEARCH_USAGE)),
                };
                let domain = DomainArg::from_str(domain, true).map_err(|_| CommandError::Usage(SEARCH_USAGE))?;
                let policy = policy
                    .map(|p| PolicyArg::from_str(p, true).map_err(|_| CommandError::Usage(SEARCH_USAGE)))
                    .transpose()?;
                Self::Search {
                    domain: domain.into(),
                    query: Label::new(query),
                    target: Label::new(target),
                    policy: policy.map(Into::into),
                }
            }
            "exit" | "quit" => Self::Exit,
            other => return Err(CommandError::Unknown(other.to_owned())),
        };
        Ok(Some(command))
    }
}

/// A loaded store plus the compressions built so far.
pub struct Session {
    store: MemoryStore,
    config: Config,
    compressed: HashMap<Label, CompressedGraph>,
    persist: bool,
    json: bool,
}

impl Session {
    pub fn new(store: MemoryStore, config: Config) -> Self {
        Self {
            store,
            config,
            compressed: HashMap::new(),
            persist: false,
            json: false,
        }
    }

    /// Write every built compression back into the store.
    pub const fn persist(mut self, persist: bool) -> Self {
        self.persist = persist;
        self
    }

    /// Emit one JSON object per search instead of `q,t;` lines.
    pub const fn json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    /// Runs commands until `exit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> std::io::Result<()> {
        for line in input.lines() {
            let line = line?;
            match Command::parse(&line).and_then(|c| c.map_or(Ok(true), |c| self.execute(c, out))) {
                Ok(true) => {}
                Ok(false) => break,
                Err(CommandError::Output(e)) => return Err(e),
                Err(e) => {
                    error!("{}", e);
                    writeln!(out, "error: {e}")?;
                }
            }
        }
        Ok(())
    }

    /// Executes one command; `Ok(false)` ends the session.
    pub fn execute<W: Write>(&mut self, command: Command, out: &mut W) -> Result<bool, CommandError> {
        match command {
            Command::Build(label) => {
                self.build(&label)?;
                writeln!(out, "built {label}")?;
            }
            Command::Search {
                domain,
                query,
                target,
                policy,
            } => {
                let mut config = self.config.clone();
                config.domain_policy = domain;
                if let Some(policy) = policy {
                    config.search_policy = policy;
                }
                let outcome = self.search(&query, &target, &config)?;
                self.print(&query, &target, &outcome, out)?;
            }
            Command::Exit => return Ok(false),
        }
        Ok(true)
    }

    fn require(&self, label: &Label) -> Result<(), CommandError> {
        if self.store.find_nodes_by_label(label)?.is_empty() {
            return Err(CommandError::UnknownGraph(label.clone()));
        }
        Ok(())
    }

    fn build(&mut self, label: &Label) -> Result<(), CommandError> {
        self.require(label)?;
        let index = GraphIndex::build(&self.store, label)?;
        let compressed = AdaptedGraphBuilder::new(&index, &self.config).build()?;
        info!(
            "{}: {} hidden, {} SC edges",
            label,
            compressed.hidden_count(),
            compressed.sc_edge_count()
        );
        if self.persist {
            compressed.persist(&index, &mut self.store)?;
        }
        self.compressed.insert(label.clone(), compressed);
        Ok(())
    }

    fn search(&self, query: &Label, target: &Label, config: &Config) -> Result<MatchOutcome, CommandError> {
        self.require(query)?;
        self.require(target)?;
        Ok(match_graphs(
            &self.store,
            query,
            target,
            config,
            self.compressed.get(target),
        )?)
    }

    fn print<W: Write>(
        &self,
        query: &Label,
        target: &Label,
        outcome: &MatchOutcome,
        out: &mut W,
    ) -> Result<(), CommandError> {
        if self.json {
            let record = serde_json::json!({
                "query": query.as_str(),
                "target": target.as_str(),
                "cap_reached": outcome.cap_reached(),
                "embeddings": outcome.embeddings(),
            });
            serde_json::to_writer(&mut *out, &record)?;
            writeln!(out)?;
            return Ok(());
        }
        if outcome.is_empty() {
            writeln!(out, "No Solutions")?;
            return Ok(());
        }
        for embedding in outcome.embeddings() {
            for (q, t) in embedding {
                write!(out, "{q},{t};")?;
            }
            writeln!(out)?;
        }
        Ok(())
    }
}
