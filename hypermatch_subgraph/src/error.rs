use hypermatch_common::{Label, NodeId, StoreError};
use thiserror::Error;

/// Failures of a compression or match request.
///
/// An empty candidate domain or a reached solution cap are results, not errors.
#[derive(Debug, Error)]
pub enum MatchError {
    /// The graph store failed while the request was reading it.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
    /// Strict label checking found a node with more than one content label.
    #[error("Node {node} carries {} content labels ({}), expected one", .labels.len(), join(.labels))]
    MultipleContentLabels {
        /// Offending node.
        node: NodeId,
        /// Its content labels.
        labels: Vec<Label>,
    },
    /// A profile counter is not an integer.
    #[error("Profile property '{key}' on node {node} is {kind}, expected int")]
    InvalidProfile {
        /// Node carrying the property.
        node: NodeId,
        /// Property key.
        key: String,
        /// Actual value kind.
        kind: &'static str,
    },
}

fn join(labels: &[Label]) -> String {
    labels
        .iter()
        .map(Label::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
