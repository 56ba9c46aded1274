use contracts::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;

/// Persistent identifier of a node inside the backing graph store.
/// This is what solutions report and what the store understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId {
    inner: u64,
}

impl NodeId {
    /// Creates a store id from a raw integer.
    pub const fn new(id: u64) -> Self {
        Self { inner: id }
    }

    /// The raw integer behind this id.
    pub const fn raw(self) -> u64 {
        self.inner
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<u64> for NodeId {
    #[inline]
    fn from(id: u64) -> Self {
        Self { inner: id }
    }
}

/// Local identifier within a specific GraphIndex array.
/// Exclusively used inside the matcher for performance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIdx {
    /// The underlying raw integer index.
    inner: u32,
}

impl NodeIdx {
    /// Creates a new local graph index from a raw integer.
    #[ensures(ret.inner == id)]
    pub const fn new(id: u32) -> Self {
        Self { inner: id }
    }

    /// Returns the index as a usize for array access.
    #[ensures(ret == self.inner as usize)]
    pub const fn as_usize(self) -> usize {
        self.inner as usize
    }
}

impl fmt::Display for NodeIdx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.inner)
    }
}

impl From<usize> for NodeIdx {
    #[inline]
    fn from(id: usize) -> Self {
        Self { inner: id as u32 }
    }
}

impl From<NodeIdx> for usize {
    #[inline]
    fn from(id: NodeIdx) -> Self {
        id.inner as Self
    }
}

impl From<NodeIdx> for u32 {
    #[inline]
    fn from(id: NodeIdx) -> Self {
        id.inner
    }
}
