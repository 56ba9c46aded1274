//! Common types shared across the hypermatch workspace.
//!
//! This crate provides node identifiers, labels and property values, the
//! search configuration, the graph-store contracts consumed by the matcher,
//! and [`GraphIndex`], the dense snapshot of one labeled graph that every
//! matching stage works on.

mod config;
mod ids;
mod label;
mod property;
mod store;

pub mod index;

pub use crate::config::*;
pub use crate::ids::*;
pub use crate::index::GraphIndex;
pub use crate::label::*;
pub use crate::property::*;
pub use crate::store::*;

pub use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
