use serde::{Deserialize, Serialize};

use crate::ids::NodeId;
use crate::label::PROFILE_PREFIX;

/// A node property value as held by the graph store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyValue {
    /// Integer value. Profile counters are always of this kind.
    Int(i64),
    /// Boolean flag.
    Bool(bool),
    /// Free text.
    Text(String),
    /// A list of store node ids (used for persisted SEC lists).
    Ids(Vec<NodeId>),
}

impl PropertyValue {
    /// Returns the integer payload, if this is an integer.
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the boolean payload, if this is a boolean.
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the id list payload, if this is an id list.
    pub fn as_ids(&self) -> Option<&[NodeId]> {
        match self {
            Self::Ids(v) => Some(v),
            _ => None,
        }
    }

    /// Short name of the value kind, for error messages.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Bool(_) => "bool",
            Self::Text(_) => "text",
            Self::Ids(_) => "ids",
        }
    }
}

/// Returns true for property keys holding profile counters.
pub fn is_profile_key(key: &str) -> bool {
    key.starts_with(PROFILE_PREFIX)
}
