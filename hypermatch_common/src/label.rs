use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// Prefix of the per-node profile counter properties (`profile_<label>`).
pub const PROFILE_PREFIX: &str = "profile_";

/// A node label. One label on every node names the graph it belongs to
/// (the membership label); the remaining ones are content labels.
///
/// Cheap to clone: the name is shared.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Label(Arc<str>);

impl Label {
    /// Creates a label from its name.
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    /// The label name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The profile counter key tracking neighbors that carry this label.
    pub fn profile_key(&self) -> String {
        format!("{PROFILE_PREFIX}{}", self.0)
    }
}

impl fmt::Debug for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":{}", self.0)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Label {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Label {
    fn from(name: String) -> Self {
        Self(Arc::from(name))
    }
}

impl From<Label> for String {
    fn from(label: Label) -> Self {
        label.0.to_string()
    }
}

impl Borrow<str> for Label {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_key_uses_prefix() {
        assert_eq!(Label::new("A").profile_key(), "profile_A");
    }

    #[test]
    fn labels_compare_by_name() {
        assert_eq!(Label::from("x"), Label::from(String::from("x")));
        assert!(Label::from("a") < Label::from("b"));
    }
}
