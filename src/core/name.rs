use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a person in the referral network.
///
/// Every deal is keyed by its `name`, and a deal's `referred_by` field
/// holds the name of another person. A name does not have to belong to a
/// deal: a referrer who never closed a deal is still a valid chain root.
///
/// # Examples
///
/// ```
/// use referral_breakdown::core::name::Name;
///
/// let alice = Name::new("Alice");
/// let bob = Name::new("Bob");
/// assert_ne!(alice, bob);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Name(String);

impl Name {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the string representation of this name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the name is empty or whitespace only.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Name {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Name {
    fn from(s: String) -> Self {
        Self(s)
    }
}
