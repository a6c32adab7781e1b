//! Identifiers bound by generators or captured from the enclosing scope.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// An identifier in a comprehension.
///
/// Cloning is cheap: the text is shared behind an `Arc`.
///
/// # Examples
///
/// ```rust
/// use bindchain::clause::Name;
///
/// let name = Name::from("v1");
/// assert_eq!(name.as_str(), "v1");
/// assert_eq!(format!("{name}"), "v1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Name(Arc<str>);

impl Name {
    /// Creates a name from any string-like value.
    #[must_use]
    pub fn new(text: impl Into<Arc<str>>) -> Self {
        Self(text.into())
    }

    /// Returns the identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Name {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

impl Borrow<str> for Name {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Name {
    fn from(text: &str) -> Self {
        Self(Arc::from(text))
    }
}

impl From<String> for Name {
    fn from(text: String) -> Self {
        Self(Arc::from(text))
    }
}

impl From<&Name> for Name {
    fn from(name: &Name) -> Self {
        name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rustc_hash::FxHashSet;

    #[rstest]
    fn test_name_borrows_as_str() {
        let mut names = FxHashSet::default();
        names.insert(Name::from("left"));
        assert!(names.contains("left"));
        assert!(!names.contains("right"));
    }

    #[rstest]
    fn test_name_from_string_matches_from_str() {
        assert_eq!(Name::from(String::from("x")), Name::from("x"));
        assert_eq!(Name::new("x"), Name::from("x"));
    }
}
