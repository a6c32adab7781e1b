//! Name-to-value bindings visible to a closure.

use smallvec::SmallVec;

use super::Name;
use crate::error::DoError;

/// The captured lexical bindings a front-end supplies with a sequence.
///
/// These are the free variables of the enclosing scope. The chain reads them
/// but never mutates them.
pub type Environment<V> = Scope<V>;

/// An ordered set of bindings.
///
/// Scopes stay small (a closure holds only the names it reads), so entries
/// live inline and lookup is a linear scan.
///
/// # Examples
///
/// ```rust
/// use bindchain::clause::{Name, Scope};
///
/// let mut scope = Scope::new();
/// scope.insert(Name::from("x"), 1);
/// scope.insert(Name::from("x"), 2);
/// assert_eq!(scope.get("x"), Some(&2));
/// assert_eq!(scope.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Scope<V> {
    entries: SmallVec<[(Name, V); 4]>,
}

impl<V> Scope<V> {
    /// Creates an empty scope.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: SmallVec::new(),
        }
    }

    /// Binds `name` to `value`, replacing any previous binding of `name`.
    pub fn insert(&mut self, name: Name, value: V) {
        match self.entries.iter_mut().find(|(bound, _)| *bound == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Returns the value bound to `name`, if any.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&V> {
        self.entries
            .iter()
            .find(|(bound, _)| bound.as_str() == name)
            .map(|(_, value)| value)
    }

    /// Returns the value bound to `name`.
    ///
    /// # Errors
    ///
    /// Returns [`DoError::UnboundName`] when `name` is not in this scope,
    /// which happens when a closure reads a name it did not declare.
    pub fn lookup(&self, name: &str) -> Result<&V, DoError> {
        self.get(name)
            .ok_or_else(|| DoError::UnboundName(Name::from(name)))
    }

    /// Returns `true` if `name` is bound.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterates over the bound names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &Name> {
        self.entries.iter().map(|(name, _)| name)
    }

    /// Returns the number of bindings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V: Clone> Scope<V> {
    /// Copies the bindings for `names` into a new scope.
    ///
    /// Names missing from `self` are skipped.
    #[must_use]
    pub fn project<'a>(&self, names: impl IntoIterator<Item = &'a Name>) -> Self {
        let mut projected = Self::new();
        for name in names {
            if let Some(value) = self.get(name.as_str()) {
                projected.insert(name.clone(), value.clone());
            }
        }
        projected
    }

    /// Adds every binding of `other`, overriding on collision.
    pub fn extend_from(&mut self, other: &Self) {
        for (name, value) in &other.entries {
            self.insert(name.clone(), value.clone());
        }
    }
}

impl<V> Default for Scope<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> FromIterator<(Name, V)> for Scope<V> {
    fn from_iter<I: IntoIterator<Item = (Name, V)>>(iter: I) -> Self {
        let mut scope = Self::new();
        for (name, value) in iter {
            scope.insert(name, value);
        }
        scope
    }
}
