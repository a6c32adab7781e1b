//! Binding patterns for generator clauses.
//!
//! A generator binds the value it draws to a pattern: a single name, a
//! wildcard, or an arbitrarily nested tuple of patterns.
//!
//! # Examples
//!
//! ```rust
//! use bindchain::clause::Pattern;
//!
//! let pattern = Pattern::tuple([
//!     Pattern::from("v1"),
//!     Pattern::tuple([Pattern::from("v2"), Pattern::Wildcard]),
//! ]);
//! assert_eq!(format!("{pattern}"), "(v1, (v2, _))");
//! let names: Vec<_> = pattern.names().iter().map(|name| name.to_string()).collect();
//! assert_eq!(names, vec!["v1", "v2"]);
//! ```

use std::fmt;

use super::{Name, Scope};
use crate::error::DoError;
use crate::value::Value;

/// The left-hand side of a generator clause.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Pattern {
    /// Binds the whole value to a name.
    Bind(Name),
    /// Discards the value.
    Wildcard,
    /// Destructures the value into exactly as many parts as sub-patterns.
    Tuple(Vec<Self>),
}

impl Pattern {
    /// Creates a single-name pattern.
    #[must_use]
    pub fn name(name: impl Into<Name>) -> Self {
        Self::Bind(name.into())
    }

    /// Creates a tuple pattern from its parts.
    #[must_use]
    pub fn tuple(parts: impl IntoIterator<Item = Self>) -> Self {
        Self::Tuple(parts.into_iter().collect())
    }

    /// Returns every name this pattern binds, in source order.
    #[must_use]
    pub fn names(&self) -> Vec<Name> {
        let mut names = Vec::new();
        self.collect_names(&mut names);
        names
    }

    fn collect_names(&self, names: &mut Vec<Name>) {
        match self {
            Self::Bind(name) => names.push(name.clone()),
            Self::Wildcard => {}
            Self::Tuple(parts) => {
                for part in parts {
                    part.collect_names(names);
                }
            }
        }
    }

    /// Binds `value` into `scope` according to this pattern.
    ///
    /// # Errors
    ///
    /// Returns [`DoError::PatternMismatch`] when a tuple pattern meets a
    /// value that does not destructure into the pattern's arity. `depth`
    /// identifies the generator for the error.
    pub fn bind<V: Value>(
        &self,
        value: V,
        depth: usize,
        scope: &mut Scope<V>,
    ) -> Result<(), DoError> {
        match self {
            Self::Bind(name) => {
                scope.insert(name.clone(), value);
                Ok(())
            }
            Self::Wildcard => Ok(()),
            Self::Tuple(parts) => {
                let expected = parts.len();
                let values = value
                    .destructure(expected)
                    .filter(|values| values.len() == expected)
                    .ok_or(DoError::PatternMismatch { expected, depth })?;
                for (part, value) in parts.iter().zip(values) {
                    part.bind(value, depth, scope)?;
                }
                Ok(())
            }
        }
    }
}

impl From<&str> for Pattern {
    /// `"_"` becomes [`Pattern::Wildcard`]; anything else a single name.
    fn from(text: &str) -> Self {
        if text == "_" {
            Self::Wildcard
        } else {
            Self::Bind(Name::from(text))
        }
    }
}

impl From<Name> for Pattern {
    fn from(name: Name) -> Self {
        Self::Bind(name)
    }
}

impl<const N: usize> From<[&str; N]> for Pattern {
    /// A flat tuple pattern, e.g. `["v1", "v2"]` for `(v1, v2)`.
    fn from(parts: [&str; N]) -> Self {
        Self::tuple(parts.map(Self::from))
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bind(name) => write!(formatter, "{name}"),
            Self::Wildcard => formatter.write_str("_"),
            Self::Tuple(parts) => {
                formatter.write_str("(")?;
                for (index, part) in parts.iter().enumerate() {
                    if index > 0 {
                        formatter.write_str(", ")?;
                    }
                    write!(formatter, "{part}")?;
                }
                formatter.write_str(")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::CapabilitySet;
    use rstest::rstest;

    #[derive(Debug, Clone, PartialEq)]
    enum Shape {
        Leaf(i32),
        Pair(Box<Shape>, Box<Shape>),
    }

    impl Value for Shape {
        type Error = DoError;

        fn capabilities(&self) -> Option<CapabilitySet<Self>> {
            None
        }

        fn destructure(&self, arity: usize) -> Option<Vec<Self>> {
            match self {
                Self::Pair(left, right) if arity == 2 => {
                    Some(vec![left.as_ref().clone(), right.as_ref().clone()])
                }
                _ => None,
            }
        }
    }

    fn pair(left: Shape, right: Shape) -> Shape {
        Shape::Pair(Box::new(left), Box::new(right))
    }

    #[rstest]
    fn test_bind_single_name() {
        let mut scope = Scope::new();
        Pattern::from("x")
            .bind(Shape::Leaf(7), 0, &mut scope)
            .unwrap();
        assert_eq!(scope.get("x"), Some(&Shape::Leaf(7)));
    }

    #[rstest]
    fn test_bind_nested_tuple() {
        let pattern = Pattern::tuple([
            Pattern::from("a"),
            Pattern::tuple([Pattern::from("b"), Pattern::from("c")]),
        ]);
        let value = pair(Shape::Leaf(1), pair(Shape::Leaf(2), Shape::Leaf(3)));
        let mut scope = Scope::new();
        pattern.bind(value, 0, &mut scope).unwrap();
        assert_eq!(scope.get("a"), Some(&Shape::Leaf(1)));
        assert_eq!(scope.get("b"), Some(&Shape::Leaf(2)));
        assert_eq!(scope.get("c"), Some(&Shape::Leaf(3)));
    }

    #[rstest]
    fn test_wildcard_binds_nothing() {
        let mut scope = Scope::new();
        Pattern::from(["_", "right"])
            .bind(pair(Shape::Leaf(1), Shape::Leaf(2)), 0, &mut scope)
            .unwrap();
        assert_eq!(scope.len(), 1);
        assert_eq!(scope.get("right"), Some(&Shape::Leaf(2)));
    }

    #[rstest]
    #[case(Pattern::from(["a", "b", "c"]), 3)]
    #[case(Pattern::from(["a", "b"]), 2)]
    fn test_bind_reports_arity_mismatch(#[case] pattern: Pattern, #[case] expected: usize) {
        let value = if expected == 2 {
            Shape::Leaf(1)
        } else {
            pair(Shape::Leaf(1), Shape::Leaf(2))
        };
        let mut scope = Scope::new();
        assert_eq!(
            pattern.bind(value, 4, &mut scope),
            Err(DoError::PatternMismatch { expected, depth: 4 })
        );
    }

    #[rstest]
    fn test_names_in_source_order() {
        let pattern = Pattern::tuple([
            Pattern::tuple([Pattern::from("z"), Pattern::Wildcard]),
            Pattern::from("a"),
        ]);
        assert_eq!(pattern.names(), vec![Name::from("z"), Name::from("a")]);
    }
}
